use std::ops::{AddAssign, MulAssign, SubAssign};

use crate::{approx::ApproxEq, Number, Quat, QuatExpr, QuatMul};

quat_expr_ops! {
    [T] Quat<T>;
    ['a, T] &'a Quat<T>;
}

quat_expr_eq! {
    [T] Quat<T>;
}

impl<T> Eq for Quat<T> where T: Eq + Copy {}

impl<T> ApproxEq for Quat<T>
where
    T: ApproxEq,
{
    type Tolerance = T::Tolerance;

    fn abs_diff_eq(&self, other: &Self, abs_tolerance: Self::Tolerance) -> bool {
        self.0.abs_diff_eq(&other.0, abs_tolerance)
    }

    fn rel_diff_eq(&self, other: &Self, rel_tolerance: Self::Tolerance) -> bool {
        self.0.rel_diff_eq(&other.0, rel_tolerance)
    }

    fn ulps_diff_eq(&self, other: &Self, ulps_tolerance: u32) -> bool {
        self.0.ulps_diff_eq(&other.0, ulps_tolerance)
    }
}

impl<T, E> AddAssign<E> for Quat<T>
where
    T: Number,
    E: QuatExpr<Elem = T>,
{
    fn add_assign(&mut self, rhs: E) {
        let [w, x, y, z] = &mut self.0;
        *w = *w + rhs.w();
        *x = *x + rhs.x();
        *y = *y + rhs.y();
        *z = *z + rhs.z();
    }
}

impl<T, E> SubAssign<E> for Quat<T>
where
    T: Number,
    E: QuatExpr<Elem = T>,
{
    fn sub_assign(&mut self, rhs: E) {
        let [w, x, y, z] = &mut self.0;
        *w = *w - rhs.w();
        *x = *x - rhs.x();
        *y = *y - rhs.y();
        *z = *z - rhs.z();
    }
}

/// Right-multiplication with a quaternion expression (`q = q * rhs`).
impl<T, E> MulAssign<E> for Quat<T>
where
    T: Number,
    E: QuatExpr<Elem = T>,
{
    fn mul_assign(&mut self, rhs: E) {
        *self = QuatMul::new(*self, rhs).eval();
    }
}

#[cfg(test)]
mod tests {
    use crate::Quat;

    #[test]
    fn compound_assignment() {
        let mut q = Quat::new(1i32, 2, 3, 4);
        q += Quat::new(1, 1, 1, 1);
        assert_eq!(q, Quat::new(2, 3, 4, 5));
        q -= Quat::<i32>::IDENTITY;
        assert_eq!(q, Quat::new(1, 3, 4, 5));

        let i = Quat::new(0i32, 1, 0, 0);
        let mut p = i;
        p *= Quat::new(0, 0, 1, 0);
        assert_eq!(p, i * Quat::new(0, 0, 1, 0));
        assert_eq!(p, Quat::new(0, 0, 0, 1));
    }

    #[test]
    fn by_reference() {
        let q = Quat::new(2.0f32, -1.0, 0.5, 4.0);
        assert_eq!(&q * &q, q * q);
        assert_eq!(2.0 * &q, &q + &q);
        assert_eq!(-&q, q * -1.0);
    }
}
