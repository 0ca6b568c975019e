//! Implementations of `std::ops`.

use std::ops::{AddAssign, DivAssign, Index, IndexMut, MulAssign, SubAssign};

use crate::{approx::ApproxEq, Number, VectorExpr};

use super::Vector;

impl<T, const N: usize> Index<usize> for Vector<T, N> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<T, const N: usize> IndexMut<usize> for Vector<T, N> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

vector_expr_ops! {
    [T, const N: usize] Vector<T, N> => N;
    ['a, T, const N: usize] &'a Vector<T, N> => N;
}

// Compares against any vector expression, including arrays.
vector_expr_eq! {
    [T, const N: usize] Vector<T, N> => N;
}

impl<T, const N: usize> Eq for Vector<T, N> where T: Eq + Copy {}

impl<T, U, const N: usize> PartialEq<Vector<U, N>> for [T; N]
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &Vector<U, N>) -> bool {
        *self == other.0
    }
}

impl<T, const N: usize> ApproxEq for Vector<T, N>
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

/// Element-wise addition.
impl<T, E, const N: usize> AddAssign<E> for Vector<T, N>
where
    T: Number,
    E: VectorExpr<N, Elem = T>,
{
    fn add_assign(&mut self, rhs: E) {
        for (i, lhs) in self.0.iter_mut().enumerate() {
            *lhs = *lhs + rhs.at(i);
        }
    }
}

/// Element-wise subtraction.
impl<T, E, const N: usize> SubAssign<E> for Vector<T, N>
where
    T: Number,
    E: VectorExpr<N, Elem = T>,
{
    fn sub_assign(&mut self, rhs: E) {
        for (i, lhs) in self.0.iter_mut().enumerate() {
            *lhs = *lhs - rhs.at(i);
        }
    }
}

/// Vector-Scalar multiplication (scaling).
impl<T, const N: usize> MulAssign<T> for Vector<T, N>
where
    T: Number,
{
    fn mul_assign(&mut self, rhs: T) {
        self.as_mut_slice()
            .iter_mut()
            .for_each(|lhs| *lhs = *lhs * rhs);
    }
}

/// Vector-Scalar division (scaling).
impl<T, const N: usize> DivAssign<T> for Vector<T, N>
where
    T: Number,
{
    fn div_assign(&mut self, rhs: T) {
        self.as_mut_slice()
            .iter_mut()
            .for_each(|lhs| *lhs = *lhs / rhs);
    }
}

#[cfg(test)]
mod tests {
    use std::num::Wrapping;

    use crate::{assert_approx_eq, dot, vec2, vec3, Vec3f, VectorExpr};

    #[test]
    fn compound_assignment() {
        let mut v = vec3(1i32, 2, 3);
        v += vec3(1, 1, 1);
        assert_eq!(v, [2, 3, 4]);
        v -= [2, 2, 2];
        assert_eq!(v, [0, 1, 2]);
        v *= 3;
        assert_eq!(v, [0, 3, 6]);
        v /= 3;
        assert_eq!(v, [0, 1, 2]);

        let mut w = Vec3f::X;
        w += Vec3f::Y * 2.0;
        assert_eq!(w, vec3(1.0f32, 2.0, 0.0));
    }

    #[test]
    fn array_comparison() {
        assert_eq!([1, 2], vec2(1, 2));
        assert_ne!(vec2(1, 2), [2, 1]);
    }

    #[test]
    fn scalar_commutes() {
        let v = vec3(0.5f64, -1.25, 8.0);
        assert_eq!((2.0 * v).eval(), (v * 2.0).eval());
        assert_eq!(2.0 * &v, v * 2.0);
        assert_approx_eq!((v / 3.0).eval(), vec3(0.5 / 3.0, -1.25 / 3.0, 8.0 / 3.0));
    }

    #[test]
    fn wrapping_elements() {
        let a = vec2(Wrapping(127i8), Wrapping(-128));
        let b = vec2(Wrapping(1i8), Wrapping(1));
        assert_eq!((a + b).eval(), vec2(Wrapping(-128i8), Wrapping(-127)));
        assert_eq!((b - a).eval(), vec2(Wrapping(-126i8), Wrapping(-127)));
        assert_eq!((-a).eval(), vec2(Wrapping(-127i8), Wrapping(-128)));
        assert_eq!((a * Wrapping(2i8)).eval(), vec2(Wrapping(-2i8), Wrapping(0)));
        assert_eq!(Wrapping(2i8) * a, a * Wrapping(2i8));
        assert_eq!(dot(a, a), Wrapping(1i8));

        let mut c = a;
        c += b;
        assert_eq!(c, [Wrapping(-128i8), Wrapping(-127)]);
    }
}
