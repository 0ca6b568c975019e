//! Quaternions and quaternion algebra.
//!
//! The [`QuatExpr`] contract is implemented by the [`Quat`] container and by the lazy nodes built
//! by the arithmetic operators. `*` between two quaternion expressions is the Hamilton product,
//! and `/` multiplies with the [`inverse`] of the right-hand side.
//!
//! The free functions in this module take any quaternion expression. [`conjugate`] and
//! [`inverse`] are also re-exported at the crate root; [`dot`] and [`magnitude`] are not, since
//! those names belong to the vector functions there.

mod expr;
mod ops;

use std::fmt;

use crate::{vec3, Interop, Number, One, Sqrt, Trig, Vec3, VectorExpr, Zero};

pub use expr::*;

/// The quaternion contract: a real part `w` and the imaginary parts `x`, `y` and `z`.
///
/// # Examples
///
/// ```
/// # use vecta::*;
/// let i = Quat::new(0, 1, 0, 0);
/// let j = Quat::new(0, 0, 1, 0);
/// let k = i * j;
/// assert_eq!((k.w(), k.x(), k.y(), k.z()), (0, 0, 0, 1));
/// ```
pub trait QuatExpr {
    /// The scalar type of the components.
    type Elem: Copy;

    /// Returns the real part.
    fn w(&self) -> Self::Elem;
    /// Returns the `i` coefficient.
    fn x(&self) -> Self::Elem;
    /// Returns the `j` coefficient.
    fn y(&self) -> Self::Elem;
    /// Returns the `k` coefficient.
    fn z(&self) -> Self::Elem;

    /// Evaluates all four components into a [`Quat`].
    fn eval(&self) -> Quat<Self::Elem> {
        Quat::new(self.w(), self.x(), self.y(), self.z())
    }
}

impl<E: QuatExpr + ?Sized> QuatExpr for &E {
    type Elem = E::Elem;

    #[inline]
    fn w(&self) -> Self::Elem {
        (**self).w()
    }

    #[inline]
    fn x(&self) -> Self::Elem {
        (**self).x()
    }

    #[inline]
    fn y(&self) -> Self::Elem {
        (**self).y()
    }

    #[inline]
    fn z(&self) -> Self::Elem {
        (**self).z()
    }
}

/// A quaternion consisting of a real number and 3 imaginary numbers.
///
/// Unit-length quaternions ("*versors*") are commonly used to represent rotations in 3D space.
///
/// The components are stored in `[w, x, y, z]` order, where `x`, `y` and `z` correspond to the
/// `i`, `j` and `k` imaginary parts.
#[derive(Clone, Copy, Hash)]
#[repr(transparent)]
pub struct Quat<T>([T; 4]);

unsafe impl<T: bytemuck::Zeroable> bytemuck::Zeroable for Quat<T> {}
unsafe impl<T: bytemuck::Pod> bytemuck::Pod for Quat<T> {}

impl<T: Copy> QuatExpr for Quat<T> {
    type Elem = T;

    #[inline]
    fn w(&self) -> T {
        self.0[0]
    }

    #[inline]
    fn x(&self) -> T {
        self.0[1]
    }

    #[inline]
    fn y(&self) -> T {
        self.0[2]
    }

    #[inline]
    fn z(&self) -> T {
        self.0[3]
    }

    #[inline]
    fn eval(&self) -> Self {
        *self
    }
}

impl<T: Zero + One> Quat<T> {
    /// The multiplicative identity.
    ///
    /// This is a unit quaternion that will not change a vector it is multiplied with.
    pub const IDENTITY: Self = Self([T::ONE, T::ZERO, T::ZERO, T::ZERO]);
}

impl<T: Zero> Quat<T> {
    /// A quaternion with all components set to 0.
    pub const ZERO: Self = Self([T::ZERO, T::ZERO, T::ZERO, T::ZERO]);
}

impl<T> Quat<T> {
    /// Creates a quaternion from its real part `w` and its imaginary parts `x`, `y` and `z`.
    #[inline]
    pub const fn new(w: T, x: T, y: T, z: T) -> Self {
        Self([w, x, y, z])
    }

    /// Evaluates any quaternion expression into a [`Quat`], converting the scalar type if needed.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vecta::*;
    /// let q = Quat::new(1.5f32, -2.0, 0.25, 8.0);
    /// let wide = Quat::<f64>::from_expr(q * 2.0);
    /// assert_eq!(wide, Quat::new(3.0f64, -4.0, 0.5, 16.0));
    /// ```
    pub fn from_expr<E>(expr: E) -> Self
    where
        E: QuatExpr,
        T: Interop<E::Elem>,
    {
        Self::new(
            T::from(expr.w()),
            T::from(expr.x()),
            T::from(expr.y()),
            T::from(expr.z()),
        )
    }

    /// Overwrites all components with those of `expr`.
    ///
    /// `expr` is fully evaluated before any component is written, so it may read from `self`.
    pub fn assign<E>(&mut self, expr: E)
    where
        E: QuatExpr<Elem = T>,
    {
        *self = Self::new(expr.w(), expr.x(), expr.y(), expr.z());
    }

    /// Creates a quaternion that rotates by `angle` radians around `axis`.
    ///
    /// `axis` is expected to have unit length.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vecta::*;
    /// let q = Quat::from_axis_angle(Vec3f::Z, std::f32::consts::FRAC_PI_2);
    /// assert_approx_eq!(q.rotate(Vec3f::X), Vec3f::Y).abs(1e-6);
    /// ```
    pub fn from_axis_angle<A>(axis: A, angle: T) -> Self
    where
        A: VectorExpr<3, Elem = T>,
        T: Number + Trig,
    {
        let half = angle / (T::ONE + T::ONE);
        let (sin, cos) = (half.sin(), half.cos());
        Self::new(cos, axis.at(0) * sin, axis.at(1) * sin, axis.at(2) * sin)
    }

    /// Rotates a 3-dimensional vector by this quaternion (computes `q * v * conjugate(q)`).
    ///
    /// If `self` is not of unit length, the result is also scaled by its squared magnitude.
    pub fn rotate<V>(self, v: V) -> Vec3<T>
    where
        V: VectorExpr<3, Elem = T>,
        T: Number,
    {
        let p = Quat::new(T::ZERO, v.at(0), v.at(1), v.at(2));
        let r = QuatMul::new(QuatMul::new(self, p), QuatConj::new(self)).eval();
        vec3(r.x(), r.y(), r.z())
    }

    /// Returns the conjugate of this quaternion (the imaginary parts negated).
    #[inline]
    pub fn conjugate(self) -> Self
    where
        T: Number,
    {
        conjugate(self).eval()
    }

    /// Returns the multiplicative inverse of this quaternion.
    pub fn inverse(self) -> Self
    where
        T: Number,
    {
        inverse(self).eval()
    }

    /// Returns the 4-dimensional dot product of `self` and `other`.
    #[inline]
    pub fn dot(self, other: Self) -> T
    where
        T: Number,
    {
        dot(self, other)
    }

    /// Returns the length of this quaternion.
    ///
    /// If the length is not equal to one, rotating a vector with this quaternion will scale the
    /// vector in addition to rotating it.
    #[doc(alias = "norm", alias = "length")]
    #[inline]
    pub fn magnitude(self) -> T
    where
        T: Number + Sqrt,
    {
        magnitude(self)
    }

    /// Returns a normalized copy of this quaternion (whose length equals one).
    pub fn normalize(self) -> Self
    where
        T: Number + Sqrt,
    {
        let len = self.magnitude();
        Self(self.0.map(|c| c / len))
    }

    /// Returns the components in `[w, x, y, z]` order.
    #[inline]
    pub const fn as_array(&self) -> &[T; 4] {
        &self.0
    }

    #[inline]
    pub fn into_array(self) -> [T; 4] {
        self.0
    }
}

impl<T> From<[T; 4]> for Quat<T> {
    /// Creates a quaternion from its components in `[w, x, y, z]` order.
    #[inline]
    fn from(wxyz: [T; 4]) -> Self {
        Self(wxyz)
    }
}

impl<T> From<Quat<T>> for [T; 4] {
    #[inline]
    fn from(q: Quat<T>) -> Self {
        q.0
    }
}

impl<T: Default> Default for Quat<T> {
    fn default() -> Self {
        Self(Default::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Quat<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [w, x, y, z] = &self.0;
        f.debug_struct("Quat")
            .field("w", w)
            .field("x", x)
            .field("y", y)
            .field("z", z)
            .finish()
    }
}

/// Computes the 4-dimensional dot product of two quaternion expressions.
pub fn dot<A, B>(a: A, b: B) -> A::Elem
where
    A: QuatExpr,
    B: QuatExpr<Elem = A::Elem>,
    A::Elem: Number,
{
    a.w() * b.w() + a.x() * b.x() + a.y() * b.y() + a.z() * b.z()
}

/// Computes the length of a quaternion expression.
///
/// # Examples
///
/// ```
/// # use vecta::*;
/// assert_eq!(quat::magnitude(Quat::new(1.0, 1.0, 1.0, 1.0)), 2.0);
/// ```
pub fn magnitude<Q>(q: Q) -> Q::Elem
where
    Q: QuatExpr,
    Q::Elem: Number + Sqrt,
{
    dot(&q, &q).sqrt()
}

/// Returns the conjugate of a quaternion expression, which negates `x`, `y` and `z`.
///
/// # Examples
///
/// ```
/// # use vecta::*;
/// let q = Quat::new(1, 2, 3, 4);
/// assert_eq!(conjugate(q), Quat::new(1, -2, -3, -4));
/// ```
#[inline]
pub fn conjugate<Q>(q: Q) -> QuatConj<Q>
where
    Q: QuatExpr,
    Q::Elem: Number,
{
    QuatConj::new(q)
}

/// The expression type returned by [`inverse`].
pub type Inverse<Q> = QuatDivScalar<QuatConj<Q>, <Q as QuatExpr>::Elem>;

/// Returns the multiplicative inverse of a quaternion expression: its conjugate divided by its
/// squared magnitude.
///
/// The squared magnitude is computed immediately, the division happens lazily per component.
/// The inverse of a zero quaternion divides by zero.
///
/// # Examples
///
/// ```
/// # use vecta::*;
/// let q = Quat::new(3.0f64, 13.0, 7.0, 19.0);
/// assert_approx_eq!((inverse(q) * q).eval(), Quat::IDENTITY).abs(1e-12);
/// assert_approx_eq!((q / q).eval(), Quat::IDENTITY).abs(1e-12);
/// ```
pub fn inverse<Q>(q: Q) -> Inverse<Q>
where
    Q: QuatExpr,
    Q::Elem: Number,
{
    let norm2 = dot(&q, &q);
    QuatDivScalar::new(QuatConj::new(q), norm2)
}

#[cfg(test)]
mod tests {
    use crate::{assert_approx_eq, Vec3f};

    use super::*;

    #[test]
    fn accessors() {
        let q = Quat::new(1, 2, 3, 4);
        assert_eq!((q.w(), q.x(), q.y(), q.z()), (1, 2, 3, 4));
        assert_eq!(q.as_array(), &[1, 2, 3, 4]);
        assert_eq!(Quat::<f32>::default(), Quat::ZERO);
    }

    #[test]
    fn fmt() {
        assert_eq!(
            format!("{:?}", Quat::<i32>::IDENTITY),
            "Quat { w: 1, x: 0, y: 0, z: 0 }"
        );
    }

    #[test]
    fn identities() {
        let one = Quat::<i64>::IDENTITY;
        let i = Quat::new(0i64, 1, 0, 0);
        let j = Quat::new(0i64, 0, 1, 0);
        let k = Quat::new(0i64, 0, 0, 1);

        assert_eq!(i * i, -one);
        assert_eq!(j * j, -one);
        assert_eq!(k * k, -one);
        assert_eq!(i * j * k, -one);
        assert_eq!(i * j, k);
        assert_eq!(j * k, i);
        assert_eq!(k * i, j);
        assert_eq!(j * i, -k);
        assert_eq!(k * j, -i);
        assert_eq!(i * k, -j);
        assert_eq!(one * k, k);
    }

    #[test]
    fn hamilton() {
        let l = Quat::new(3i32, 13, 7, 19);
        let r = Quat::new(5i32, 11, 23, 29);
        let p = l * r;
        assert_eq!(p.w(), 3 * 5 - 13 * 11 - 7 * 23 - 19 * 29);
        assert_eq!(p.x(), 3 * 11 + 13 * 5 + 7 * 29 - 19 * 23);
        assert_eq!(p.y(), 3 * 23 - 13 * 29 + 7 * 5 + 19 * 11);
        assert_eq!(p.z(), 3 * 29 + 13 * 23 - 7 * 11 + 19 * 5);
        assert_ne!(l * r, r * l);
    }

    #[test]
    fn inverse_law() {
        let q = Quat::new(0.5f32, -1.5, 2.0, 0.25);
        assert_approx_eq!((inverse(q) * q).eval(), Quat::IDENTITY).abs(1e-5);
        assert_approx_eq!((q * inverse(&q)).eval(), Quat::IDENTITY).abs(1e-5);
        assert_approx_eq!(q.inverse().inverse(), q).abs(1e-5);

        let r = Quat::new(2.0f32, 0.0, -1.0, 3.0);
        assert_approx_eq!((q * r / r).eval(), q).abs(1e-5);
    }

    #[test]
    fn conversions() {
        let q = Quat::new(1i32, -2, 3, -4);
        let f = Quat::<f64>::from_expr(-q);
        assert_eq!(f, Quat::new(-1.0, 2.0, -3.0, 4.0));

        let mut m = Quat::<i32>::ZERO;
        m.assign(q * 2);
        assert_eq!(m, Quat::new(2, -4, 6, -8));
        m.assign(conjugate(m) / 2);
        assert_eq!(m, Quat::new(1, 2, -3, 4));
    }

    #[test]
    fn rotation() {
        let q = Quat::from_axis_angle(Vec3f::X, std::f32::consts::PI);
        assert_approx_eq!(q.magnitude(), 1.0);
        assert_approx_eq!(q.rotate(Vec3f::Y), (-Vec3f::Y).eval()).abs(1e-6);
        assert_approx_eq!(q.rotate(Vec3f::X), Vec3f::X).abs(1e-6);

        let n = Quat::new(0.0f32, 3.0, 0.0, 4.0).normalize();
        assert_eq!(n, Quat::new(0.0f32, 0.6, 0.0, 0.8));
        assert_eq!(dot(n, n), n.dot(n));
    }
}
