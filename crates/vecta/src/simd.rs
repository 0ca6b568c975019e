//! Register-backed vectors and quaternions.
//!
//! [`SimdVector`] and [`SimdQuat`] store their components in the register type of an instruction
//! set tag and implement their operators with that tag's [`Kernels`]. The tag defaults to
//! [`Native`], the best one the build target enables. Naming a tag that the build does not enable
//! fails to compile, because its kernels don't exist.
//!
//! Both types also implement the [`VectorExpr`] and [`QuatExpr`] contracts, so they can be mixed
//! with the generic containers and expression nodes, and the results always match the generic
//! evaluation (up to the rounding of reordered or fused floating-point operations).
//!
//! # Examples
//!
//! ```
//! use vecta::{isa::NoIsa, simd::SimdVector, vec3, VectorExpr};
//!
//! let a = SimdVector::<f32, 3>::new([1.0, 0.0, 0.0]);
//! let b = SimdVector::<f32, 3>::new([0.0, 1.0, 0.0]);
//! assert_eq!(a.cross(b).to_array(), [0.0, 0.0, 1.0]);
//! assert_eq!((a + b * 2.0).eval(), vec3(1.0f32, 2.0, 0.0));
//!
//! // The scalar fallback can be requested explicitly.
//! let c = SimdVector::<i32, 4, NoIsa>::new([3, 13, 7, 19]);
//! assert_eq!(c.dot(SimdVector::new([5, 11, 23, 29])), 870);
//! ```

use std::{fmt, marker::PhantomData, num::Wrapping, ops};

use crate::{
    approx::ApproxEq,
    isa::{Extends, Native},
    kernels::{lane_out_of_range, Kernels},
    Dim, Interop, Number, Quat, QuatExpr, Sqrt, Vector, VectorExpr,
};

mod sealed {
    pub trait Sealed {}

    impl Sealed for crate::Dim<3> {}
    impl Sealed for crate::Dim<4> {}
}

/// The dimensions a [`SimdVector`] supports: 3 and 4.
pub trait SimdDim: sealed::Sealed {
    /// Lanes holding components.
    #[doc(hidden)]
    const LANES: u32;

    #[doc(hidden)]
    fn dot<T: Number, I: Kernels<T>>(a: I::Reg, b: I::Reg) -> T;
}

impl SimdDim for Dim<3> {
    const LANES: u32 = 0b0111;

    #[inline]
    fn dot<T: Number, I: Kernels<T>>(a: I::Reg, b: I::Reg) -> T {
        I::dot3(a, b)
    }
}

impl SimdDim for Dim<4> {
    const LANES: u32 = 0b1111;

    #[inline]
    fn dot<T: Number, I: Kernels<T>>(a: I::Reg, b: I::Reg) -> T {
        I::dot4(a, b)
    }
}

/// A 3- or 4-dimensional vector stored in a register of the instruction set `I`.
///
/// 3-dimensional vectors keep their unused fourth lane at zero.
pub struct SimdVector<T: Number, const N: usize, I: Kernels<T> = Native> {
    reg: I::Reg,
    _elem: PhantomData<T>,
}

impl<T: Number, const N: usize, I: Kernels<T>> Clone for SimdVector<T, N, I> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Number, const N: usize, I: Kernels<T>> Copy for SimdVector<T, N, I> {}

impl<T: Number, const N: usize, I: Kernels<T>> SimdVector<T, N, I>
where
    Dim<N>: SimdDim,
{
    #[inline]
    fn from_reg(reg: I::Reg) -> Self {
        Self {
            reg,
            _elem: PhantomData,
        }
    }

    /// Creates a vector from its components.
    pub fn new(components: [T; N]) -> Self {
        let mut lanes = [T::ZERO; 4];
        lanes[..N].copy_from_slice(&components);
        Self::from_reg(I::load(lanes))
    }

    /// Returns a vector with all components set to 0.
    #[inline]
    pub fn zero() -> Self {
        Self::from_reg(I::load([T::ZERO; 4]))
    }

    /// Returns a vector with all components set to `value`.
    #[inline]
    pub fn splat(value: T) -> Self {
        Self::new([value; N])
    }

    /// Evaluates a vector expression into a register, converting the scalar type if needed.
    pub fn from_expr<E>(expr: E) -> Self
    where
        E: VectorExpr<N>,
        T: Interop<E::Elem>,
    {
        Self::new(std::array::from_fn(|i| T::from(expr.at(i))))
    }

    /// Returns the component at `index`.
    ///
    /// # Panics
    ///
    /// This panics if `index >= N`, including when `index` addresses the unused fourth lane of a
    /// 3-dimensional vector.
    #[inline]
    #[track_caller]
    pub fn get(&self, index: usize) -> T {
        if index >= N {
            lane_out_of_range(index, N);
        }
        I::lane(self.reg, index)
    }

    pub fn to_array(self) -> [T; N] {
        let lanes = I::store(self.reg);
        std::array::from_fn(|i| lanes[i])
    }

    #[inline]
    pub fn to_vector(self) -> Vector<T, N> {
        Vector::from(self.to_array())
    }

    /// Returns the dot product of `self` and `other`.
    #[inline]
    pub fn dot(self, other: Self) -> T {
        <Dim<N> as SimdDim>::dot::<T, I>(self.reg, other.reg)
    }

    /// Returns the length of this vector.
    #[doc(alias = "norm", alias = "length")]
    #[inline]
    pub fn magnitude(self) -> T
    where
        T: Sqrt,
    {
        self.dot(self).sqrt()
    }

    /// Moves this vector to a tag that extends `I`.
    ///
    /// # Examples
    ///
    /// ```
    /// use vecta::{isa::{Native, NoIsa}, simd::SimdVector};
    ///
    /// let v = SimdVector::<f64, 4, NoIsa>::new([1.0, 2.0, 3.0, 4.0]);
    /// let native: SimdVector<f64, 4, Native> = v.retag();
    /// assert_eq!(native.to_array(), v.to_array());
    /// ```
    pub fn retag<J>(self) -> SimdVector<T, N, J>
    where
        J: Kernels<T> + Extends<I>,
    {
        SimdVector::new(self.to_array())
    }

    /// Returns the underlying register.
    #[inline]
    pub fn into_reg(self) -> I::Reg {
        self.reg
    }
}

impl<T: Number, I: Kernels<T>> SimdVector<T, 3, I> {
    /// Returns the cross product of `self` and `other`.
    #[inline]
    pub fn cross(self, other: Self) -> Self {
        Self::from_reg(I::cross3(self.reg, other.reg))
    }
}

impl<T: Number, const N: usize, I: Kernels<T>> VectorExpr<N> for SimdVector<T, N, I>
where
    Dim<N>: SimdDim,
{
    type Elem = T;

    #[inline]
    fn at(&self, index: usize) -> T {
        self.get(index)
    }

    fn eval(&self) -> Vector<T, N> {
        self.to_vector()
    }
}

impl<T: Number, const N: usize, I: Kernels<T>> Default for SimdVector<T, N, I>
where
    Dim<N>: SimdDim,
{
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: Number, const N: usize, I: Kernels<T>> From<[T; N]> for SimdVector<T, N, I>
where
    Dim<N>: SimdDim,
{
    fn from(components: [T; N]) -> Self {
        Self::new(components)
    }
}

impl<T: Number, const N: usize, I: Kernels<T>> From<Vector<T, N>> for SimdVector<T, N, I>
where
    Dim<N>: SimdDim,
{
    fn from(v: Vector<T, N>) -> Self {
        Self::new(v.into_array())
    }
}

impl<T: Number, const N: usize, I: Kernels<T>> From<SimdVector<T, N, I>> for Vector<T, N>
where
    Dim<N>: SimdDim,
{
    fn from(v: SimdVector<T, N, I>) -> Self {
        v.to_vector()
    }
}

impl<T, const N: usize, I> fmt::Debug for SimdVector<T, N, I>
where
    T: Number + fmt::Debug,
    I: Kernels<T>,
    Dim<N>: SimdDim,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SimdVector<{}>{:?}", I::NAME, self.to_array())
    }
}

impl<T: Number, const N: usize, I: Kernels<T>> PartialEq for SimdVector<T, N, I>
where
    Dim<N>: SimdDim,
{
    fn eq(&self, other: &Self) -> bool {
        let lanes = <Dim<N> as SimdDim>::LANES;
        I::eq_mask(self.reg, other.reg) & lanes == lanes
    }
}

impl<T, const N: usize, I> ApproxEq for SimdVector<T, N, I>
where
    T: Number + ApproxEq,
    I: Kernels<T>,
    Dim<N>: SimdDim,
{
    type Tolerance = T::Tolerance;

    fn abs_diff_eq(&self, other: &Self, abs_tolerance: Self::Tolerance) -> bool {
        self.to_array().abs_diff_eq(&other.to_array(), abs_tolerance)
    }

    fn rel_diff_eq(&self, other: &Self, rel_tolerance: Self::Tolerance) -> bool {
        self.to_array().rel_diff_eq(&other.to_array(), rel_tolerance)
    }

    fn ulps_diff_eq(&self, other: &Self, ulps_tolerance: u32) -> bool {
        self.to_array().ulps_diff_eq(&other.to_array(), ulps_tolerance)
    }
}

impl<T: Number, const N: usize, I: Kernels<T>> ops::Neg for SimdVector<T, N, I>
where
    Dim<N>: SimdDim,
{
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::from_reg(I::neg(self.reg))
    }
}

impl<T: Number, const N: usize, I: Kernels<T>> ops::Add for SimdVector<T, N, I>
where
    Dim<N>: SimdDim,
{
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::from_reg(I::add(self.reg, rhs.reg))
    }
}

impl<T: Number, const N: usize, I: Kernels<T>> ops::Sub for SimdVector<T, N, I>
where
    Dim<N>: SimdDim,
{
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::from_reg(I::sub(self.reg, rhs.reg))
    }
}

impl<T: Number, const N: usize, I: Kernels<T>> ops::Mul<T> for SimdVector<T, N, I>
where
    Dim<N>: SimdDim,
{
    type Output = Self;

    #[inline]
    fn mul(self, rhs: T) -> Self {
        Self::from_reg(I::mul_scalar(self.reg, rhs))
    }
}

impl<T: Number, const N: usize, I: Kernels<T>> ops::Div<T> for SimdVector<T, N, I>
where
    Dim<N>: SimdDim,
{
    type Output = Self;

    #[inline]
    fn div(self, rhs: T) -> Self {
        Self::from_reg(I::div_scalar(self.reg, rhs))
    }
}

impl<T: Number, const N: usize, I: Kernels<T>> ops::AddAssign for SimdVector<T, N, I>
where
    Dim<N>: SimdDim,
{
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: Number, const N: usize, I: Kernels<T>> ops::SubAssign for SimdVector<T, N, I>
where
    Dim<N>: SimdDim,
{
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

/// A quaternion stored as `[w, x, y, z]` in a register of the instruction set `I`.
///
/// # Examples
///
/// ```
/// use vecta::{simd::SimdQuat, Quat};
///
/// let i = SimdQuat::<f32>::new(0.0, 1.0, 0.0, 0.0);
/// let j = SimdQuat::<f32>::new(0.0, 0.0, 1.0, 0.0);
/// assert_eq!((i * j).to_quat(), Quat::new(0.0f32, 0.0, 0.0, 1.0));
/// assert_eq!((i * i).to_quat(), Quat::new(-1.0f32, 0.0, 0.0, 0.0));
/// ```
pub struct SimdQuat<T: Number, I: Kernels<T> = Native> {
    reg: I::Reg,
    _elem: PhantomData<T>,
}

impl<T: Number, I: Kernels<T>> Clone for SimdQuat<T, I> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Number, I: Kernels<T>> Copy for SimdQuat<T, I> {}

impl<T: Number, I: Kernels<T>> SimdQuat<T, I> {
    #[inline]
    fn from_reg(reg: I::Reg) -> Self {
        Self {
            reg,
            _elem: PhantomData,
        }
    }

    /// Creates a quaternion from its real part `w` and its imaginary parts `x`, `y` and `z`.
    #[inline]
    pub fn new(w: T, x: T, y: T, z: T) -> Self {
        Self::from_reg(I::load([w, x, y, z]))
    }

    /// The multiplicative identity.
    #[inline]
    pub fn identity() -> Self {
        Self::new(T::ONE, T::ZERO, T::ZERO, T::ZERO)
    }

    #[inline]
    pub fn zero() -> Self {
        Self::from_reg(I::load([T::ZERO; 4]))
    }

    /// Evaluates a quaternion expression into a register, converting the scalar type if needed.
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

    /// Returns the components in `[w, x, y, z]` order.
    #[inline]
    pub fn to_array(self) -> [T; 4] {
        I::store(self.reg)
    }

    #[inline]
    pub fn to_quat(self) -> Quat<T> {
        Quat::from(self.to_array())
    }

    /// Returns the 4-dimensional dot product of `self` and `other`.
    #[inline]
    pub fn dot(self, other: Self) -> T {
        I::dot4(self.reg, other.reg)
    }

    #[doc(alias = "norm", alias = "length")]
    #[inline]
    pub fn magnitude(self) -> T
    where
        T: Sqrt,
    {
        self.dot(self).sqrt()
    }

    /// Returns the conjugate (the imaginary parts negated).
    #[inline]
    pub fn conjugate(self) -> Self {
        Self::from_reg(I::conjugate(self.reg))
    }

    /// Returns the multiplicative inverse: the conjugate divided by the squared magnitude.
    #[inline]
    pub fn inverse(self) -> Self {
        Self::from_reg(I::div_scalar(I::conjugate(self.reg), self.dot(self)))
    }

    /// Moves this quaternion to a tag that extends `I`.
    pub fn retag<J>(self) -> SimdQuat<T, J>
    where
        J: Kernels<T> + Extends<I>,
    {
        SimdQuat::from_reg(J::load(self.to_array()))
    }

    /// Returns the underlying register.
    #[inline]
    pub fn into_reg(self) -> I::Reg {
        self.reg
    }
}

impl<T: Number, I: Kernels<T>> QuatExpr for SimdQuat<T, I> {
    type Elem = T;

    #[inline]
    fn w(&self) -> T {
        I::lane(self.reg, 0)
    }

    #[inline]
    fn x(&self) -> T {
        I::lane(self.reg, 1)
    }

    #[inline]
    fn y(&self) -> T {
        I::lane(self.reg, 2)
    }

    #[inline]
    fn z(&self) -> T {
        I::lane(self.reg, 3)
    }

    fn eval(&self) -> Quat<T> {
        self.to_quat()
    }
}

impl<T: Number, I: Kernels<T>> Default for SimdQuat<T, I> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: Number, I: Kernels<T>> From<Quat<T>> for SimdQuat<T, I> {
    fn from(q: Quat<T>) -> Self {
        Self::from_reg(I::load(q.into_array()))
    }
}

impl<T: Number, I: Kernels<T>> From<SimdQuat<T, I>> for Quat<T> {
    fn from(q: SimdQuat<T, I>) -> Self {
        q.to_quat()
    }
}

impl<T, I> fmt::Debug for SimdQuat<T, I>
where
    T: Number + fmt::Debug,
    I: Kernels<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [w, x, y, z] = self.to_array();
        write!(f, "SimdQuat<{}> {{ w: {w:?}, x: {x:?}, y: {y:?}, z: {z:?} }}", I::NAME)
    }
}

impl<T: Number, I: Kernels<T>> PartialEq for SimdQuat<T, I> {
    fn eq(&self, other: &Self) -> bool {
        I::eq_mask(self.reg, other.reg) == 0b1111
    }
}

impl<T, I> ApproxEq for SimdQuat<T, I>
where
    T: Number + ApproxEq,
    I: Kernels<T>,
{
    type Tolerance = T::Tolerance;

    fn abs_diff_eq(&self, other: &Self, abs_tolerance: Self::Tolerance) -> bool {
        self.to_array().abs_diff_eq(&other.to_array(), abs_tolerance)
    }

    fn rel_diff_eq(&self, other: &Self, rel_tolerance: Self::Tolerance) -> bool {
        self.to_array().rel_diff_eq(&other.to_array(), rel_tolerance)
    }

    fn ulps_diff_eq(&self, other: &Self, ulps_tolerance: u32) -> bool {
        self.to_array().ulps_diff_eq(&other.to_array(), ulps_tolerance)
    }
}

impl<T: Number, I: Kernels<T>> ops::Neg for SimdQuat<T, I> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::from_reg(I::neg(self.reg))
    }
}

impl<T: Number, I: Kernels<T>> ops::Add for SimdQuat<T, I> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::from_reg(I::add(self.reg, rhs.reg))
    }
}

impl<T: Number, I: Kernels<T>> ops::Sub for SimdQuat<T, I> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::from_reg(I::sub(self.reg, rhs.reg))
    }
}

/// The Hamilton product.
impl<T: Number, I: Kernels<T>> ops::Mul for SimdQuat<T, I> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::from_reg(I::hamilton(self.reg, rhs.reg))
    }
}

/// Multiplication with the inverse of `rhs`.
impl<T: Number, I: Kernels<T>> ops::Div for SimdQuat<T, I> {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        self * rhs.inverse()
    }
}

impl<T: Number, I: Kernels<T>> ops::Mul<T> for SimdQuat<T, I> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: T) -> Self {
        Self::from_reg(I::mul_scalar(self.reg, rhs))
    }
}

impl<T: Number, I: Kernels<T>> ops::Div<T> for SimdQuat<T, I> {
    type Output = Self;

    #[inline]
    fn div(self, rhs: T) -> Self {
        Self::from_reg(I::div_scalar(self.reg, rhs))
    }
}

impl<T: Number, I: Kernels<T>> ops::MulAssign for SimdQuat<T, I> {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

macro_rules! scalar_lhs {
    ($($scalar:ty),+) => {$(
        impl<const N: usize, I: Kernels<$scalar>> ops::Mul<SimdVector<$scalar, N, I>> for $scalar
        where
            Dim<N>: SimdDim,
        {
            type Output = SimdVector<$scalar, N, I>;

            #[inline]
            fn mul(self, rhs: SimdVector<$scalar, N, I>) -> Self::Output {
                rhs * self
            }
        }

        impl<I: Kernels<$scalar>> ops::Mul<SimdQuat<$scalar, I>> for $scalar {
            type Output = SimdQuat<$scalar, I>;

            #[inline]
            fn mul(self, rhs: SimdQuat<$scalar, I>) -> Self::Output {
                rhs * self
            }
        }
    )+};
}

scalar_lhs!(f32, f64, i8, i16, i32, i64, i128, isize);
scalar_lhs!(
    Wrapping<i8>,
    Wrapping<i16>,
    Wrapping<i32>,
    Wrapping<i64>,
    Wrapping<i128>,
    Wrapping<isize>
);

#[cfg(test)]
mod tests {
    use crate::{
        assert_approx_eq, cross, dot, inverse,
        isa::{Isa, Native, NoIsa},
        kernels::Kernels,
        vec3, vec4, Quat, QuatExpr, VectorExpr,
    };

    use super::*;

    #[test]
    fn vector_construction() {
        let v = SimdVector::<i32, 3, NoIsa>::new([1, 2, 3]);
        assert_eq!(v.to_array(), [1, 2, 3]);
        assert_eq!(v.into_reg(), [1, 2, 3, 0]);
        assert_eq!(v.size(), 3);
        assert_eq!(v.get(2), 3);
        assert_eq!(SimdVector::<i32, 4, NoIsa>::splat(7).to_array(), [7; 4]);
        assert_eq!(SimdVector::<i32, 3, NoIsa>::splat(7).into_reg(), [7, 7, 7, 0]);
        assert_eq!(SimdVector::<i32, 4, NoIsa>::default().to_array(), [0; 4]);

        let wide = SimdVector::<f64, 3>::from_expr(vec3(1.5f32, -2.0, 0.25) * 2.0);
        assert_eq!(wide.to_vector(), vec3(3.0f64, -4.0, 0.5));
        assert_eq!(format!("{:?}", v), "SimdVector<none>[1, 2, 3]");
    }

    #[test]
    #[should_panic(expected = "lane index out of range: the lane count is 3 but the index is 3")]
    fn vector_unused_lane() {
        SimdVector::<f32, 3>::new([1.0, 2.0, 3.0]).get(3);
    }

    #[test]
    #[should_panic(expected = "lane index out of range: the lane count is 4 but the index is 9")]
    fn vector_out_of_range() {
        SimdVector::<f64, 4>::zero().at(9);
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn generic_vector_out_of_range() {
        vec4(1, 2, 3, 4).at(4);
    }

    fn vector_ops<I>()
    where
        I: Kernels<f32> + Kernels<f64> + Kernels<i32>,
    {
        let a = SimdVector::<i32, 4, I>::new([3, 13, 7, 19]);
        let b = SimdVector::<i32, 4, I>::new([5, 11, 23, 29]);
        assert_eq!(a.dot(b), 870);
        assert_eq!(a.dot(b), b.dot(a));
        assert_eq!((-a).to_array(), [-3, -13, -7, -19]);
        assert_eq!((a + b).to_array(), [8, 24, 30, 48]);
        assert_eq!((a - b).to_array(), [-2, 2, -16, -10]);
        assert_eq!((a * 2).to_array(), [6, 26, 14, 38]);
        assert_eq!((2 * a), a * 2);
        assert_eq!((a * 4 / 2), a * 2);
        assert_ne!(a, b);

        let x = SimdVector::<f32, 3, I>::new([1.0, 0.0, 0.0]);
        let y = SimdVector::<f32, 3, I>::new([0.0, 1.0, 0.0]);
        let z = SimdVector::<f32, 3, I>::new([0.0, 0.0, 1.0]);
        assert_eq!(x.cross(y), z);
        assert_eq!(y.cross(x), -z);
        assert_eq!(SimdVector::<f32, 3, I>::new([3.0, 4.0, 0.0]).magnitude(), 5.0);

        let p = SimdVector::<f64, 3, I>::new([1.5, -2.0, 4.0]);
        let q = SimdVector::<f64, 3, I>::new([0.5, 3.0, -1.0]);
        let generic = cross(p.to_vector(), q.to_vector());
        assert_approx_eq!(p.cross(q).to_vector(), generic.eval());
        assert_eq!(p.dot(q), dot(p, q));
        let mut r = p;
        r += q;
        r -= p;
        assert_eq!(r, q);
    }

    fn quat_ops<I>()
    where
        I: Kernels<f32> + Kernels<f64> + Kernels<i32>,
    {
        let a = SimdQuat::<i32, I>::new(3, 13, 7, 19);
        let b = SimdQuat::<i32, I>::new(5, 11, 23, 29);
        let generic = Quat::new(3, 13, 7, 19) * Quat::new(5, 11, 23, 29);
        assert_eq!((a * b).to_quat(), generic.eval());
        assert_eq!((-a).to_array(), [-3, -13, -7, -19]);
        assert_eq!(a.conjugate().to_array(), [3, -13, -7, -19]);
        assert_eq!(a.dot(b), 870);
        assert_eq!(3 * a, a * 3);
        assert_eq!((a + b - b), a);

        let mut c = a;
        c *= SimdQuat::identity();
        assert_eq!(c, a);

        let q = SimdQuat::<f32, I>::new(1.0, -2.0, 0.5, 3.0);
        let one = SimdQuat::<f32, I>::identity();
        assert_approx_eq!(q * q.inverse(), one).abs(1e-5);
        assert_approx_eq!(q.inverse() * q, one).abs(1e-5);
        assert_approx_eq!(q / q, one).abs(1e-5);
        assert_approx_eq!(q.inverse().to_quat(), inverse(q.to_quat()).eval()).abs(1e-6);

        let d = SimdQuat::<f64, I>::new(0.25, 4.0, -2.0, 1.0);
        assert_approx_eq!(d.magnitude(), 21.0625f64.sqrt()).abs(1e-12);
        assert_eq!(SimdQuat::<f64, I>::from_expr(q.to_quat()).to_array(), [1.0, -2.0, 0.5, 3.0]);

        let l = SimdQuat::<f64, I>::new(0.5, -1.25, 2.0, 3.5);
        let r = SimdQuat::<f64, I>::new(-2.0, 0.75, 1.5, -0.25);
        let generic = l.to_quat() * r.to_quat();
        assert_approx_eq!((l * r).to_quat(), generic.eval()).abs(1e-12);
        let generic = r.to_quat() * l.to_quat();
        assert_approx_eq!((r * l).to_quat(), generic.eval()).abs(1e-12);
        let generic = (l.to_quat() * r.to_quat()) * l.to_quat();
        assert_approx_eq!((l * r * l).to_quat(), generic.eval()).abs(1e-12);

        let l = SimdQuat::<f32, I>::new(1.5, 0.25, -3.0, 2.0);
        let r = SimdQuat::<f32, I>::new(0.5, -4.0, 1.0, 0.75);
        let generic = l.to_quat() * r.to_quat();
        assert_approx_eq!((l * r).to_quat(), generic.eval()).abs(1e-5);
    }

    fn units<I>()
    where
        I: Kernels<f32> + Kernels<f64> + Kernels<i32>,
    {
        fn check<T: Number + fmt::Debug, I: Kernels<T>>() {
            let (o, l) = (T::ZERO, T::ONE);
            let minus_one = SimdQuat::<T, I>::new(-l, o, o, o);
            let i = SimdQuat::<T, I>::new(o, l, o, o);
            let j = SimdQuat::<T, I>::new(o, o, l, o);
            let k = SimdQuat::<T, I>::new(o, o, o, l);
            assert_eq!(i * i, minus_one);
            assert_eq!(j * j, minus_one);
            assert_eq!(k * k, minus_one);
            assert_eq!(i * j * k, minus_one);
            assert_eq!(i * j, k);
            assert_eq!(j * k, i);
            assert_eq!(k * i, j);
            assert_eq!(j * i, -k);
            assert_eq!(k * j, -i);
            assert_eq!(i * k, -j);
        }

        check::<f32, I>();
        check::<f64, I>();
        check::<i32, I>();
    }

    fn all_ops<I>()
    where
        I: Kernels<f32> + Kernels<f64> + Kernels<i32>,
    {
        vector_ops::<I>();
        quat_ops::<I>();
        units::<I>();
    }

    #[test]
    fn generic_tag() {
        all_ops::<NoIsa>();
    }

    #[test]
    fn native_tag() {
        log::debug!("native tag: {}", <Native as Isa>::NAME);
        all_ops::<Native>();
    }

    #[test]
    fn retag() {
        let v = SimdVector::<f32, 3, NoIsa>::new([1.0, 2.0, 3.0]);
        let n: SimdVector<f32, 3> = v.retag();
        assert_eq!(n.to_array(), [1.0, 2.0, 3.0]);
        let q = SimdQuat::<f64, NoIsa>::new(1.0, 2.0, 3.0, 4.0);
        let n: SimdQuat<f64> = q.retag();
        assert_eq!(n.to_quat(), Quat::new(1.0f64, 2.0, 3.0, 4.0));
    }

    #[test]
    fn mixes_with_generic_expressions() {
        let s = SimdVector::<f32, 3>::new([1.0, 2.0, 3.0]);
        let v = vec3(1.0f32, 1.0, 1.0);
        assert_eq!((v + s).eval(), vec3(2.0f32, 3.0, 4.0));
        assert_eq!(dot(&s, v), 6.0);

        let q = SimdQuat::<f32>::new(0.0, 1.0, 0.0, 0.0);
        assert_eq!((Quat::new(0.0f32, 0.0, 1.0, 0.0) * q).eval(), Quat::new(0.0f32, 0.0, 0.0, -1.0));
    }

    #[test]
    fn wrapping_lanes() {
        let w = |lanes: [i8; 4]| lanes.map(Wrapping);
        let a = SimdVector::<Wrapping<i8>, 4>::new(w([127, -128, 100, 1]));
        let b = SimdVector::<Wrapping<i8>, 4>::splat(Wrapping(1));
        assert_eq!((a + b).to_array(), w([-128, -127, 101, 2]));
        assert_eq!((a - b).to_array(), w([126, 127, 99, 0]));
        assert_eq!((a * Wrapping(2)).to_array(), w([-2, 0, -56, 2]));
        assert_eq!(Wrapping(2i8) * a, a * Wrapping(2));
        assert_eq!(a.dot(a), Wrapping(18));

        let max = Wrapping(i32::MAX);
        let q = SimdQuat::<Wrapping<i32>, NoIsa>::new(max, max, Wrapping(0), Wrapping(1));
        assert_eq!((q + q).to_array(), [-2, -2, 0, 2].map(Wrapping));
    }

    #[test]
    fn quat_fmt() {
        let q = SimdQuat::<i32, NoIsa>::new(1, 2, 3, 4);
        assert_eq!(format!("{q:?}"), "SimdQuat<none> { w: 1, x: 2, y: 3, z: 4 }");
    }

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    #[test]
    fn x86_tags() {
        use crate::isa::{Avx, Avx2, Sse, Sse2, Sse3, Sse4};

        if is_x86_feature_detected!("sse") {
            all_ops::<Sse>();
        }
        if is_x86_feature_detected!("sse2") {
            all_ops::<Sse2>();
        }
        if is_x86_feature_detected!("sse3") {
            all_ops::<Sse3>();
        }
        if is_x86_feature_detected!("sse4.1") {
            all_ops::<Sse4>();
        }
        if is_x86_feature_detected!("avx") {
            all_ops::<Avx>();
        }
        if is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma") {
            all_ops::<Avx2>();
        }
    }

    #[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
    #[test]
    fn neon_tags() {
        use crate::isa::{Neon32, Neon64};

        all_ops::<Neon32>();
        all_ops::<Neon64>();
    }
}
