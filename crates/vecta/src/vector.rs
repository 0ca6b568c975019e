use std::{array, fmt};

use crate::{Dim, Interop, Number, One, Sqrt, Zero};

mod expr;
mod ops;

pub use expr::*;

/// A 2-dimensional vector.
pub type Vec2<T> = Vector<T, 2>;
/// A 2-dimensional vector with [`f32`] elements.
pub type Vec2f = Vec2<f32>;
/// A 3-dimensional vector.
pub type Vec3<T> = Vector<T, 3>;
/// A 3-dimensional vector with [`f32`] elements.
pub type Vec3f = Vec3<f32>;
/// A 4-dimensional vector.
pub type Vec4<T> = Vector<T, 4>;
/// A 4-dimensional vector with [`f32`] elements.
pub type Vec4f = Vec4<f32>;

/// The vector contract: an `N`-dimensional sequence of scalars that can be read component-wise.
///
/// [`Vector`] implements it by reading its storage. The expression nodes produced by the
/// arithmetic operators ([`VecAdd`], [`VecMulScalar`], etc.) implement it by computing each
/// component on demand from their operands, so nothing is computed until [`VectorExpr::eval`] (or
/// another consumer like [`dot`]) reads the components.
///
/// Arrays and references to vector expressions are vector expressions too.
///
/// # Examples
///
/// ```
/// # use vecta::*;
/// let a = vec3(1i32, 2, 3);
/// let b = vec3(10, 20, 30);
/// let expr = -(a + b) * 2;
/// assert_eq!(expr.size(), 3);
/// assert_eq!(expr.at(1), -44);
/// assert_eq!(expr.eval(), vec3(-22, -44, -66));
/// ```
pub trait VectorExpr<const N: usize> {
    /// The scalar type of the components.
    type Elem: Copy;

    /// Computes the component at `index`.
    ///
    /// # Panics
    ///
    /// This panics if `index` is not less than `N`.
    fn at(&self, index: usize) -> Self::Elem;

    /// Returns the number of components, `N`.
    #[inline]
    fn size(&self) -> usize {
        N
    }

    /// Evaluates every component and stores the result in a [`Vector`].
    fn eval(&self) -> Vector<Self::Elem, N> {
        Vector::from_fn(|i| self.at(i))
    }
}

impl<E, const N: usize> VectorExpr<N> for &E
where
    E: VectorExpr<N> + ?Sized,
{
    type Elem = E::Elem;

    #[inline]
    fn at(&self, index: usize) -> Self::Elem {
        (**self).at(index)
    }
}

impl<T: Copy, const N: usize> VectorExpr<N> for [T; N] {
    type Elem = T;

    #[inline]
    fn at(&self, index: usize) -> T {
        self[index]
    }
}

/// Dense `N`-component vector, the array-backed [`VectorExpr`].
///
/// Operators on vectors don't compute anything: they return expression nodes such as [`VecAdd`]
/// that read their operands component by component. An expression becomes a [`Vector`] again
/// through [`VectorExpr::eval`], [`Vector::from_expr`] or [`Vector::assign`].
///
/// Vectors are built with [`vec2`], [`vec3`] and [`vec4`], from arrays through [`From`], or with
/// [`Vector::splat`] and [`Vector::from_fn`]. [`Vector::ZERO`] and the unit constants
/// `X`/`Y`/`Z`/`W` exist for every element type implementing [`Zero`] and [`One`].
///
/// Components are read with [`VectorExpr::at`] or indexing, both of which panic on an index
/// `>= N`. [`Vector::as_array`] and [`Vector::as_slice`] borrow the storage. With a
/// [`bytemuck::Pod`] element type, the vector is `Pod` too and can be cast to bytes.
#[derive(Clone, Copy, Hash)]
#[repr(transparent)]
pub struct Vector<T, const N: usize>([T; N]);

unsafe impl<T: bytemuck::Zeroable, const N: usize> bytemuck::Zeroable for Vector<T, N> {}
unsafe impl<T: bytemuck::Pod, const N: usize> bytemuck::Pod for Vector<T, N> {}

impl<T: Copy, const N: usize> VectorExpr<N> for Vector<T, N> {
    type Elem = T;

    #[inline]
    fn at(&self, index: usize) -> T {
        self.0[index]
    }

    #[inline]
    fn eval(&self) -> Self {
        *self
    }
}

impl<T: Zero + Copy, const N: usize> Vector<T, N> {
    /// All components [`Zero::ZERO`].
    pub const ZERO: Self = Self([T::ZERO; N]);

    /// Returns [`Vector::ZERO`].
    #[inline]
    pub const fn zero() -> Self {
        Self::ZERO
    }
}

macro_rules! unit_vectors {
    ($n:literal: $($axis:ident = [$($c:ident),+]),+) => {
        impl<T: Zero + One> Vector<T, $n> {
            $(
                #[doc = concat!("Unit vector along the ", stringify!($axis), " axis.")]
                pub const $axis: Self = Self([$(T::$c),+]);
            )+
        }
    };
}

unit_vectors!(2: X = [ONE, ZERO], Y = [ZERO, ONE]);
unit_vectors!(3: X = [ONE, ZERO, ZERO], Y = [ZERO, ONE, ZERO], Z = [ZERO, ZERO, ONE]);
#[rustfmt::skip]
unit_vectors!(4:
    X = [ONE, ZERO, ZERO, ZERO],
    Y = [ZERO, ONE, ZERO, ZERO],
    Z = [ZERO, ZERO, ONE, ZERO],
    W = [ZERO, ZERO, ZERO, ONE]
);

impl<T, const N: usize> Vector<T, N> {
    /// Returns a vector with every component set to `elem`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vecta::*;
    /// let v: Vec3<i32> = Vector::splat(2);
    /// assert_eq!(v, vec3(2, 2, 2));
    /// ```
    #[inline]
    pub fn splat(elem: T) -> Self
    where
        T: Copy,
    {
        Self([elem; N])
    }

    /// Builds a vector by calling `cb` with each index in turn, like [`array::from_fn`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use vecta::*;
    /// let v: Vec3<usize> = Vector::from_fn(|i| i + 100);
    /// assert_eq!(v, vec3(100, 101, 102));
    /// ```
    pub fn from_fn<F>(cb: F) -> Self
    where
        F: FnMut(usize) -> T,
    {
        Self(array::from_fn(cb))
    }

    /// Evaluates a vector expression of the same dimension into a new [`Vector`].
    ///
    /// The element type may differ from the expression's, as long as it converts losslessly.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vecta::*;
    /// let a = vec3(1.5f32, 2.0, -1.0);
    /// let v = Vector::<f64, 3>::from_expr(a * 2.0);
    /// assert_eq!(v, vec3(3.0, 4.0, -2.0));
    /// ```
    pub fn from_expr<E>(expr: E) -> Self
    where
        E: VectorExpr<N>,
        T: Interop<E::Elem>,
    {
        Self::from_fn(|i| T::from(expr.at(i)))
    }

    /// Overwrites every element with the corresponding component of `expr`.
    ///
    /// `expr` is fully evaluated before any element is written, so it may refer to `self`'s old
    /// value through a copy.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vecta::*;
    /// let mut v = vec2(1i32, 2);
    /// let old = v;
    /// v.assign(old + vec2(10, 10));
    /// assert_eq!(v, vec2(11, 12));
    /// ```
    pub fn assign<E>(&mut self, expr: E)
    where
        E: VectorExpr<N, Elem = T>,
    {
        self.0 = array::from_fn(|i| expr.at(i));
    }

    /// Maps each component through `f`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vecta::*;
    /// let v = vec3(1, 2, 3).map(|i| i * 10);
    /// assert_eq!(v, vec3(10, 20, 30));
    /// ```
    pub fn map<F, U>(self, f: F) -> Vector<U, N>
    where
        F: FnMut(T) -> U,
    {
        Vector(self.0.map(f))
    }

    /// Borrows the components as an array.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vecta::*;
    /// assert_eq!(vec3(1, 2, 3).as_array(), &[1, 2, 3]);
    /// ```
    #[inline]
    pub const fn as_array(&self) -> &[T; N] {
        &self.0
    }

    /// Mutably borrows the components as an array.
    #[inline]
    pub fn as_mut_array(&mut self) -> &mut [T; N] {
        &mut self.0
    }

    /// Borrows the components as a slice.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vecta::*;
    /// assert_eq!(vec3(1, 2, 3).as_slice(), &[1, 2, 3]);
    /// ```
    #[inline]
    pub const fn as_slice(&self) -> &[T] {
        &self.0
    }

    /// Mutably borrows the components as a slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.0
    }

    /// Unwraps the component array. Same as the [`From`] conversion, without the annotation.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vecta::*;
    /// assert_eq!(vec3(1, 2, 3).into_array(), [1, 2, 3]);
    /// ```
    #[inline]
    pub fn into_array(self) -> [T; N] {
        self.0
    }

    /// Method form of [`dot`] for two vectors.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vecta::*;
    /// let a = vec3(1, 3, -5);
    /// let b = vec3(4, -2, -1);
    /// assert_eq!(a.dot(b), 3);
    /// ```
    #[inline]
    pub fn dot(self, other: Self) -> T
    where
        T: Number,
    {
        dot(self, other)
    }

    /// Method form of [`magnitude`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use vecta::*;
    /// assert_eq!(vec2(3.0, 4.0).magnitude(), 5.0);
    /// ```
    #[doc(alias = "norm", alias = "length")]
    #[inline]
    pub fn magnitude(self) -> T
    where
        T: Number + Sqrt,
    {
        magnitude(self)
    }

    /// Scales the vector to unit length.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vecta::*;
    /// let z = vec3(0.0, 0.0, 4.0).normalize();
    /// assert_eq!(z, vec3(0.0, 0.0, 1.0));
    /// ```
    pub fn normalize(self) -> Self
    where
        T: Number + Sqrt,
    {
        let len = self.magnitude();
        self.map(|elem| elem / len)
    }
}

impl<T> Vector<T, 3> {
    /// Evaluates [`cross`] of two 3-vectors. The result is perpendicular to both and flips
    /// direction when the operands are swapped.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vecta::*;
    /// let x = Vec3f::X;
    /// let y = Vec3f::Y;
    /// let z = Vec3f::Z;
    /// assert_eq!(x.cross(y), z);
    /// assert_eq!(y.cross(x), -z);
    /// ```
    pub fn cross(self, other: Self) -> Self
    where
        T: Number,
    {
        cross(self, other).eval()
    }
}

impl<T, const N: usize> Default for Vector<T, N>
where
    T: Default,
{
    #[inline]
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T, N> {
    #[inline]
    fn from(value: [T; N]) -> Self {
        Self(value)
    }
}

impl<T, const N: usize> From<Vector<T, N>> for [T; N] {
    #[inline]
    fn from(value: Vector<T, N>) -> Self {
        value.0
    }
}

impl<T, const N: usize> fmt::Debug for Vector<T, N>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tup = f.debug_tuple("");
        for elem in &self.0 {
            tup.field(elem);
        }
        tup.finish()
    }
}

impl<T, const N: usize> fmt::Display for Vector<T, N>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, elem) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            elem.fmt(f)?;
        }
        f.write_str(")")
    }
}

impl<T, const N: usize> AsRef<[T]> for Vector<T, N> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        &self.0
    }
}

impl<T, const N: usize> AsRef<[T; N]> for Vector<T, N> {
    #[inline]
    fn as_ref(&self) -> &[T; N] {
        &self.0
    }
}

impl<T, const N: usize> AsMut<[T]> for Vector<T, N> {
    #[inline]
    fn as_mut(&mut self) -> &mut [T] {
        &mut self.0
    }
}

impl<T, const N: usize> AsMut<[T; N]> for Vector<T, N> {
    #[inline]
    fn as_mut(&mut self) -> &mut [T; N] {
        &mut self.0
    }
}

/// `Vector([x, y])`
#[inline]
pub const fn vec2<T>(x: T, y: T) -> Vec2<T> {
    Vector([x, y])
}

/// `Vector([x, y, z])`
#[inline]
pub const fn vec3<T>(x: T, y: T, z: T) -> Vec3<T> {
    Vector([x, y, z])
}

/// `Vector([x, y, z, w])`
#[inline]
pub const fn vec4<T>(x: T, y: T, z: T, w: T) -> Vec4<T> {
    Vector([x, y, z, w])
}

/// Computes the dot product of two vector expressions of the same dimension.
///
/// The products are summed in index order, starting from zero.
///
/// # Examples
///
/// ```
/// # use vecta::*;
/// let a = vec4(3, 13, 7, 19);
/// let b = vec4(5, 11, 23, 29);
/// assert_eq!(dot(a, b), 870);
/// assert_eq!(dot(&a, a + b), dot(a, a) + dot(a, b));
/// ```
pub fn dot<A, B, const N: usize>(a: A, b: B) -> A::Elem
where
    A: VectorExpr<N>,
    B: VectorExpr<N, Elem = A::Elem>,
    A::Elem: Number,
{
    (0..N).fold(A::Elem::ZERO, |acc, i| acc + a.at(i) * b.at(i))
}

/// Computes the length of a vector expression (the square root of its dot product with itself).
///
/// # Examples
///
/// ```
/// # use vecta::*;
/// assert_eq!(magnitude(vec3(2.0, 3.0, 6.0)), 7.0);
/// ```
#[doc(alias = "length")]
pub fn magnitude<A, const N: usize>(a: A) -> A::Elem
where
    A: VectorExpr<N>,
    A::Elem: Number + Sqrt,
{
    dot(&a, &a).sqrt()
}

/// Alias of [`magnitude`].
#[inline]
pub fn norm<A, const N: usize>(a: A) -> A::Elem
where
    A: VectorExpr<N>,
    A::Elem: Number + Sqrt,
{
    magnitude(a)
}

/// Dimension-specific cross product, selected through [`Dim`].
///
/// Implemented for `Dim<2>`, where the result is the scalar `a0*b1 - a1*b0`, and for `Dim<3>`,
/// where the result is a [`Cross3`] vector. Other dimensions have no cross product.
pub trait CrossProduct<A, B> {
    type Output;

    fn cross(a: A, b: B) -> Self::Output;
}

impl<A, B> CrossProduct<A, B> for Dim<2>
where
    A: VectorExpr<2>,
    B: VectorExpr<2, Elem = A::Elem>,
    A::Elem: Number,
{
    type Output = A::Elem;

    #[inline]
    fn cross(a: A, b: B) -> A::Elem {
        a.at(0) * b.at(1) - a.at(1) * b.at(0)
    }
}

impl<A, B> CrossProduct<A, B> for Dim<3>
where
    A: VectorExpr<3>,
    B: VectorExpr<3, Elem = A::Elem>,
    A::Elem: Number,
{
    type Output = Cross3<A::Elem>;

    #[inline]
    fn cross(a: A, b: B) -> Cross3<A::Elem> {
        Cross3::new(a, b)
    }
}

/// Computes the cross product of two 2- or 3-dimensional vector expressions.
///
/// For 2-dimensional inputs the result is a scalar (the Z component of the 3-dimensional cross
/// product of the inputs extended with Z=0). For 3-dimensional inputs it is a [`Cross3`] vector
/// expression whose components are computed immediately.
///
/// # Examples
///
/// ```
/// # use vecta::*;
/// assert_eq!(cross(vec2(3, 13), vec2(5, 11)), -32);
/// assert_eq!(cross(Vec3f::X, Vec3f::Y).eval(), Vec3f::Z);
/// ```
///
/// Other dimensions are rejected at compile time:
///
/// ```compile_fail
/// # use vecta::*;
/// cross(vec4(1, 2, 3, 4), vec4(5, 6, 7, 8));
/// ```
pub fn cross<A, B, const N: usize>(a: A, b: B) -> <Dim<N> as CrossProduct<A, B>>::Output
where
    A: VectorExpr<N>,
    Dim<N>: CrossProduct<A, B>,
{
    <Dim<N> as CrossProduct<A, B>>::cross(a, b)
}
