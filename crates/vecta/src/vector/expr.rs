//! Lazy vector expression nodes.
//!
//! Each node stores its operands by value (operands can be references) and computes a component
//! only when [`VectorExpr::at`] asks for it.

use crate::{Number, VectorExpr};

/// Component-wise negation, produced by the unary `-` operator.
#[derive(Debug, Clone, Copy)]
pub struct VecNeg<A, const N: usize> {
    a: A,
}

impl<A: VectorExpr<N>, const N: usize> VecNeg<A, N> {
    #[inline]
    pub fn new(a: A) -> Self {
        Self { a }
    }
}

impl<A, const N: usize> VectorExpr<N> for VecNeg<A, N>
where
    A: VectorExpr<N>,
    A::Elem: Number,
{
    type Elem = A::Elem;

    #[inline]
    fn at(&self, index: usize) -> A::Elem {
        -self.a.at(index)
    }
}

/// Component-wise sum of two vector expressions, produced by the `+` operator.
#[derive(Debug, Clone, Copy)]
pub struct VecAdd<A, B, const N: usize> {
    a: A,
    b: B,
}

impl<A, B, const N: usize> VecAdd<A, B, N>
where
    A: VectorExpr<N>,
    B: VectorExpr<N, Elem = A::Elem>,
{
    #[inline]
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A, B, const N: usize> VectorExpr<N> for VecAdd<A, B, N>
where
    A: VectorExpr<N>,
    B: VectorExpr<N, Elem = A::Elem>,
    A::Elem: Number,
{
    type Elem = A::Elem;

    #[inline]
    fn at(&self, index: usize) -> A::Elem {
        self.a.at(index) + self.b.at(index)
    }
}

/// Component-wise difference of two vector expressions, produced by the `-` operator.
#[derive(Debug, Clone, Copy)]
pub struct VecSub<A, B, const N: usize> {
    a: A,
    b: B,
}

impl<A, B, const N: usize> VecSub<A, B, N>
where
    A: VectorExpr<N>,
    B: VectorExpr<N, Elem = A::Elem>,
{
    #[inline]
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A, B, const N: usize> VectorExpr<N> for VecSub<A, B, N>
where
    A: VectorExpr<N>,
    B: VectorExpr<N, Elem = A::Elem>,
    A::Elem: Number,
{
    type Elem = A::Elem;

    #[inline]
    fn at(&self, index: usize) -> A::Elem {
        self.a.at(index) - self.b.at(index)
    }
}

/// A vector expression scaled by a scalar, produced by `v * s` and `s * v`.
#[derive(Debug, Clone, Copy)]
pub struct VecMulScalar<A, S, const N: usize> {
    a: A,
    s: S,
}

impl<A, S, const N: usize> VecMulScalar<A, S, N>
where
    A: VectorExpr<N, Elem = S>,
    S: Number,
{
    #[inline]
    pub fn new(a: A, s: S) -> Self {
        Self { a, s }
    }
}

impl<A, S, const N: usize> VectorExpr<N> for VecMulScalar<A, S, N>
where
    A: VectorExpr<N, Elem = S>,
    S: Number,
{
    type Elem = S;

    #[inline]
    fn at(&self, index: usize) -> S {
        self.a.at(index) * self.s
    }
}

/// A vector expression divided by a scalar, produced by `v / s`.
#[derive(Debug, Clone, Copy)]
pub struct VecDivScalar<A, S, const N: usize> {
    a: A,
    s: S,
}

impl<A, S, const N: usize> VecDivScalar<A, S, N>
where
    A: VectorExpr<N, Elem = S>,
    S: Number,
{
    #[inline]
    pub fn new(a: A, s: S) -> Self {
        Self { a, s }
    }
}

impl<A, S, const N: usize> VectorExpr<N> for VecDivScalar<A, S, N>
where
    A: VectorExpr<N, Elem = S>,
    S: Number,
{
    type Elem = S;

    #[inline]
    fn at(&self, index: usize) -> S {
        self.a.at(index) / self.s
    }
}

/// The cross product of two 3-dimensional vector expressions, returned by [`cross`].
///
/// Unlike the other nodes, the components are computed when the node is created and cached.
///
/// [`cross`]: crate::cross
#[derive(Debug, Clone, Copy)]
pub struct Cross3<T> {
    elems: [T; 3],
}

impl<T: Number> Cross3<T> {
    pub fn new<A, B>(a: A, b: B) -> Self
    where
        A: VectorExpr<3, Elem = T>,
        B: VectorExpr<3, Elem = T>,
    {
        let [a0, a1, a2] = [a.at(0), a.at(1), a.at(2)];
        let [b0, b1, b2] = [b.at(0), b.at(1), b.at(2)];

        #[rustfmt::skip]
        let elems = [
            a1 * b2 - a2 * b1,
            a2 * b0 - a0 * b2,
            a0 * b1 - a1 * b0,
        ];
        Self { elems }
    }
}

impl<T: Copy> VectorExpr<3> for Cross3<T> {
    type Elem = T;

    #[inline]
    fn at(&self, index: usize) -> T {
        self.elems[index]
    }
}

vector_expr_ops! {
    [A, const N: usize] VecNeg<A, N> => N;
    [A, B, const N: usize] VecAdd<A, B, N> => N;
    [A, B, const N: usize] VecSub<A, B, N> => N;
    [A, S, const N: usize] VecMulScalar<A, S, N> => N;
    [A, S, const N: usize] VecDivScalar<A, S, N> => N;
    [T] Cross3<T> => 3;
}

vector_expr_eq! {
    [A, const N: usize] VecNeg<A, N> => N;
    [A, B, const N: usize] VecAdd<A, B, N> => N;
    [A, B, const N: usize] VecSub<A, B, N> => N;
    [A, S, const N: usize] VecMulScalar<A, S, N> => N;
    [A, S, const N: usize] VecDivScalar<A, S, N> => N;
    [T] Cross3<T> => 3;
}

#[cfg(test)]
mod tests {
    use crate::{cross, vec3, vec4, Vec3, Vec4f};

    use super::*;

    #[test]
    fn lazy_components() {
        let a = vec4(3i32, 13, 7, 19);
        let b = vec4(5, 11, 23, 29);
        assert_eq!(-a, vec4(-3, -13, -7, -19));
        assert_eq!(a + b, [8, 24, 30, 48]);
        assert_eq!(a - b, [-2, 2, -16, -10]);
        assert_eq!(a * 2, [6, 26, 14, 38]);
        assert_eq!(2 * a, a * 2);
        assert_eq!((a * 4) / 2, a * 2);
        assert_eq!((a + b).at(3), 48);
    }

    #[test]
    fn nested() {
        let a = vec3(1.0f32, 2.0, 3.0);
        let b = vec3(4.0f32, 5.0, 6.0);
        let expr = (a + b) * 2.0 - -a / 2.0;
        assert_eq!(expr.eval(), vec3(10.5f32, 15.0, 19.5));

        let by_ref = &a + &b;
        assert_eq!(by_ref.eval(), vec3(5.0f32, 7.0, 9.0));
        assert_eq!(Vec4f::ZERO - Vec4f::X, -Vec4f::X);
    }

    #[test]
    fn cross_is_cached() {
        let mut a = vec3(1i64, 0, 0);
        let c = cross(a, vec3(0, 1, 0));
        a[0] = 5;
        assert_eq!(c, Vec3::<i64>::Z);
        assert_eq!(c * 3, vec3(0, 0, 3));
        assert_eq!(a.at(0), 5);
    }
}
