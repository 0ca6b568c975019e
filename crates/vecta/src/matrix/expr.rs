//! Lazy matrix expression nodes.

use crate::{MatrixExpr, Number, VectorExpr, Zero};

/// Element-wise negation of a matrix expression.
#[derive(Debug, Clone, Copy)]
pub struct MatNeg<A, const R: usize, const C: usize> {
    a: A,
}

impl<A: MatrixExpr<R, C>, const R: usize, const C: usize> MatNeg<A, R, C> {
    #[inline]
    pub fn new(a: A) -> Self {
        Self { a }
    }
}

impl<A, const R: usize, const C: usize> MatrixExpr<R, C> for MatNeg<A, R, C>
where
    A: MatrixExpr<R, C>,
    A::Elem: Number,
{
    type Elem = A::Elem;

    #[inline]
    fn at(&self, row: usize, col: usize) -> A::Elem {
        -self.a.at(row, col)
    }
}

/// Element-wise sum of two matrix expressions of the same shape.
#[derive(Debug, Clone, Copy)]
pub struct MatAdd<A, B, const R: usize, const C: usize> {
    a: A,
    b: B,
}

impl<A, B, const R: usize, const C: usize> MatAdd<A, B, R, C>
where
    A: MatrixExpr<R, C>,
    B: MatrixExpr<R, C, Elem = A::Elem>,
{
    #[inline]
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A, B, const R: usize, const C: usize> MatrixExpr<R, C> for MatAdd<A, B, R, C>
where
    A: MatrixExpr<R, C>,
    B: MatrixExpr<R, C, Elem = A::Elem>,
    A::Elem: Number,
{
    type Elem = A::Elem;

    #[inline]
    fn at(&self, row: usize, col: usize) -> A::Elem {
        self.a.at(row, col) + self.b.at(row, col)
    }
}

/// Element-wise difference of two matrix expressions of the same shape.
#[derive(Debug, Clone, Copy)]
pub struct MatSub<A, B, const R: usize, const C: usize> {
    a: A,
    b: B,
}

impl<A, B, const R: usize, const C: usize> MatSub<A, B, R, C>
where
    A: MatrixExpr<R, C>,
    B: MatrixExpr<R, C, Elem = A::Elem>,
{
    #[inline]
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A, B, const R: usize, const C: usize> MatrixExpr<R, C> for MatSub<A, B, R, C>
where
    A: MatrixExpr<R, C>,
    B: MatrixExpr<R, C, Elem = A::Elem>,
    A::Elem: Number,
{
    type Elem = A::Elem;

    #[inline]
    fn at(&self, row: usize, col: usize) -> A::Elem {
        self.a.at(row, col) - self.b.at(row, col)
    }
}

/// A matrix expression with every element multiplied by a scalar.
#[derive(Debug, Clone, Copy)]
pub struct MatMulScalar<A, S, const R: usize, const C: usize> {
    a: A,
    s: S,
}

impl<A, S, const R: usize, const C: usize> MatMulScalar<A, S, R, C>
where
    A: MatrixExpr<R, C, Elem = S>,
    S: Number,
{
    #[inline]
    pub fn new(a: A, s: S) -> Self {
        Self { a, s }
    }
}

impl<A, S, const R: usize, const C: usize> MatrixExpr<R, C> for MatMulScalar<A, S, R, C>
where
    A: MatrixExpr<R, C, Elem = S>,
    S: Number,
{
    type Elem = S;

    #[inline]
    fn at(&self, row: usize, col: usize) -> S {
        self.a.at(row, col) * self.s
    }
}

/// A matrix expression with every element divided by a scalar.
#[derive(Debug, Clone, Copy)]
pub struct MatDivScalar<A, S, const R: usize, const C: usize> {
    a: A,
    s: S,
}

impl<A, S, const R: usize, const C: usize> MatDivScalar<A, S, R, C>
where
    A: MatrixExpr<R, C, Elem = S>,
    S: Number,
{
    #[inline]
    pub fn new(a: A, s: S) -> Self {
        Self { a, s }
    }
}

impl<A, S, const R: usize, const C: usize> MatrixExpr<R, C> for MatDivScalar<A, S, R, C>
where
    A: MatrixExpr<R, C, Elem = S>,
    S: Number,
{
    type Elem = S;

    #[inline]
    fn at(&self, row: usize, col: usize) -> S {
        self.a.at(row, col) / self.s
    }
}

/// Product of an `I`x`J` and a `J`x`K` matrix expression.
///
/// Each element is the dot product of a row of `a` and a column of `b`, summed in ascending `j`
/// order and computed when the element is read. Reading every element of an `I`x`K` product
/// therefore reads `J` elements of each operand per element; call [`MatrixExpr::eval`] to cache the
/// result when it is read more than once.
#[derive(Debug, Clone, Copy)]
pub struct MatMul<A, B, const I: usize, const J: usize, const K: usize> {
    a: A,
    b: B,
}

impl<A, B, const I: usize, const J: usize, const K: usize> MatMul<A, B, I, J, K>
where
    A: MatrixExpr<I, J>,
    B: MatrixExpr<J, K, Elem = A::Elem>,
{
    #[inline]
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A, B, const I: usize, const J: usize, const K: usize> MatrixExpr<I, K> for MatMul<A, B, I, J, K>
where
    A: MatrixExpr<I, J>,
    B: MatrixExpr<J, K, Elem = A::Elem>,
    A::Elem: Number,
{
    type Elem = A::Elem;

    fn at(&self, row: usize, col: usize) -> A::Elem {
        (0..J).fold(A::Elem::ZERO, |acc, j| {
            acc + self.a.at(row, j) * self.b.at(j, col)
        })
    }
}

/// An `R`x`C` matrix expression viewed as a `C`x`R` matrix, returned by [`transpose`].
///
/// [`transpose`]: crate::transpose
#[derive(Debug, Clone, Copy)]
pub struct MatTranspose<A, const R: usize, const C: usize> {
    a: A,
}

impl<A: MatrixExpr<R, C>, const R: usize, const C: usize> MatTranspose<A, R, C> {
    #[inline]
    pub fn new(a: A) -> Self {
        Self { a }
    }
}

impl<A, const R: usize, const C: usize> MatrixExpr<C, R> for MatTranspose<A, R, C>
where
    A: MatrixExpr<R, C>,
{
    type Elem = A::Elem;

    #[inline]
    fn at(&self, row: usize, col: usize) -> A::Elem {
        self.a.at(col, row)
    }
}

/// Product of an `R`x`C` matrix expression and a `C`-dimensional vector expression.
///
/// The result is an `R`-dimensional vector expression.
#[derive(Debug, Clone, Copy)]
pub struct MatVecMul<M, V, const R: usize, const C: usize> {
    m: M,
    v: V,
}

impl<M, V, const R: usize, const C: usize> MatVecMul<M, V, R, C>
where
    M: MatrixExpr<R, C>,
    V: VectorExpr<C, Elem = M::Elem>,
{
    #[inline]
    pub fn new(m: M, v: V) -> Self {
        Self { m, v }
    }
}

impl<M, V, const R: usize, const C: usize> VectorExpr<R> for MatVecMul<M, V, R, C>
where
    M: MatrixExpr<R, C>,
    V: VectorExpr<C, Elem = M::Elem>,
    M::Elem: Number,
{
    type Elem = M::Elem;

    fn at(&self, index: usize) -> M::Elem {
        (0..C).fold(M::Elem::ZERO, |acc, j| {
            acc + self.m.at(index, j) * self.v.at(j)
        })
    }
}

matrix_expr_ops! {
    [A, const R: usize, const C: usize] MatNeg<A, R, C> => R, C;
    [A, B, const R: usize, const C: usize] MatAdd<A, B, R, C> => R, C;
    [A, B, const R: usize, const C: usize] MatSub<A, B, R, C> => R, C;
    [A, S, const R: usize, const C: usize] MatMulScalar<A, S, R, C> => R, C;
    [A, S, const R: usize, const C: usize] MatDivScalar<A, S, R, C> => R, C;
    [A, B, const I: usize, const J: usize, const K: usize] MatMul<A, B, I, J, K> => I, K;
    [A, const R: usize, const C: usize] MatTranspose<A, R, C> => C, R;
}

matrix_expr_eq! {
    [A, const R: usize, const C: usize] MatNeg<A, R, C> => R, C;
    [A, B, const R: usize, const C: usize] MatAdd<A, B, R, C> => R, C;
    [A, B, const R: usize, const C: usize] MatSub<A, B, R, C> => R, C;
    [A, S, const R: usize, const C: usize] MatMulScalar<A, S, R, C> => R, C;
    [A, S, const R: usize, const C: usize] MatDivScalar<A, S, R, C> => R, C;
    [A, B, const I: usize, const J: usize, const K: usize] MatMul<A, B, I, J, K> => I, K;
    [A, const R: usize, const C: usize] MatTranspose<A, R, C> => C, R;
}

vector_expr_ops! {
    [M, V, const R: usize, const C: usize] MatVecMul<M, V, R, C> => R;
}

vector_expr_eq! {
    [M, V, const R: usize, const C: usize] MatVecMul<M, V, R, C> => R;
}

#[cfg(test)]
mod tests {
    use crate::{transpose, vec2, Mat2, Matrix, MatrixExpr};

    #[test]
    fn elementwise() {
        let a = Matrix::from_rows([[1i32, 2], [3, 4]]);
        let b = Matrix::from_rows([[5i32, 6], [7, 8]]);
        assert_eq!(a + b, [[6, 8], [10, 12]]);
        assert_eq!(b - a, [[4, 4], [4, 4]]);
        assert_eq!(-a, [[-1, -2], [-3, -4]]);
        assert_eq!(a * 3, [[3, 6], [9, 12]]);
        assert_eq!(3 * a, a * 3);
        assert_eq!((b * 2) / 2, b);
    }

    #[test]
    fn product_shapes() {
        let a = Matrix::from_rows([[1i32, 2, 3], [4, 5, 6]]);
        let b = Matrix::from_rows([[7i32, 8], [9, 10], [11, 12]]);
        let ab = a * b;
        assert_eq!(ab, [[58, 64], [139, 154]]);
        let ba = (b * a).eval();
        assert_eq!(ba.width(), 3);
        assert_eq!(ba[(0, 0)], 7 + 32);

        // Products chain without evaluating intermediate results.
        assert_eq!(ab * Mat2::<i32>::identity(), ab);
        assert_eq!(a * b * vec2(1, 0), [58, 139]);
    }

    #[test]
    fn transpose_of_expression() {
        let a = Matrix::from_rows([[1i32, 2, 3], [4, 5, 6]]);
        let t = transpose(a * 2);
        assert_eq!(t, [[2, 8], [4, 10], [6, 12]]);
        assert_eq!(transpose(t), a * 2);
        assert_eq!(-transpose(&a), transpose(-a));
    }

    #[test]
    fn mat_vec_is_vector_expr() {
        let m = Matrix::from_rows([[0.0f32, -1.0], [1.0, 0.0]]);
        let v = vec2(2.0f32, 3.0);
        let rotated = m * v;
        assert_eq!(rotated, [-3.0f32, 2.0]);
        assert_eq!(rotated * 2.0 + v, [-4.0f32, 7.0]);
        assert_eq!(m * (m * v), -v);
    }
}
