use std::{array, fmt};

use crate::{Dim, Interop, Number, One, Vector, Zero};

mod expr;
mod ops;

pub use expr::*;

/// A 2x2 matrix.
pub type Mat2<T> = Matrix<T, 2, 2>;
/// A 2x2 matrix with [`f32`] elements.
pub type Mat2f = Mat2<f32>;
/// A 3x3 matrix.
pub type Mat3<T> = Matrix<T, 3, 3>;
/// A 3x3 matrix with [`f32`] elements.
pub type Mat3f = Mat3<f32>;
/// A 4x4 matrix.
pub type Mat4<T> = Matrix<T, 4, 4>;
/// A 4x4 matrix with [`f32`] elements.
pub type Mat4f = Mat4<f32>;

/// The matrix contract: an `R`x`C` grid of scalars that can be read element-wise.
///
/// Elements are addressed as `(row, col)`. [`Matrix`] implements this by reading its storage, the
/// expression nodes ([`MatAdd`], [`MatMul`], [`MatTranspose`], etc.) by computing the element when
/// it is requested. Row-major nested arrays (`[[T; C]; R]`) are matrix expressions too.
///
/// # Examples
///
/// ```
/// # use vecta::*;
/// let a = Matrix::from_rows([[1i32, 2, 3], [4, 5, 6]]);
/// assert_eq!(a.width(), 3);
/// assert_eq!(a.height(), 2);
/// assert_eq!(transpose(a).width(), 2);
/// assert_eq!((a + a).at(1, 2), 12);
/// ```
pub trait MatrixExpr<const R: usize, const C: usize> {
    /// The scalar type of the elements.
    type Elem: Copy;

    /// Computes the element in row `row` and column `col`.
    ///
    /// # Panics
    ///
    /// This panics if `row >= R` or `col >= C`.
    fn at(&self, row: usize, col: usize) -> Self::Elem;

    /// Returns the number of columns, `C`.
    #[inline]
    fn width(&self) -> usize {
        C
    }

    /// Returns the number of rows, `R`.
    #[inline]
    fn height(&self) -> usize {
        R
    }

    /// Evaluates every element and stores the result in a [`Matrix`].
    fn eval(&self) -> Matrix<Self::Elem, R, C> {
        Matrix::from_fn(|row, col| self.at(row, col))
    }
}

impl<E, const R: usize, const C: usize> MatrixExpr<R, C> for &E
where
    E: MatrixExpr<R, C> + ?Sized,
{
    type Elem = E::Elem;

    #[inline]
    fn at(&self, row: usize, col: usize) -> Self::Elem {
        (**self).at(row, col)
    }
}

impl<T: Copy, const R: usize, const C: usize> MatrixExpr<R, C> for [[T; C]; R] {
    type Elem = T;

    #[inline]
    fn at(&self, row: usize, col: usize) -> T {
        self[row][col]
    }
}

/// Right-hand side of a matrix product whose left-hand side has `J` columns.
///
/// Implemented by every matrix expression with `J` rows (the product is a [`MatMul`]) and by every
/// vector expression with `J` components (the product is a [`MatVecMul`]). This is what makes
/// `a * b` only compile when `a`'s width equals `b`'s height.
pub trait MatMulRhs<const J: usize> {
    type Elem;

    /// The product type when multiplied with an `I`x`J` matrix expression `L`.
    type Product<L, const I: usize>;

    fn product<L, const I: usize>(lhs: L, rhs: Self) -> Self::Product<L, I>
    where
        L: MatrixExpr<I, J, Elem = Self::Elem>;
}

/// Dense `R`x`C` matrix stored column by column, the array-backed [`MatrixExpr`].
///
/// Like [`Vector`], a matrix builds lazy nodes when combined with operators. `a * b` is a
/// [`MatMul`] whose elements are row-column dot products computed on read, and it only compiles
/// when `a`'s width matches `b`'s height.
///
/// Matrices are written row by row with [`Matrix::from_rows`], column by column with
/// [`Matrix::from_columns`], or computed with [`Matrix::from_fn`] and [`Matrix::from_expr`].
/// [`Matrix::ZERO`], [`Matrix::identity`] and [`Matrix::from_diagonal`] cover the usual special
/// matrices.
///
/// Elements are indexed as `mat[(row, col)]`, 0-based. Out-of-range indices panic;
/// [`Matrix::get`] and [`Matrix::get_mut`] are the checked variants.
///
/// ```
/// # use vecta::*;
/// let mut mat = Matrix::from_rows([[0, 1]]);
/// mat[(0, 0)] = 4;
/// assert_eq!(mat[(0, 0)], 4);
/// assert_eq!(mat.get(0, 1), Some(&1));
/// assert_eq!(mat.get(1, 0), None);
/// ```
#[derive(Clone, Copy, Hash)]
pub struct Matrix<T, const R: usize, const C: usize>([[T; R]; C]);

#[rustfmt::skip]
unsafe impl<T: bytemuck::Zeroable, const R: usize, const C: usize> bytemuck::Zeroable for Matrix<T, R, C> {}
unsafe impl<T: bytemuck::Pod, const R: usize, const C: usize> bytemuck::Pod for Matrix<T, R, C> {}

impl<T: Copy, const R: usize, const C: usize> MatrixExpr<R, C> for Matrix<T, R, C> {
    type Elem = T;

    #[inline]
    fn at(&self, row: usize, col: usize) -> T {
        self[(row, col)]
    }

    #[inline]
    fn eval(&self) -> Self {
        *self
    }
}

impl<T, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Builds a matrix from its rows, written top to bottom.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vecta::*;
    /// let m = Matrix::from_rows([[2, 3], [5, 7]]);
    /// assert_eq!(m, Matrix::from_columns([[2, 5], [3, 7]]));
    /// assert_eq!(m[(1, 0)], 5);
    /// ```
    pub fn from_rows<U: Into<Vector<T, C>>>(rows: [U; R]) -> Self
    where
        T: Copy,
    {
        let rows = rows.map(|row| row.into());
        Self::from_fn(|row, col| rows[row][col])
    }

    /// Builds a matrix from its columns, written left to right.
    pub fn from_columns<U: Into<Vector<T, R>>>(columns: [U; C]) -> Self {
        Self(columns.map(|col| col.into().into_array()))
    }

    /// Builds a matrix by calling `cb(row, col)` for every element.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vecta::*;
    /// let mat: Matrix<usize, 2, 3> = Matrix::from_fn(|row, col| row * 10 + col);
    /// assert_eq!(mat, Matrix::from_rows([[0, 1, 2], [10, 11, 12]]));
    /// ```
    pub fn from_fn<F>(mut cb: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        Self(array::from_fn(|col| array::from_fn(|row| cb(row, col))))
    }

    /// Evaluates a matrix expression of the same shape into a new [`Matrix`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use vecta::*;
    /// let a = Matrix::from_rows([[1i32, 2], [3, 4]]);
    /// let m = Matrix::<f64, 2, 2>::from_expr(a * a);
    /// assert_eq!(m, [[7.0, 10.0], [15.0, 22.0]]);
    /// ```
    pub fn from_expr<E>(expr: E) -> Self
    where
        E: MatrixExpr<R, C>,
        T: Interop<E::Elem>,
    {
        Self::from_fn(|row, col| T::from(expr.at(row, col)))
    }

    /// Overwrites every element with the corresponding element of `expr`.
    ///
    /// `expr` is fully evaluated before any element is written.
    pub fn assign<E>(&mut self, expr: E)
    where
        E: MatrixExpr<R, C, Elem = T>,
    {
        *self = Self::from_fn(|row, col| expr.at(row, col));
    }

    /// Maps each element through `f`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vecta::*;
    /// let halves = Matrix::from_rows([[1, 2], [3, 4]]).map(|e| e as f32 / 2.0);
    /// assert_eq!(halves, Matrix::from_rows([[0.5f32, 1.0], [1.5, 2.0]]));
    /// ```
    pub fn map<F, U>(self, mut f: F) -> Matrix<U, R, C>
    where
        F: FnMut(T) -> U,
    {
        Matrix(self.0.map(|column| column.map(|v| f(v))))
    }

    /// Eagerly transposed copy. The free function [`transpose`] is the lazy form.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vecta::*;
    /// let wide = Matrix::from_rows([[1, 2, 3], [4, 5, 6]]);
    /// let tall: Matrix<i32, 3, 2> = wide.transpose();
    /// assert_eq!(tall, Matrix::from_columns([[1, 2, 3], [4, 5, 6]]));
    /// assert_eq!(tall, transpose(wide));
    /// ```
    pub fn transpose(self) -> Matrix<T, C, R>
    where
        T: Copy,
    {
        Matrix::from_fn(|row, col| self[(col, row)])
    }

    /// Checked element access: [`None`] outside the matrix.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vecta::*;
    /// let mat = Mat2::<u8>::identity();
    /// assert_eq!(mat.get(1, 1), Some(&1));
    /// assert_eq!(mat.get(0, 2), None);
    /// assert_eq!(mat.get(2, 0), None);
    /// ```
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row >= R {
            return None;
        }
        self.0.get(col).and_then(|col| col.get(row))
    }

    /// Checked mutable element access.
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        if row >= R {
            return None;
        }
        self.0.get_mut(col).and_then(|col| col.get_mut(row))
    }
}

impl<T: fmt::Debug, const R: usize, const C: usize> fmt::Debug for Matrix<T, R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Rows stay on one line even with `{:#?}`.
        let mut rows = f.debug_list();
        for row in 0..R {
            let row: [&T; C] = array::from_fn(|col| &self[(row, col)]);
            rows.entry(&format_args!("{row:?}"));
        }
        rows.finish()
    }
}

impl<T: Zero + Copy, const R: usize, const C: usize> Matrix<T, R, C> {
    /// All elements [`Zero::ZERO`].
    pub const ZERO: Self = Self([[T::ZERO; R]; C]);

    /// Returns [`Matrix::ZERO`], the value an "assign 0" produces.
    #[inline]
    pub const fn zero() -> Self {
        Self::ZERO
    }
}

impl<T: Zero + One, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Ones on the diagonal, zeros elsewhere. Not square-only: the diagonal of a non-square matrix
    /// stops at the shorter side.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vecta::*;
    /// let v = vec3(1, 2, 3);
    /// assert_eq!(Mat3::identity() * v, v);
    /// ```
    pub fn identity() -> Self {
        Self::from_fn(|row, col| if row == col { T::ONE } else { T::ZERO })
    }
}

impl<T, const N: usize> Matrix<T, N, N> {
    /// Copies out the diagonal.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vecta::*;
    /// let mat = Matrix::from_fn(|row, col| row * 3 + col);
    /// assert_eq!(Mat3::into_diagonal(mat), [0, 4, 8]);
    /// ```
    pub fn into_diagonal(self) -> Vector<T, N>
    where
        T: Copy,
    {
        Vector::from_fn(|i| self[(i, i)])
    }

    /// Square matrix with `diag` on the diagonal and zeros elsewhere.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vecta::*;
    /// let scale = Matrix::from_diagonal([2, 3]);
    /// assert_eq!(scale * vec2(5, 7), vec2(10, 21));
    /// ```
    pub fn from_diagonal<D: Into<Vector<T, N>>>(diag: D) -> Self
    where
        T: Zero + Copy,
    {
        let diag = diag.into();
        Self::from_fn(|row, col| if row == col { diag[row] } else { T::ZERO })
    }

    /// Sum of the diagonal.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vecta::*;
    /// assert_eq!(Matrix::from_rows([[2, 3], [5, 7]]).trace(), 9);
    ///
    /// assert_eq!(Mat3f::identity().trace(), 3.0);
    /// ```
    pub fn trace(&self) -> T
    where
        T: Number,
    {
        (0..N).fold(T::ZERO, |acc, i| acc + self[(i, i)])
    }
}

impl<T, const R: usize, const C: usize> Default for Matrix<T, R, C>
where
    T: Default,
{
    fn default() -> Self {
        Self::from_fn(|_, _| T::default())
    }
}

/// Lazily swaps the rows and columns of a matrix expression.
///
/// # Examples
///
/// ```
/// # use vecta::*;
/// let m = Matrix::from_rows([[1, 2, 3], [4, 5, 6]]);
/// let t = transpose(&m);
/// assert_eq!(t.at(2, 0), 3);
/// assert_eq!(t, [[1, 4], [2, 5], [3, 6]]);
/// ```
pub fn transpose<A, const R: usize, const C: usize>(a: A) -> MatTranspose<A, R, C>
where
    A: MatrixExpr<R, C>,
{
    MatTranspose::new(a)
}

/// Closed-form determinant of a square matrix expression, selected through [`Dim`].
///
/// Implemented for `Dim<2>`, `Dim<3>` and `Dim<4>`.
pub trait Determinant<A> {
    type Output;

    fn det(a: A) -> Self::Output;
}

impl<A> Determinant<A> for Dim<2>
where
    A: MatrixExpr<2, 2>,
    A::Elem: Number,
{
    type Output = A::Elem;

    #[inline]
    fn det(a: A) -> A::Elem {
        a.at(0, 0) * a.at(1, 1) - a.at(0, 1) * a.at(1, 0)
    }
}

impl<A> Determinant<A> for Dim<3>
where
    A: MatrixExpr<3, 3>,
    A::Elem: Number,
{
    type Output = A::Elem;

    fn det(a: A) -> A::Elem {
        det3(array::from_fn(|row| array::from_fn(|col| a.at(row, col))))
    }
}

impl<A> Determinant<A> for Dim<4>
where
    A: MatrixExpr<4, 4>,
    A::Elem: Number,
{
    type Output = A::Elem;

    fn det(a: A) -> A::Elem {
        let m: [[A::Elem; 4]; 4] = array::from_fn(|row| array::from_fn(|col| a.at(row, col)));

        // Cofactor expansion along the first row.
        (0..4).fold(A::Elem::ZERO, |acc, skip| {
            let minor = array::from_fn(|row| {
                array::from_fn(|col| m[row + 1][if col < skip { col } else { col + 1 }])
            });
            let term = m[0][skip] * det3(minor);
            if skip % 2 == 0 {
                acc + term
            } else {
                acc - term
            }
        })
    }
}

fn det3<T: Number>(m: [[T; 3]; 3]) -> T {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Computes the [determinant] of a 2x2, 3x3 or 4x4 matrix expression.
///
/// # Examples
///
/// ```
/// # use vecta::*;
/// assert_eq!(det(Matrix::from_rows([[2, 3], [5, 7]])), -1);
/// assert_eq!(det(Mat4::<f64>::identity()), 1.0);
/// ```
///
/// Other sizes, and non-square matrices, are rejected at compile time:
///
/// ```compile_fail
/// # use vecta::*;
/// det(Matrix::<i32, 5, 5>::identity());
/// ```
///
/// [determinant]: https://en.wikipedia.org/wiki/Determinant
pub fn det<A, const N: usize>(a: A) -> <Dim<N> as Determinant<A>>::Output
where
    A: MatrixExpr<N, N>,
    Dim<N>: Determinant<A>,
{
    <Dim<N> as Determinant<A>>::det(a)
}

#[cfg(test)]
mod tests {
    use crate::vec2;

    use super::*;

    #[test]
    fn from_rows_columns() {
        assert_eq!(
            Matrix::<i32, 2, 3>::from_rows([[1, 2, 3], [4, 5, 6]]),
            Matrix::<i32, 2, 3>::from_columns([[1, 4], [2, 5], [3, 6]]),
        );
    }

    #[test]
    fn contract() {
        let m = Matrix::<f32, 2, 3>::ZERO;
        assert_eq!(m.width(), 3);
        assert_eq!(m.height(), 2);
        assert_eq!(transpose(m).width(), 2);
        assert_eq!(transpose(m).height(), 3);
        assert_eq!((m * Matrix::<f32, 3, 4>::ZERO).width(), 4);
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn access_out_of_range() {
        Mat2::<i32>::identity().at(2, 0);
    }

    #[test]
    fn diagonal() {
        let mat = Matrix::from_diagonal([1, 2]);

        #[rustfmt::skip]
        assert_eq!(mat, Matrix::from_rows([
            [1, 0],
            [0, 2],
        ]));

        assert_eq!(mat.into_diagonal(), [1, 2]);
    }

    #[test]
    fn fmt() {
        let mat = Matrix::from_rows([[0, 1], [2, 3]]);

        // Natural writing order (row-wise) for debug output.
        assert_eq!(format!("{:?}", mat), "[[0, 1], [2, 3]]");

        // `#` modifier prints each row in its own line, but not each individual element.
        assert_eq!(
            format!("{:#?}", mat),
            "
[
    [0, 1],
    [2, 3],
]
"
            .trim()
        );
    }

    #[test]
    fn constants() {
        assert_eq!(format!("{:?}", Mat2f::ZERO), "[[0.0, 0.0], [0.0, 0.0]]");
        assert_eq!(format!("{:?}", Mat2f::identity()), "[[1.0, 0.0], [0.0, 1.0]]");
        assert_eq!(Mat2f::zero(), Mat2f::ZERO);
        assert_eq!(Mat3::<i8>::default(), Mat3::<i8>::ZERO);
    }

    #[test]
    fn mat_vec_mul() {
        let mat = Matrix::from_rows([[0i32, 1], [2, 3]]);
        let vec = vec2(4, 5);
        let out = mat * vec;
        assert_eq!(out, [4 * 0 + 5 * 1, 4 * 2 + 5 * 3]);
    }

    #[test]
    fn mat_mat_mul() {
        #[rustfmt::skip]
        let a = Matrix::from_rows([
            [1i32, 2],
            [3, 4],
            [5, 6],
            [7, 8],
        ]);
        #[rustfmt::skip]
        let b = Matrix::from_rows([
            [9i32, 10, 11],
            [12, 13, 14],
        ]);
        let c = (a * b).eval();
        assert_eq!(c[(0, 1)], a[(0, 0)] * b[(0, 1)] + a[(0, 1)] * b[(1, 1)]);
        assert_eq!(c[(2, 2)], a[(2, 0)] * b[(0, 2)] + a[(2, 1)] * b[(1, 2)]);
        assert_eq!(transpose(a * b), transpose(b) * transpose(a));
    }

    #[test]
    fn determinant() {
        assert_eq!(det(Mat2f::ZERO), 0.0);
        assert_eq!(det(Mat3f::ZERO), 0.0);
        assert_eq!(det(Mat4f::ZERO), 0.0);
        assert_eq!(det(Mat2f::identity()), 1.0);
        assert_eq!(det(Mat3f::identity()), 1.0);
        assert_eq!(det(Mat4f::identity()), 1.0);

        #[rustfmt::skip]
        let testmat = Matrix::from_rows([
            [-2i32, -1,  2],
            [ 2,  1,  4],
            [-3,  3, -1],
        ]);
        assert_eq!(det(testmat), 54);
        assert_eq!(det(transpose(testmat)), 54);

        #[rustfmt::skip]
        let testmat = Matrix::from_rows([
            [1i64, 0, 2, -1],
            [3, 0, 0, 5],
            [2, 1, 4, -3],
            [1, 0, 5, 0],
        ]);
        assert_eq!(det(testmat), 30);
        assert_eq!(det(testmat * 2), 30 * 16);
        assert_eq!(det(transpose(&testmat)), 30);
    }
}
