use std::ops::{AddAssign, Index, IndexMut, SubAssign};

use crate::{approx::ApproxEq, MatrixExpr, Matrix, Number};

impl<T, const R: usize, const C: usize> Index<(usize, usize)> for Matrix<T, R, C> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.0[col][row]
    }
}

impl<T, const R: usize, const C: usize> IndexMut<(usize, usize)> for Matrix<T, R, C> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        &mut self.0[col][row]
    }
}

matrix_expr_ops! {
    [T, const R: usize, const C: usize] Matrix<T, R, C> => R, C;
    ['a, T, const R: usize, const C: usize] &'a Matrix<T, R, C> => R, C;
}

// Compares against any matrix expression, including nested arrays.
matrix_expr_eq! {
    [T, const R: usize, const C: usize] Matrix<T, R, C> => R, C;
}

impl<T, const R: usize, const C: usize> Eq for Matrix<T, R, C> where T: Eq + Copy {}

impl<T, const R: usize, const C: usize> ApproxEq for Matrix<T, R, C>
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
impl<T, E, const R: usize, const C: usize> AddAssign<E> for Matrix<T, R, C>
where
    T: Number,
    E: MatrixExpr<R, C, Elem = T>,
{
    fn add_assign(&mut self, rhs: E) {
        *self = Matrix::from_fn(|row, col| self[(row, col)] + rhs.at(row, col));
    }
}

/// Element-wise subtraction.
impl<T, E, const R: usize, const C: usize> SubAssign<E> for Matrix<T, R, C>
where
    T: Number,
    E: MatrixExpr<R, C, Elem = T>,
{
    fn sub_assign(&mut self, rhs: E) {
        *self = Matrix::from_fn(|row, col| self[(row, col)] - rhs.at(row, col));
    }
}
