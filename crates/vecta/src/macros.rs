//! Operator impls shared by the containers and every expression node.
//!
//! Operators between two expressions are generic over the right-hand side. Operators with a
//! scalar are implemented once per primitive scalar type (`scalar * expr` can only be implemented
//! for concrete scalar types), including the [`Wrapping`](std::num::Wrapping) signed integers.
//! Each entry is `[generics] Type => dimensions;`.

macro_rules! vector_expr_ops {
    (@scalar [$($gen:tt)*] $ty:ty, $n:tt, $scalar:ty) => {
        impl<$($gen)*> ::std::ops::Mul<$scalar> for $ty
        where
            Self: $crate::VectorExpr<$n, Elem = $scalar>,
        {
            type Output = $crate::VecMulScalar<Self, $scalar, $n>;

            #[inline]
            fn mul(self, rhs: $scalar) -> Self::Output {
                $crate::VecMulScalar::new(self, rhs)
            }
        }

        impl<$($gen)*> ::std::ops::Mul<$ty> for $scalar
        where
            $ty: $crate::VectorExpr<$n, Elem = $scalar>,
        {
            type Output = $crate::VecMulScalar<$ty, $scalar, $n>;

            #[inline]
            fn mul(self, rhs: $ty) -> Self::Output {
                $crate::VecMulScalar::new(rhs, self)
            }
        }

        impl<$($gen)*> ::std::ops::Div<$scalar> for $ty
        where
            Self: $crate::VectorExpr<$n, Elem = $scalar>,
        {
            type Output = $crate::VecDivScalar<Self, $scalar, $n>;

            #[inline]
            fn div(self, rhs: $scalar) -> Self::Output {
                $crate::VecDivScalar::new(self, rhs)
            }
        }
    };
    (@scalars $gen:tt $ty:ty, $n:tt) => {
        vector_expr_ops!(@scalar $gen $ty, $n, f32);
        vector_expr_ops!(@scalar $gen $ty, $n, f64);
        vector_expr_ops!(@scalar $gen $ty, $n, i8);
        vector_expr_ops!(@scalar $gen $ty, $n, i16);
        vector_expr_ops!(@scalar $gen $ty, $n, i32);
        vector_expr_ops!(@scalar $gen $ty, $n, i64);
        vector_expr_ops!(@scalar $gen $ty, $n, i128);
        vector_expr_ops!(@scalar $gen $ty, $n, isize);
        vector_expr_ops!(@scalar $gen $ty, $n, ::std::num::Wrapping<i8>);
        vector_expr_ops!(@scalar $gen $ty, $n, ::std::num::Wrapping<i16>);
        vector_expr_ops!(@scalar $gen $ty, $n, ::std::num::Wrapping<i32>);
        vector_expr_ops!(@scalar $gen $ty, $n, ::std::num::Wrapping<i64>);
        vector_expr_ops!(@scalar $gen $ty, $n, ::std::num::Wrapping<i128>);
        vector_expr_ops!(@scalar $gen $ty, $n, ::std::num::Wrapping<isize>);
    };
    ($([$($gen:tt)*] $ty:ty => $n:tt;)+) => {
        $(
            impl<$($gen)*> ::std::ops::Neg for $ty
            where
                Self: $crate::VectorExpr<$n>,
                <Self as $crate::VectorExpr<$n>>::Elem: $crate::Number,
            {
                type Output = $crate::VecNeg<Self, $n>;

                #[inline]
                fn neg(self) -> Self::Output {
                    $crate::VecNeg::new(self)
                }
            }

            impl<$($gen)*, Rhs> ::std::ops::Add<Rhs> for $ty
            where
                Self: $crate::VectorExpr<$n>,
                Rhs: $crate::VectorExpr<$n, Elem = <Self as $crate::VectorExpr<$n>>::Elem>,
                <Self as $crate::VectorExpr<$n>>::Elem: $crate::Number,
            {
                type Output = $crate::VecAdd<Self, Rhs, $n>;

                #[inline]
                fn add(self, rhs: Rhs) -> Self::Output {
                    $crate::VecAdd::new(self, rhs)
                }
            }

            impl<$($gen)*, Rhs> ::std::ops::Sub<Rhs> for $ty
            where
                Self: $crate::VectorExpr<$n>,
                Rhs: $crate::VectorExpr<$n, Elem = <Self as $crate::VectorExpr<$n>>::Elem>,
                <Self as $crate::VectorExpr<$n>>::Elem: $crate::Number,
            {
                type Output = $crate::VecSub<Self, Rhs, $n>;

                #[inline]
                fn sub(self, rhs: Rhs) -> Self::Output {
                    $crate::VecSub::new(self, rhs)
                }
            }

            // Lets `matrix * vector` accept this type.
            impl<$($gen)*> $crate::MatMulRhs<$n> for $ty
            where
                Self: $crate::VectorExpr<$n>,
                <Self as $crate::VectorExpr<$n>>::Elem: $crate::Number,
            {
                type Elem = <Self as $crate::VectorExpr<$n>>::Elem;
                type Product<Lhs, const P: usize> = $crate::MatVecMul<Lhs, Self, P, $n>;

                #[inline]
                fn product<Lhs, const P: usize>(lhs: Lhs, rhs: Self) -> Self::Product<Lhs, P>
                where
                    Lhs: $crate::MatrixExpr<P, $n, Elem = Self::Elem>,
                {
                    $crate::MatVecMul::new(lhs, rhs)
                }
            }

            vector_expr_ops!(@scalars [$($gen)*] $ty, $n);
        )+
    };
}

macro_rules! vector_expr_eq {
    ($([$($gen:tt)*] $ty:ty => $n:tt;)+) => {
        $(
            impl<$($gen)*, Rhs> ::std::cmp::PartialEq<Rhs> for $ty
            where
                Self: $crate::VectorExpr<$n>,
                Rhs: $crate::VectorExpr<$n>,
                <Self as $crate::VectorExpr<$n>>::Elem:
                    ::std::cmp::PartialEq<<Rhs as $crate::VectorExpr<$n>>::Elem>,
            {
                fn eq(&self, other: &Rhs) -> bool {
                    (0..$n).all(|i| {
                        $crate::VectorExpr::at(self, i) == $crate::VectorExpr::at(other, i)
                    })
                }
            }
        )+
    };
}

macro_rules! matrix_expr_ops {
    (@scalar [$($gen:tt)*] $ty:ty, $r:tt, $c:tt, $scalar:ty) => {
        impl<$($gen)*> ::std::ops::Mul<$scalar> for $ty
        where
            Self: $crate::MatrixExpr<$r, $c, Elem = $scalar>,
        {
            type Output = $crate::MatMulScalar<Self, $scalar, $r, $c>;

            #[inline]
            fn mul(self, rhs: $scalar) -> Self::Output {
                $crate::MatMulScalar::new(self, rhs)
            }
        }

        impl<$($gen)*> ::std::ops::Mul<$ty> for $scalar
        where
            $ty: $crate::MatrixExpr<$r, $c, Elem = $scalar>,
        {
            type Output = $crate::MatMulScalar<$ty, $scalar, $r, $c>;

            #[inline]
            fn mul(self, rhs: $ty) -> Self::Output {
                $crate::MatMulScalar::new(rhs, self)
            }
        }

        impl<$($gen)*> ::std::ops::Div<$scalar> for $ty
        where
            Self: $crate::MatrixExpr<$r, $c, Elem = $scalar>,
        {
            type Output = $crate::MatDivScalar<Self, $scalar, $r, $c>;

            #[inline]
            fn div(self, rhs: $scalar) -> Self::Output {
                $crate::MatDivScalar::new(self, rhs)
            }
        }
    };
    (@scalars $gen:tt $ty:ty, $r:tt, $c:tt) => {
        matrix_expr_ops!(@scalar $gen $ty, $r, $c, f32);
        matrix_expr_ops!(@scalar $gen $ty, $r, $c, f64);
        matrix_expr_ops!(@scalar $gen $ty, $r, $c, i8);
        matrix_expr_ops!(@scalar $gen $ty, $r, $c, i16);
        matrix_expr_ops!(@scalar $gen $ty, $r, $c, i32);
        matrix_expr_ops!(@scalar $gen $ty, $r, $c, i64);
        matrix_expr_ops!(@scalar $gen $ty, $r, $c, i128);
        matrix_expr_ops!(@scalar $gen $ty, $r, $c, isize);
        matrix_expr_ops!(@scalar $gen $ty, $r, $c, ::std::num::Wrapping<i8>);
        matrix_expr_ops!(@scalar $gen $ty, $r, $c, ::std::num::Wrapping<i16>);
        matrix_expr_ops!(@scalar $gen $ty, $r, $c, ::std::num::Wrapping<i32>);
        matrix_expr_ops!(@scalar $gen $ty, $r, $c, ::std::num::Wrapping<i64>);
        matrix_expr_ops!(@scalar $gen $ty, $r, $c, ::std::num::Wrapping<i128>);
        matrix_expr_ops!(@scalar $gen $ty, $r, $c, ::std::num::Wrapping<isize>);
    };
    ($([$($gen:tt)*] $ty:ty => $r:tt, $c:tt;)+) => {
        $(
            impl<$($gen)*> ::std::ops::Neg for $ty
            where
                Self: $crate::MatrixExpr<$r, $c>,
                <Self as $crate::MatrixExpr<$r, $c>>::Elem: $crate::Number,
            {
                type Output = $crate::MatNeg<Self, $r, $c>;

                #[inline]
                fn neg(self) -> Self::Output {
                    $crate::MatNeg::new(self)
                }
            }

            impl<$($gen)*, Rhs> ::std::ops::Add<Rhs> for $ty
            where
                Self: $crate::MatrixExpr<$r, $c>,
                Rhs: $crate::MatrixExpr<$r, $c, Elem = <Self as $crate::MatrixExpr<$r, $c>>::Elem>,
                <Self as $crate::MatrixExpr<$r, $c>>::Elem: $crate::Number,
            {
                type Output = $crate::MatAdd<Self, Rhs, $r, $c>;

                #[inline]
                fn add(self, rhs: Rhs) -> Self::Output {
                    $crate::MatAdd::new(self, rhs)
                }
            }

            impl<$($gen)*, Rhs> ::std::ops::Sub<Rhs> for $ty
            where
                Self: $crate::MatrixExpr<$r, $c>,
                Rhs: $crate::MatrixExpr<$r, $c, Elem = <Self as $crate::MatrixExpr<$r, $c>>::Elem>,
                <Self as $crate::MatrixExpr<$r, $c>>::Elem: $crate::Number,
            {
                type Output = $crate::MatSub<Self, Rhs, $r, $c>;

                #[inline]
                fn sub(self, rhs: Rhs) -> Self::Output {
                    $crate::MatSub::new(self, rhs)
                }
            }

            /// Matrix product with a matrix or vector whose height equals this matrix' width.
            impl<$($gen)*, Rhs> ::std::ops::Mul<Rhs> for $ty
            where
                Self: $crate::MatrixExpr<$r, $c>,
                Rhs: $crate::MatMulRhs<$c, Elem = <Self as $crate::MatrixExpr<$r, $c>>::Elem>,
            {
                type Output = <Rhs as $crate::MatMulRhs<$c>>::Product<Self, $r>;

                #[inline]
                fn mul(self, rhs: Rhs) -> Self::Output {
                    <Rhs as $crate::MatMulRhs<$c>>::product(self, rhs)
                }
            }

            // Lets this type appear on the right of a matrix product.
            impl<$($gen)*> $crate::MatMulRhs<$r> for $ty
            where
                Self: $crate::MatrixExpr<$r, $c>,
                <Self as $crate::MatrixExpr<$r, $c>>::Elem: $crate::Number,
            {
                type Elem = <Self as $crate::MatrixExpr<$r, $c>>::Elem;
                type Product<Lhs, const P: usize> = $crate::MatMul<Lhs, Self, P, $r, $c>;

                #[inline]
                fn product<Lhs, const P: usize>(lhs: Lhs, rhs: Self) -> Self::Product<Lhs, P>
                where
                    Lhs: $crate::MatrixExpr<P, $r, Elem = Self::Elem>,
                {
                    $crate::MatMul::new(lhs, rhs)
                }
            }

            matrix_expr_ops!(@scalars [$($gen)*] $ty, $r, $c);
        )+
    };
}

macro_rules! matrix_expr_eq {
    ($([$($gen:tt)*] $ty:ty => $r:tt, $c:tt;)+) => {
        $(
            impl<$($gen)*, Rhs> ::std::cmp::PartialEq<Rhs> for $ty
            where
                Self: $crate::MatrixExpr<$r, $c>,
                Rhs: $crate::MatrixExpr<$r, $c>,
                <Self as $crate::MatrixExpr<$r, $c>>::Elem:
                    ::std::cmp::PartialEq<<Rhs as $crate::MatrixExpr<$r, $c>>::Elem>,
            {
                fn eq(&self, other: &Rhs) -> bool {
                    (0..$r).all(|row| {
                        (0..$c).all(|col| {
                            $crate::MatrixExpr::at(self, row, col)
                                == $crate::MatrixExpr::at(other, row, col)
                        })
                    })
                }
            }
        )+
    };
}

macro_rules! quat_expr_ops {
    (@scalar [$($gen:tt)*] $ty:ty, $scalar:ty) => {
        impl<$($gen)*> ::std::ops::Mul<$scalar> for $ty
        where
            Self: $crate::QuatExpr<Elem = $scalar>,
        {
            type Output = $crate::QuatMulScalar<Self, $scalar>;

            #[inline]
            fn mul(self, rhs: $scalar) -> Self::Output {
                $crate::QuatMulScalar::new(self, rhs)
            }
        }

        impl<$($gen)*> ::std::ops::Mul<$ty> for $scalar
        where
            $ty: $crate::QuatExpr<Elem = $scalar>,
        {
            type Output = $crate::QuatMulScalar<$ty, $scalar>;

            #[inline]
            fn mul(self, rhs: $ty) -> Self::Output {
                $crate::QuatMulScalar::new(rhs, self)
            }
        }

        impl<$($gen)*> ::std::ops::Div<$scalar> for $ty
        where
            Self: $crate::QuatExpr<Elem = $scalar>,
        {
            type Output = $crate::QuatDivScalar<Self, $scalar>;

            #[inline]
            fn div(self, rhs: $scalar) -> Self::Output {
                $crate::QuatDivScalar::new(self, rhs)
            }
        }
    };
    (@scalars $gen:tt $ty:ty) => {
        quat_expr_ops!(@scalar $gen $ty, f32);
        quat_expr_ops!(@scalar $gen $ty, f64);
        quat_expr_ops!(@scalar $gen $ty, i8);
        quat_expr_ops!(@scalar $gen $ty, i16);
        quat_expr_ops!(@scalar $gen $ty, i32);
        quat_expr_ops!(@scalar $gen $ty, i64);
        quat_expr_ops!(@scalar $gen $ty, i128);
        quat_expr_ops!(@scalar $gen $ty, isize);
        quat_expr_ops!(@scalar $gen $ty, ::std::num::Wrapping<i8>);
        quat_expr_ops!(@scalar $gen $ty, ::std::num::Wrapping<i16>);
        quat_expr_ops!(@scalar $gen $ty, ::std::num::Wrapping<i32>);
        quat_expr_ops!(@scalar $gen $ty, ::std::num::Wrapping<i64>);
        quat_expr_ops!(@scalar $gen $ty, ::std::num::Wrapping<i128>);
        quat_expr_ops!(@scalar $gen $ty, ::std::num::Wrapping<isize>);
    };
    ($([$($gen:tt)*] $ty:ty;)+) => {
        $(
            impl<$($gen)*> ::std::ops::Neg for $ty
            where
                Self: $crate::QuatExpr,
                <Self as $crate::QuatExpr>::Elem: $crate::Number,
            {
                type Output = $crate::QuatNeg<Self>;

                #[inline]
                fn neg(self) -> Self::Output {
                    $crate::QuatNeg::new(self)
                }
            }

            impl<$($gen)*, Rhs> ::std::ops::Add<Rhs> for $ty
            where
                Self: $crate::QuatExpr,
                Rhs: $crate::QuatExpr<Elem = <Self as $crate::QuatExpr>::Elem>,
                <Self as $crate::QuatExpr>::Elem: $crate::Number,
            {
                type Output = $crate::QuatAdd<Self, Rhs>;

                #[inline]
                fn add(self, rhs: Rhs) -> Self::Output {
                    $crate::QuatAdd::new(self, rhs)
                }
            }

            impl<$($gen)*, Rhs> ::std::ops::Sub<Rhs> for $ty
            where
                Self: $crate::QuatExpr,
                Rhs: $crate::QuatExpr<Elem = <Self as $crate::QuatExpr>::Elem>,
                <Self as $crate::QuatExpr>::Elem: $crate::Number,
            {
                type Output = $crate::QuatSub<Self, Rhs>;

                #[inline]
                fn sub(self, rhs: Rhs) -> Self::Output {
                    $crate::QuatSub::new(self, rhs)
                }
            }

            /// Hamilton product.
            impl<$($gen)*, Rhs> ::std::ops::Mul<Rhs> for $ty
            where
                Self: $crate::QuatExpr,
                Rhs: $crate::QuatExpr<Elem = <Self as $crate::QuatExpr>::Elem>,
                <Self as $crate::QuatExpr>::Elem: $crate::Number,
            {
                type Output = $crate::QuatMul<Self, Rhs>;

                #[inline]
                fn mul(self, rhs: Rhs) -> Self::Output {
                    $crate::QuatMul::new(self, rhs)
                }
            }

            /// Quaternion division: `a / b` is `a * inverse(b)`.
            impl<$($gen)*, Rhs> ::std::ops::Div<Rhs> for $ty
            where
                Self: $crate::QuatExpr,
                Rhs: $crate::QuatExpr<Elem = <Self as $crate::QuatExpr>::Elem>,
                <Self as $crate::QuatExpr>::Elem: $crate::Number,
            {
                type Output = $crate::QuatMul<Self, $crate::Inverse<Rhs>>;

                #[inline]
                fn div(self, rhs: Rhs) -> Self::Output {
                    $crate::QuatMul::new(self, $crate::inverse(rhs))
                }
            }

            quat_expr_ops!(@scalars [$($gen)*] $ty);
        )+
    };
}

macro_rules! quat_expr_eq {
    ($([$($gen:tt)*] $ty:ty;)+) => {
        $(
            impl<$($gen)*, Rhs> ::std::cmp::PartialEq<Rhs> for $ty
            where
                Self: $crate::QuatExpr,
                Rhs: $crate::QuatExpr,
                <Self as $crate::QuatExpr>::Elem:
                    ::std::cmp::PartialEq<<Rhs as $crate::QuatExpr>::Elem>,
            {
                fn eq(&self, other: &Rhs) -> bool {
                    use $crate::QuatExpr;

                    self.w() == other.w()
                        && self.x() == other.x()
                        && self.y() == other.y()
                        && self.z() == other.z()
                }
            }
        )+
    };
}
