use std::{num::Wrapping, ops};

/// Types that support the trigonometric functions needed to build rotations.
pub trait Trig {
    /// Computes the sine of the angle `self` (in radians).
    fn sin(self) -> Self;
    /// Computes the cosine of the angle `self` (in radians).
    fn cos(self) -> Self;
}

/// Square root, needed for magnitudes and normalization.
pub trait Sqrt {
    fn sqrt(self) -> Self;
}

/// Additive identity, available in `const` contexts.
pub trait Zero {
    const ZERO: Self;
}

/// Multiplicative identity, available in `const` contexts.
pub trait One {
    const ONE: Self;
}

/// Scalars closed under negation and the four arithmetic operations.
///
/// This is the contract every vector, matrix and quaternion element has to fulfill. Note
/// that it requires [`ops::Neg`], so unsigned integers are not [`Number`]s.
///
/// Arithmetic on plain integers follows the integer's own operators: it panics on overflow in
/// debug builds and wraps in release builds. Use [`Wrapping`] elements to wrap in every build.
pub trait Number:
    Zero
    + One
    + ops::Neg<Output = Self>
    + ops::Add<Output = Self>
    + ops::Sub<Output = Self>
    + ops::Mul<Output = Self>
    + ops::Div<Output = Self>
    + PartialEq
    + Copy
{
}
impl<T> Number for T where
    T: Zero
        + One
        + ops::Neg<Output = Self>
        + ops::Add<Output = Self>
        + ops::Sub<Output = Self>
        + ops::Mul<Output = Self>
        + ops::Div<Output = Self>
        + PartialEq
        + Copy
{
}

/// [`Number`]s that values of type `U` can be converted into without loss.
///
/// This decides which scalar types may be mixed in conversions: a `Quat<f32>` can become a
/// `Quat<f64>` because `f64: Interop<f32>`, but not the other way around.
pub trait Interop<U>: Number + From<U> {}
impl<T, U> Interop<U> for T where T: Number + From<U> {}

/// Type-level dimension marker.
///
/// Used to select dimension-specific operations (2-D vs. 3-D cross products, the closed-form
/// determinants) through trait impls on `Dim<2>`, `Dim<3>`, etc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dim<const N: usize>;

macro_rules! zero_one {
    ($zero:literal, $one:literal; $($types:ty),+) => {
        $(
            impl Zero for $types {
                const ZERO: Self = $zero;
            }
            impl One for $types {
                const ONE: Self = $one;
            }
        )+
    };
}
zero_one!(0.0, 1.0; f32, f64);
zero_one!(0, 1; u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl<T: Zero> Zero for Wrapping<T> {
    const ZERO: Self = Wrapping(T::ZERO);
}

impl<T: One> One for Wrapping<T> {
    const ONE: Self = Wrapping(T::ONE);
}

macro_rules! float_fns {
    ($($t:ty),+) => {$(
        impl Trig for $t {
            #[inline]
            fn sin(self) -> Self {
                <$t>::sin(self)
            }

            #[inline]
            fn cos(self) -> Self {
                <$t>::cos(self)
            }
        }

        impl Sqrt for $t {
            #[inline]
            fn sqrt(self) -> Self {
                <$t>::sqrt(self)
            }
        }
    )+};
}
float_fns!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    fn widen<T: Interop<U>, U>(u: U) -> T {
        T::from(u)
    }

    #[test]
    fn interop() {
        let x: f64 = widen(1.5f32);
        assert_eq!(x, 1.5);
        let y: f64 = widen(-7i32);
        assert_eq!(y, -7.0);
        let z: i64 = widen(3i16);
        assert_eq!(z, 3);
    }

    #[test]
    fn constants() {
        assert_eq!(<i8 as Zero>::ZERO, 0);
        assert_eq!(<f32 as One>::ONE, 1.0);
        assert_eq!(<isize as One>::ONE + <isize as One>::ONE, 2);
    }

    #[test]
    fn wrapping_numbers() {
        fn sum<T: Number>(a: T, b: T) -> T {
            a + b
        }

        assert_eq!(<Wrapping<i16> as Zero>::ZERO, Wrapping(0));
        assert_eq!(sum(Wrapping(i8::MAX), Wrapping::ONE), Wrapping(i8::MIN));
        assert_eq!(sum(Wrapping(i64::MIN), Wrapping(-1)), Wrapping(i64::MAX));
    }
}
