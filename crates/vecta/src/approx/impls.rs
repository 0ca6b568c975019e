use super::ApproxEq;

macro_rules! float_impls {
    ($($t:ty),+) => {$(
        impl ApproxEq for $t {
            type Tolerance = Self;

            fn abs_diff_eq(&self, other: &Self, abs_tolerance: Self) -> bool {
                // Infinities only equal themselves, whatever the tolerance.
                if !self.is_finite() || !other.is_finite() {
                    return self == other;
                }
                (self - other).abs() <= abs_tolerance
            }

            fn rel_diff_eq(&self, other: &Self, rel_tolerance: Self) -> bool {
                if !self.is_finite() || !other.is_finite() {
                    return self == other;
                }
                let largest = self.abs().max(other.abs());
                (self - other).abs() <= largest * rel_tolerance
            }

            fn ulps_diff_eq(&self, other: &Self, ulps_tolerance: u32) -> bool {
                if self.is_nan() || other.is_nan() {
                    return false;
                }
                if self.is_sign_negative() != other.is_sign_negative() {
                    // `-0.0 == +0.0`
                    return self == other;
                }
                self.to_bits().abs_diff(other.to_bits()) <= ulps_tolerance.into()
            }
        }
    )+};
}

float_impls!(f32, f64);

impl<T: ApproxEq<U> + ?Sized, U: ?Sized> ApproxEq<U> for &T {
    type Tolerance = T::Tolerance;

    fn abs_diff_eq(&self, other: &U, abs_tolerance: Self::Tolerance) -> bool {
        T::abs_diff_eq(self, other, abs_tolerance)
    }

    fn rel_diff_eq(&self, other: &U, rel_tolerance: Self::Tolerance) -> bool {
        T::rel_diff_eq(self, other, rel_tolerance)
    }

    fn ulps_diff_eq(&self, other: &U, ulps_tolerance: u32) -> bool {
        T::ulps_diff_eq(self, other, ulps_tolerance)
    }
}

impl<T: ApproxEq<U>, U> ApproxEq<[U]> for [T] {
    type Tolerance = T::Tolerance;

    fn abs_diff_eq(&self, other: &[U], abs_tolerance: Self::Tolerance) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other)
                .all(|(a, b)| a.abs_diff_eq(b, abs_tolerance))
    }

    fn rel_diff_eq(&self, other: &[U], rel_tolerance: Self::Tolerance) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other)
                .all(|(a, b)| a.rel_diff_eq(b, rel_tolerance))
    }

    fn ulps_diff_eq(&self, other: &[U], ulps_tolerance: u32) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other)
                .all(|(a, b)| a.ulps_diff_eq(b, ulps_tolerance))
    }
}

impl<T: ApproxEq<U>, U, const N: usize> ApproxEq<[U; N]> for [T; N] {
    type Tolerance = T::Tolerance;

    fn abs_diff_eq(&self, other: &[U; N], abs_tolerance: Self::Tolerance) -> bool {
        self[..].abs_diff_eq(&other[..], abs_tolerance)
    }

    fn rel_diff_eq(&self, other: &[U; N], rel_tolerance: Self::Tolerance) -> bool {
        self[..].rel_diff_eq(&other[..], rel_tolerance)
    }

    fn ulps_diff_eq(&self, other: &[U; N], ulps_tolerance: u32) -> bool {
        self[..].ulps_diff_eq(&other[..], ulps_tolerance)
    }
}
