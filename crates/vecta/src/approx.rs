//! Approximate equality for floating-point scalars and everything built from them.
//!
//! SIMD kernels are allowed to reorder and fuse floating-point operations, so their results can
//! differ from the generic evaluation in the last few bits. [`ApproxEq`] and the
//! [`assert_approx_eq!`][crate::assert_approx_eq] family express "equal up to rounding".

mod impls;

use std::{fmt, panic::Location};

/// Comparison of values that are equal up to a tolerance.
///
/// Vectors, matrices and quaternions compare componentwise: they are approximately equal when
/// every pair of components is.
///
/// Background on picking a comparison:
/// <https://randomascii.wordpress.com/2012/02/25/comparing-floating-point-numbers-2012-edition/>
pub trait ApproxEq<Rhs: ?Sized = Self> {
    /// Scalar type of the `abs` and `rel` tolerances, usually [`f32`] or [`f64`].
    type Tolerance: DefaultTolerances + Copy + fmt::Debug;

    /// Returns whether `|self - other| <= abs_tolerance`.
    fn abs_diff_eq(&self, other: &Rhs, abs_tolerance: Self::Tolerance) -> bool;

    /// Returns whether `|self - other| <= max(|self|, |other|) * rel_tolerance`.
    fn rel_diff_eq(&self, other: &Rhs, rel_tolerance: Self::Tolerance) -> bool;

    /// Returns whether at most `ulps_tolerance` representable values lie between `self` and
    /// `other`.
    ///
    /// `NaN` equals nothing. `-0.0` equals `+0.0`, but no other pair of values with different
    /// signs is equal.
    fn ulps_diff_eq(&self, other: &Rhs, ulps_tolerance: u32) -> bool;
}

/// Tolerances used when an assertion doesn't configure any.
pub trait DefaultTolerances {
    const DEFAULT_ABS_TOLERANCE: Self;
    const DEFAULT_REL_TOLERANCE: Self;
    const DEFAULT_ULPS_TOLERANCE: u32;
}

macro_rules! default_tolerances {
    ($($t:ty),+) => {$(
        impl DefaultTolerances for $t {
            const DEFAULT_ABS_TOLERANCE: Self = <$t>::EPSILON;
            const DEFAULT_REL_TOLERANCE: Self = <$t>::EPSILON;
            const DEFAULT_ULPS_TOLERANCE: u32 = 4;
        }
    )+};
}

default_tolerances!(f32, f64);

/// The comparisons an [`Asserter`] runs. The values are equal if any of them passes.
#[derive(Clone, Copy)]
struct Checks<Tol> {
    abs: Option<Tol>,
    rel: Option<Tol>,
    ulps: Option<u32>,
}

impl<Tol: DefaultTolerances + Copy> Checks<Tol> {
    const NONE: Self = Self {
        abs: None,
        rel: None,
        ulps: None,
    };

    /// Absolute or relative comparison at the default tolerances, if nothing was configured.
    fn or_default(self) -> Self {
        match self {
            Self {
                abs: None,
                rel: None,
                ulps: None,
            } => Self {
                abs: Some(Tol::DEFAULT_ABS_TOLERANCE),
                rel: Some(Tol::DEFAULT_REL_TOLERANCE),
                ulps: None,
            },
            configured => configured,
        }
    }

    fn pass<T: ApproxEq<Tolerance = Tol> + ?Sized>(&self, left: &T, right: &T) -> bool {
        self.abs.map_or(false, |abs| left.abs_diff_eq(right, abs))
            || self.rel.map_or(false, |rel| left.rel_diff_eq(right, rel))
            || self.ulps.map_or(false, |ulps| left.ulps_diff_eq(right, ulps))
    }
}

impl<Tol: fmt::Debug> fmt::Display for Checks<Tol> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        if let Some(abs) = &self.abs {
            write!(f, "abs: {abs:?}")?;
            sep = ", ";
        }
        if let Some(rel) = &self.rel {
            write!(f, "{sep}rel: {rel:?}")?;
            sep = ", ";
        }
        if let Some(ulps) = &self.ulps {
            write!(f, "{sep}ulps: {ulps}")?;
        }
        Ok(())
    }
}

/// Pending approximate assertion, created by [`assert_approx_eq!`][crate::assert_approx_eq] and
/// [`assert_approx_ne!`][crate::assert_approx_ne].
///
/// The assertion is evaluated when the value is dropped, which lets the caller pick comparisons
/// first:
///
/// - [`Asserter::abs`] compares the absolute difference.
/// - [`Asserter::rel`] compares the difference relative to the larger magnitude.
/// - [`Asserter::ulps`] counts the floats between the values.
///
/// The values are equal if *any* selected comparison passes. With none selected, an absolute and
/// a relative comparison at [`DefaultTolerances`] are used.
pub struct Asserter<'a, T>
where
    T: ApproxEq + fmt::Debug,
{
    left: &'a T,
    right: &'a T,
    kind: AssertionKind,
    location: &'static Location<'static>,
    msg: Option<fmt::Arguments<'a>>,
    checks: Checks<T::Tolerance>,
}

impl<'a, T> Asserter<'a, T>
where
    T: ApproxEq + fmt::Debug,
{
    #[doc(hidden)]
    #[track_caller]
    pub fn new(
        left: &'a T,
        right: &'a T,
        kind: AssertionKind,
        msg: Option<fmt::Arguments<'a>>,
    ) -> Self {
        Self {
            left,
            right,
            kind,
            location: Location::caller(),
            msg,
            checks: Checks::NONE,
        }
    }

    /// Accepts values whose absolute difference is at most `abs`.
    ///
    /// Suited to values near zero, where relative comparisons break down.
    pub fn abs(&mut self, abs: T::Tolerance) -> &mut Self {
        self.checks.abs = Some(abs);
        self
    }

    /// Accepts values whose difference is at most `rel` times the larger magnitude.
    ///
    /// Near zero this needs very large tolerances: values of opposite sign need at least `2.0`,
    /// and anything compared against `0.0` needs at least `1.0`.
    pub fn rel(&mut self, rel: T::Tolerance) -> &mut Self {
        self.checks.rel = Some(rel);
        self
    }

    /// Accepts values with at most `ulps` representable floats between them.
    ///
    /// This scales with the magnitude of the values, but floats of opposite sign are always
    /// billions of ULPs apart.
    pub fn ulps(&mut self, ulps: u32) -> &mut Self {
        self.checks.ulps = Some(ulps);
        self
    }
}

impl<'a, T> Drop for Asserter<'a, T>
where
    T: ApproxEq + fmt::Debug,
{
    // `#[track_caller]` has no effect on `drop`; `location` was captured in `new`.
    fn drop(&mut self) {
        let checks = self.checks.or_default();
        let equal = checks.pass(self.left, self.right);
        let expected = self.kind == AssertionKind::Eq;
        if equal != expected {
            assertion_failed(
                self.left,
                self.right,
                self.kind,
                &checks.to_string(),
                self.location,
                self.msg,
            );
        }
    }
}

fn assertion_failed(
    left: &dyn fmt::Debug,
    right: &dyn fmt::Debug,
    kind: AssertionKind,
    checks: &str,
    location: &Location<'_>,
    msg: Option<fmt::Arguments<'_>>,
) -> ! {
    let op = match kind {
        AssertionKind::Eq => "==",
        AssertionKind::Ne => "!=",
    };
    let msg = msg.map(|args| format!(": {args}")).unwrap_or_default();
    panic!(
        "assertion `left {op} right` ({checks}) failed at {location}{msg}
  left: {left:?}
 right: {right:?}"
    );
}

#[doc(hidden)]
#[derive(Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AssertionKind {
    Eq,
    Ne,
}

/// Asserts that two values are approximately equal, as defined by [`ApproxEq`].
///
/// Evaluates to an [`Asserter`], which selects the comparisons to run. An optional trailing
/// message works like the one of [`assert_eq!`].
///
/// # Examples
///
/// ```
/// # use vecta::*;
/// let one = (0..10).fold(0.0, |acc, _| acc + 0.1);
/// assert_approx_eq!(one, 1.0);
///
/// assert_approx_eq!(vec3(1.0, 2.0, 3.0), vec3(1.01, 1.99, 3.0)).abs(0.02);
/// assert_approx_eq!(200.0, 198.0, "off by {}", 2.0).rel(0.01);
/// assert_approx_eq!(1.0, 1.0 + f64::EPSILON).ulps(1);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::approx::Asserter::new(
            &$lhs,
            &$rhs,
            $crate::approx::AssertionKind::Eq,
            ::core::option::Option::None,
        )
    };
    ($lhs:expr, $rhs:expr, $($arg:tt)+) => {
        $crate::approx::Asserter::new(
            &$lhs,
            &$rhs,
            $crate::approx::AssertionKind::Eq,
            ::core::option::Option::Some(::core::format_args!($($arg)+)),
        )
    };
}

/// Asserts that two values are *not* approximately equal, as defined by [`ApproxEq`].
///
/// See [`assert_approx_eq!`].
///
/// ```
/// # use vecta::*;
/// assert_approx_ne!(100.0, 99.0).abs(0.5);
/// assert_approx_ne!(1.0, 1.0 + 2.0 * f64::EPSILON).ulps(1);
/// ```
#[macro_export]
macro_rules! assert_approx_ne {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::approx::Asserter::new(
            &$lhs,
            &$rhs,
            $crate::approx::AssertionKind::Ne,
            ::core::option::Option::None,
        )
    };
    ($lhs:expr, $rhs:expr, $($arg:tt)+) => {
        $crate::approx::Asserter::new(
            &$lhs,
            &$rhs,
            $crate::approx::AssertionKind::Ne,
            ::core::option::Option::Some(::core::format_args!($($arg)+)),
        )
    };
}

#[cfg(test)]
mod tests {
    use super::Checks;

    #[test]
    #[should_panic(expected = "assertion `left == right` (abs: 0.5) failed")]
    fn reports_tolerance() {
        assert_approx_eq!(1.0f32, 2.0).abs(0.5);
    }

    #[test]
    #[should_panic(expected = "assertion `left != right` (abs: ")]
    fn reports_defaults() {
        assert_approx_ne!(0.5, 0.5);
    }

    #[test]
    #[should_panic(expected = "components drifted")]
    fn message() {
        assert_approx_eq!([1.0, 2.0], [1.0, 2.5], "components drifted").abs(0.1);
    }

    #[test]
    fn checks_fmt() {
        let checks = Checks {
            abs: Some(0.5f32),
            rel: None,
            ulps: Some(3),
        };
        assert_eq!(checks.to_string(), "abs: 0.5, ulps: 3");
        assert_eq!(Checks::<f64>::NONE.to_string(), "");
        assert_eq!(
            Checks::<f32>::NONE.or_default().to_string(),
            format!("abs: {:?}, rel: {:?}", f32::EPSILON, f32::EPSILON)
        );
    }

    #[test]
    fn any_check_passes() {
        assert_approx_eq!(100.0, 99.0).abs(0.5).rel(0.02);
        assert_approx_eq!(100.0, 99.0).ulps(0).abs(1.0);
        assert_approx_ne!(100.0, 99.0).abs(0.5).rel(0.001).ulps(2);
    }

    #[test]
    fn rel() {
        assert_approx_eq!(1000.0, 1001.0).rel(0.001);
        assert_approx_ne!(1000.0, 1002.0).rel(0.001);
        assert_approx_eq!(0.5, -0.5).rel(2.0);
        assert_approx_eq!(0.0, 1e-9).rel(1.0);
    }

    #[test]
    fn ulps() {
        let next = f32::from_bits(1.0f32.to_bits() + 1);
        assert_approx_eq!(1.0, next).ulps(1);
        assert_approx_ne!(1.0, next).ulps(0);
        assert_approx_eq!(0.0f64, -0.0).ulps(0);
        assert_approx_ne!(f32::MIN_POSITIVE, -f32::MIN_POSITIVE).ulps(u32::MAX);
    }

    #[test]
    fn non_finite() {
        for nan in [f32::NAN, -f32::NAN] {
            assert_approx_ne!(nan, nan).abs(f32::INFINITY);
            assert_approx_ne!(nan, nan).rel(f32::INFINITY);
            assert_approx_ne!(nan, nan).ulps(u32::MAX);
            assert_approx_ne!(nan, 1.0).abs(f32::INFINITY);
        }

        assert_approx_eq!(f64::INFINITY, f64::INFINITY).abs(0.0);
        assert_approx_eq!(f64::NEG_INFINITY, f64::NEG_INFINITY).rel(0.0);
        assert_approx_ne!(f64::INFINITY, f64::NEG_INFINITY).abs(f64::MAX);
        assert_approx_ne!(f64::INFINITY, f64::MAX).abs(1e300);
        assert_approx_eq!(f64::MAX, f64::INFINITY).ulps(1);
    }

    #[test]
    fn compound() {
        assert_approx_eq!([0.1 + 0.2, 1.0], [0.3, 1.0]);
        assert_approx_ne!([0.0, 1.0], [0.0, 1.1]).abs(0.01);
    }
}
