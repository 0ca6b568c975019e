//! Runtime checks of the host CPU against the instruction sets compiled into the build.
//!
//! Kernels are selected at compile time, so a binary built with `-C target-cpu=native` and copied
//! to an older machine will fault on the first SIMD instruction the host does not implement. The
//! functions here detect the host's features and compare them against an [`Isa`] tag's
//! [`Isa::FEATURES`] so that applications can fail early with a readable message instead.

use std::env::{self, VarError};

use anyhow::bail;
use once_cell::sync::Lazy;

use crate::isa::{Isa, Native};

const HOST_CHECK_VAR: &str = "VECTA_HOST_CHECK";

/// What [`check_native`] does when the host lacks a feature the build was compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCheck {
    /// Return an error.
    Strict,
    /// Log a warning and carry on.
    Warn,
    /// Don't check at all.
    Off,
}

const DEFAULT_HOST_CHECK: HostCheck = HostCheck::Warn;

static HOST_CHECK: Lazy<Result<HostCheck, String>> = Lazy::new(|| match env::var(HOST_CHECK_VAR) {
    Ok(v) => parse_host_check(Some(&v)),
    Err(VarError::NotPresent) => Ok(DEFAULT_HOST_CHECK),
    Err(VarError::NotUnicode(s)) => Err(format!(
        "invalid value set for `{HOST_CHECK_VAR}` variable: {}",
        s.to_string_lossy()
    )),
});

static DETECTED: Lazy<Vec<&'static str>> = Lazy::new(|| {
    let detected = detect();
    log::debug!("detected host CPU features: {:?}", detected);
    detected
});

#[allow(unused_mut)]
fn detect() -> Vec<&'static str> {
    let mut detected = Vec::new();

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        macro_rules! detect_x86 {
            ($($feature:tt),+) => {$(
                if is_x86_feature_detected!($feature) {
                    detected.push($feature);
                }
            )+};
        }
        detect_x86!("sse", "sse2", "sse3", "sse4.1", "avx", "avx2", "fma");
    }

    #[cfg(target_arch = "aarch64")]
    {
        if std::arch::is_aarch64_feature_detected!("neon") {
            detected.push("neon");
        }
    }

    // WebAssembly modules fail validation instead of faulting, so whatever the build enabled is
    // what the host has.
    #[cfg(all(target_arch = "wasm32", target_feature = "simd128"))]
    {
        detected.push("simd128");
    }

    detected
}

/// Parses a [`HostCheck`] policy. `None` selects the default, [`HostCheck::Warn`].
fn parse_host_check(value: Option<&str>) -> Result<HostCheck, String> {
    match value {
        None => Ok(DEFAULT_HOST_CHECK),
        Some("strict") => Ok(HostCheck::Strict),
        Some("warn") => Ok(HostCheck::Warn),
        Some("off") => Ok(HostCheck::Off),
        Some(v) => Err(format!(
            "invalid value set for `{HOST_CHECK_VAR}` variable: '{v}' \
             (expected `strict`, `warn` or `off`)"
        )),
    }
}

/// Returns the policy configured by the `VECTA_HOST_CHECK` environment variable.
///
/// The variable is read once, on first use.
pub fn host_check() -> anyhow::Result<HostCheck> {
    match &*HOST_CHECK {
        Ok(policy) => Ok(*policy),
        Err(e) => bail!("{e}"),
    }
}

/// Returns the SIMD-related CPU features detected on the running host.
///
/// Only the features some [`Isa`] tag requires are detected.
pub fn detected_features() -> &'static [&'static str] {
    &DETECTED
}

/// Returns the features required by `I` that the running host lacks.
pub fn missing_features<I: Isa>() -> Vec<&'static str> {
    I::FEATURES
        .iter()
        .copied()
        .filter(|feature| !DETECTED.contains(feature))
        .collect()
}

/// Checks that the running host implements every feature required by the tag `I`.
///
/// # Errors
///
/// Returns an error listing the missing features if there are any.
///
/// # Examples
///
/// ```
/// use vecta::{host, isa::NoIsa};
///
/// host::verify::<NoIsa>().unwrap();
/// ```
pub fn verify<I: Isa>() -> anyhow::Result<()> {
    let missing = missing_features::<I>();
    if !missing.is_empty() {
        bail!(
            "the `{}` instruction set requires CPU features this host lacks: {}",
            I::NAME,
            missing.join(", ")
        );
    }

    log::debug!("host supports the `{}` instruction set", I::NAME);
    Ok(())
}

/// Checks the host against [`Native`], the tag the build was compiled for, under the policy set
/// by `VECTA_HOST_CHECK`.
///
/// With `strict`, a missing feature is returned as an error. With `warn` (the default) it is
/// logged and `Ok` is returned. With `off` nothing is checked.
///
/// # Errors
///
/// Returns an error if `VECTA_HOST_CHECK` holds an invalid value, or if the policy is `strict`
/// and the host lacks a required feature.
pub fn check_native() -> anyhow::Result<()> {
    apply(host_check()?, verify::<Native>())
}

fn apply(policy: HostCheck, verified: anyhow::Result<()>) -> anyhow::Result<()> {
    match (policy, verified) {
        (HostCheck::Off, _) | (_, Ok(())) => Ok(()),
        (HostCheck::Strict, Err(e)) => Err(e),
        (HostCheck::Warn, Err(e)) => {
            log::warn!("{e}; SIMD kernels may fault on this machine");
            Ok(())
        }
    }
}

/// Logs the selected [`Native`] tag, its lineage and the detected host features at debug level.
pub fn report() {
    log::debug!(
        "vecta uses the `{}` instruction set (lineage: {})",
        Native::NAME,
        Native::lineage().join(" → ")
    );
    log::debug!("required target features: {:?}", Native::FEATURES);
    log::debug!("detected host features: {:?}", detected_features());
}

#[cfg(test)]
mod tests {
    use crate::isa::NoIsa;

    use super::*;

    #[test]
    fn parse() {
        assert_eq!(parse_host_check(None), Ok(HostCheck::Warn));
        assert_eq!(parse_host_check(Some("strict")), Ok(HostCheck::Strict));
        assert_eq!(parse_host_check(Some("warn")), Ok(HostCheck::Warn));
        assert_eq!(parse_host_check(Some("off")), Ok(HostCheck::Off));

        let err = parse_host_check(Some("loud")).unwrap_err();
        assert!(err.contains("VECTA_HOST_CHECK"), "{err}");
        assert!(err.contains("'loud'"), "{err}");
        assert!(parse_host_check(Some("")).is_err());
        assert!(parse_host_check(Some("Strict")).is_err());
    }

    #[test]
    fn generic_always_verifies() {
        crate::init_logger!();

        assert!(missing_features::<NoIsa>().is_empty());
        verify::<NoIsa>().unwrap();
    }

    #[test]
    fn native_matches_host() {
        // The test binary runs on the machine it was built for.
        verify::<Native>().unwrap();
        check_native().ok();
        report();
    }

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    #[test]
    fn detection_agrees_with_std() {
        assert_eq!(
            detected_features().contains(&"avx2"),
            is_x86_feature_detected!("avx2")
        );
        assert_eq!(
            detected_features().contains(&"sse4.1"),
            is_x86_feature_detected!("sse4.1")
        );

        if !is_x86_feature_detected!("avx2") {
            let err = verify::<crate::isa::Avx2>().unwrap_err().to_string();
            assert!(err.contains("`avx2`"), "{err}");
            assert!(err.contains("avx2"), "{err}");
        }
    }

    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
    #[test]
    fn foreign_tags_are_missing() {
        let err = verify::<crate::isa::Sse2>().unwrap_err().to_string();
        assert!(err.contains("sse2"), "{err}");
    }

    #[test]
    fn policies() {
        let missing = || -> anyhow::Result<()> { bail!("missing `avx2`") };

        assert!(apply(HostCheck::Strict, missing()).is_err());
        assert!(apply(HostCheck::Warn, missing()).is_ok());
        assert!(apply(HostCheck::Off, missing()).is_ok());
        assert!(apply(HostCheck::Strict, Ok(())).is_ok());
    }
}
