//! Instruction set tags.
//!
//! Every tag is a zero-sized marker type naming one generation of a SIMD instruction set. The
//! generations form three chains rooted at [`NoIsa`]:
//!
//! - x86: [`NoIsa`] → [`Sse`] → [`Sse2`] → [`Sse3`] → [`Sse4`] → [`Avx`] → [`Avx2`]
//! - ARM: [`NoIsa`] → [`Neon32`] → [`Neon64`]
//! - WebAssembly: [`NoIsa`] → [`Wasm128`]
//!
//! A tag *extends* itself and every tag before it in its chain, which is expressed by the
//! [`Extends`] trait. Kernels for a tag are only compiled in when all of its [`Isa::FEATURES`] are
//! enabled for the build target, so naming a tag the build does not support in a SIMD type is a
//! compile error rather than a runtime fallback.
//!
//! [`Native`] is the most capable tag the build target enables.
//!
//! # Examples
//!
//! ```
//! use vecta::isa::{is_family_of, Avx2, Extends, Isa, NoIsa, Sse2, Sse4};
//!
//! fn needs_sse2<I: Extends<Sse2>>() -> &'static str {
//!     I::NAME
//! }
//!
//! assert_eq!(needs_sse2::<Avx2>(), "avx2");
//! assert!(is_family_of::<Sse4, Avx2>());
//! assert!(!is_family_of::<Avx2, Sse4>());
//! assert_eq!(Sse2::lineage(), ["sse2", "sse", "none"]);
//! assert_eq!(NoIsa::FEATURES, &[] as &[&str]);
//! ```

use std::fmt;

/// An instruction set generation.
pub trait Isa: Copy + Default + fmt::Debug + Send + Sync + 'static {
    /// The generation this one builds on. [`NoIsa`] is its own parent.
    type Parent: Isa;

    /// Short lowercase name of the generation.
    const NAME: &'static str;

    /// The `target_feature`s that must be enabled to use this generation, including those of all
    /// parents.
    const FEATURES: &'static [&'static str];

    /// Returns the names of this tag and all of its ancestors, starting with this tag and ending
    /// with [`NoIsa`].
    fn lineage() -> Vec<&'static str> {
        let mut lineage = vec![Self::NAME];
        lineage.extend(Self::Parent::lineage());
        lineage
    }
}

/// Marker trait implemented by a tag for itself and for every tag it builds on.
///
/// `B: Extends<A>` means that anything that works with `A` also works with `B`.
pub trait Extends<A: Isa>: Isa {}

/// Returns whether `B` is `A` or a descendant of `A`.
///
/// This is the runtime counterpart of the `B: Extends<A>` bound, meant for diagnostics.
pub fn is_family_of<A: Isa, B: Isa>() -> bool {
    B::lineage().contains(&A::NAME)
}

/// Asserts `C: Extends<P>` at compile time.
pub(crate) const fn assert_extends<C: Extends<P>, P: Isa>() {}

macro_rules! tags {
    ($(
        $(#[$attr:meta])*
        $name:ident($display:literal) => $parent:ident [$($feature:literal),*] extends [$($ancestor:ident),*];
    )+) => {$(
        $(#[$attr])*
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name;

        impl Isa for $name {
            type Parent = $parent;
            const NAME: &'static str = $display;
            const FEATURES: &'static [&'static str] = &[$($feature),*];
        }

        impl Extends<$name> for $name {}
        $( impl Extends<$ancestor> for $name {} )*
    )+};
}

/// The scalar fallback. Every other tag extends it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoIsa;

impl Isa for NoIsa {
    type Parent = NoIsa;
    const NAME: &'static str = "none";
    const FEATURES: &'static [&'static str] = &[];

    fn lineage() -> Vec<&'static str> {
        vec![Self::NAME]
    }
}

impl Extends<NoIsa> for NoIsa {}

tags! {
    /// SSE: four `f32` lanes in a 128-bit register.
    Sse("sse") => NoIsa ["sse"] extends [NoIsa];
    /// SSE2: adds `f64` lanes, stored as two 128-bit halves.
    Sse2("sse2") => Sse ["sse", "sse2"] extends [NoIsa, Sse];
    /// SSE3: horizontal adds and `addsub`.
    Sse3("sse3") => Sse2 ["sse", "sse2", "sse3"] extends [NoIsa, Sse, Sse2];
    /// SSE4.1: dot product instructions.
    Sse4("sse4") => Sse3 ["sse", "sse2", "sse3", "sse4.1"]
        extends [NoIsa, Sse, Sse2, Sse3];
    /// AVX: 256-bit registers holding four `f64` lanes.
    Avx("avx") => Sse4 ["sse", "sse2", "sse3", "sse4.1", "avx"]
        extends [NoIsa, Sse, Sse2, Sse3, Sse4];
    /// AVX2 with FMA: cross-lane permutes and fused multiply-add.
    Avx2("avx2") => Avx ["sse", "sse2", "sse3", "sse4.1", "avx", "avx2", "fma"]
        extends [NoIsa, Sse, Sse2, Sse3, Sse4, Avx];
    /// NEON as available to 32-bit ARM code (no vector division, no across-lane adds).
    Neon32("neon32") => NoIsa ["neon"] extends [NoIsa];
    /// AArch64 Advanced SIMD: adds vector division, across-lane adds, `f64` lanes and fused
    /// multiply-add.
    Neon64("neon64") => Neon32 ["neon"] extends [NoIsa, Neon32];
    /// WebAssembly 128-bit SIMD.
    Wasm128("wasm128") => NoIsa ["simd128"] extends [NoIsa];
}

/// The most capable tag enabled for the build target.
///
/// Selected from the enabled `target_feature`s (eg. through `-C target-cpu=native`). The
/// `portable` cargo feature forces [`NoIsa`].
#[cfg(all(
    not(feature = "portable"),
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "avx2",
    target_feature = "fma"
))]
pub type Native = Avx2;

/// The most capable tag enabled for the build target.
#[cfg(all(
    not(feature = "portable"),
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "avx",
    not(all(target_feature = "avx2", target_feature = "fma"))
))]
pub type Native = Avx;

/// The most capable tag enabled for the build target.
#[cfg(all(
    not(feature = "portable"),
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse4.1",
    not(target_feature = "avx")
))]
pub type Native = Sse4;

/// The most capable tag enabled for the build target.
#[cfg(all(
    not(feature = "portable"),
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse3",
    not(target_feature = "sse4.1")
))]
pub type Native = Sse3;

/// The most capable tag enabled for the build target.
#[cfg(all(
    not(feature = "portable"),
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse2",
    not(target_feature = "sse3")
))]
pub type Native = Sse2;

/// The most capable tag enabled for the build target.
#[cfg(all(
    not(feature = "portable"),
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse",
    not(target_feature = "sse2")
))]
pub type Native = Sse;

/// The most capable tag enabled for the build target.
#[cfg(all(
    not(feature = "portable"),
    target_arch = "aarch64",
    target_feature = "neon"
))]
pub type Native = Neon64;

/// The most capable tag enabled for the build target.
#[cfg(all(
    not(feature = "portable"),
    target_arch = "wasm32",
    target_feature = "simd128"
))]
pub type Native = Wasm128;

/// The most capable tag enabled for the build target.
#[cfg(any(
    feature = "portable",
    not(any(
        all(any(target_arch = "x86", target_arch = "x86_64"), target_feature = "sse"),
        all(target_arch = "aarch64", target_feature = "neon"),
        all(target_arch = "wasm32", target_feature = "simd128"),
    ))
))]
pub type Native = NoIsa;

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_family<A: Isa, B: Extends<A>>() {
        assert!(is_family_of::<A, B>(), "{} should extend {}", B::NAME, A::NAME);
    }

    #[test]
    fn x86_chain() {
        assert_family::<NoIsa, Avx2>();
        assert_family::<Sse, Avx2>();
        assert_family::<Sse2, Sse3>();
        assert_family::<Avx, Avx>();
        assert!(!is_family_of::<Sse3, Sse2>());
        assert!(!is_family_of::<Neon32, Avx2>());
        assert_eq!(
            Avx2::lineage(),
            ["avx2", "avx", "sse4", "sse3", "sse2", "sse", "none"]
        );
    }

    #[test]
    fn other_chains() {
        assert_family::<Neon32, Neon64>();
        assert_family::<NoIsa, Wasm128>();
        assert!(!is_family_of::<Wasm128, Neon64>());
        assert!(!is_family_of::<Neon64, Neon32>());
        assert_eq!(Neon64::lineage(), ["neon64", "neon32", "none"]);
        assert_eq!(NoIsa::lineage(), ["none"]);
    }

    #[test]
    fn features_accumulate() {
        fn check<I: Isa>() {
            let parent = <I::Parent as Isa>::FEATURES;
            for feature in parent {
                assert!(I::FEATURES.contains(feature), "{} lacks {feature}", I::NAME);
            }
        }
        check::<Sse>();
        check::<Sse2>();
        check::<Sse3>();
        check::<Sse4>();
        check::<Avx>();
        check::<Avx2>();
        check::<Neon32>();
        check::<Neon64>();
        check::<Wasm128>();
        assert!(Avx2::FEATURES.contains(&"fma"));
    }

    /// The `target_feature`s that select [`Native`], and whether this build enables them.
    const TARGET_FEATURES: &[(&str, bool)] = &[
        ("sse", cfg!(target_feature = "sse")),
        ("sse2", cfg!(target_feature = "sse2")),
        ("sse3", cfg!(target_feature = "sse3")),
        ("sse4.1", cfg!(target_feature = "sse4.1")),
        ("avx", cfg!(target_feature = "avx")),
        ("avx2", cfg!(target_feature = "avx2")),
        ("fma", cfg!(target_feature = "fma")),
        ("neon", cfg!(target_feature = "neon")),
        ("simd128", cfg!(target_feature = "simd128")),
    ];

    fn target_enables(feature: &str) -> Option<bool> {
        TARGET_FEATURES
            .iter()
            .find(|(name, _)| *name == feature)
            .map(|&(_, enabled)| enabled)
    }

    #[test]
    fn features_select_native() {
        fn check<I: Isa>() {
            for feature in I::FEATURES {
                assert!(
                    target_enables(feature).is_some(),
                    "{} requires `{feature}`, which never selects a native tag",
                    I::NAME
                );
            }
        }
        check::<Sse>();
        check::<Sse2>();
        check::<Sse3>();
        check::<Sse4>();
        check::<Avx>();
        check::<Avx2>();
        check::<Neon32>();
        check::<Neon64>();
        check::<Wasm128>();
    }

    #[test]
    fn native_is_enabled() {
        for feature in Native::FEATURES {
            log::debug!("native tag {} requires `{feature}`", Native::NAME);
            assert_eq!(
                target_enables(feature),
                Some(true),
                "native tag {} requires `{feature}`, which the build does not enable",
                Native::NAME
            );
        }
        assert!(is_family_of::<NoIsa, Native>());
    }
}
