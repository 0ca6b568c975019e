//! Const-generic linear algebra with lazy expressions and per-instruction-set SIMD kernels.
//!
//! # Motivation
//!
//! Small fixed-size vectors, matrices and quaternions show up everywhere in geometry code, and
//! they are usually combined in long chains of arithmetic. Materializing every intermediate of
//! such a chain is wasteful, and hand-writing SIMD for every target is tedious and error-prone.
//!
//! This library addresses both:
//!
//! - Arithmetic on vectors, matrices and quaternions builds lightweight *expression* values
//!   instead of computing results. An expression is only evaluated when a component is read or
//!   when [`VectorExpr::eval`], [`MatrixExpr::eval`] or [`QuatExpr::eval`] is called, so chains
//!   like `(a + b) * s - c` compute each component exactly once, without temporaries.
//! - [`SimdVector`] and [`SimdQuat`] keep their components in SIMD registers and dispatch their
//!   operations to kernels chosen by an instruction set tag (see [`isa`]). The tag is resolved at
//!   compile time, and the results match those of the generic containers.
//!
//! # Goals & Non-Goals
//!
//! - Dimensions are const generics. Mismatched dimensions are compile errors, and there are no
//!   dynamically-sized vectors or matrices.
//! - Matrices use a single, column-major, unpadded data layout.
//! - Be generic over the element type, but don't try to support non-[`Copy`] numeric types (eg.
//!   "big decimals").
//! - Instruction set selection happens at compile time. There is no runtime dispatch; [`host`]
//!   only *verifies* that the running CPU matches what the build was compiled for.
//!
//! # Instruction set selection
//!
//! [`isa::Native`] names the most capable tag enabled by the build's target features. Compile
//! with `-C target-cpu=native` (or an explicit `-C target-feature=+avx2,+fma`, etc.) to select a
//! wider tag. The `portable` cargo feature forces [`isa::NoIsa`], the scalar fallback.
//!
//! # Environment Variables
//!
//! - `VECTA_HOST_CHECK`: what [`host::check_native`] does when the host CPU lacks a feature the
//!   build was compiled for. `strict` returns an error, `warn` (the default) logs a warning, `off`
//!   skips the check.
//! - `RUST_LOG`: configures the logger installed by [`init_logger!`], as documented by
//!   `env_logger`.

use log::LevelFilter;

#[macro_use]
mod macros;

pub mod approx;
pub mod host;
pub mod isa;
pub mod kernels;
mod matrix;
pub mod quat;
pub mod simd;
mod traits;
mod vector;

pub use matrix::*;
pub use quat::{
    conjugate, inverse, Inverse, Quat, QuatAdd, QuatConj, QuatDivScalar, QuatExpr, QuatMul,
    QuatMulScalar, QuatNeg, QuatSub,
};
pub use simd::{SimdQuat, SimdVector};
pub use traits::*;
pub use vector::*;

#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = LevelFilter::Debug;
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_PKG_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// Log messages of the calling crate and of `vecta` are shown at debug level and above. `RUST_LOG`
/// can override this. Does nothing if a logger is already installed.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
