//! Per-ISA kernel tables.
//!
//! [`Kernels<T>`] maps an instruction set tag to a register type holding four lanes of `T` and to
//! the kernels the SIMD types in [`crate::simd`] are built from. Three-dimensional vectors use the
//! first three lanes and keep the fourth at zero.
//!
//! [`NoIsa`] implements every kernel for every [`Number`] through the generic expression layer.
//! Every other tag either reuses its parent's register type and kernels for a scalar type it has
//! nothing better for (see `promote!`), or stores a hardware register and overrides some kernels
//! while taking the rest from its parent (see `kernels!`).
//!
//! Every override must produce the same result as the [`NoIsa`] kernel, except for the rounding
//! differences caused by reordered or fused floating-point operations.

use crate::{
    dot, isa::Isa, isa::NoIsa, Cross3, Number, Quat, QuatConj, QuatExpr, QuatMul, VecAdd,
    VecDivScalar, VecMulScalar, VecNeg, VecSub, VectorExpr,
};

/// Register type and kernels of an instruction set for scalar type `T`.
///
/// Every kernel operates on all four lanes, except for [`Kernels::dot3`] and
/// [`Kernels::cross3`], which only read the first three.
pub trait Kernels<T: Number>: Isa {
    /// A value holding four lanes of `T`.
    type Reg: Copy;

    fn load(lanes: [T; 4]) -> Self::Reg;
    fn store(reg: Self::Reg) -> [T; 4];

    /// Reads one lane.
    ///
    /// # Panics
    ///
    /// This panics if `index >= 4`.
    fn lane(reg: Self::Reg, index: usize) -> T;

    fn neg(a: Self::Reg) -> Self::Reg;
    fn add(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn sub(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn mul_scalar(a: Self::Reg, s: T) -> Self::Reg;
    fn div_scalar(a: Self::Reg, s: T) -> Self::Reg;

    /// Compares each lane for exact equality. Bit `i` of the result is set if lane `i` is equal.
    fn eq_mask(a: Self::Reg, b: Self::Reg) -> u32;

    fn dot3(a: Self::Reg, b: Self::Reg) -> T;
    fn dot4(a: Self::Reg, b: Self::Reg) -> T;

    /// Cross product of the first three lanes. The fourth lane of the result is zero.
    fn cross3(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// Hamilton product of two quaternions stored as `[w, x, y, z]`.
    fn hamilton(l: Self::Reg, r: Self::Reg) -> Self::Reg;

    /// Negates lanes 1, 2 and 3.
    fn conjugate(q: Self::Reg) -> Self::Reg;
}

#[cold]
#[track_caller]
pub(crate) fn lane_out_of_range(index: usize, len: usize) -> ! {
    panic!("lane index out of range: the lane count is {len} but the index is {index}")
}

impl<T: Number> Kernels<T> for NoIsa {
    type Reg = [T; 4];

    #[inline]
    fn load(lanes: [T; 4]) -> [T; 4] {
        lanes
    }

    #[inline]
    fn store(reg: [T; 4]) -> [T; 4] {
        reg
    }

    #[inline]
    fn lane(reg: [T; 4], index: usize) -> T {
        match reg.get(index) {
            Some(lane) => *lane,
            None => lane_out_of_range(index, 4),
        }
    }

    fn neg(a: [T; 4]) -> [T; 4] {
        VecNeg::new(a).eval().into_array()
    }

    fn add(a: [T; 4], b: [T; 4]) -> [T; 4] {
        VecAdd::new(a, b).eval().into_array()
    }

    fn sub(a: [T; 4], b: [T; 4]) -> [T; 4] {
        VecSub::new(a, b).eval().into_array()
    }

    fn mul_scalar(a: [T; 4], s: T) -> [T; 4] {
        VecMulScalar::new(a, s).eval().into_array()
    }

    fn div_scalar(a: [T; 4], s: T) -> [T; 4] {
        VecDivScalar::new(a, s).eval().into_array()
    }

    fn eq_mask(a: [T; 4], b: [T; 4]) -> u32 {
        (0..4).filter(|&i| a[i] == b[i]).fold(0, |mask, i| mask | 1 << i)
    }

    fn dot3(a: [T; 4], b: [T; 4]) -> T {
        dot([a[0], a[1], a[2]], [b[0], b[1], b[2]])
    }

    fn dot4(a: [T; 4], b: [T; 4]) -> T {
        dot(a, b)
    }

    fn cross3(a: [T; 4], b: [T; 4]) -> [T; 4] {
        let c = Cross3::new([a[0], a[1], a[2]], [b[0], b[1], b[2]]);
        [c.at(0), c.at(1), c.at(2), T::ZERO]
    }

    fn hamilton(l: [T; 4], r: [T; 4]) -> [T; 4] {
        QuatMul::new(Quat::from(l), Quat::from(r)).eval().into_array()
    }

    fn conjugate(q: [T; 4]) -> [T; 4] {
        QuatConj::new(Quat::from(q)).eval().into_array()
    }
}

/// Defines kernels by forwarding to another implementation.
///
/// `(from Tag)` calls the kernel of `Tag`'s `Kernels` impl, which must use the same register
/// type. `(raw module)` calls the `#[target_feature]` function of the same name in `module`.
/// `(safe module)` calls a safe function in `module`.
macro_rules! kernels {
    ($via:tt, $t:ty; $($kernel:ident),+ $(,)?) => {
        $( kernels!(@sig $via, $t, $kernel); )+
    };

    (@sig $via:tt, $t:ty, load) => {
        #[inline]
        fn load(lanes: [$t; 4]) -> Self::Reg {
            kernels!(@call $via, $t, load(lanes))
        }
    };
    (@sig $via:tt, $t:ty, store) => {
        #[inline]
        fn store(reg: Self::Reg) -> [$t; 4] {
            kernels!(@call $via, $t, store(reg))
        }
    };
    (@sig $via:tt, $t:ty, lane) => {
        #[inline]
        fn lane(reg: Self::Reg, index: usize) -> $t {
            kernels!(@call $via, $t, lane(reg, index))
        }
    };
    (@sig $via:tt, $t:ty, neg) => {
        #[inline]
        fn neg(a: Self::Reg) -> Self::Reg {
            kernels!(@call $via, $t, neg(a))
        }
    };
    (@sig $via:tt, $t:ty, conjugate) => {
        #[inline]
        fn conjugate(q: Self::Reg) -> Self::Reg {
            kernels!(@call $via, $t, conjugate(q))
        }
    };
    (@sig $via:tt, $t:ty, mul_scalar) => {
        #[inline]
        fn mul_scalar(a: Self::Reg, s: $t) -> Self::Reg {
            kernels!(@call $via, $t, mul_scalar(a, s))
        }
    };
    (@sig $via:tt, $t:ty, div_scalar) => {
        #[inline]
        fn div_scalar(a: Self::Reg, s: $t) -> Self::Reg {
            kernels!(@call $via, $t, div_scalar(a, s))
        }
    };
    (@sig $via:tt, $t:ty, eq_mask) => {
        #[inline]
        fn eq_mask(a: Self::Reg, b: Self::Reg) -> u32 {
            kernels!(@call $via, $t, eq_mask(a, b))
        }
    };
    (@sig $via:tt, $t:ty, dot3) => {
        #[inline]
        fn dot3(a: Self::Reg, b: Self::Reg) -> $t {
            kernels!(@call $via, $t, dot3(a, b))
        }
    };
    (@sig $via:tt, $t:ty, dot4) => {
        #[inline]
        fn dot4(a: Self::Reg, b: Self::Reg) -> $t {
            kernels!(@call $via, $t, dot4(a, b))
        }
    };
    (@sig $via:tt, $t:ty, hamilton) => {
        #[inline]
        fn hamilton(l: Self::Reg, r: Self::Reg) -> Self::Reg {
            kernels!(@call $via, $t, hamilton(l, r))
        }
    };
    // add, sub, cross3
    (@sig $via:tt, $t:ty, $binary:ident) => {
        #[inline]
        fn $binary(a: Self::Reg, b: Self::Reg) -> Self::Reg {
            kernels!(@call $via, $t, $binary(a, b))
        }
    };

    (@call (from $parent:ty), $t:ty, $kernel:ident($($arg:ident),*)) => {
        <$parent as $crate::kernels::Kernels<$t>>::$kernel($($arg),*)
    };
    (@call (raw $module:ident), $t:ty, $kernel:ident($($arg:ident),*)) => {
        // SAFETY: outside of tests, the surrounding impl only exists when the target features of
        // `$module` are enabled. Tests check for them at runtime before calling any kernel.
        unsafe { $module::$kernel($($arg),*) }
    };
    (@call (safe $module:ident), $t:ty, $kernel:ident($($arg:ident),*)) => {
        $module::$kernel($($arg),*)
    };
}

/// Implements `Kernels` for a tag by reusing its parent's register type and kernels unchanged.
macro_rules! promote {
    ($child:ty => $parent:ty: $($t:ty),+ $(,)?) => {
        const _: () = $crate::isa::assert_extends::<$child, $parent>();

        $(
            impl $crate::kernels::Kernels<$t> for $child {
                type Reg = <$parent as $crate::kernels::Kernels<$t>>::Reg;

                kernels!((from $parent), $t;
                    load, store, lane, neg, add, sub, mul_scalar, div_scalar, eq_mask,
                    dot3, dot4, cross3, hamilton, conjugate);
            }
        )+
    };
}

/// The integer [`Number`]s, plain and [`Wrapping`](std::num::Wrapping). No tag has integer
/// kernels of its own.
macro_rules! promote_integers {
    ($child:ty => $parent:ty) => {
        promote!($child => $parent: i8, i16, i32, i64, i128, isize);
        promote!($child => $parent:
            ::std::num::Wrapping<i8>,
            ::std::num::Wrapping<i16>,
            ::std::num::Wrapping<i32>,
            ::std::num::Wrapping<i64>,
            ::std::num::Wrapping<i128>,
            ::std::num::Wrapping<isize>,
        );
    };
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod x86;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub use x86::F64x2x2;

#[cfg(target_arch = "aarch64")]
mod aarch64;
#[cfg(target_arch = "aarch64")]
pub use aarch64::F64x2x2;

#[cfg(target_arch = "wasm32")]
mod wasm32;
#[cfg(all(target_arch = "wasm32", target_feature = "simd128"))]
pub use wasm32::F64x2x2;


#[cfg(test)]
mod tests {
    use crate::isa::NoIsa;

    use super::{testing::*, *};

    #[test]
    fn generic_kernels() {
        let a = [3i32, 13, 7, 19];
        let b = [5i32, 11, 23, 29];
        type K = NoIsa;
        assert_eq!(<K as Kernels<i32>>::dot4(a, b), 870);
        assert_eq!(<K as Kernels<i32>>::dot3(a, b), 15 + 143 + 161);
        assert_eq!(<K as Kernels<i32>>::neg(a), [-3, -13, -7, -19]);
        assert_eq!(<K as Kernels<i32>>::eq_mask(a, [3, 0, 7, 0]), 0b0101);
        assert_eq!(<K as Kernels<i32>>::conjugate(a), [3, -13, -7, -19]);
        assert_eq!(
            <K as Kernels<i32>>::cross3([1, 0, 0, 0], [0, 1, 0, 0]),
            [0, 0, 1, 0]
        );
        assert_eq!(
            <K as Kernels<i32>>::hamilton(a, b),
            [
                3 * 5 - 13 * 11 - 7 * 23 - 19 * 29,
                3 * 11 + 13 * 5 + 7 * 29 - 19 * 23,
                3 * 23 - 13 * 29 + 7 * 5 + 19 * 11,
                3 * 29 + 13 * 23 - 7 * 11 + 19 * 5,
            ]
        );
    }

    #[test]
    #[should_panic(expected = "lane index out of range: the lane count is 4 but the index is 4")]
    fn generic_lane_out_of_range() {
        <NoIsa as Kernels<f32>>::lane([0.0; 4], 4);
    }

    #[test]
    fn generic_quaternion_units() {
        quaternion_units::<f32, NoIsa>();
        quaternion_units::<f64, NoIsa>();
        quaternion_units::<i32, NoIsa>();
        quaternion_units::<i8, NoIsa>();
    }

    #[test]
    fn generic_matches_itself() {
        matches_generic::<f32, NoIsa>();
        matches_generic::<f64, NoIsa>();
    }
}
