//! WebAssembly SIMD kernels.
//!
//! WebAssembly has no runtime feature detection, so these are only compiled when the build enables
//! `simd128`. Cross and Hamilton products have no profitable lane shuffles here and use the
//! generic kernels.

#[cfg(target_feature = "simd128")]
use std::arch::wasm32::*;

#[allow(unused_imports)]
use crate::isa::{NoIsa, Wasm128};

#[allow(unused_imports)]
use super::Kernels;

/// Four `f64` lanes in two `v128`s: lanes 0 and 1 in `lo`, lanes 2 and 3 in `hi`.
#[cfg(target_feature = "simd128")]
#[derive(Clone, Copy)]
pub struct F64x2x2 {
    lo: v128,
    hi: v128,
}

#[cfg(target_feature = "simd128")]
mod wasm_f32 {
    use super::*;
    use crate::kernels::lane_out_of_range;

    pub fn load([x, y, z, w]: [f32; 4]) -> v128 {
        f32x4(x, y, z, w)
    }

    pub fn store(reg: v128) -> [f32; 4] {
        [
            f32x4_extract_lane::<0>(reg),
            f32x4_extract_lane::<1>(reg),
            f32x4_extract_lane::<2>(reg),
            f32x4_extract_lane::<3>(reg),
        ]
    }

    pub fn lane(reg: v128, index: usize) -> f32 {
        match index {
            0 => f32x4_extract_lane::<0>(reg),
            1 => f32x4_extract_lane::<1>(reg),
            2 => f32x4_extract_lane::<2>(reg),
            3 => f32x4_extract_lane::<3>(reg),
            _ => lane_out_of_range(index, 4),
        }
    }

    pub fn neg(a: v128) -> v128 {
        f32x4_neg(a)
    }

    pub fn add(a: v128, b: v128) -> v128 {
        f32x4_add(a, b)
    }

    pub fn sub(a: v128, b: v128) -> v128 {
        f32x4_sub(a, b)
    }

    pub fn mul_scalar(a: v128, s: f32) -> v128 {
        f32x4_mul(a, f32x4_splat(s))
    }

    pub fn div_scalar(a: v128, s: f32) -> v128 {
        f32x4_div(a, f32x4_splat(s))
    }

    pub fn eq_mask(a: v128, b: v128) -> u32 {
        u32::from(i32x4_bitmask(f32x4_eq(a, b)))
    }

    pub fn dot3(a: v128, b: v128) -> f32 {
        let [x, y, z, _] = store(f32x4_mul(a, b));
        x + y + z
    }

    pub fn dot4(a: v128, b: v128) -> f32 {
        let [x, y, z, w] = store(f32x4_mul(a, b));
        x + y + z + w
    }

    pub fn cross3(a: v128, b: v128) -> v128 {
        load(<NoIsa as Kernels<f32>>::cross3(store(a), store(b)))
    }

    pub fn hamilton(l: v128, r: v128) -> v128 {
        load(<NoIsa as Kernels<f32>>::hamilton(store(l), store(r)))
    }

    pub fn conjugate(q: v128) -> v128 {
        f32x4_replace_lane::<0>(f32x4_neg(q), f32x4_extract_lane::<0>(q))
    }
}

#[cfg(target_feature = "simd128")]
mod wasm_f64 {
    use super::*;
    use crate::kernels::lane_out_of_range;

    pub fn load([x, y, z, w]: [f64; 4]) -> F64x2x2 {
        F64x2x2 {
            lo: f64x2(x, y),
            hi: f64x2(z, w),
        }
    }

    pub fn store(reg: F64x2x2) -> [f64; 4] {
        [
            f64x2_extract_lane::<0>(reg.lo),
            f64x2_extract_lane::<1>(reg.lo),
            f64x2_extract_lane::<0>(reg.hi),
            f64x2_extract_lane::<1>(reg.hi),
        ]
    }

    pub fn lane(reg: F64x2x2, index: usize) -> f64 {
        match index {
            0 => f64x2_extract_lane::<0>(reg.lo),
            1 => f64x2_extract_lane::<1>(reg.lo),
            2 => f64x2_extract_lane::<0>(reg.hi),
            3 => f64x2_extract_lane::<1>(reg.hi),
            _ => lane_out_of_range(index, 4),
        }
    }

    fn each(a: F64x2x2, f: impl Fn(v128) -> v128) -> F64x2x2 {
        F64x2x2 {
            lo: f(a.lo),
            hi: f(a.hi),
        }
    }

    pub fn neg(a: F64x2x2) -> F64x2x2 {
        each(a, f64x2_neg)
    }

    pub fn add(a: F64x2x2, b: F64x2x2) -> F64x2x2 {
        F64x2x2 {
            lo: f64x2_add(a.lo, b.lo),
            hi: f64x2_add(a.hi, b.hi),
        }
    }

    pub fn sub(a: F64x2x2, b: F64x2x2) -> F64x2x2 {
        F64x2x2 {
            lo: f64x2_sub(a.lo, b.lo),
            hi: f64x2_sub(a.hi, b.hi),
        }
    }

    pub fn mul_scalar(a: F64x2x2, s: f64) -> F64x2x2 {
        let s = f64x2_splat(s);
        each(a, |half| f64x2_mul(half, s))
    }

    pub fn div_scalar(a: F64x2x2, s: f64) -> F64x2x2 {
        let s = f64x2_splat(s);
        each(a, |half| f64x2_div(half, s))
    }

    pub fn eq_mask(a: F64x2x2, b: F64x2x2) -> u32 {
        let lo = u32::from(i64x2_bitmask(f64x2_eq(a.lo, b.lo)));
        let hi = u32::from(i64x2_bitmask(f64x2_eq(a.hi, b.hi)));
        lo | hi << 2
    }

    pub fn dot3(a: F64x2x2, b: F64x2x2) -> f64 {
        let [x, y, z, _] = store(F64x2x2 {
            lo: f64x2_mul(a.lo, b.lo),
            hi: f64x2_mul(a.hi, b.hi),
        });
        x + y + z
    }

    pub fn dot4(a: F64x2x2, b: F64x2x2) -> f64 {
        let [x, y, z, w] = store(F64x2x2 {
            lo: f64x2_mul(a.lo, b.lo),
            hi: f64x2_mul(a.hi, b.hi),
        });
        x + y + z + w
    }

    pub fn cross3(a: F64x2x2, b: F64x2x2) -> F64x2x2 {
        load(<NoIsa as Kernels<f64>>::cross3(store(a), store(b)))
    }

    pub fn hamilton(l: F64x2x2, r: F64x2x2) -> F64x2x2 {
        load(<NoIsa as Kernels<f64>>::hamilton(store(l), store(r)))
    }

    pub fn conjugate(q: F64x2x2) -> F64x2x2 {
        F64x2x2 {
            lo: f64x2_replace_lane::<0>(f64x2_neg(q.lo), f64x2_extract_lane::<0>(q.lo)),
            hi: f64x2_neg(q.hi),
        }
    }
}

#[cfg(target_feature = "simd128")]
impl Kernels<f32> for Wasm128 {
    type Reg = v128;

    kernels!((safe wasm_f32), f32;
        load, store, lane, neg, add, sub, mul_scalar, div_scalar, eq_mask,
        dot3, dot4, cross3, hamilton, conjugate);
}

#[cfg(target_feature = "simd128")]
impl Kernels<f64> for Wasm128 {
    type Reg = F64x2x2;

    kernels!((safe wasm_f64), f64;
        load, store, lane, neg, add, sub, mul_scalar, div_scalar, eq_mask,
        dot3, dot4, cross3, hamilton, conjugate);
}

#[cfg(target_feature = "simd128")]
promote_integers!(Wasm128 => NoIsa);

#[cfg(all(test, target_feature = "simd128"))]
mod tests {
    use crate::{isa::Wasm128, kernels::testing::*};

    #[test]
    fn wasm128() {
        matches_generic::<f32, Wasm128>();
        matches_generic::<f64, Wasm128>();
        quaternion_units::<f32, Wasm128>();
        quaternion_units::<f64, Wasm128>();
        quaternion_units::<i32, Wasm128>();
        hamilton_products::<f32, Wasm128>();
        hamilton_products::<f64, Wasm128>();
        hamilton_products::<i32, Wasm128>();
    }
}
