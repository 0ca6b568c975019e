//! SSE and AVX kernels.
//!
//! `f32` lanes live in an `__m128` from [`Sse`] on. `f64` lanes live in a pair of `__m128d` from
//! [`Sse2`] on, and in an `__m256d` from [`Avx`] on. Integers always use the generic kernels.
//!
//! Every kernel table is compiled in when the build target enables the features of its tag. Test
//! builds compile all of them and check for the features at runtime before calling any.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[allow(unused_imports)]
use crate::isa::{Avx, Avx2, NoIsa, Sse, Sse2, Sse3, Sse4};

use super::Kernels;

/// Four `f64` lanes in two SSE2 registers: lanes 0 and 1 in `lo`, lanes 2 and 3 in `hi`.
#[derive(Clone, Copy)]
pub struct F64x2x2 {
    lo: __m128d,
    hi: __m128d,
}

/// Immediate selecting lane `w` for output lane 0, `x` for 1, `y` for 2 and `z` for 3.
const fn mm_shuffle(z: u32, y: u32, x: u32, w: u32) -> i32 {
    ((z << 6) | (y << 4) | (x << 2) | w) as i32
}

const YZX: i32 = mm_shuffle(3, 0, 2, 1);
const ZXY: i32 = mm_shuffle(3, 1, 0, 2);

// Lane permutations of the right-hand side of a Hamilton product, paired with the left-hand
// `x`, `y` and `z` components.
const HAMILTON_X: i32 = mm_shuffle(2, 3, 0, 1);
const HAMILTON_Y: i32 = mm_shuffle(1, 0, 3, 2);
const HAMILTON_Z: i32 = mm_shuffle(0, 1, 2, 3);

const XYXY: i32 = mm_shuffle(1, 0, 1, 0);
const YZXW: i32 = mm_shuffle(0, 1, 3, 2);
const ZWYX: i32 = mm_shuffle(1, 2, 0, 3);
// Accumulator reorderings of the SSE3 Hamilton product.
const WXZY: i32 = mm_shuffle(2, 3, 1, 0);
const WXZY_TO_WZXY: i32 = mm_shuffle(3, 1, 2, 0);
const WZXY_TO_WXYZ: i32 = mm_shuffle(1, 3, 2, 0);

#[cfg(any(test, target_feature = "sse"))]
mod sse_f32 {
    use super::*;
    use crate::kernels::lane_out_of_range;

    #[inline]
    #[target_feature(enable = "sse")]
    pub unsafe fn load(lanes: [f32; 4]) -> __m128 {
        _mm_loadu_ps(lanes.as_ptr())
    }

    #[inline]
    #[target_feature(enable = "sse")]
    pub unsafe fn store(reg: __m128) -> [f32; 4] {
        let mut lanes = [0.0; 4];
        _mm_storeu_ps(lanes.as_mut_ptr(), reg);
        lanes
    }

    #[inline]
    #[target_feature(enable = "sse")]
    pub unsafe fn lane(reg: __m128, index: usize) -> f32 {
        match store(reg).get(index) {
            Some(lane) => *lane,
            None => lane_out_of_range(index, 4),
        }
    }

    #[inline]
    #[target_feature(enable = "sse")]
    pub unsafe fn neg(a: __m128) -> __m128 {
        _mm_xor_ps(a, _mm_set1_ps(-0.0))
    }

    #[inline]
    #[target_feature(enable = "sse")]
    pub unsafe fn add(a: __m128, b: __m128) -> __m128 {
        _mm_add_ps(a, b)
    }

    #[inline]
    #[target_feature(enable = "sse")]
    pub unsafe fn sub(a: __m128, b: __m128) -> __m128 {
        _mm_sub_ps(a, b)
    }

    #[inline]
    #[target_feature(enable = "sse")]
    pub unsafe fn mul_scalar(a: __m128, s: f32) -> __m128 {
        _mm_mul_ps(a, _mm_set1_ps(s))
    }

    #[inline]
    #[target_feature(enable = "sse")]
    pub unsafe fn div_scalar(a: __m128, s: f32) -> __m128 {
        _mm_div_ps(a, _mm_set1_ps(s))
    }

    #[inline]
    #[target_feature(enable = "sse")]
    pub unsafe fn eq_mask(a: __m128, b: __m128) -> u32 {
        _mm_movemask_ps(_mm_cmpeq_ps(a, b)) as u32
    }

    #[inline]
    #[target_feature(enable = "sse")]
    pub unsafe fn dot3(a: __m128, b: __m128) -> f32 {
        let p = _mm_mul_ps(a, b);
        let y = _mm_shuffle_ps(p, p, 0x55);
        let z = _mm_movehl_ps(p, p);
        _mm_cvtss_f32(_mm_add_ss(_mm_add_ss(p, y), z))
    }

    #[inline]
    #[target_feature(enable = "sse")]
    pub unsafe fn dot4(a: __m128, b: __m128) -> f32 {
        let p = _mm_mul_ps(a, b);
        // [p0 + p2, p1 + p3, ..]
        let s = _mm_add_ps(p, _mm_movehl_ps(p, p));
        _mm_cvtss_f32(_mm_add_ss(s, _mm_shuffle_ps(s, s, 0x55)))
    }

    #[inline]
    #[target_feature(enable = "sse")]
    pub unsafe fn cross3(a: __m128, b: __m128) -> __m128 {
        let l = _mm_mul_ps(_mm_shuffle_ps(a, a, YZX), _mm_shuffle_ps(b, b, ZXY));
        let r = _mm_mul_ps(_mm_shuffle_ps(a, a, ZXY), _mm_shuffle_ps(b, b, YZX));
        let c = _mm_sub_ps(l, r);
        // [c.x, c.y, c.z, 0]
        _mm_shuffle_ps(c, _mm_unpackhi_ps(c, _mm_setzero_ps()), XYXY)
    }

    #[inline]
    #[target_feature(enable = "sse")]
    pub unsafe fn hamilton(l: __m128, r: __m128) -> __m128 {
        let rx = _mm_xor_ps(
            _mm_shuffle_ps(r, r, HAMILTON_X),
            _mm_set_ps(0.0, -0.0, 0.0, -0.0),
        );
        let ry = _mm_xor_ps(
            _mm_shuffle_ps(r, r, HAMILTON_Y),
            _mm_set_ps(-0.0, 0.0, 0.0, -0.0),
        );
        let rz = _mm_xor_ps(
            _mm_shuffle_ps(r, r, HAMILTON_Z),
            _mm_set_ps(0.0, 0.0, -0.0, -0.0),
        );

        let acc = _mm_mul_ps(_mm_shuffle_ps(l, l, 0x00), r);
        let acc = _mm_add_ps(acc, _mm_mul_ps(_mm_shuffle_ps(l, l, 0x55), rx));
        let acc = _mm_add_ps(acc, _mm_mul_ps(_mm_shuffle_ps(l, l, 0xAA), ry));
        _mm_add_ps(acc, _mm_mul_ps(_mm_shuffle_ps(l, l, 0xFF), rz))
    }

    #[inline]
    #[target_feature(enable = "sse")]
    pub unsafe fn conjugate(q: __m128) -> __m128 {
        _mm_xor_ps(q, _mm_set_ps(-0.0, -0.0, -0.0, 0.0))
    }
}

#[cfg(any(test, target_feature = "sse3"))]
mod sse3_f32 {
    use super::*;

    #[inline]
    #[target_feature(enable = "sse3")]
    pub unsafe fn dot4(a: __m128, b: __m128) -> f32 {
        let p = _mm_mul_ps(a, b);
        let s = _mm_hadd_ps(p, p);
        _mm_cvtss_f32(_mm_hadd_ps(s, s))
    }

    /// Folds in one left-hand component per step with `addsub`, reordering the accumulator so the
    /// signs of the next step alternate.
    #[inline]
    #[target_feature(enable = "sse3")]
    pub unsafe fn hamilton(l: __m128, r: __m128) -> __m128 {
        // [w, x, y, z]
        let acc = _mm_mul_ps(_mm_shuffle_ps(l, l, 0x00), r);
        let rx = _mm_shuffle_ps(r, r, HAMILTON_X);
        let acc = _mm_addsub_ps(acc, _mm_mul_ps(_mm_shuffle_ps(l, l, 0x55), rx));

        // [w, x, z, y]
        let acc = _mm_shuffle_ps(acc, acc, WXZY);
        let ry = _mm_shuffle_ps(r, r, YZXW);
        let acc = _mm_addsub_ps(acc, _mm_mul_ps(_mm_shuffle_ps(l, l, 0xAA), ry));

        // [w, z, x, y]
        let acc = _mm_shuffle_ps(acc, acc, WXZY_TO_WZXY);
        let rz = _mm_shuffle_ps(r, r, ZWYX);
        let acc = _mm_addsub_ps(acc, _mm_mul_ps(_mm_shuffle_ps(l, l, 0xFF), rz));

        _mm_shuffle_ps(acc, acc, WZXY_TO_WXYZ)
    }
}

#[cfg(any(test, target_feature = "sse4.1"))]
mod sse41_f32 {
    use super::*;

    #[inline]
    #[target_feature(enable = "sse4.1")]
    pub unsafe fn dot3(a: __m128, b: __m128) -> f32 {
        _mm_cvtss_f32(_mm_dp_ps(a, b, 0x71))
    }

    #[inline]
    #[target_feature(enable = "sse4.1")]
    pub unsafe fn dot4(a: __m128, b: __m128) -> f32 {
        _mm_cvtss_f32(_mm_dp_ps(a, b, 0xF1))
    }
}

#[cfg(any(test, all(target_feature = "avx2", target_feature = "fma")))]
mod avx2_f32 {
    use super::*;

    #[inline]
    #[target_feature(enable = "avx2,fma")]
    pub unsafe fn cross3(a: __m128, b: __m128) -> __m128 {
        let r = _mm_mul_ps(_mm_permute_ps(a, ZXY), _mm_permute_ps(b, YZX));
        let c = _mm_fmsub_ps(_mm_permute_ps(a, YZX), _mm_permute_ps(b, ZXY), r);
        _mm_blend_ps(c, _mm_setzero_ps(), 0b1000)
    }

    #[inline]
    #[target_feature(enable = "avx2,fma")]
    pub unsafe fn hamilton(l: __m128, r: __m128) -> __m128 {
        let rx = _mm_xor_ps(
            _mm_permute_ps(r, HAMILTON_X),
            _mm_set_ps(0.0, -0.0, 0.0, -0.0),
        );
        let ry = _mm_xor_ps(
            _mm_permute_ps(r, HAMILTON_Y),
            _mm_set_ps(-0.0, 0.0, 0.0, -0.0),
        );
        let rz = _mm_xor_ps(
            _mm_permute_ps(r, HAMILTON_Z),
            _mm_set_ps(0.0, 0.0, -0.0, -0.0),
        );

        let acc = _mm_mul_ps(_mm_permute_ps(l, 0x00), r);
        let acc = _mm_fmadd_ps(_mm_permute_ps(l, 0x55), rx, acc);
        let acc = _mm_fmadd_ps(_mm_permute_ps(l, 0xAA), ry, acc);
        _mm_fmadd_ps(_mm_permute_ps(l, 0xFF), rz, acc)
    }
}

#[cfg(any(test, target_feature = "sse2"))]
mod sse2_f64 {
    use super::*;
    use crate::kernels::lane_out_of_range;

    #[inline]
    #[target_feature(enable = "sse2")]
    unsafe fn swap(a: __m128d) -> __m128d {
        _mm_shuffle_pd(a, a, 0b01)
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    pub unsafe fn load(lanes: [f64; 4]) -> F64x2x2 {
        F64x2x2 {
            lo: _mm_loadu_pd(lanes.as_ptr()),
            hi: _mm_loadu_pd(lanes.as_ptr().add(2)),
        }
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    pub unsafe fn store(reg: F64x2x2) -> [f64; 4] {
        let mut lanes = [0.0; 4];
        _mm_storeu_pd(lanes.as_mut_ptr(), reg.lo);
        _mm_storeu_pd(lanes.as_mut_ptr().add(2), reg.hi);
        lanes
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    pub unsafe fn lane(reg: F64x2x2, index: usize) -> f64 {
        match store(reg).get(index) {
            Some(lane) => *lane,
            None => lane_out_of_range(index, 4),
        }
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    pub unsafe fn neg(a: F64x2x2) -> F64x2x2 {
        let sign = _mm_set1_pd(-0.0);
        F64x2x2 {
            lo: _mm_xor_pd(a.lo, sign),
            hi: _mm_xor_pd(a.hi, sign),
        }
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    pub unsafe fn add(a: F64x2x2, b: F64x2x2) -> F64x2x2 {
        F64x2x2 {
            lo: _mm_add_pd(a.lo, b.lo),
            hi: _mm_add_pd(a.hi, b.hi),
        }
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    pub unsafe fn sub(a: F64x2x2, b: F64x2x2) -> F64x2x2 {
        F64x2x2 {
            lo: _mm_sub_pd(a.lo, b.lo),
            hi: _mm_sub_pd(a.hi, b.hi),
        }
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    pub unsafe fn mul_scalar(a: F64x2x2, s: f64) -> F64x2x2 {
        let s = _mm_set1_pd(s);
        F64x2x2 {
            lo: _mm_mul_pd(a.lo, s),
            hi: _mm_mul_pd(a.hi, s),
        }
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    pub unsafe fn div_scalar(a: F64x2x2, s: f64) -> F64x2x2 {
        let s = _mm_set1_pd(s);
        F64x2x2 {
            lo: _mm_div_pd(a.lo, s),
            hi: _mm_div_pd(a.hi, s),
        }
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    pub unsafe fn eq_mask(a: F64x2x2, b: F64x2x2) -> u32 {
        let lo = _mm_movemask_pd(_mm_cmpeq_pd(a.lo, b.lo));
        let hi = _mm_movemask_pd(_mm_cmpeq_pd(a.hi, b.hi));
        (lo | hi << 2) as u32
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    pub unsafe fn dot3(a: F64x2x2, b: F64x2x2) -> f64 {
        let lo = _mm_mul_pd(a.lo, b.lo);
        let s = _mm_add_sd(lo, _mm_unpackhi_pd(lo, lo));
        _mm_cvtsd_f64(_mm_add_sd(s, _mm_mul_sd(a.hi, b.hi)))
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    pub unsafe fn dot4(a: F64x2x2, b: F64x2x2) -> f64 {
        // [p0 + p2, p1 + p3]
        let s = _mm_add_pd(_mm_mul_pd(a.lo, b.lo), _mm_mul_pd(a.hi, b.hi));
        _mm_cvtsd_f64(_mm_add_sd(s, _mm_unpackhi_pd(s, s)))
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    pub unsafe fn cross3(a: F64x2x2, b: F64x2x2) -> F64x2x2 {
        // [y, z] * [z, x] - [z, x] * [y, z]
        let a_yz = _mm_shuffle_pd(a.lo, a.hi, 0b01);
        let a_zx = _mm_shuffle_pd(a.hi, a.lo, 0b00);
        let b_yz = _mm_shuffle_pd(b.lo, b.hi, 0b01);
        let b_zx = _mm_shuffle_pd(b.hi, b.lo, 0b00);
        let lo = _mm_sub_pd(_mm_mul_pd(a_yz, b_zx), _mm_mul_pd(a_zx, b_yz));

        // [x * y, y * x]
        let p = _mm_mul_pd(a.lo, swap(b.lo));
        let z = _mm_sub_sd(p, _mm_unpackhi_pd(p, p));
        F64x2x2 {
            lo,
            hi: _mm_move_sd(_mm_setzero_pd(), z),
        }
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    pub unsafe fn hamilton(l: F64x2x2, r: F64x2x2) -> F64x2x2 {
        let (neg_lo, neg_hi, neg_both) = (
            _mm_set_pd(0.0, -0.0),
            _mm_set_pd(-0.0, 0.0),
            _mm_set1_pd(-0.0),
        );
        let (lw, lx) = (_mm_unpacklo_pd(l.lo, l.lo), _mm_unpackhi_pd(l.lo, l.lo));
        let (ly, lz) = (_mm_unpacklo_pd(l.hi, l.hi), _mm_unpackhi_pd(l.hi, l.hi));

        // [-rx, rw, -rz, ry]
        let rx_lo = _mm_xor_pd(swap(r.lo), neg_lo);
        let rx_hi = _mm_xor_pd(swap(r.hi), neg_lo);
        // [-ry, rz, rw, -rx]
        let ry_lo = _mm_xor_pd(r.hi, neg_lo);
        let ry_hi = _mm_xor_pd(r.lo, neg_hi);
        // [-rz, -ry, rx, rw]
        let rz_lo = _mm_xor_pd(swap(r.hi), neg_both);
        let rz_hi = swap(r.lo);

        let lo = _mm_mul_pd(lw, r.lo);
        let lo = _mm_add_pd(lo, _mm_mul_pd(lx, rx_lo));
        let lo = _mm_add_pd(lo, _mm_mul_pd(ly, ry_lo));
        let lo = _mm_add_pd(lo, _mm_mul_pd(lz, rz_lo));

        let hi = _mm_mul_pd(lw, r.hi);
        let hi = _mm_add_pd(hi, _mm_mul_pd(lx, rx_hi));
        let hi = _mm_add_pd(hi, _mm_mul_pd(ly, ry_hi));
        let hi = _mm_add_pd(hi, _mm_mul_pd(lz, rz_hi));

        F64x2x2 { lo, hi }
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    pub unsafe fn conjugate(q: F64x2x2) -> F64x2x2 {
        F64x2x2 {
            lo: _mm_xor_pd(q.lo, _mm_set_pd(-0.0, 0.0)),
            hi: _mm_xor_pd(q.hi, _mm_set1_pd(-0.0)),
        }
    }
}

#[cfg(any(test, target_feature = "sse3"))]
mod sse3_f64 {
    use super::*;

    #[inline]
    #[target_feature(enable = "sse3")]
    unsafe fn swap(a: __m128d) -> __m128d {
        _mm_shuffle_pd(a, a, 0b01)
    }

    #[inline]
    #[target_feature(enable = "sse3")]
    pub unsafe fn dot4(a: F64x2x2, b: F64x2x2) -> f64 {
        let s = _mm_add_pd(_mm_mul_pd(a.lo, b.lo), _mm_mul_pd(a.hi, b.hi));
        _mm_cvtsd_f64(_mm_hadd_pd(s, s))
    }

    #[inline]
    #[target_feature(enable = "sse3")]
    pub unsafe fn hamilton(l: F64x2x2, r: F64x2x2) -> F64x2x2 {
        let (lw, lx) = (_mm_unpacklo_pd(l.lo, l.lo), _mm_unpackhi_pd(l.lo, l.lo));
        let (ly, lz) = (_mm_unpacklo_pd(l.hi, l.hi), _mm_unpackhi_pd(l.hi, l.hi));

        let lo = _mm_mul_pd(lw, r.lo);
        let hi = _mm_mul_pd(lw, r.hi);

        let lo = _mm_addsub_pd(lo, _mm_mul_pd(lx, swap(r.lo)));
        let hi = _mm_addsub_pd(hi, _mm_mul_pd(lx, swap(r.hi)));

        // `hi` stays in [z, y] order until the end.
        let lo = _mm_addsub_pd(lo, _mm_mul_pd(ly, r.hi));
        let hi = _mm_addsub_pd(swap(hi), _mm_mul_pd(ly, swap(r.lo)));

        let lo = _mm_sub_pd(lo, _mm_mul_pd(lz, swap(r.hi)));
        let hi = _mm_add_pd(hi, _mm_mul_pd(lz, r.lo));

        F64x2x2 { lo, hi: swap(hi) }
    }
}

#[cfg(any(test, target_feature = "sse4.1"))]
mod sse41_f64 {
    use super::*;

    #[inline]
    #[target_feature(enable = "sse4.1")]
    pub unsafe fn dot3(a: F64x2x2, b: F64x2x2) -> f64 {
        let s = _mm_dp_pd(a.lo, b.lo, 0x31);
        _mm_cvtsd_f64(_mm_add_sd(s, _mm_mul_sd(a.hi, b.hi)))
    }

    #[inline]
    #[target_feature(enable = "sse4.1")]
    pub unsafe fn dot4(a: F64x2x2, b: F64x2x2) -> f64 {
        let lo = _mm_dp_pd(a.lo, b.lo, 0x31);
        let hi = _mm_dp_pd(a.hi, b.hi, 0x31);
        _mm_cvtsd_f64(_mm_add_sd(lo, hi))
    }
}

#[cfg(any(test, target_feature = "avx"))]
mod avx_f64 {
    use super::*;
    use crate::kernels::lane_out_of_range;

    #[inline]
    #[target_feature(enable = "avx")]
    unsafe fn split(a: __m256d) -> F64x2x2 {
        F64x2x2 {
            lo: _mm256_castpd256_pd128(a),
            hi: _mm256_extractf128_pd(a, 1),
        }
    }

    #[inline]
    #[target_feature(enable = "avx")]
    unsafe fn join(a: F64x2x2) -> __m256d {
        _mm256_set_m128d(a.hi, a.lo)
    }

    #[inline]
    #[target_feature(enable = "avx")]
    pub unsafe fn load(lanes: [f64; 4]) -> __m256d {
        _mm256_loadu_pd(lanes.as_ptr())
    }

    #[inline]
    #[target_feature(enable = "avx")]
    pub unsafe fn store(reg: __m256d) -> [f64; 4] {
        let mut lanes = [0.0; 4];
        _mm256_storeu_pd(lanes.as_mut_ptr(), reg);
        lanes
    }

    #[inline]
    #[target_feature(enable = "avx")]
    pub unsafe fn lane(reg: __m256d, index: usize) -> f64 {
        match store(reg).get(index) {
            Some(lane) => *lane,
            None => lane_out_of_range(index, 4),
        }
    }

    #[inline]
    #[target_feature(enable = "avx")]
    pub unsafe fn neg(a: __m256d) -> __m256d {
        _mm256_xor_pd(a, _mm256_set1_pd(-0.0))
    }

    #[inline]
    #[target_feature(enable = "avx")]
    pub unsafe fn add(a: __m256d, b: __m256d) -> __m256d {
        _mm256_add_pd(a, b)
    }

    #[inline]
    #[target_feature(enable = "avx")]
    pub unsafe fn sub(a: __m256d, b: __m256d) -> __m256d {
        _mm256_sub_pd(a, b)
    }

    #[inline]
    #[target_feature(enable = "avx")]
    pub unsafe fn mul_scalar(a: __m256d, s: f64) -> __m256d {
        _mm256_mul_pd(a, _mm256_set1_pd(s))
    }

    #[inline]
    #[target_feature(enable = "avx")]
    pub unsafe fn div_scalar(a: __m256d, s: f64) -> __m256d {
        _mm256_div_pd(a, _mm256_set1_pd(s))
    }

    #[inline]
    #[target_feature(enable = "avx")]
    pub unsafe fn eq_mask(a: __m256d, b: __m256d) -> u32 {
        _mm256_movemask_pd(_mm256_cmp_pd(a, b, _CMP_EQ_OQ)) as u32
    }

    #[inline]
    #[target_feature(enable = "avx")]
    pub unsafe fn dot3(a: __m256d, b: __m256d) -> f64 {
        let p = _mm256_mul_pd(a, b);
        let (lo, hi) = (_mm256_castpd256_pd128(p), _mm256_extractf128_pd(p, 1));
        let s = _mm_add_sd(lo, _mm_unpackhi_pd(lo, lo));
        _mm_cvtsd_f64(_mm_add_sd(s, hi))
    }

    #[inline]
    #[target_feature(enable = "avx")]
    pub unsafe fn dot4(a: __m256d, b: __m256d) -> f64 {
        let p = _mm256_mul_pd(a, b);
        let s = _mm_add_pd(_mm256_castpd256_pd128(p), _mm256_extractf128_pd(p, 1));
        _mm_cvtsd_f64(_mm_hadd_pd(s, s))
    }

    #[inline]
    #[target_feature(enable = "avx")]
    pub unsafe fn cross3(a: __m256d, b: __m256d) -> __m256d {
        join(sse2_f64::cross3(split(a), split(b)))
    }

    #[inline]
    #[target_feature(enable = "avx")]
    pub unsafe fn hamilton(l: __m256d, r: __m256d) -> __m256d {
        join(sse3_f64::hamilton(split(l), split(r)))
    }

    #[inline]
    #[target_feature(enable = "avx")]
    pub unsafe fn conjugate(q: __m256d) -> __m256d {
        _mm256_xor_pd(q, _mm256_set_pd(-0.0, -0.0, -0.0, 0.0))
    }
}

#[cfg(any(test, all(target_feature = "avx2", target_feature = "fma")))]
mod avx2_f64 {
    use super::*;

    #[inline]
    #[target_feature(enable = "avx2,fma")]
    pub unsafe fn cross3(a: __m256d, b: __m256d) -> __m256d {
        let r = _mm256_mul_pd(
            _mm256_permute4x64_pd(a, ZXY),
            _mm256_permute4x64_pd(b, YZX),
        );
        let c = _mm256_fmsub_pd(
            _mm256_permute4x64_pd(a, YZX),
            _mm256_permute4x64_pd(b, ZXY),
            r,
        );
        _mm256_blend_pd(c, _mm256_setzero_pd(), 0b1000)
    }

    #[inline]
    #[target_feature(enable = "avx2,fma")]
    pub unsafe fn hamilton(l: __m256d, r: __m256d) -> __m256d {
        let rx = _mm256_xor_pd(
            _mm256_permute4x64_pd(r, HAMILTON_X),
            _mm256_set_pd(0.0, -0.0, 0.0, -0.0),
        );
        let ry = _mm256_xor_pd(
            _mm256_permute4x64_pd(r, HAMILTON_Y),
            _mm256_set_pd(-0.0, 0.0, 0.0, -0.0),
        );
        let rz = _mm256_xor_pd(
            _mm256_permute4x64_pd(r, HAMILTON_Z),
            _mm256_set_pd(0.0, 0.0, -0.0, -0.0),
        );

        let acc = _mm256_mul_pd(_mm256_permute4x64_pd(l, 0x00), r);
        let acc = _mm256_fmadd_pd(_mm256_permute4x64_pd(l, 0x55), rx, acc);
        let acc = _mm256_fmadd_pd(_mm256_permute4x64_pd(l, 0xAA), ry, acc);
        _mm256_fmadd_pd(_mm256_permute4x64_pd(l, 0xFF), rz, acc)
    }
}

// Sse

#[cfg(any(test, target_feature = "sse"))]
impl Kernels<f32> for Sse {
    type Reg = __m128;

    kernels!((raw sse_f32), f32;
        load, store, lane, neg, add, sub, mul_scalar, div_scalar, eq_mask,
        dot3, dot4, cross3, hamilton, conjugate);
}

#[cfg(any(test, target_feature = "sse"))]
promote!(Sse => NoIsa: f64);

#[cfg(any(test, target_feature = "sse"))]
promote_integers!(Sse => NoIsa);

// Sse2

#[cfg(any(test, target_feature = "sse2"))]
promote!(Sse2 => Sse: f32);

#[cfg(any(test, target_feature = "sse2"))]
impl Kernels<f64> for Sse2 {
    type Reg = F64x2x2;

    kernels!((raw sse2_f64), f64;
        load, store, lane, neg, add, sub, mul_scalar, div_scalar, eq_mask,
        dot3, dot4, cross3, hamilton, conjugate);
}

#[cfg(any(test, target_feature = "sse2"))]
promote_integers!(Sse2 => Sse);

// Sse3

#[cfg(any(test, target_feature = "sse3"))]
impl Kernels<f32> for Sse3 {
    type Reg = __m128;

    kernels!((from Sse2), f32;
        load, store, lane, neg, add, sub, mul_scalar, div_scalar, eq_mask,
        dot3, cross3, conjugate);
    kernels!((raw sse3_f32), f32; dot4, hamilton);
}

#[cfg(any(test, target_feature = "sse3"))]
impl Kernels<f64> for Sse3 {
    type Reg = F64x2x2;

    kernels!((from Sse2), f64;
        load, store, lane, neg, add, sub, mul_scalar, div_scalar, eq_mask,
        dot3, cross3, conjugate);
    kernels!((raw sse3_f64), f64; dot4, hamilton);
}

#[cfg(any(test, target_feature = "sse3"))]
promote_integers!(Sse3 => Sse2);

// Sse4

#[cfg(any(test, target_feature = "sse4.1"))]
impl Kernels<f32> for Sse4 {
    type Reg = __m128;

    kernels!((from Sse3), f32;
        load, store, lane, neg, add, sub, mul_scalar, div_scalar, eq_mask,
        cross3, hamilton, conjugate);
    kernels!((raw sse41_f32), f32; dot3, dot4);
}

#[cfg(any(test, target_feature = "sse4.1"))]
impl Kernels<f64> for Sse4 {
    type Reg = F64x2x2;

    kernels!((from Sse3), f64;
        load, store, lane, neg, add, sub, mul_scalar, div_scalar, eq_mask,
        cross3, hamilton, conjugate);
    kernels!((raw sse41_f64), f64; dot3, dot4);
}

#[cfg(any(test, target_feature = "sse4.1"))]
promote_integers!(Sse4 => Sse3);

// Avx

#[cfg(any(test, target_feature = "avx"))]
promote!(Avx => Sse4: f32);

#[cfg(any(test, target_feature = "avx"))]
impl Kernels<f64> for Avx {
    type Reg = __m256d;

    kernels!((raw avx_f64), f64;
        load, store, lane, neg, add, sub, mul_scalar, div_scalar, eq_mask,
        dot3, dot4, cross3, hamilton, conjugate);
}

#[cfg(any(test, target_feature = "avx"))]
promote_integers!(Avx => Sse4);

// Avx2

#[cfg(any(test, all(target_feature = "avx2", target_feature = "fma")))]
impl Kernels<f32> for Avx2 {
    type Reg = __m128;

    kernels!((from Avx), f32;
        load, store, lane, neg, add, sub, mul_scalar, div_scalar, eq_mask,
        dot3, dot4, conjugate);
    kernels!((raw avx2_f32), f32; cross3, hamilton);
}

#[cfg(any(test, all(target_feature = "avx2", target_feature = "fma")))]
impl Kernels<f64> for Avx2 {
    type Reg = __m256d;

    kernels!((from Avx), f64;
        load, store, lane, neg, add, sub, mul_scalar, div_scalar, eq_mask,
        dot3, dot4, conjugate);
    kernels!((raw avx2_f64), f64; cross3, hamilton);
}

#[cfg(any(test, all(target_feature = "avx2", target_feature = "fma")))]
promote_integers!(Avx2 => Avx);

#[cfg(test)]
mod tests {
    use crate::{
        isa::{Avx, Avx2, Isa, NoIsa, Sse, Sse2, Sse3, Sse4},
        kernels::{testing::*, Kernels},
    };

    fn check<I>(detected: bool)
    where
        I: Kernels<f32> + Kernels<f64> + Kernels<i32> + Kernels<i64>,
    {
        if !detected {
            log::warn!("skipping `{}` kernels, not supported by this CPU", <I as Isa>::NAME);
            return;
        }

        matches_generic::<f32, I>();
        matches_generic::<f64, I>();
        quaternion_units::<f32, I>();
        quaternion_units::<f64, I>();
        quaternion_units::<i32, I>();
        quaternion_units::<i64, I>();
        hamilton_products::<f32, I>();
        hamilton_products::<f64, I>();
        hamilton_products::<i32, I>();
        hamilton_products::<i64, I>();
    }

    /// Kernels that perform the same operations as the generic ones in the same order must produce
    /// bit-identical results.
    fn exact<T: Sample, I: Kernels<T>>(detected: bool) {
        if !detected {
            return;
        }

        let mut rng = fastrand::Rng::with_seed(0x5eed);
        for _ in 0..500 {
            let (a, b) = (lanes::<T>(&mut rng), lanes::<T>(&mut rng));
            let (ra, rb) = (I::load(a), I::load(b));
            assert_eq!(
                I::store(I::hamilton(ra, rb)),
                <NoIsa as Kernels<T>>::hamilton(a, b),
                "{} hamilton",
                <I as Isa>::NAME,
            );
            assert_eq!(
                I::store(I::cross3(ra, rb)),
                <NoIsa as Kernels<T>>::cross3(a, b),
                "{} cross3",
                <I as Isa>::NAME,
            );
            assert_eq!(I::dot3(ra, rb), <NoIsa as Kernels<T>>::dot3(a, b));
        }
    }

    #[test]
    fn sse() {
        check::<Sse>(is_x86_feature_detected!("sse"));
        exact::<f32, Sse>(is_x86_feature_detected!("sse"));
    }

    #[test]
    fn sse2() {
        check::<Sse2>(is_x86_feature_detected!("sse2"));
        exact::<f64, Sse2>(is_x86_feature_detected!("sse2"));
    }

    #[test]
    fn sse3() {
        check::<Sse3>(is_x86_feature_detected!("sse3"));
        exact::<f32, Sse3>(is_x86_feature_detected!("sse3"));
        exact::<f64, Sse3>(is_x86_feature_detected!("sse3"));
    }

    #[test]
    fn sse4() {
        let detected = is_x86_feature_detected!("sse4.1");
        check::<Sse4>(detected);
        exact::<f32, Sse4>(detected);
        exact::<f64, Sse4>(detected);
    }

    #[test]
    fn avx() {
        check::<Avx>(is_x86_feature_detected!("avx"));
        exact::<f64, Avx>(is_x86_feature_detected!("avx"));
    }

    #[test]
    fn avx2() {
        check::<Avx2>(is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma"));
    }

    #[test]
    fn lane_out_of_range() {
        if !is_x86_feature_detected!("sse2") {
            return;
        }
        let reg = <Sse2 as Kernels<f64>>::load([1.0, 2.0, 3.0, 4.0]);
        let result = std::panic::catch_unwind(|| <Sse2 as Kernels<f64>>::lane(reg, 7));
        assert!(result.is_err());
        assert_eq!(<Sse2 as Kernels<f64>>::lane(reg, 3), 4.0);
    }
}
