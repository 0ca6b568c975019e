//! NEON kernels.
//!
//! [`Neon32`] only uses instructions that 32-bit ARM NEON also has: no vector division, no
//! across-lane adds and no fused multiply-add. [`Neon64`] adds those, along with `f64` lanes.
//! Both are only compiled for AArch64.

use std::arch::aarch64::*;

#[allow(unused_imports)]
use crate::isa::{Neon32, Neon64, NoIsa};

use super::Kernels;

/// Four `f64` lanes in two NEON registers: lanes 0 and 1 in `lo`, lanes 2 and 3 in `hi`.
#[derive(Clone, Copy)]
pub struct F64x2x2 {
    lo: float64x2_t,
    hi: float64x2_t,
}

// Signs of the right-hand side lanes paired with the left-hand `x`, `y` and `z` components of a
// Hamilton product.
const SIGNS_X: [f32; 4] = [-1.0, 1.0, -1.0, 1.0];
const SIGNS_Y: [f32; 4] = [-1.0, 1.0, 1.0, -1.0];
const SIGNS_Z: [f32; 4] = [-1.0, -1.0, 1.0, 1.0];

#[cfg(any(test, target_feature = "neon"))]
mod neon32_f32 {
    use super::*;
    use crate::kernels::lane_out_of_range;

    /// `[y, z, x, x]`
    #[inline]
    #[target_feature(enable = "neon")]
    pub(super) unsafe fn yzx(v: float32x4_t) -> float32x4_t {
        vsetq_lane_f32::<2>(vgetq_lane_f32::<0>(v), vextq_f32::<1>(v, v))
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn load(lanes: [f32; 4]) -> float32x4_t {
        vld1q_f32(lanes.as_ptr())
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn store(reg: float32x4_t) -> [f32; 4] {
        let mut lanes = [0.0; 4];
        vst1q_f32(lanes.as_mut_ptr(), reg);
        lanes
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn lane(reg: float32x4_t, index: usize) -> f32 {
        match store(reg).get(index) {
            Some(lane) => *lane,
            None => lane_out_of_range(index, 4),
        }
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn neg(a: float32x4_t) -> float32x4_t {
        vnegq_f32(a)
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn add(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        vaddq_f32(a, b)
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn sub(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        vsubq_f32(a, b)
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn mul_scalar(a: float32x4_t, s: f32) -> float32x4_t {
        vmulq_n_f32(a, s)
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn div_scalar(a: float32x4_t, s: f32) -> float32x4_t {
        load(store(a).map(|lane| lane / s))
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn eq_mask(a: float32x4_t, b: float32x4_t) -> u32 {
        let mut lanes = [0u32; 4];
        vst1q_u32(lanes.as_mut_ptr(), vceqq_f32(a, b));
        lanes
            .iter()
            .enumerate()
            .fold(0, |mask, (i, lane)| mask | (lane & 1) << i)
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn dot3(a: float32x4_t, b: float32x4_t) -> f32 {
        let [x, y, z, _] = store(vmulq_f32(a, b));
        x + y + z
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn dot4(a: float32x4_t, b: float32x4_t) -> f32 {
        let p = vmulq_f32(a, b);
        let s = vadd_f32(vget_low_f32(p), vget_high_f32(p));
        vget_lane_f32::<0>(vpadd_f32(s, s))
    }

    /// Computes `(a * b.yzx - a.yzx * b).yzx`.
    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn cross3(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        let t = vmlsq_f32(vmulq_f32(a, yzx(b)), yzx(a), b);
        vsetq_lane_f32::<3>(0.0, yzx(t))
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn hamilton(l: float32x4_t, r: float32x4_t) -> float32x4_t {
        // [rx, rw, rz, ry], [ry, rz, rw, rx], [rz, ry, rx, rw]
        let r1 = vrev64q_f32(r);
        let r2 = vextq_f32::<2>(r, r);
        let r3 = vrev64q_f32(r2);

        let acc = vmulq_n_f32(r, vgetq_lane_f32::<0>(l));
        let acc = vmlaq_n_f32(acc, vmulq_f32(r1, load(SIGNS_X)), vgetq_lane_f32::<1>(l));
        let acc = vmlaq_n_f32(acc, vmulq_f32(r2, load(SIGNS_Y)), vgetq_lane_f32::<2>(l));
        vmlaq_n_f32(acc, vmulq_f32(r3, load(SIGNS_Z)), vgetq_lane_f32::<3>(l))
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn conjugate(q: float32x4_t) -> float32x4_t {
        vsetq_lane_f32::<0>(vgetq_lane_f32::<0>(q), vnegq_f32(q))
    }
}

#[cfg(any(test, target_feature = "neon"))]
mod neon64_f32 {
    use super::*;
    use super::neon32_f32::yzx;

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn div_scalar(a: float32x4_t, s: f32) -> float32x4_t {
        vdivq_f32(a, vdupq_n_f32(s))
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn eq_mask(a: float32x4_t, b: float32x4_t) -> u32 {
        let bits = [1u32, 2, 4, 8];
        vaddvq_u32(vandq_u32(vceqq_f32(a, b), vld1q_u32(bits.as_ptr())))
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn dot3(a: float32x4_t, b: float32x4_t) -> f32 {
        vaddvq_f32(vsetq_lane_f32::<3>(0.0, vmulq_f32(a, b)))
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn dot4(a: float32x4_t, b: float32x4_t) -> f32 {
        vaddvq_f32(vmulq_f32(a, b))
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn cross3(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        let t = vfmsq_f32(vmulq_f32(a, yzx(b)), yzx(a), b);
        vsetq_lane_f32::<3>(0.0, yzx(t))
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn hamilton(l: float32x4_t, r: float32x4_t) -> float32x4_t {
        let r1 = vrev64q_f32(r);
        let r2 = vextq_f32::<2>(r, r);
        let r3 = vrev64q_f32(r2);

        let r1 = vmulq_f32(r1, vld1q_f32(SIGNS_X.as_ptr()));
        let r2 = vmulq_f32(r2, vld1q_f32(SIGNS_Y.as_ptr()));
        let r3 = vmulq_f32(r3, vld1q_f32(SIGNS_Z.as_ptr()));

        let acc = vmulq_n_f32(r, vgetq_lane_f32::<0>(l));
        let acc = vfmaq_n_f32(acc, r1, vgetq_lane_f32::<1>(l));
        let acc = vfmaq_n_f32(acc, r2, vgetq_lane_f32::<2>(l));
        vfmaq_n_f32(acc, r3, vgetq_lane_f32::<3>(l))
    }
}

#[cfg(any(test, target_feature = "neon"))]
mod neon64_f64 {
    use super::*;
    use crate::kernels::lane_out_of_range;

    #[inline]
    #[target_feature(enable = "neon")]
    unsafe fn swap(a: float64x2_t) -> float64x2_t {
        vextq_f64::<1>(a, a)
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn load(lanes: [f64; 4]) -> F64x2x2 {
        F64x2x2 {
            lo: vld1q_f64(lanes.as_ptr()),
            hi: vld1q_f64(lanes.as_ptr().add(2)),
        }
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn store(reg: F64x2x2) -> [f64; 4] {
        let mut lanes = [0.0; 4];
        vst1q_f64(lanes.as_mut_ptr(), reg.lo);
        vst1q_f64(lanes.as_mut_ptr().add(2), reg.hi);
        lanes
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn lane(reg: F64x2x2, index: usize) -> f64 {
        match store(reg).get(index) {
            Some(lane) => *lane,
            None => lane_out_of_range(index, 4),
        }
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn neg(a: F64x2x2) -> F64x2x2 {
        F64x2x2 {
            lo: vnegq_f64(a.lo),
            hi: vnegq_f64(a.hi),
        }
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn add(a: F64x2x2, b: F64x2x2) -> F64x2x2 {
        F64x2x2 {
            lo: vaddq_f64(a.lo, b.lo),
            hi: vaddq_f64(a.hi, b.hi),
        }
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn sub(a: F64x2x2, b: F64x2x2) -> F64x2x2 {
        F64x2x2 {
            lo: vsubq_f64(a.lo, b.lo),
            hi: vsubq_f64(a.hi, b.hi),
        }
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn mul_scalar(a: F64x2x2, s: f64) -> F64x2x2 {
        F64x2x2 {
            lo: vmulq_n_f64(a.lo, s),
            hi: vmulq_n_f64(a.hi, s),
        }
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn div_scalar(a: F64x2x2, s: f64) -> F64x2x2 {
        let s = vdupq_n_f64(s);
        F64x2x2 {
            lo: vdivq_f64(a.lo, s),
            hi: vdivq_f64(a.hi, s),
        }
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn eq_mask(a: F64x2x2, b: F64x2x2) -> u32 {
        let (lo, hi) = (vceqq_f64(a.lo, b.lo), vceqq_f64(a.hi, b.hi));
        let mask = vgetq_lane_u64::<0>(lo) & 1
            | vgetq_lane_u64::<1>(lo) & 2
            | vgetq_lane_u64::<0>(hi) & 4
            | vgetq_lane_u64::<1>(hi) & 8;
        mask as u32
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn dot3(a: F64x2x2, b: F64x2x2) -> f64 {
        let z = vgetq_lane_f64::<0>(a.hi) * vgetq_lane_f64::<0>(b.hi);
        vaddvq_f64(vmulq_f64(a.lo, b.lo)) + z
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn dot4(a: F64x2x2, b: F64x2x2) -> f64 {
        vaddvq_f64(vaddq_f64(vmulq_f64(a.lo, b.lo), vmulq_f64(a.hi, b.hi)))
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn cross3(a: F64x2x2, b: F64x2x2) -> F64x2x2 {
        // [y, z] * [z, x] - [z, x] * [y, z]
        let a_yz = vextq_f64::<1>(a.lo, a.hi);
        let a_zx = vzip1q_f64(a.hi, a.lo);
        let b_yz = vextq_f64::<1>(b.lo, b.hi);
        let b_zx = vzip1q_f64(b.hi, b.lo);
        let lo = vsubq_f64(vmulq_f64(a_yz, b_zx), vmulq_f64(a_zx, b_yz));

        let (ax, ay) = (vgetq_lane_f64::<0>(a.lo), vgetq_lane_f64::<1>(a.lo));
        let (bx, by) = (vgetq_lane_f64::<0>(b.lo), vgetq_lane_f64::<1>(b.lo));
        F64x2x2 {
            lo,
            hi: vsetq_lane_f64::<0>(ax * by - ay * bx, vdupq_n_f64(0.0)),
        }
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn hamilton(l: F64x2x2, r: F64x2x2) -> F64x2x2 {
        let (neg_lo, neg_hi) = ([-1.0, 1.0], [1.0, -1.0]);
        let (neg_lo, neg_hi) = (vld1q_f64(neg_lo.as_ptr()), vld1q_f64(neg_hi.as_ptr()));
        let (lw, lx) = (vgetq_lane_f64::<0>(l.lo), vgetq_lane_f64::<1>(l.lo));
        let (ly, lz) = (vgetq_lane_f64::<0>(l.hi), vgetq_lane_f64::<1>(l.hi));

        // [-rx, rw, -rz, ry]
        let rx_lo = vmulq_f64(swap(r.lo), neg_lo);
        let rx_hi = vmulq_f64(swap(r.hi), neg_lo);
        // [-ry, rz, rw, -rx]
        let ry_lo = vmulq_f64(r.hi, neg_lo);
        let ry_hi = vmulq_f64(r.lo, neg_hi);
        // [-rz, -ry, rx, rw]
        let rz_lo = vnegq_f64(swap(r.hi));
        let rz_hi = swap(r.lo);

        let lo = vmulq_n_f64(r.lo, lw);
        let lo = vaddq_f64(lo, vmulq_n_f64(rx_lo, lx));
        let lo = vaddq_f64(lo, vmulq_n_f64(ry_lo, ly));
        let lo = vaddq_f64(lo, vmulq_n_f64(rz_lo, lz));

        let hi = vmulq_n_f64(r.hi, lw);
        let hi = vaddq_f64(hi, vmulq_n_f64(rx_hi, lx));
        let hi = vaddq_f64(hi, vmulq_n_f64(ry_hi, ly));
        let hi = vaddq_f64(hi, vmulq_n_f64(rz_hi, lz));

        F64x2x2 { lo, hi }
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn conjugate(q: F64x2x2) -> F64x2x2 {
        F64x2x2 {
            lo: vsetq_lane_f64::<0>(vgetq_lane_f64::<0>(q.lo), vnegq_f64(q.lo)),
            hi: vnegq_f64(q.hi),
        }
    }
}

// Neon32

#[cfg(any(test, target_feature = "neon"))]
impl Kernels<f32> for Neon32 {
    type Reg = float32x4_t;

    kernels!((raw neon32_f32), f32;
        load, store, lane, neg, add, sub, mul_scalar, div_scalar, eq_mask,
        dot3, dot4, cross3, hamilton, conjugate);
}

#[cfg(any(test, target_feature = "neon"))]
promote!(Neon32 => NoIsa: f64);

#[cfg(any(test, target_feature = "neon"))]
promote_integers!(Neon32 => NoIsa);

// Neon64

#[cfg(any(test, target_feature = "neon"))]
impl Kernels<f32> for Neon64 {
    type Reg = float32x4_t;

    kernels!((from Neon32), f32;
        load, store, lane, neg, add, sub, mul_scalar, conjugate);
    kernels!((raw neon64_f32), f32;
        div_scalar, eq_mask, dot3, dot4, cross3, hamilton);
}

#[cfg(any(test, target_feature = "neon"))]
impl Kernels<f64> for Neon64 {
    type Reg = F64x2x2;

    kernels!((raw neon64_f64), f64;
        load, store, lane, neg, add, sub, mul_scalar, div_scalar, eq_mask,
        dot3, dot4, cross3, hamilton, conjugate);
}

#[cfg(any(test, target_feature = "neon"))]
promote_integers!(Neon64 => Neon32);

#[cfg(test)]
mod tests {
    use crate::{
        isa::{Isa, Neon32, Neon64, NoIsa},
        kernels::{testing::*, Kernels},
    };

    fn check<I>()
    where
        I: Kernels<f32> + Kernels<f64> + Kernels<i32> + Kernels<i16>,
    {
        if !std::arch::is_aarch64_feature_detected!("neon") {
            log::warn!("skipping `{}` kernels, not supported by this CPU", <I as Isa>::NAME);
            return;
        }

        matches_generic::<f32, I>();
        matches_generic::<f64, I>();
        quaternion_units::<f32, I>();
        quaternion_units::<f64, I>();
        quaternion_units::<i32, I>();
        quaternion_units::<i16, I>();
        hamilton_products::<f32, I>();
        hamilton_products::<f64, I>();
        hamilton_products::<i32, I>();
        hamilton_products::<i16, I>();
    }

    fn exact<T: Sample, I: Kernels<T>>() {
        if !std::arch::is_aarch64_feature_detected!("neon") {
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
        }
    }

    #[test]
    fn neon32() {
        check::<Neon32>();
        exact::<f32, Neon32>();
    }

    #[test]
    fn neon64() {
        check::<Neon64>();
        exact::<f64, Neon64>();
    }
}
