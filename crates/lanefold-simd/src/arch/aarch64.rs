//! AArch64 NEON 128-bit f32 register

use std::arch::aarch64::*;
use std::fmt;

use crate::vector::SimdVector;

/// Four f32 lanes in a `float32x4_t`
#[derive(Clone, Copy)]
pub struct NeonF32x4(float32x4_t);

impl NeonF32x4 {
    /// Copies the lanes out
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        let mut out = [0.0f32; 4];
        unsafe { vst1q_f32(out.as_mut_ptr(), self.0) };
        out
    }

    #[inline]
    fn from_array(lanes: [f32; 4]) -> Self {
        Self(unsafe { vld1q_f32(lanes.as_ptr()) })
    }
}

impl fmt::Debug for NeonF32x4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NeonF32x4").field(&self.to_array()).finish()
    }
}

impl SimdVector for NeonF32x4 {
    type Scalar = f32;

    const LANES: usize = 4;

    #[inline]
    fn splat(value: f32) -> Self {
        Self(unsafe { vdupq_n_f32(value) })
    }

    #[inline]
    fn load(src: &[f32]) -> Self {
        let src = &src[..4];
        Self(unsafe { vld1q_f32(src.as_ptr()) })
    }

    #[inline]
    fn load_partial(src: &[f32], count: usize) -> Self {
        let count = count.min(4);
        let mut lanes = [0.0f32; 4];
        lanes[..count].copy_from_slice(&src[..count]);
        Self::from_array(lanes)
    }

    #[inline]
    fn store(self, dst: &mut [f32]) {
        let dst = &mut dst[..4];
        unsafe { vst1q_f32(dst.as_mut_ptr(), self.0) }
    }

    #[inline]
    fn store_partial(self, dst: &mut [f32], count: usize) {
        let count = count.min(4);
        dst[..count].copy_from_slice(&self.to_array()[..count]);
    }

    #[inline]
    fn lane(self, index: usize) -> f32 {
        self.to_array()[index]
    }

    #[inline]
    fn blend_prefix(self, other: Self, count: usize) -> Self {
        let count = count.min(4);
        let mut lanes = self.to_array();
        lanes[..count].copy_from_slice(&other.to_array()[..count]);
        Self::from_array(lanes)
    }

    #[inline]
    fn vadd(self, other: Self) -> Self {
        Self(unsafe { vaddq_f32(self.0, other.0) })
    }

    #[inline]
    fn vmul(self, other: Self) -> Self {
        Self(unsafe { vmulq_f32(self.0, other.0) })
    }

    #[inline]
    fn vmax(self, other: Self) -> Self {
        Self(unsafe { vmaxq_f32(self.0, other.0) })
    }

    #[inline]
    fn vmin(self, other: Self) -> Self {
        Self(unsafe { vminq_f32(self.0, other.0) })
    }
}
