//! AVX 256-bit f32 register

use std::arch::x86_64::*;
use std::fmt;

use crate::vector::SimdVector;

/// Eight f32 lanes in a `__m256`
#[derive(Clone, Copy)]
pub struct Avx256F32(__m256);

impl Avx256F32 {
    /// Copies the lanes out
    #[inline]
    pub fn to_array(self) -> [f32; 8] {
        let mut out = [0.0f32; 8];
        unsafe { _mm256_storeu_ps(out.as_mut_ptr(), self.0) };
        out
    }

    #[inline]
    fn from_array(lanes: [f32; 8]) -> Self {
        Self(unsafe { _mm256_loadu_ps(lanes.as_ptr()) })
    }
}

impl fmt::Debug for Avx256F32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Avx256F32").field(&self.to_array()).finish()
    }
}

impl SimdVector for Avx256F32 {
    type Scalar = f32;

    const LANES: usize = 8;

    #[inline]
    fn splat(value: f32) -> Self {
        Self(unsafe { _mm256_set1_ps(value) })
    }

    #[inline]
    fn zero() -> Self {
        Self(unsafe { _mm256_setzero_ps() })
    }

    #[inline]
    fn load(src: &[f32]) -> Self {
        let src = &src[..8];
        Self(unsafe { _mm256_loadu_ps(src.as_ptr()) })
    }

    #[inline]
    fn load_partial(src: &[f32], count: usize) -> Self {
        let count = count.min(8);
        let mut lanes = [0.0f32; 8];
        lanes[..count].copy_from_slice(&src[..count]);
        Self::from_array(lanes)
    }

    #[inline]
    fn store(self, dst: &mut [f32]) {
        let dst = &mut dst[..8];
        unsafe { _mm256_storeu_ps(dst.as_mut_ptr(), self.0) }
    }

    #[inline]
    fn store_partial(self, dst: &mut [f32], count: usize) {
        let count = count.min(8);
        dst[..count].copy_from_slice(&self.to_array()[..count]);
    }

    #[inline]
    fn lane(self, index: usize) -> f32 {
        self.to_array()[index]
    }

    #[inline]
    fn blend_prefix(self, other: Self, count: usize) -> Self {
        let count = count.min(8);
        let mut lanes = self.to_array();
        lanes[..count].copy_from_slice(&other.to_array()[..count]);
        Self::from_array(lanes)
    }

    #[inline]
    fn vadd(self, other: Self) -> Self {
        Self(unsafe { _mm256_add_ps(self.0, other.0) })
    }

    #[inline]
    fn vmul(self, other: Self) -> Self {
        Self(unsafe { _mm256_mul_ps(self.0, other.0) })
    }

    #[inline]
    fn vmax(self, other: Self) -> Self {
        Self(unsafe { _mm256_max_ps(self.0, other.0) })
    }

    #[inline]
    fn vmin(self, other: Self) -> Self {
        Self(unsafe { _mm256_min_ps(self.0, other.0) })
    }
}
