//! Native vector registers
//!
//! Each wrapper is compiled only when its instruction set is available at
//! build time, so no runtime feature detection is involved.
//! [`NativeF32`] names the widest f32 register for the build target and
//! falls back to the portable [`F32x8`](crate::vector::F32x8).

#[cfg(all(target_arch = "x86_64", target_feature = "avx"))]
pub mod x86_64;

#[cfg(target_arch = "aarch64")]
pub mod aarch64;

#[cfg(all(target_arch = "x86_64", target_feature = "avx"))]
pub use x86_64::Avx256F32;

#[cfg(target_arch = "aarch64")]
pub use aarch64::NeonF32x4;

/// Widest native f32 vector for the build target
#[cfg(all(target_arch = "x86_64", target_feature = "avx"))]
pub type NativeF32 = Avx256F32;

/// Widest native f32 vector for the build target
#[cfg(target_arch = "aarch64")]
pub type NativeF32 = NeonF32x4;

/// Widest native f32 vector for the build target
#[cfg(not(any(
    all(target_arch = "x86_64", target_feature = "avx"),
    target_arch = "aarch64"
)))]
pub type NativeF32 = crate::vector::F32x8;

/// Name of the instruction set behind [`NativeF32`]
pub const fn native_isa() -> &'static str {
    if cfg!(all(target_arch = "x86_64", target_feature = "avx")) {
        "avx"
    } else if cfg!(target_arch = "aarch64") {
        "neon"
    } else {
        "portable"
    }
}
