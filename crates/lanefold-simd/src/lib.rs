//! Lanefold SIMD: fixed-width vectors with tail-aware horizontal reduction
//!
//! This crate reduces a flat buffer of scalars to a single value through a
//! vector type of fixed width, and runs elementwise kernels over pairs of
//! buffers the same way.
//!
//! # Features
//!
//! - **Generic reducer**: any lane-wise combine, including plain closures
//! - **Exact tails**: partial strides only touch the lanes they populate
//! - **Portable and native vectors**: array-backed [`Lanes`] everywhere,
//!   AVX and NEON registers where the target has them
//! - **Parallel reduction**: chunked reduction on rayon (`parallel` feature)
//!
//! # Example
//!
//! ```rust
//! use lanefold_simd::prelude::*;
//!
//! let data: Vec<f32> = (1..=10).map(|i| i as f32).collect();
//! assert_eq!(reduce_with::<F32x8, _>(&SumOp, &data), 55.0);
//! assert_eq!(reduce_with::<F32x8, _>(&MaxOp, &data), 10.0);
//!
//! let mut out = vec![0.0; data.len()];
//! mul::<F32x8>(&data, &data, &mut out)?;
//! assert_eq!(out[9], 100.0);
//! # Ok::<(), lanefold_simd::SimdError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod arch;
pub mod dtype;
pub mod elementwise;
pub mod error;
pub mod ops;
pub mod reduce;
pub mod vector;

pub use dtype::DType;
pub use error::{Result, SimdError};
pub use ops::{MaxOp, MinOp, ProdOp, Reduction, SumOp, VecOp};
pub use reduce::{horizontal_fold, reduce_all, reduce_prefix, reduce_with, scalar_reduce};
pub use vector::{Element, Lanes, SimdVector};

#[cfg(feature = "parallel")]
pub use reduce::par_reduce_with;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::arch::NativeF32;
    pub use crate::elementwise::{add, binary_map, mul, mul_unrolled};
    pub use crate::ops::{MaxOp, MinOp, ProdOp, Reduction, SumOp, VecOp};
    pub use crate::reduce::{reduce_all, reduce_prefix, reduce_with};
    pub use crate::vector::{
        Element, F32x4, F32x8, F64x4, I32x8, I64x4, Lanes, SimdVector, U8x32,
    };
    pub use crate::{DType, Result, SimdError};

    #[cfg(feature = "parallel")]
    pub use crate::reduce::par_reduce_with;
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
