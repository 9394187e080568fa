//! Fixed-width vector abstraction
//!
//! [`SimdVector`] is the only thing the reducer and the elementwise kernels
//! know about a vector register: a width, full and partial loads and stores,
//! single-lane access and a handful of lane-wise operations. [`Lanes`] is the
//! portable implementation backed by a plain array, which the compiler is
//! free to auto-vectorize. Native register wrappers live in [`crate::arch`].

use std::fmt::Debug;

use num_traits::{One, Zero};

use crate::dtype::DType;

/// Scalar type that can occupy a vector lane
pub trait Element:
    Copy
    + Send
    + Sync
    + Debug
    + PartialOrd
    + Zero
    + One
    + std::ops::Add<Output = Self>
    + std::ops::Mul<Output = Self>
    + 'static
{
    /// Runtime tag for this type
    const DTYPE: DType;

    /// Smallest value of the type (`-inf` for floats)
    fn lowest() -> Self;

    /// Largest value of the type (`+inf` for floats)
    fn highest() -> Self;

    /// Larger of two values
    #[inline]
    fn max_of(self, other: Self) -> Self {
        if other > self {
            other
        } else {
            self
        }
    }

    /// Smaller of two values
    #[inline]
    fn min_of(self, other: Self) -> Self {
        if other < self {
            other
        } else {
            self
        }
    }
}

macro_rules! impl_element {
    ($ty:ty, $dtype:expr, $lowest:expr, $highest:expr) => {
        impl Element for $ty {
            const DTYPE: DType = $dtype;

            #[inline]
            fn lowest() -> Self {
                $lowest
            }

            #[inline]
            fn highest() -> Self {
                $highest
            }
        }
    };
}

impl_element!(f32, DType::F32, f32::NEG_INFINITY, f32::INFINITY);
impl_element!(f64, DType::F64, f64::NEG_INFINITY, f64::INFINITY);
impl_element!(i8, DType::I8, i8::MIN, i8::MAX);
impl_element!(i16, DType::I16, i16::MIN, i16::MAX);
impl_element!(i32, DType::I32, i32::MIN, i32::MAX);
impl_element!(i64, DType::I64, i64::MIN, i64::MAX);
impl_element!(u8, DType::U8, u8::MIN, u8::MAX);
impl_element!(u16, DType::U16, u16::MIN, u16::MAX);
impl_element!(u32, DType::U32, u32::MIN, u32::MAX);
impl_element!(u64, DType::U64, u64::MIN, u64::MAX);

/// A vector of `LANES` scalars supporting lane-wise arithmetic
///
/// Loads and stores index the given slice directly, so a slice shorter than
/// the requested count panics instead of reading out of bounds.
pub trait SimdVector: Copy + Send + Sync + Debug {
    /// Lane type
    type Scalar: Element;

    /// Number of lanes
    const LANES: usize;

    /// Broadcasts a scalar to every lane
    fn splat(value: Self::Scalar) -> Self;

    /// All lanes zero
    #[inline]
    fn zero() -> Self {
        Self::splat(Self::Scalar::zero())
    }

    /// Loads the first `LANES` elements of `src`
    fn load(src: &[Self::Scalar]) -> Self;

    /// Loads the first `count` elements of `src`; lanes `count..LANES` are zero
    fn load_partial(src: &[Self::Scalar], count: usize) -> Self;

    /// Stores all lanes into the first `LANES` elements of `dst`
    fn store(self, dst: &mut [Self::Scalar]);

    /// Stores lanes `0..count` into `dst`
    fn store_partial(self, dst: &mut [Self::Scalar], count: usize);

    /// Reads a single lane
    fn lane(self, index: usize) -> Self::Scalar;

    /// Vector with `value` in lane 0 and zero elsewhere
    #[inline]
    fn from_lane0(value: Self::Scalar) -> Self {
        Self::load_partial(&[value], 1)
    }

    /// Lanes `0..count` from `other`, the remaining lanes from `self`
    fn blend_prefix(self, other: Self, count: usize) -> Self;

    /// Lane-wise addition
    fn vadd(self, other: Self) -> Self;

    /// Lane-wise multiplication
    fn vmul(self, other: Self) -> Self;

    /// Lane-wise maximum
    fn vmax(self, other: Self) -> Self;

    /// Lane-wise minimum
    fn vmin(self, other: Self) -> Self;
}

/// Portable vector of `W` lanes backed by an array
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Lanes<T, const W: usize>(pub [T; W]);

impl<T: Element, const W: usize> Lanes<T, W> {
    /// Wraps an array
    #[inline]
    pub const fn new(lanes: [T; W]) -> Self {
        Self(lanes)
    }

    /// Copies the lanes out
    #[inline]
    pub fn to_array(self) -> [T; W] {
        self.0
    }

    #[inline]
    fn zip_with(self, other: Self, f: impl Fn(T, T) -> T) -> Self {
        let mut out = self.0;
        for (o, b) in out.iter_mut().zip(other.0) {
            *o = f(*o, b);
        }
        Self(out)
    }
}

impl<T: Element, const W: usize> SimdVector for Lanes<T, W> {
    type Scalar = T;

    const LANES: usize = W;

    #[inline]
    fn splat(value: T) -> Self {
        Self([value; W])
    }

    #[inline]
    fn load(src: &[T]) -> Self {
        let mut lanes = [T::zero(); W];
        lanes.copy_from_slice(&src[..W]);
        Self(lanes)
    }

    #[inline]
    fn load_partial(src: &[T], count: usize) -> Self {
        let count = count.min(W);
        let mut lanes = [T::zero(); W];
        lanes[..count].copy_from_slice(&src[..count]);
        Self(lanes)
    }

    #[inline]
    fn store(self, dst: &mut [T]) {
        dst[..W].copy_from_slice(&self.0);
    }

    #[inline]
    fn store_partial(self, dst: &mut [T], count: usize) {
        let count = count.min(W);
        dst[..count].copy_from_slice(&self.0[..count]);
    }

    #[inline]
    fn lane(self, index: usize) -> T {
        self.0[index]
    }

    #[inline]
    fn blend_prefix(self, other: Self, count: usize) -> Self {
        let count = count.min(W);
        let mut lanes = self.0;
        lanes[..count].copy_from_slice(&other.0[..count]);
        Self(lanes)
    }

    #[inline]
    fn vadd(self, other: Self) -> Self {
        self.zip_with(other, |a, b| a + b)
    }

    #[inline]
    fn vmul(self, other: Self) -> Self {
        self.zip_with(other, |a, b| a * b)
    }

    #[inline]
    fn vmax(self, other: Self) -> Self {
        self.zip_with(other, T::max_of)
    }

    #[inline]
    fn vmin(self, other: Self) -> Self {
        self.zip_with(other, T::min_of)
    }
}

impl<T: Element, const W: usize> std::ops::Add for Lanes<T, W> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.vadd(rhs)
    }
}

impl<T: Element, const W: usize> std::ops::Mul for Lanes<T, W> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.vmul(rhs)
    }
}

impl<T: Element, const W: usize> From<[T; W]> for Lanes<T, W> {
    fn from(lanes: [T; W]) -> Self {
        Self(lanes)
    }
}

// 256-bit register shapes
/// 8 lanes of `f32`
pub type F32x8 = Lanes<f32, 8>;
/// 4 lanes of `f64`
pub type F64x4 = Lanes<f64, 4>;
/// 32 lanes of `i8`
pub type I8x32 = Lanes<i8, 32>;
/// 16 lanes of `i16`
pub type I16x16 = Lanes<i16, 16>;
/// 8 lanes of `i32`
pub type I32x8 = Lanes<i32, 8>;
/// 4 lanes of `i64`
pub type I64x4 = Lanes<i64, 4>;
/// 32 lanes of `u8`
pub type U8x32 = Lanes<u8, 32>;
/// 16 lanes of `u16`
pub type U16x16 = Lanes<u16, 16>;
/// 8 lanes of `u32`
pub type U32x8 = Lanes<u32, 8>;
/// 4 lanes of `u64`
pub type U64x4 = Lanes<u64, 4>;

/// Narrow shape used where a small width keeps examples readable
/// 4 lanes of `f32`
pub type F32x4 = Lanes<f32, 4>;
