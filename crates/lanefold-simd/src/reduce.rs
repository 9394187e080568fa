//! Horizontal reduction of a scalar buffer through fixed-width vectors
//!
//! The buffer is consumed in strides of `V::LANES`. The first full stride
//! seeds an accumulator, each further stride is combined into it, and a
//! trailing partial stride is combined only into the lanes it actually
//! populates. The accumulator is then folded to a scalar by combining lane
//! `i` into lane 0 for `i = 1..valid`, using the same vector operation.
//!
//! For an operation `⊕` the result is therefore
//! `((s0 ⊕ s1) ⊕ s2) ... ⊕ s(valid-1)`, where `s_j` is the strided partial
//! of lane `j`. Associative, commutative operations give the same value as a
//! sequential scalar loop (up to float rounding); other operations give a
//! deterministic value in that order.

use tracing::trace;

use crate::error::{Result, SimdError};
use crate::ops::{Reduction, VecOp};
use crate::vector::SimdVector;

/// Folds lanes `0..valid` of `acc` into a scalar
///
/// Lanes at or above `valid` never reach the result.
///
/// # Panics
///
/// Panics if `valid` is 0 or greater than `V::LANES`.
#[inline]
pub fn horizontal_fold<V, Op>(combine: &Op, acc: V, valid: usize) -> V::Scalar
where
    V: SimdVector,
    Op: VecOp<V> + ?Sized,
{
    assert!(
        (1..=V::LANES).contains(&valid),
        "horizontal_fold: valid lane count {valid} outside 1..={}",
        V::LANES
    );

    let lanes = acc;
    let mut acc = acc;
    for i in 1..valid {
        acc = combine.combine(acc, V::from_lane0(lanes.lane(i)));
    }
    acc.lane(0)
}

/// Reduces every element of `data`
///
/// Returns `None` for an empty buffer, since an arbitrary operation has no
/// known identity. Use [`reduce_with`] when one exists.
///
/// ```
/// use lanefold_simd::{reduce_all, vector::{F32x4, SimdVector}};
///
/// let sum = reduce_all::<F32x4, _>(&|a: F32x4, b| a.vadd(b), &[1.0, 2.0, 3.0, 4.0, 5.0]);
/// assert_eq!(sum, Some(15.0));
/// ```
pub fn reduce_all<V, Op>(combine: &Op, data: &[V::Scalar]) -> Option<V::Scalar>
where
    V: SimdVector,
    Op: VecOp<V> + ?Sized,
{
    let size = data.len();
    if size == 0 {
        return None;
    }

    let width = V::LANES;
    trace!(size, width, "reduce_all");

    if size < width {
        let acc = V::load_partial(data, size);
        return Some(horizontal_fold(combine, acc, size));
    }

    let full = size - size % width;
    let mut acc = V::load(data);
    let mut d = width;
    while d < full {
        acc = combine.combine(acc, V::load(&data[d..]));
        d += width;
    }

    let tail = size - d;
    if tail > 0 {
        let tail_vec = V::load_partial(&data[d..], tail);
        acc = acc.blend_prefix(combine.combine(acc, tail_vec), tail);
    }

    Some(horizontal_fold(combine, acc, width))
}

/// Reduces the first `size` elements of `data`
///
/// Fails with [`SimdError::SizeOutOfBounds`] before touching the buffer when
/// `size` exceeds its length.
pub fn reduce_prefix<V, Op>(
    combine: &Op,
    data: &[V::Scalar],
    size: usize,
) -> Result<Option<V::Scalar>>
where
    V: SimdVector,
    Op: VecOp<V> + ?Sized,
{
    if size > data.len() {
        return Err(SimdError::SizeOutOfBounds {
            size,
            len: data.len(),
        });
    }
    Ok(reduce_all::<V, Op>(combine, &data[..size]))
}

/// Reduces `data` with an operation that has an identity element
///
/// An empty buffer yields `op.identity()`.
pub fn reduce_with<V, R>(op: &R, data: &[V::Scalar]) -> V::Scalar
where
    V: SimdVector,
    R: Reduction<V>,
{
    reduce_all::<V, R>(op, data).unwrap_or_else(|| op.identity())
}

/// Sequential scalar fold, the reference every vector path is checked against
pub fn scalar_reduce<T, F>(f: F, data: &[T]) -> Option<T>
where
    T: Copy,
    F: Fn(T, T) -> T,
{
    let (&first, rest) = data.split_first()?;
    Some(rest.iter().fold(first, |acc, &x| f(acc, x)))
}

/// Reduces `data` on the rayon pool
///
/// The buffer is split into chunks of at least `chunk_len` elements, rounded
/// up to a multiple of `V::LANES`; each chunk is reduced with [`reduce_with`]
/// and the partials are combined in chunk order. A buffer no longer than
/// `chunk_len` is reduced as a single chunk.
#[cfg(feature = "parallel")]
pub fn par_reduce_with<V, R>(op: &R, data: &[V::Scalar], chunk_len: usize) -> Result<V::Scalar>
where
    V: SimdVector,
    R: Reduction<V> + Sync,
{
    use rayon::prelude::*;

    if chunk_len == 0 {
        return Err(SimdError::InvalidChunkLen(chunk_len));
    }

    let chunk_len = chunk_len
        .checked_next_multiple_of(V::LANES)
        .unwrap_or(usize::MAX);
    if data.len() <= chunk_len {
        return Ok(reduce_with::<V, R>(op, data));
    }

    tracing::debug!(len = data.len(), chunk_len, "par_reduce_with");

    let partials: Vec<V::Scalar> = data
        .par_chunks(chunk_len)
        .map(|chunk| reduce_with::<V, R>(op, chunk))
        .collect();

    Ok(partials
        .into_iter()
        .fold(op.identity(), |acc, x| op.combine_scalar(acc, x)))
}
