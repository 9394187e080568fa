//! Elementwise kernels over pairs of buffers

use tracing::trace;

use crate::error::{Result, SimdError};
use crate::ops::{ProdOp, SumOp, VecOp};
use crate::vector::SimdVector;

fn check_lengths<T>(operation: &'static str, a: &[T], b: &[T], out: &[T]) -> Result<()> {
    if a.len() != b.len() || a.len() != out.len() {
        return Err(SimdError::LengthMismatch {
            operation,
            lhs: a.len(),
            rhs: b.len(),
            output: out.len(),
        });
    }
    Ok(())
}

/// Computes `out[i] = combine(a[i], b[i])` one vector at a time
///
/// The trailing `len % V::LANES` elements go through a partial load and a
/// partial store, so nothing past the end of any buffer is read or written.
pub fn binary_map<V, Op>(combine: &Op, a: &[V::Scalar], b: &[V::Scalar], out: &mut [V::Scalar]) -> Result<()>
where
    V: SimdVector,
    Op: VecOp<V> + ?Sized,
{
    check_lengths("binary_map", a, b, out)?;

    let len = a.len();
    let width = V::LANES;
    let simd_len = len - (len % width);
    trace!(len, width, "binary_map");

    for i in (0..simd_len).step_by(width) {
        let r = combine.combine(V::load(&a[i..]), V::load(&b[i..]));
        r.store(&mut out[i..]);
    }

    let tail = len - simd_len;
    if tail > 0 {
        let va = V::load_partial(&a[simd_len..], tail);
        let vb = V::load_partial(&b[simd_len..], tail);
        combine.combine(va, vb).store_partial(&mut out[simd_len..], tail);
    }

    Ok(())
}

/// Same as [`binary_map`], processing two vectors per iteration
pub fn binary_map_unrolled<V, Op>(
    combine: &Op,
    a: &[V::Scalar],
    b: &[V::Scalar],
    out: &mut [V::Scalar],
) -> Result<()>
where
    V: SimdVector,
    Op: VecOp<V> + ?Sized,
{
    check_lengths("binary_map_unrolled", a, b, out)?;

    let len = a.len();
    let width = V::LANES;
    let step = 2 * width;
    let unrolled_len = len - (len % step);
    trace!(len, width, "binary_map_unrolled");

    for i in (0..unrolled_len).step_by(step) {
        let j = i + width;
        let r0 = combine.combine(V::load(&a[i..]), V::load(&b[i..]));
        let r1 = combine.combine(V::load(&a[j..]), V::load(&b[j..]));
        r0.store(&mut out[i..]);
        r1.store(&mut out[j..]);
    }

    // At most one full vector plus a partial one remain
    binary_map::<V, Op>(
        combine,
        &a[unrolled_len..],
        &b[unrolled_len..],
        &mut out[unrolled_len..],
    )
}

/// Elementwise sum of two buffers
pub fn add<V: SimdVector>(a: &[V::Scalar], b: &[V::Scalar], out: &mut [V::Scalar]) -> Result<()> {
    binary_map::<V, SumOp>(&SumOp, a, b, out)
}

/// Elementwise product of two buffers
pub fn mul<V: SimdVector>(a: &[V::Scalar], b: &[V::Scalar], out: &mut [V::Scalar]) -> Result<()> {
    binary_map::<V, ProdOp>(&ProdOp, a, b, out)
}

/// Elementwise product of two buffers, two vectors per iteration
pub fn mul_unrolled<V: SimdVector>(
    a: &[V::Scalar],
    b: &[V::Scalar],
    out: &mut [V::Scalar],
) -> Result<()> {
    binary_map_unrolled::<V, ProdOp>(&ProdOp, a, b, out)
}
