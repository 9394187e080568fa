//! Combine operations over vectors
//!
//! Reductions and elementwise kernels take their operation as a [`VecOp`],
//! so a plain closure such as `|a: F32x8, b| a.vadd(b)` works wherever one of
//! the named operations below does. The named operations additionally know
//! their identity element, which is what an empty reduction returns.

use num_traits::{One, Zero};

use crate::vector::{Element, SimdVector};

/// A binary lane-wise operation on vectors
pub trait VecOp<V: SimdVector> {
    /// Combines two vectors lane by lane
    fn combine(&self, a: V, b: V) -> V;
}

impl<V, F> VecOp<V> for F
where
    V: SimdVector,
    F: Fn(V, V) -> V,
{
    #[inline]
    fn combine(&self, a: V, b: V) -> V {
        self(a, b)
    }
}

/// An associative, commutative operation with a known identity
pub trait Reduction<V: SimdVector>: VecOp<V> {
    /// Value `e` such that `combine(e, x) == x` in every lane
    fn identity(&self) -> V::Scalar;

    /// Scalar form of the operation
    fn combine_scalar(&self, a: V::Scalar, b: V::Scalar) -> V::Scalar;
}

/// Lane-wise sum
#[derive(Debug, Clone, Copy, Default)]
pub struct SumOp;

/// Lane-wise product
#[derive(Debug, Clone, Copy, Default)]
pub struct ProdOp;

/// Lane-wise maximum
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxOp;

/// Lane-wise minimum
#[derive(Debug, Clone, Copy, Default)]
pub struct MinOp;

impl<V: SimdVector> VecOp<V> for SumOp {
    #[inline]
    fn combine(&self, a: V, b: V) -> V {
        a.vadd(b)
    }
}

impl<V: SimdVector> Reduction<V> for SumOp {
    #[inline]
    fn identity(&self) -> V::Scalar {
        V::Scalar::zero()
    }

    #[inline]
    fn combine_scalar(&self, a: V::Scalar, b: V::Scalar) -> V::Scalar {
        a + b
    }
}

impl<V: SimdVector> VecOp<V> for ProdOp {
    #[inline]
    fn combine(&self, a: V, b: V) -> V {
        a.vmul(b)
    }
}

impl<V: SimdVector> Reduction<V> for ProdOp {
    #[inline]
    fn identity(&self) -> V::Scalar {
        V::Scalar::one()
    }

    #[inline]
    fn combine_scalar(&self, a: V::Scalar, b: V::Scalar) -> V::Scalar {
        a * b
    }
}

impl<V: SimdVector> VecOp<V> for MaxOp {
    #[inline]
    fn combine(&self, a: V, b: V) -> V {
        a.vmax(b)
    }
}

impl<V: SimdVector> Reduction<V> for MaxOp {
    #[inline]
    fn identity(&self) -> V::Scalar {
        V::Scalar::lowest()
    }

    #[inline]
    fn combine_scalar(&self, a: V::Scalar, b: V::Scalar) -> V::Scalar {
        a.max_of(b)
    }
}

impl<V: SimdVector> VecOp<V> for MinOp {
    #[inline]
    fn combine(&self, a: V, b: V) -> V {
        a.vmin(b)
    }
}

impl<V: SimdVector> Reduction<V> for MinOp {
    #[inline]
    fn identity(&self) -> V::Scalar {
        V::Scalar::highest()
    }

    #[inline]
    fn combine_scalar(&self, a: V::Scalar, b: V::Scalar) -> V::Scalar {
        a.min_of(b)
    }
}
