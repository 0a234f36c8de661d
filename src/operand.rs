//! Capability contract for array-like operands.
//!
//! The engine never names a concrete container. Inputs are read through
//! [`Operand`], which narrows a view one dimension at a time, and the output
//! is written through [`OperandMut`], which stores a value at a multi-index.
//! Both share [`Shaped`] for extent queries.

use crate::error::{EinError, Result};

/// Extent queries shared by readable and writable operands.
pub trait Shaped {
    /// Number of free dimensions.
    fn rank(&self) -> usize;

    /// Size along `dim`, or `None` if the operand exposes no per-dimension
    /// extents.
    fn extent(&self, dim: usize) -> Option<usize>;

    /// Element count, used for flat sequences that expose no extents.
    fn size(&self) -> Option<usize> {
        None
    }
}

/// A readable array-like operand.
///
/// Views are expected to be cheap to clone: the engine clones an input
/// whenever it is broadcast along a dimension it does not carry.
pub trait Operand: Shaped + Clone {
    /// Element type yielded by rank-0 views.
    type Elem: Copy;

    /// Fix `dim` to `index`, returning a view of rank `self.rank() - 1`.
    fn fix(&self, dim: usize, index: usize) -> Result<Self>;

    /// Read the element of a rank-0 view.
    fn value(&self) -> Result<Self::Elem>;

    /// Read the element at a full multi-index.
    fn get(&self, index: &[usize]) -> Result<Self::Elem> {
        let rank = self.rank();
        if index.len() > rank {
            return Err(EinError::NoSuchDimension { dim: rank, rank });
        }
        if index.len() < rank {
            return Err(EinError::NotScalar {
                rank: rank - index.len(),
            });
        }
        index
            .iter()
            .try_fold(self.clone(), |view, &i| view.fix(0, i))?
            .value()
    }
}

/// A writable output operand.
pub trait OperandMut: Shaped {
    /// Element type stored in each cell.
    type Elem: Copy;

    /// Store `value` at the cell addressed by `index` (one entry per
    /// dimension).
    fn assign(&mut self, index: &[usize], value: Self::Elem) -> Result<()>;
}

/// Resolve the size of `dim`, falling back to `size()` for rank-1 operands.
pub(crate) fn dim_extent<S: Shaped + ?Sized>(operand: &S, dim: usize) -> Option<usize> {
    operand
        .extent(dim)
        .or_else(|| if operand.rank() == 1 && dim == 0 { operand.size() } else { None })
}

/// Check that an index into a dimension of known extent is in range.
pub(crate) fn check_bounds(dim: usize, index: usize, extent: usize) -> Result<()> {
    if index < extent {
        Ok(())
    } else {
        Err(EinError::Bounds { dim, index, extent })
    }
}

macro_rules! scalar_operand {
    ($($t:ty),*) => {$(
        impl Shaped for $t {
            fn rank(&self) -> usize {
                0
            }

            fn extent(&self, _dim: usize) -> Option<usize> {
                None
            }
        }

        impl Operand for $t {
            type Elem = $t;

            fn fix(&self, dim: usize, _index: usize) -> Result<Self> {
                Err(EinError::NoSuchDimension { dim, rank: 0 })
            }

            fn value(&self) -> Result<$t> {
                Ok(*self)
            }
        }

        impl OperandMut for $t {
            type Elem = $t;

            fn assign(&mut self, index: &[usize], value: $t) -> Result<()> {
                if !index.is_empty() {
                    return Err(EinError::NoSuchDimension { dim: 0, rank: 0 });
                }
                *self = value;
                Ok(())
            }
        }
    )*};
}

scalar_operand!(f32, f64, i32, i64, u32, u64, usize);

impl<T> Shaped for [T] {
    fn rank(&self) -> usize {
        1
    }

    fn extent(&self, dim: usize) -> Option<usize> {
        (dim == 0).then_some(self.len())
    }

    fn size(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl<T: Copy> OperandMut for [T] {
    type Elem = T;

    fn assign(&mut self, index: &[usize], value: T) -> Result<()> {
        let &[i] = index else {
            return Err(EinError::NoSuchDimension {
                dim: index.len().saturating_sub(1),
                rank: 1,
            });
        };
        let extent = self.len();
        let cell = self
            .get_mut(i)
            .ok_or(EinError::Bounds { dim: 0, index: i, extent })?;
        *cell = value;
        Ok(())
    }
}

impl<T> Shaped for Vec<T> {
    fn rank(&self) -> usize {
        1
    }

    fn extent(&self, dim: usize) -> Option<usize> {
        self.as_slice().extent(dim)
    }

    fn size(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl<T: Copy> OperandMut for Vec<T> {
    type Elem = T;

    fn assign(&mut self, index: &[usize], value: T) -> Result<()> {
        self.as_mut_slice().assign(index, value)
    }
}
