//! Layout: shape, strides, and offset of a strided view.

use smallvec::SmallVec;

use crate::error::{EinError, Result};

/// Most operands have 4 or fewer dimensions, so we stack-allocate up to 4.
const STACK_DIMS: usize = 4;

/// Dimensions of a view.
pub type Shape = SmallVec<[usize; STACK_DIMS]>;

/// Element offsets between consecutive elements along each dimension.
pub type Strides = SmallVec<[usize; STACK_DIMS]>;

/// Address of element `[i0, .., in]` is `offset + i0 * strides[0] + .. + in * strides[n]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    shape: Shape,
    strides: Strides,
    offset: usize,
}

impl Layout {
    /// Row-major layout for `shape`.
    pub fn contiguous(shape: &[usize]) -> Self {
        let shape: Shape = shape.iter().copied().collect();
        let strides = Self::contiguous_strides(&shape);
        Self {
            shape,
            strides,
            offset: 0,
        }
    }

    fn contiguous_strides(shape: &[usize]) -> Strides {
        let mut strides: Strides = SmallVec::with_capacity(shape.len());
        let mut stride = 1;
        for &dim in shape.iter().rev() {
            strides.push(stride);
            stride *= dim;
        }
        strides.reverse();
        strides
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    #[inline]
    pub fn elem_count(&self) -> usize {
        self.shape.iter().product()
    }

    /// Highest storage offset this layout can address, plus one.
    ///
    /// Zero for layouts with no elements.
    pub fn span(&self) -> usize {
        if self.shape.contains(&0) {
            return 0;
        }
        self.offset
            + self
                .shape
                .iter()
                .zip(&self.strides)
                .map(|(&n, &s)| (n - 1) * s)
                .sum::<usize>()
            + 1
    }

    /// Drop `dim`, moving the offset to `index` along it.
    pub fn fix(&self, dim: usize, index: usize) -> Result<Self> {
        let extent = *self.shape.get(dim).ok_or(EinError::NoSuchDimension {
            dim,
            rank: self.ndim(),
        })?;
        if index >= extent {
            return Err(EinError::Bounds { dim, index, extent });
        }

        let mut shape = self.shape.clone();
        let mut strides = self.strides.clone();
        shape.remove(dim);
        let stride = strides.remove(dim);

        Ok(Self {
            shape,
            strides,
            offset: self.offset + index * stride,
        })
    }

    /// Storage offset of the element at `indices`.
    pub fn index(&self, indices: &[usize]) -> Result<usize> {
        if indices.len() != self.ndim() {
            return Err(EinError::ShapeMismatch {
                expected: format!("{} indices", self.ndim()),
                got: format!("{} indices", indices.len()),
            });
        }

        let mut linear = self.offset;
        for (dim, ((&i, &extent), &stride)) in indices
            .iter()
            .zip(&self.shape)
            .zip(&self.strides)
            .enumerate()
        {
            if i >= extent {
                return Err(EinError::Bounds {
                    dim,
                    index: i,
                    extent,
                });
            }
            linear += i * stride;
        }
        Ok(linear)
    }

    /// Swap two dimensions.
    pub fn transpose(&self, dim0: usize, dim1: usize) -> Result<Self> {
        let rank = self.ndim();
        for dim in [dim0, dim1] {
            if dim >= rank {
                return Err(EinError::NoSuchDimension { dim, rank });
            }
        }

        let mut shape = self.shape.clone();
        let mut strides = self.strides.clone();
        shape.swap(dim0, dim1);
        strides.swap(dim0, dim1);
        Ok(Self {
            shape,
            strides,
            offset: self.offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contiguous_strides() {
        let layout = Layout::contiguous(&[2, 3, 4]);
        assert_eq!(layout.strides(), &[12, 4, 1]);
        assert_eq!(layout.elem_count(), 24);
        assert_eq!(layout.span(), 24);
    }

    #[test]
    fn test_fix_moves_offset() {
        let layout = Layout::contiguous(&[2, 3]);
        let row = layout.fix(0, 1).unwrap();
        assert_eq!(row.shape(), &[3]);
        assert_eq!(row.offset(), 3);

        let col = layout.fix(1, 2).unwrap();
        assert_eq!(col.shape(), &[2]);
        assert_eq!(col.strides(), &[3]);
        assert_eq!(col.offset(), 2);

        assert!(matches!(
            layout.fix(0, 2),
            Err(EinError::Bounds { dim: 0, index: 2, extent: 2 })
        ));
        assert!(matches!(
            layout.fix(2, 0),
            Err(EinError::NoSuchDimension { dim: 2, rank: 2 })
        ));
    }

    #[test]
    fn test_transpose_index() {
        let layout = Layout::contiguous(&[2, 3]).transpose(0, 1).unwrap();
        assert_eq!(layout.shape(), &[3, 2]);
        assert_eq!(layout.index(&[2, 1]).unwrap(), 5);
        assert!(layout.index(&[3, 0]).is_err());
        assert!(layout.index(&[0]).is_err());
    }

    #[test]
    fn test_span_of_empty_layout() {
        assert_eq!(Layout::contiguous(&[0, 4]).span(), 0);
        assert_eq!(Layout::contiguous(&[]).span(), 1);
    }
}
