//! Strided views over borrowed storage, and an owned buffer to write into.

use std::fmt;

use num_traits::Zero;

use super::layout::Layout;
use crate::error::{EinError, Result};
use crate::operand::{Operand, OperandMut, Shaped};

fn check_storage(layout: &Layout, len: usize) -> Result<()> {
    if layout.span() > len {
        return Err(EinError::ShapeMismatch {
            expected: format!("storage of at least {} elements", layout.span()),
            got: format!("{} elements", len),
        });
    }
    Ok(())
}

fn check_count(shape: &[usize], len: usize) -> Result<()> {
    let count: usize = shape.iter().product();
    if count != len {
        return Err(EinError::ShapeMismatch {
            expected: format!("{} elements for shape {:?}", count, shape),
            got: format!("{} elements", len),
        });
    }
    Ok(())
}

/// Element offsets of `layout` in row-major order.
fn offsets(layout: &Layout) -> impl Iterator<Item = usize> + '_ {
    (0..layout.elem_count()).map(move |mut flat| {
        let mut offset = layout.offset();
        for (&n, &stride) in layout.shape().iter().zip(layout.strides()).rev() {
            offset += (flat % n) * stride;
            flat /= n;
        }
        offset
    })
}

/// A read-only strided view.
///
/// Fixing a dimension produces another `TensorView` over the same storage,
/// so descending through a contraction never copies elements.
pub struct TensorView<'a, T> {
    data: &'a [T],
    layout: Layout,
}

impl<'a, T> TensorView<'a, T> {
    /// View `data` as a row-major array of the given shape.
    ///
    /// # Example
    /// ```
    /// use einplan::TensorView;
    ///
    /// let data = [1.0, 2.0, 3.0, 4.0];
    /// let a = TensorView::new(&data, &[2, 2]).unwrap();
    /// assert_eq!(a.shape(), &[2, 2]);
    /// ```
    pub fn new(data: &'a [T], shape: &[usize]) -> Result<Self> {
        check_count(shape, data.len())?;
        Ok(Self {
            data,
            layout: Layout::contiguous(shape),
        })
    }

    /// View a slice as a rank-1 array.
    pub fn from_slice(data: &'a [T]) -> Self {
        Self {
            data,
            layout: Layout::contiguous(&[data.len()]),
        }
    }

    /// View a single value as a rank-0 array.
    pub fn scalar(value: &'a T) -> Self {
        Self {
            data: std::slice::from_ref(value),
            layout: Layout::contiguous(&[]),
        }
    }

    /// View `data` through an arbitrary layout.
    pub fn with_layout(data: &'a [T], layout: Layout) -> Result<Self> {
        check_storage(&layout, data.len())?;
        Ok(Self { data, layout })
    }

    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Swap two dimensions without touching storage.
    pub fn transpose(&self, dim0: usize, dim1: usize) -> Result<Self> {
        Ok(Self {
            data: self.data,
            layout: self.layout.transpose(dim0, dim1)?,
        })
    }

    /// Transpose of a rank-2 view.
    pub fn t(&self) -> Result<Self> {
        self.transpose(0, 1)
    }

    /// Elements in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &'a T> + '_ {
        let data = self.data;
        offsets(&self.layout).map(move |offset| &data[offset])
    }
}

impl<T: Copy> TensorView<'_, T> {
    /// Copy the elements out in row-major order.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().copied().collect()
    }
}

impl<T> Clone for TensorView<'_, T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data,
            layout: self.layout.clone(),
        }
    }
}

impl<T> fmt::Debug for TensorView<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TensorView")
            .field("shape", &self.layout.shape())
            .field("strides", &self.layout.strides())
            .field("offset", &self.layout.offset())
            .finish()
    }
}

impl<T> Shaped for TensorView<'_, T> {
    fn rank(&self) -> usize {
        self.layout.ndim()
    }

    fn extent(&self, dim: usize) -> Option<usize> {
        self.layout.shape().get(dim).copied()
    }

    fn size(&self) -> Option<usize> {
        Some(self.layout.elem_count())
    }
}

impl<T: Copy> Operand for TensorView<'_, T> {
    type Elem = T;

    fn fix(&self, dim: usize, index: usize) -> Result<Self> {
        Ok(Self {
            data: self.data,
            layout: self.layout.fix(dim, index)?,
        })
    }

    fn value(&self) -> Result<T> {
        if self.rank() != 0 {
            return Err(EinError::NotScalar { rank: self.rank() });
        }
        let offset = self.layout.offset();
        self.data.get(offset).copied().ok_or(EinError::Bounds {
            dim: 0,
            index: offset,
            extent: self.data.len(),
        })
    }

    fn get(&self, index: &[usize]) -> Result<T> {
        let offset = self.layout.index(index)?;
        self.data.get(offset).copied().ok_or(EinError::Bounds {
            dim: 0,
            index: offset,
            extent: self.data.len(),
        })
    }
}

/// A writable strided view.
pub struct TensorViewMut<'a, T> {
    data: &'a mut [T],
    layout: Layout,
}

impl<'a, T> TensorViewMut<'a, T> {
    /// View `data` as a writable row-major array of the given shape.
    pub fn new(data: &'a mut [T], shape: &[usize]) -> Result<Self> {
        check_count(shape, data.len())?;
        Ok(Self {
            data,
            layout: Layout::contiguous(shape),
        })
    }

    /// View `data` through an arbitrary layout.
    pub fn with_layout(data: &'a mut [T], layout: Layout) -> Result<Self> {
        check_storage(&layout, data.len())?;
        Ok(Self { data, layout })
    }

    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    /// Read-only view of the same cells.
    pub fn view(&self) -> TensorView<'_, T> {
        TensorView {
            data: &*self.data,
            layout: self.layout.clone(),
        }
    }
}

impl<T> Shaped for TensorViewMut<'_, T> {
    fn rank(&self) -> usize {
        self.layout.ndim()
    }

    fn extent(&self, dim: usize) -> Option<usize> {
        self.layout.shape().get(dim).copied()
    }

    fn size(&self) -> Option<usize> {
        Some(self.layout.elem_count())
    }
}

impl<T: Copy> OperandMut for TensorViewMut<'_, T> {
    type Elem = T;

    fn assign(&mut self, index: &[usize], value: T) -> Result<()> {
        let offset = self.layout.index(index)?;
        let extent = self.data.len();
        let cell = self.data.get_mut(offset).ok_or(EinError::Bounds {
            dim: 0,
            index: offset,
            extent,
        })?;
        *cell = value;
        Ok(())
    }
}

/// An owned, row-major array used as an evaluation target.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorBuf<T> {
    data: Vec<T>,
    layout: Layout,
}

impl<T> TensorBuf<T> {
    /// Wrap `data` as a row-major array of the given shape.
    pub fn from_vec(data: Vec<T>, shape: &[usize]) -> Result<Self> {
        check_count(shape, data.len())?;
        Ok(Self {
            data,
            layout: Layout::contiguous(shape),
        })
    }

    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn view(&self) -> TensorView<'_, T> {
        TensorView {
            data: &self.data,
            layout: self.layout.clone(),
        }
    }

    pub fn view_mut(&mut self) -> TensorViewMut<'_, T> {
        TensorViewMut {
            data: &mut self.data,
            layout: self.layout.clone(),
        }
    }
}

impl<T: Zero + Clone> TensorBuf<T> {
    /// A zero-filled array of the given shape.
    pub fn zeros(shape: &[usize]) -> Self {
        let layout = Layout::contiguous(shape);
        Self {
            data: vec![T::zero(); layout.elem_count()],
            layout,
        }
    }
}

impl<T> Shaped for TensorBuf<T> {
    fn rank(&self) -> usize {
        self.layout.ndim()
    }

    fn extent(&self, dim: usize) -> Option<usize> {
        self.layout.shape().get(dim).copied()
    }

    fn size(&self) -> Option<usize> {
        Some(self.data.len())
    }
}

impl<T: Copy> OperandMut for TensorBuf<T> {
    type Elem = T;

    fn assign(&mut self, index: &[usize], value: T) -> Result<()> {
        self.view_mut().assign(index, value)
    }
}
