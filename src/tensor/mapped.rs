//! Lazily mapped operands.

use std::fmt;

use crate::error::Result;
use crate::operand::{Operand, Shaped};

/// An operand whose elements are passed through `f` when read.
///
/// Shape and narrowing are those of the wrapped operand; nothing is
/// computed until a rank-0 view is read.
///
/// # Example
/// ```
/// use einplan::{sum, Mapped, TensorView};
///
/// let a = [1.0, 2.0, 3.0, 4.0];
/// let mut b = vec![0.0f64; 4];
/// let cubes = Mapped::new(TensorView::from_slice(&a), |x: f64| x * x);
/// sum("i", ["i", "i"], &mut b, &(TensorView::from_slice(&a), cubes)).unwrap();
/// assert_eq!(b, vec![1.0, 8.0, 27.0, 64.0]);
/// ```
#[derive(Clone)]
pub struct Mapped<O, F> {
    inner: O,
    f: F,
}

impl<O, F> Mapped<O, F> {
    pub fn new(inner: O, f: F) -> Self {
        Self { inner, f }
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }
}

impl<O: fmt::Debug, F> fmt::Debug for Mapped<O, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapped").field("inner", &self.inner).finish()
    }
}

impl<O: Shaped, F> Shaped for Mapped<O, F> {
    fn rank(&self) -> usize {
        self.inner.rank()
    }

    fn extent(&self, dim: usize) -> Option<usize> {
        self.inner.extent(dim)
    }

    fn size(&self) -> Option<usize> {
        self.inner.size()
    }
}

impl<O, F, U> Operand for Mapped<O, F>
where
    O: Operand,
    F: Fn(O::Elem) -> U + Clone,
    U: Copy,
{
    type Elem = U;

    fn fix(&self, dim: usize, index: usize) -> Result<Self> {
        Ok(Self {
            inner: self.inner.fix(dim, index)?,
            f: self.f.clone(),
        })
    }

    fn value(&self) -> Result<U> {
        Ok((self.f)(self.inner.value()?))
    }
}
