//! Flat sequences that only know their length.

use crate::error::{EinError, Result};
use crate::operand::{check_bounds, Operand, Shaped};

/// A borrowed rank-1 sequence exposing an element count but no extents.
///
/// Bounds for labels on a `Sequence` are resolved through [`Shaped::size`].
/// Fixing its only dimension selects one element and yields a rank-0
/// sequence.
#[derive(Debug)]
pub struct Sequence<'a, T> {
    items: &'a [T],
    cursor: Option<usize>,
}

impl<'a, T> Sequence<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        Self {
            items,
            cursor: None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remaining elements: all of them, or the selected one.
    pub fn iter(&self) -> impl Iterator<Item = &'a T> {
        let items = match self.cursor {
            Some(i) => &self.items[i..=i],
            None => self.items,
        };
        items.iter()
    }
}

impl<T> Clone for Sequence<'_, T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items,
            cursor: self.cursor,
        }
    }
}

impl<T> Shaped for Sequence<'_, T> {
    fn rank(&self) -> usize {
        if self.cursor.is_some() {
            0
        } else {
            1
        }
    }

    fn extent(&self, _dim: usize) -> Option<usize> {
        None
    }

    fn size(&self) -> Option<usize> {
        Some(match self.cursor {
            Some(_) => 1,
            None => self.items.len(),
        })
    }
}

impl<T: Copy> Operand for Sequence<'_, T> {
    type Elem = T;

    fn fix(&self, dim: usize, index: usize) -> Result<Self> {
        if dim != 0 || self.cursor.is_some() {
            return Err(EinError::NoSuchDimension {
                dim,
                rank: self.rank(),
            });
        }
        check_bounds(dim, index, self.items.len())?;
        Ok(Self {
            items: self.items,
            cursor: Some(index),
        })
    }

    fn value(&self) -> Result<T> {
        match self.cursor {
            Some(i) => Ok(self.items[i]),
            None => Err(EinError::NotScalar { rank: 1 }),
        }
    }
}
