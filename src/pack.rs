//! Input packs: the `N` operands of one contraction.
//!
//! A pack is either an array `[I; N]` of one operand type or a tuple whose
//! slots may each be a different [`Operand`], so a strided view, a flat
//! sequence, a scalar and a mapped view can all feed the same call.

use num_traits::One;

use crate::error::{EinError, Result};
use crate::operand::{Operand, Shaped};

/// A fixed-size set of input operands, addressed by slot.
pub trait Operands<const N: usize>: Clone {
    /// Extent queries for the operand in slot `k`.
    fn slot(&self, k: usize) -> Option<&dyn Shaped>;

    /// Fix `dim` of the operand in slot `k` to `index`.
    fn fix_slot(&mut self, k: usize, dim: usize, index: usize) -> Result<()>;
}

/// Left-to-right product of the rank-0 operands of a pack, in `T`.
///
/// An empty pack multiplies to one.
pub trait Multiply<T> {
    fn product(&self) -> Result<T>;
}

fn no_slot(k: usize, n: usize) -> EinError {
    EinError::invalid(format!("no operand in slot {} of a pack of {}", k, n))
}

impl<I: Operand, const N: usize> Operands<N> for [I; N] {
    fn slot(&self, k: usize) -> Option<&dyn Shaped> {
        self.get(k).map(|operand| operand as &dyn Shaped)
    }

    fn fix_slot(&mut self, k: usize, dim: usize, index: usize) -> Result<()> {
        let operand = self.get_mut(k).ok_or_else(|| no_slot(k, N))?;
        *operand = operand.fix(dim, index)?;
        Ok(())
    }
}

impl<I, T, const N: usize> Multiply<T> for [I; N]
where
    I: Operand,
    I::Elem: Into<T>,
    T: One + Copy,
{
    fn product(&self) -> Result<T> {
        let mut acc = T::one();
        for operand in self {
            let factor: T = operand.value()?.into();
            acc = acc * factor;
        }
        Ok(acc)
    }
}

impl Operands<0> for () {
    fn slot(&self, _k: usize) -> Option<&dyn Shaped> {
        None
    }

    fn fix_slot(&mut self, k: usize, _dim: usize, _index: usize) -> Result<()> {
        Err(no_slot(k, 0))
    }
}

impl<T: One> Multiply<T> for () {
    fn product(&self) -> Result<T> {
        Ok(T::one())
    }
}

macro_rules! tuple_operands {
    ($n:literal; $($name:ident $idx:tt),+) => {
        impl<$($name: Operand),+> Operands<$n> for ($($name,)+) {
            fn slot(&self, k: usize) -> Option<&dyn Shaped> {
                match k {
                    $($idx => Some(&self.$idx as &dyn Shaped),)+
                    _ => None,
                }
            }

            fn fix_slot(&mut self, k: usize, dim: usize, index: usize) -> Result<()> {
                match k {
                    $($idx => self.$idx = self.$idx.fix(dim, index)?,)+
                    _ => return Err(no_slot(k, $n)),
                }
                Ok(())
            }
        }

        impl<T, $($name),+> Multiply<T> for ($($name,)+)
        where
            T: One + Copy,
            $($name: Operand, $name::Elem: Into<T>,)+
        {
            fn product(&self) -> Result<T> {
                let mut acc = T::one();
                $(
                    let factor: T = self.$idx.value()?.into();
                    acc = acc * factor;
                )+
                Ok(acc)
            }
        }
    };
}

tuple_operands!(1; A 0);
tuple_operands!(2; A 0, B 1);
tuple_operands!(3; A 0, B 1, C 2);
tuple_operands!(4; A 0, B 1, C 2, D 3);
tuple_operands!(5; A 0, B 1, C 2, D 3, E 4);
tuple_operands!(6; A 0, B 1, C 2, D 3, E 4, F 5);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::{Sequence, TensorView};

    #[test]
    fn test_array_pack() {
        let data = [1.0, 2.0, 3.0];
        let mut pack = [TensorView::from_slice(&data), TensorView::from_slice(&data)];
        assert_eq!(Operands::<2>::slot(&pack, 1).map(|s| s.rank()), Some(1));
        assert!(Operands::<2>::slot(&pack, 2).is_none());

        pack.fix_slot(0, 0, 1).unwrap();
        pack.fix_slot(1, 0, 2).unwrap();
        let p: f64 = pack.product().unwrap();
        assert_eq!(p, 6.0);

        assert!(pack.fix_slot(2, 0, 0).is_err());
    }

    #[test]
    fn test_tuple_pack_mixes_kinds() {
        let data = [1.0f32, 2.0, 3.0];
        let items = [5i32, 7];
        let mut pack = (TensorView::from_slice(&data), Sequence::new(&items), 0.5f64);
        assert_eq!(pack.slot(0).and_then(|s| s.extent(0)), Some(3));
        assert_eq!(pack.slot(1).and_then(|s| s.size()), Some(2));
        assert_eq!(pack.slot(2).map(|s| s.rank()), Some(0));
        assert!(pack.slot(3).is_none());

        pack.fix_slot(0, 0, 2).unwrap();
        pack.fix_slot(1, 0, 1).unwrap();
        let p: f64 = pack.product().unwrap();
        assert_eq!(p, 3.0 * 7.0 * 0.5);
    }

    #[test]
    fn test_product_needs_scalars() {
        let data = [1.0, 2.0];
        let pack = (TensorView::from_slice(&data),);
        let err = Multiply::<f64>::product(&pack).unwrap_err();
        assert!(matches!(err, EinError::NotScalar { rank: 1 }));
    }

    #[test]
    fn test_empty_pack_is_one() {
        let p: i64 = ().product().unwrap();
        assert_eq!(p, 1);
        assert!(Operands::<0>::slot(&(), 0).is_none());
    }
}
