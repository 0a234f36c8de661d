//! Candle tensors as read-only operands.
//!
//! Candle tensors are immutable, so they only appear on the input side;
//! results are written into a [`TensorBuf`] and converted afterwards.

use candle_core::{DType, Device, Tensor, WithDType};

use super::view::TensorBuf;
use crate::error::{EinError, Result};
use crate::operand::{check_bounds, Operand, Shaped};

impl Shaped for Tensor {
    fn rank(&self) -> usize {
        self.dims().len()
    }

    fn extent(&self, dim: usize) -> Option<usize> {
        self.dims().get(dim).copied()
    }

    fn size(&self) -> Option<usize> {
        Some(self.elem_count())
    }
}

/// Elements are read as `f64` whatever the tensor's dtype.
impl Operand for Tensor {
    type Elem = f64;

    fn fix(&self, dim: usize, index: usize) -> Result<Self> {
        let extent = Shaped::extent(self, dim).ok_or(EinError::NoSuchDimension {
            dim,
            rank: Shaped::rank(self),
        })?;
        check_bounds(dim, index, extent)?;
        Ok(self.narrow(dim, index, 1)?.squeeze(dim)?)
    }

    fn value(&self) -> Result<f64> {
        let rank = Shaped::rank(self);
        if rank != 0 {
            return Err(EinError::NotScalar { rank });
        }
        Ok(self.to_dtype(DType::F64)?.to_scalar::<f64>()?)
    }
}

impl<T: WithDType> TensorBuf<T> {
    /// Copy into a candle tensor of the same shape.
    pub fn to_candle(&self, device: &Device) -> Result<Tensor> {
        Ok(Tensor::from_slice(self.data(), self.shape().to_vec(), device)?)
    }
}

impl TensorBuf<f64> {
    /// Copy a candle tensor of any dtype into an `f64` buffer.
    pub fn from_candle(tensor: &Tensor) -> Result<Self> {
        let data = tensor
            .to_dtype(DType::F64)?
            .flatten_all()?
            .to_vec1::<f64>()?;
        TensorBuf::from_vec(data, tensor.dims())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tensor_fix_and_value() {
        let t = Tensor::new(&[[1.0f32, 2.0], [3.0, 4.0]], &Device::Cpu).unwrap();
        assert_eq!(Shaped::rank(&t), 2);
        assert_eq!(Shaped::extent(&t, 1), Some(2));

        let col = t.fix(1, 1).unwrap();
        assert_eq!(col.dims(), &[2]);
        assert_eq!(col.fix(0, 1).unwrap().value().unwrap(), 4.0);

        assert!(matches!(
            t.fix(0, 2),
            Err(EinError::Bounds { dim: 0, index: 2, extent: 2 })
        ));
        assert!(matches!(t.value(), Err(EinError::NotScalar { rank: 2 })));
    }

    #[test]
    fn test_buf_round_trip_through_candle() {
        let buf = TensorBuf::from_vec(vec![1.0f64, -2.0, 0.5], &[3]).unwrap();
        let t = buf.to_candle(&Device::Cpu).unwrap();
        assert_eq!(t.dims(), &[3]);
        assert_eq!(TensorBuf::from_candle(&t).unwrap(), buf);
    }
}
