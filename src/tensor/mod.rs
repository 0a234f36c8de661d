//! Concrete operands: strided views, owned buffers, flat sequences, mapped
//! views, and candle tensors.

mod candle;
mod layout;
mod mapped;
mod sequence;
mod view;

pub use layout::{Layout, Shape, Strides};
pub use mapped::Mapped;
pub use sequence::Sequence;
pub use view::{TensorBuf, TensorView, TensorViewMut};
