//! einplan: Einstein summation as a compiled loop nest.
//!
//! A contraction is described by one index [`Spec`] per operand, e.g.
//! `"i" <- "ij", "j"` for a matrix-vector product. A [`Plan`] turns the specs
//! into a loop nest once; it can then be run against any operands that
//! implement [`Operand`] (inputs) and [`OperandMut`] (output). The inputs of
//! one call form an [`Operands`] pack: an array of one operand type, or a
//! tuple mixing views, sequences, scalars and [`Mapped`] views.
//!
//! Two engines share the nest:
//!
//! - [`Plan::sum`] computes the classic sum of products.
//! - [`Plan::transform`] hands the sub-views left at each output cell to a
//!   caller-supplied reduction, so any fold (max, norm, product) can stand in
//!   for the sum.
//!
//! ```
//! use einplan::{einsum, TensorBuf, TensorView};
//!
//! let a = [1.0, 2.0, 3.0, 4.0];
//! let b = [3.0, -2.0];
//! let mut c = TensorBuf::<f64>::zeros(&[2]);
//! einsum(
//!     "ij,j->i",
//!     &mut c,
//!     &[TensorView::new(&a, &[2, 2]).unwrap(), TensorView::new(&b, &[2]).unwrap()],
//! )
//! .unwrap();
//! assert_eq!(c.data(), &[-1.0, 1.0]);
//! ```

pub mod error;
pub mod eval;
pub mod operand;
pub mod pack;
pub mod plan;
pub mod spec;
pub mod syntax;
pub mod tensor;

pub use error::{EinError, Result};
pub use eval::{einsum, sum, transform, try_transform};
pub use operand::{Operand, OperandMut, Shaped};
pub use pack::{Multiply, Operands};
pub use plan::Plan;
pub use spec::{representative, Label, Spec};
pub use syntax::{parse_notation, Notation, Token};
pub use tensor::{Layout, Mapped, Sequence, TensorBuf, TensorView, TensorViewMut};
