//! One-shot entry points.
//!
//! Each call compiles a [`Plan`] and runs it once. The number of specs and the
//! size of the operand pack share the const parameter `N`, so passing two
//! specs with three operands does not compile. Build the plan yourself to
//! reuse it across calls.

use num_traits::{One, Zero};

use crate::error::Result;
use crate::operand::OperandMut;
use crate::pack::{Multiply, Operands};
use crate::plan::Plan;

/// Sum-of-products contraction.
///
/// # Example
/// ```
/// use einplan::{sum, TensorView};
///
/// let a = [1.0, 2.0, 3.0, 4.0];
/// let mut dot = 0.0f64;
/// sum("", ["i", "i"], &mut dot, &[TensorView::from_slice(&a), TensorView::from_slice(&a)])
///     .unwrap();
/// assert_eq!(dot, 30.0);
/// ```
pub fn sum<O, P, const N: usize>(
    output: &str,
    inputs: [&str; N],
    out: &mut O,
    operands: &P,
) -> Result<()>
where
    O: OperandMut + ?Sized,
    O::Elem: Zero + One,
    P: Operands<N> + Multiply<O::Elem>,
{
    Plan::new(output, inputs)?.sum(out, operands)
}

/// Contraction with a caller-supplied reduction at each output cell.
///
/// See [`Plan::transform`].
pub fn transform<O, P, F, const N: usize>(
    output: &str,
    inputs: [&str; N],
    out: &mut O,
    f: F,
    operands: &P,
) -> Result<()>
where
    O: OperandMut + ?Sized,
    P: Operands<N>,
    F: FnMut(&P) -> O::Elem,
{
    Plan::new(output, inputs)?.transform(out, f, operands)
}

/// Fallible form of [`transform`].
pub fn try_transform<O, P, F, const N: usize>(
    output: &str,
    inputs: [&str; N],
    out: &mut O,
    f: F,
    operands: &P,
) -> Result<()>
where
    O: OperandMut + ?Sized,
    P: Operands<N>,
    F: FnMut(&P) -> Result<O::Elem>,
{
    Plan::new(output, inputs)?.try_transform(out, f, operands)
}

/// Sum-of-products contraction from notation such as `"ij,j->i"`.
///
/// The number of inputs in the notation is checked against the size of the
/// pack before anything is evaluated.
///
/// # Example
/// ```
/// use einplan::{einsum, TensorBuf, TensorView};
///
/// let a = [1.0, 2.0, 3.0, 4.0];
/// let mut at = TensorBuf::<f64>::zeros(&[2, 2]);
/// einsum("ij->ji", &mut at, &[TensorView::new(&a, &[2, 2]).unwrap()]).unwrap();
/// assert_eq!(at.data(), &[1.0, 3.0, 2.0, 4.0]);
/// ```
pub fn einsum<O, P, const N: usize>(notation: &str, out: &mut O, operands: &P) -> Result<()>
where
    O: OperandMut + ?Sized,
    O::Elem: Zero + One,
    P: Operands<N> + Multiply<O::Elem>,
{
    Plan::<N>::parse(notation)?.sum(out, operands)
}
