//! Generalized-transform engine: a caller-supplied reduction at each cell.

use super::{run, Level, Plan};
use crate::error::Result;
use crate::operand::OperandMut;
use crate::pack::Operands;

impl<const N: usize> Plan<N> {
    /// Evaluate the plan with `f` as the terminal reduction.
    ///
    /// Output labels are walked exactly as in [`Plan::sum`]. At each output
    /// cell `f` receives the input pack narrowed by the output labels only,
    /// so labels absent from the output are still free dimensions of the
    /// views it gets; its return value is stored in the cell.
    ///
    /// # Example
    /// ```
    /// use einplan::{Plan, TensorView};
    ///
    /// let a = [1.0, 2.0, 3.0, 4.0];
    /// let mut norm = 0.0f64;
    /// Plan::new("", ["i"])
    ///     .unwrap()
    ///     .transform(
    ///         &mut norm,
    ///         |[x]: &[TensorView<f64>; 1]| x.iter().map(|v| v * v).sum::<f64>().sqrt(),
    ///         &[TensorView::from_slice(&a)],
    ///     )
    ///     .unwrap();
    /// assert_eq!(norm, 30f64.sqrt());
    /// ```
    pub fn transform<O, P, F>(&self, out: &mut O, mut f: F, inputs: &P) -> Result<()>
    where
        O: OperandMut + ?Sized,
        P: Operands<N>,
        F: FnMut(&P) -> O::Elem,
    {
        self.try_transform(out, |args: &P| Ok(f(args)), inputs)
    }

    /// Like [`Plan::transform`], for reductions that can fail.
    ///
    /// The first error aborts evaluation; cells written before it keep their
    /// new values.
    pub fn try_transform<O, P, F>(&self, out: &mut O, mut f: F, inputs: &P) -> Result<()>
    where
        O: OperandMut + ?Sized,
        P: Operands<N>,
        F: FnMut(&P) -> Result<O::Elem>,
    {
        run(self, out, inputs, |_: &[Level], _: &[usize], rest: &P| f(rest))
    }
}
