//! Fixed-operator engine: sum of products.

use num_traits::{One, Zero};

use super::{run, Level, Plan};
use crate::error::Result;
use crate::operand::OperandMut;
use crate::pack::{Multiply, Operands};

impl<const N: usize> Plan<N> {
    /// Evaluate the plan as a sum of products, writing every output cell.
    ///
    /// Labels missing from the output are summed over. Accumulation happens
    /// in the output's element type, in loop order: identical operands give
    /// bit-identical results. Integer accumulators follow Rust's arithmetic,
    /// so overflow panics in debug builds and wraps in release builds; pick
    /// an output type wide enough for the sums, e.g. `i64` for `i32` inputs.
    ///
    /// `inputs` is an array of one operand type or a tuple of mixed ones.
    ///
    /// # Example
    /// ```
    /// use einplan::{Plan, Sequence, TensorView};
    ///
    /// let a = [1.0, 2.0, 3.0, 4.0];
    /// let b = [3.0, -2.0];
    /// let mut c = vec![0.0f64; 2];
    /// Plan::new("i", ["ij", "j"])
    ///     .unwrap()
    ///     .sum(&mut c, &(TensorView::new(&a, &[2, 2]).unwrap(), Sequence::new(&b)))
    ///     .unwrap();
    /// assert_eq!(c, vec![-1.0, 1.0]);
    /// ```
    pub fn sum<O, P>(&self, out: &mut O, inputs: &P) -> Result<()>
    where
        O: OperandMut + ?Sized,
        O::Elem: Zero + One,
        P: Operands<N> + Multiply<O::Elem>,
    {
        run(self, out, inputs, reduce::<O::Elem, P, N>)
    }
}

/// Sum over the remaining reduction levels; once none are left every input
/// is a scalar and the term is their product.
fn reduce<T, P, const N: usize>(levels: &[Level], bounds: &[usize], inputs: &P) -> Result<T>
where
    T: Zero + Copy,
    P: Operands<N> + Multiply<T>,
{
    let Some((level, rest)) = levels.split_first() else {
        return inputs.product();
    };

    let mut acc = T::zero();
    for i in 0..bounds[0] {
        let fixed = level.fix_inputs::<N, P>(inputs, i)?;
        acc = acc + reduce::<T, P, N>(rest, &bounds[1..], &fixed)?;
    }
    Ok(acc)
}
