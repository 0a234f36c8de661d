//! Execution plans.
//!
//! A [`Plan`] is compiled once from the output spec and one spec per input.
//! Compilation walks the label algebra and records the loop nest: first one
//! level per output label, in output order, then one level per remaining
//! input label, each chosen as the representative of the specs left over.
//! Every level knows which output dimensions it drives and, per input, the
//! sequence of axes to narrow at the loop index (more than one for a
//! diagonal).
//!
//! Executing a plan binds each level's bound against the actual operands,
//! validating ranks and extents before any output cell is touched, and then
//! runs the nest recursively. The two engines share the descent over output
//! levels and differ only in what happens once the output is drained:
//! [`Plan::sum`] keeps descending and accumulates products,
//! [`Plan::transform`] hands the remaining sub-views to a caller function.

mod sum;
mod transform;

use std::fmt;

use log::{debug, trace};
use smallvec::{smallvec, SmallVec};

use crate::error::{EinError, Result};
use crate::operand::{dim_extent, OperandMut, Shaped};
use crate::pack::Operands;
use crate::spec::{representative, Label, LabelMap, Spec};
use crate::syntax::parse_notation;

/// Whether a level walks an output dimension or reduces over an input one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LevelKind {
    Output,
    Reduce,
}

/// One loop of the nest.
#[derive(Debug, Clone)]
pub(crate) struct Level {
    label: Label,
    kind: LevelKind,
    /// Dimensions of the output (in its full numbering) set to the loop index
    out_dims: SmallVec<[usize; 2]>,
    /// Per input, the axes to fix in turn at the loop index
    in_axes: Vec<SmallVec<[usize; 2]>>,
}

impl Level {
    /// Narrow every input that carries this level's label; pass the rest
    /// through unchanged.
    fn fix_inputs<const N: usize, P>(&self, inputs: &P, index: usize) -> Result<P>
    where
        P: Operands<N>,
    {
        let mut fixed = inputs.clone();
        for (k, axes) in self.in_axes.iter().enumerate() {
            for &axis in axes {
                fixed.fix_slot(k, axis, index)?;
            }
        }
        Ok(fixed)
    }
}

/// Which operand an extent was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Output,
    Input(usize),
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Output => write!(f, "the output"),
            Slot::Input(k) => write!(f, "input {}", k),
        }
    }
}

/// A compiled contraction over `N` inputs.
///
/// # Example
/// ```
/// use einplan::{Plan, TensorView};
///
/// let a = [1.0, 2.0, 3.0, 4.0];
/// let b = [3.0, -2.0];
/// let plan = Plan::new("i", ["ij", "j"]).unwrap();
///
/// let mut c = vec![0.0; 2];
/// plan.sum(
///     &mut c,
///     &[TensorView::new(&a, &[2, 2]).unwrap(), TensorView::from_slice(&b)],
/// )
/// .unwrap();
/// assert_eq!(c, vec![-1.0, 1.0]);
/// ```
#[derive(Debug, Clone)]
pub struct Plan<const N: usize> {
    output: Spec,
    inputs: [Spec; N],
    levels: Vec<Level>,
    /// Number of leading output levels in `levels`
    split: usize,
}

impl<const N: usize> Plan<N> {
    /// Compile a plan from spec strings, e.g. `Plan::new("i", ["ij", "j"])`.
    pub fn new(output: &str, inputs: [&str; N]) -> Result<Self> {
        let output = Spec::parse(output)?;
        let mut specs = Vec::with_capacity(N);
        for input in inputs {
            specs.push(Spec::parse(input)?);
        }
        Ok(Self::from_specs(output, into_array(specs)?))
    }

    /// Compile a plan from notation, e.g. `Plan::<2>::parse("ij,j->i")`.
    ///
    /// Fails if the notation names a different number of inputs than `N`.
    pub fn parse(notation: &str) -> Result<Self> {
        let parsed = parse_notation(notation)?;
        if parsed.inputs.len() != N {
            return Err(EinError::invalid(format!(
                "notation {:?} names {} inputs but the plan takes {}",
                notation,
                parsed.inputs.len(),
                N
            )));
        }
        Ok(Self::from_specs(parsed.output, into_array(parsed.inputs)?))
    }

    /// Compile a plan from parsed specs.
    pub fn from_specs(output: Spec, inputs: [Spec; N]) -> Self {
        let mut levels = Vec::new();

        // Output labels drive the outer loops, in output order.
        let mut out = output.clone();
        let mut out_dims: SmallVec<[usize; 8]> = (0..output.len()).collect();
        let mut rest: Vec<Spec> = inputs.to_vec();
        while let Some(label) = representative([&out]) {
            let dims = out.axes(label).iter().map(|&axis| out_dims.remove(axis)).collect();
            out = out.drop_all(label);
            levels.push(Level {
                label,
                kind: LevelKind::Output,
                out_dims: dims,
                in_axes: take_axes(&mut rest, label),
            });
        }
        let split = levels.len();

        // Whatever the inputs still carry is reduced, innermost last.
        while let Some(label) = representative(&rest) {
            levels.push(Level {
                label,
                kind: LevelKind::Reduce,
                out_dims: SmallVec::new(),
                in_axes: take_axes(&mut rest, label),
            });
        }

        let plan = Self {
            output,
            inputs,
            levels,
            split,
        };
        debug!(
            "compiled plan {} into {} output and {} reduction levels: {}",
            plan,
            plan.split,
            plan.levels.len() - plan.split,
            plan.nesting()
        );
        plan
    }

    pub fn output(&self) -> &Spec {
        &self.output
    }

    pub fn inputs(&self) -> &[Spec; N] {
        &self.inputs
    }

    /// Labels in loop order, outermost first.
    pub fn loop_order(&self) -> Vec<Label> {
        self.levels.iter().map(|level| level.label).collect()
    }

    /// Labels summed over rather than written to the output.
    pub fn reduced_labels(&self) -> Vec<Label> {
        self.levels[self.split..].iter().map(|level| level.label).collect()
    }

    fn nesting(&self) -> String {
        self.levels
            .iter()
            .map(|level| match level.kind {
                LevelKind::Output => format!("for {}", level.label),
                LevelKind::Reduce => format!("sum {}", level.label),
            })
            .collect::<Vec<_>>()
            .join(" / ")
    }

    /// Resolve one bound per level against the operands of this call.
    ///
    /// Ranks must match their specs, every label must get an extent from at
    /// least one operand, and all operands carrying a label must agree on
    /// it. The output is consulted first, then the inputs in order.
    fn bind<O, P>(&self, out: &O, inputs: &P) -> Result<Vec<usize>>
    where
        O: Shaped + ?Sized,
        P: Operands<N>,
    {
        let mut seen: LabelMap<(usize, Slot)> = LabelMap::default();
        record_extents(&mut seen, Slot::Output, &self.output, out)?;
        let mut operands: SmallVec<[&dyn Shaped; 4]> = SmallVec::with_capacity(N);
        for (k, spec) in self.inputs.iter().enumerate() {
            let operand = inputs.slot(k).ok_or_else(|| {
                EinError::invalid(format!("the plan takes {} inputs, input {} is missing", N, k))
            })?;
            record_extents(&mut seen, Slot::Input(k), spec, operand)?;
            operands.push(operand);
        }

        let mut bounds = Vec::with_capacity(self.levels.len());
        for level in &self.levels {
            let bound = self
                .output
                .extent(level.label, out)
                .or_else(|| {
                    self.inputs
                        .iter()
                        .zip(&operands)
                        .find_map(|(spec, &operand)| spec.extent(level.label, operand))
                })
                .ok_or_else(|| {
                    EinError::invalid(format!(
                        "no operand exposes an extent for label '{}'",
                        level.label
                    ))
                })?;
            bounds.push(bound);
        }
        trace!("bound {} to {:?}", self, bounds);
        Ok(bounds)
    }
}

/// Check `operand` against `spec` and record the extent of every labelled
/// dimension, failing on the first disagreement with an earlier operand.
fn record_extents<S: Shaped + ?Sized>(
    seen: &mut LabelMap<(usize, Slot)>,
    slot: Slot,
    spec: &Spec,
    operand: &S,
) -> Result<()> {
    if spec.len() != operand.rank() {
        return Err(EinError::invalid(format!(
            "spec \"{}\" for {} has {} labels but the operand has rank {}",
            spec,
            slot,
            spec.len(),
            operand.rank()
        )));
    }

    for (dim, &label) in spec.labels().iter().enumerate() {
        let Some(extent) = dim_extent(operand, dim) else {
            continue;
        };
        match seen.get(&label) {
            Some(&(known, from)) if known != extent => {
                return Err(EinError::invalid(format!(
                    "label '{}' has extent {} in {} but {} in {}",
                    label, known, from, extent, slot
                )));
            }
            Some(_) => {}
            None => {
                seen.insert(label, (extent, slot));
            }
        }
    }
    Ok(())
}

impl<const N: usize> fmt::Display for Plan<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inputs: Vec<String> = self.inputs.iter().map(Spec::to_string).collect();
        write!(f, "{}->{}", inputs.join(","), self.output)
    }
}

/// Remove `label` from every spec, returning where each one was narrowed.
fn take_axes(specs: &mut [Spec], label: Label) -> Vec<SmallVec<[usize; 2]>> {
    specs
        .iter_mut()
        .map(|spec| {
            let axes = spec.axes(label);
            *spec = spec.drop_all(label);
            axes
        })
        .collect()
}

fn into_array<T, const N: usize>(items: Vec<T>) -> Result<[T; N]> {
    let len = items.len();
    items.try_into().map_err(|_| {
        EinError::invalid(format!("expected {} specs, got {}", N, len))
    })
}

/// Walk the output levels, setting output coordinates and narrowing inputs,
/// and store `leaf(inputs)` in every output cell reached.
fn descend<const N: usize, O, P, F>(
    levels: &[Level],
    bounds: &[usize],
    out: &mut O,
    index: &mut [usize],
    inputs: &P,
    leaf: &mut F,
) -> Result<()>
where
    O: OperandMut + ?Sized,
    P: Operands<N>,
    F: FnMut(&P) -> Result<O::Elem>,
{
    let Some((level, rest)) = levels.split_first() else {
        let value = leaf(inputs)?;
        return out.assign(index, value);
    };

    for i in 0..bounds[0] {
        for &dim in &level.out_dims {
            index[dim] = i;
        }
        let fixed = level.fix_inputs::<N, P>(inputs, i)?;
        descend::<N, O, P, F>(rest, &bounds[1..], out, index, &fixed, leaf)?;
    }
    Ok(())
}

/// Shared driver of both engines.
fn run<const N: usize, O, P, F>(
    plan: &Plan<N>,
    out: &mut O,
    inputs: &P,
    mut leaf: F,
) -> Result<()>
where
    O: OperandMut + ?Sized,
    P: Operands<N>,
    F: FnMut(&[Level], &[usize], &P) -> Result<O::Elem>,
{
    let bounds = plan.bind(out, inputs)?;
    let (outer, inner) = plan.levels.split_at(plan.split);
    let (outer_bounds, inner_bounds) = bounds.split_at(plan.split);

    let mut index: SmallVec<[usize; 4]> = smallvec![0; plan.output.len()];
    descend::<N, O, P, _>(outer, outer_bounds, out, &mut index, inputs, &mut |rest: &P| {
        leaf(inner, inner_bounds, rest)
    })
}
