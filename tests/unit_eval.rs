//! Unit tests for the public evaluation API

use candle_core::{Device, Tensor};
use einplan::{
    einsum, sum, transform, try_transform, EinError, Mapped, Operand, Plan, Sequence, TensorBuf,
    TensorView, TensorViewMut,
};

const A: [f64; 4] = [1.0, 2.0, 3.0, 4.0];
const B: [f64; 2] = [3.0, -2.0];

type View<'a> = TensorView<'a, f64>;

fn mat(data: &[f64]) -> View<'_> {
    TensorView::new(data, &[2, 2]).unwrap()
}

// ============================================================================
// Sum engine
// ============================================================================

#[test]
fn test_reference_contractions() {
    let a = TensorView::from_slice(&A);
    let mut v = 0.0f64;

    sum("", ["i"], &mut v, &[a.clone()]).unwrap();
    assert_eq!(v, 10.0);

    sum("", ["i", "i"], &mut v, &[a.clone(), a.clone()]).unwrap();
    assert_eq!(v, 30.0);

    let mut squares = vec![0.0f64; 4];
    sum("i", ["i", "i"], &mut squares, &[a.clone(), a]).unwrap();
    assert_eq!(squares, vec![1.0, 4.0, 9.0, 16.0]);

    let mut c = vec![0.0f64; 2];
    sum("i", ["ij", "j", "j"], &mut c, &[mat(&A), View::from_slice(&B), View::from_slice(&B)])
        .unwrap();
    assert_eq!(c, vec![17.0, 43.0]);
}

#[test]
fn test_plan_reused_across_operands() {
    let plan = Plan::<2>::parse("ij,j->i").unwrap();
    let identity = [1.0, 0.0, 0.0, 1.0];
    let mut c = vec![0.0f64; 2];

    plan.sum(&mut c, &[mat(&A), View::from_slice(&B)]).unwrap();
    assert_eq!(c, vec![-1.0, 1.0]);

    plan.sum(&mut c, &[mat(&identity), View::from_slice(&B)]).unwrap();
    assert_eq!(c, B.to_vec());
}

#[test]
fn test_strided_input_view() {
    // Transposed view: same storage, swapped strides
    let at = mat(&A).t().unwrap();
    let mut c = vec![0.0f64; 2];
    sum("i", ["ij", "j"], &mut c, &[at, View::from_slice(&B)]).unwrap();
    assert_eq!(c, vec![-3.0, -2.0]);
}

#[test]
fn test_write_through_borrowed_output() {
    let mut storage = [0.0; 4];
    {
        let mut out = TensorViewMut::new(&mut storage, &[2, 2]).unwrap();
        einsum("i,j->ij", &mut out, &[View::from_slice(&B), View::from_slice(&B)]).unwrap();
    }
    assert_eq!(storage, [9.0, -6.0, -6.0, 4.0]);
}

#[test]
fn test_slice_output() {
    let mut storage = [0.0; 2];
    let out: &mut [f64] = &mut storage;
    sum("i", ["ii"], out, &[mat(&A)]).unwrap();
    assert_eq!(storage, [1.0, 4.0]);
}

#[test]
fn test_sequence_inputs() {
    let mut v = 0.0f64;
    sum("", ["i", "i"], &mut v, &[Sequence::new(&A), Sequence::new(&A)]).unwrap();
    assert_eq!(v, 30.0);
}

#[test]
fn test_candle_inputs() {
    let device = Device::Cpu;
    let a = Tensor::new(&[[1.0f32, 2.0], [3.0, 4.0]], &device).unwrap();
    let b = Tensor::new(&[3.0f32, -2.0], &device).unwrap();

    let mut c = TensorBuf::<f64>::zeros(&[2]);
    einsum("ij,j->i", &mut c, &[a.clone(), b]).unwrap();
    assert_eq!(c.data(), &[-1.0, 1.0]);

    let mut at = TensorBuf::<f64>::zeros(&[2, 2]);
    einsum("ij->ji", &mut at, &[a]).unwrap();
    let back = at.to_candle(&device).unwrap();
    assert_eq!(
        back.to_vec2::<f64>().unwrap(),
        vec![vec![1.0, 3.0], vec![2.0, 4.0]]
    );
}

#[test]
fn test_repeated_evaluation_is_identical() {
    let data: Vec<f64> = (0..64).map(|i| (i as f64 * 0.37).sin()).collect();
    let a = TensorView::new(&data, &[8, 8]).unwrap();
    let plan = Plan::new("ik", ["ij", "jk"]).unwrap();

    let mut first = TensorBuf::<f64>::zeros(&[8, 8]);
    let mut second = TensorBuf::<f64>::zeros(&[8, 8]);
    plan.sum(&mut first, &[a.clone(), a.clone()]).unwrap();
    plan.sum(&mut second, &[a.clone(), a]).unwrap();

    let bits = |buf: &TensorBuf<f64>| buf.data().iter().map(|x| x.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&first), bits(&second));
}

// ============================================================================
// Mixed operand kinds
// ============================================================================

#[test]
fn test_view_with_sequence() {
    let mut c = vec![0.0f64; 2];
    sum("i", ["ij", "j"], &mut c, &(mat(&A), Sequence::new(&B))).unwrap();
    assert_eq!(c, vec![-1.0, 1.0]);
}

#[test]
fn test_view_with_scalar() {
    let mut out = TensorBuf::<f64>::zeros(&[2, 2]);
    sum("ij", ["ij", ""], &mut out, &(mat(&A), -1.0f64)).unwrap();
    assert_eq!(out.data(), &[-1.0, -2.0, -3.0, -4.0]);
}

#[test]
fn test_view_with_mapped_view() {
    // b_i = a_i * f(a_i) with f applied lazily
    let a = View::from_slice(&A);
    let mut b = vec![0.0f64; 4];
    sum("i", ["i", "i"], &mut b, &(a.clone(), Mapped::new(a, |x: f64| x * x))).unwrap();
    assert_eq!(b, vec![1.0, 8.0, 27.0, 64.0]);
}

#[test]
fn test_candle_with_view() {
    let device = Device::Cpu;
    let t = Tensor::new(&[[1.0f32, 2.0], [3.0, 4.0]], &device).unwrap();
    let mut c = vec![0.0f64; 2];
    einsum("ij,j->i", &mut c, &(t, View::from_slice(&B))).unwrap();
    assert_eq!(c, vec![-1.0, 1.0]);
}

#[test]
fn test_mixed_pack_extent_mismatch() {
    let mut v = 0.0f64;
    let err = sum("", ["i", "i"], &mut v, &(View::from_slice(&A), Sequence::new(&B)))
        .unwrap_err();
    assert!(matches!(err, EinError::InvalidSpecification { .. }));
}

// ============================================================================
// Transform engine
// ============================================================================

#[test]
fn test_reference_reductions() {
    let a = [View::from_slice(&A)];
    let mut v = 0.0f64;

    transform("", ["i"], &mut v, |[x]: &[View; 1]| x.iter().sum(), &a).unwrap();
    assert_eq!(v, 10.0);

    transform("", ["i"], &mut v, |[x]: &[View; 1]| x.iter().product(), &a).unwrap();
    assert_eq!(v, 24.0);

    let pair = [View::from_slice(&A), View::from_slice(&A)];
    transform(
        "",
        ["i", "i"],
        &mut v,
        |[x, y]: &[View; 2]| x.iter().zip(y.iter()).map(|(p, q)| p * q).product(),
        &pair,
    )
    .unwrap();
    assert_eq!(v, 576.0);

    let mut c = vec![0.0f64; 2];
    transform(
        "i",
        ["ij", "j"],
        &mut c,
        |[row, b]: &[View; 2]| row.iter().zip(b.iter()).map(|(p, q)| p * q).sum(),
        &[mat(&A), View::from_slice(&B)],
    )
    .unwrap();
    assert_eq!(c, vec![-1.0, 1.0]);
}

#[test]
fn test_transform_with_no_reduced_labels_sees_scalars() {
    let mut out = TensorBuf::<f64>::zeros(&[2, 2]);
    transform(
        "ij",
        ["ij"],
        &mut out,
        |[x]: &[View; 1]| x.value().map(|v| v * 10.0).unwrap_or(f64::NAN),
        &[mat(&A)],
    )
    .unwrap();
    assert_eq!(out.data(), &[10.0, 20.0, 30.0, 40.0]);
}

#[test]
fn test_try_transform_propagates() {
    let mut v = 0.0f64;
    let err = try_transform(
        "",
        ["i"],
        &mut v,
        |[x]: &[View; 1]| {
            if x.iter().any(|e| *e < 0.0) {
                Err(EinError::Reduction("negative element".into()))
            } else {
                Ok(x.iter().sum())
            }
        },
        &[View::from_slice(&B)],
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "reduction failed: negative element");
    assert_eq!(v, 0.0);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_rank_mismatch_rejected_before_writing() {
    let mut c = vec![-1.0; 2];
    let err = sum("i", ["ijk"], &mut c, &[mat(&A)]).unwrap_err();
    assert!(matches!(err, EinError::InvalidSpecification { .. }));
    assert_eq!(c, vec![-1.0; 2]);
}

#[test]
fn test_inconsistent_extents_rejected() {
    let mut v = 0.0f64;
    let err = sum("", ["i", "i"], &mut v, &[View::from_slice(&A), View::from_slice(&B)])
        .unwrap_err();
    assert!(matches!(err, EinError::InvalidSpecification { .. }));
}

#[test]
fn test_notation_errors() {
    let mut v = 0.0f64;
    let inputs = [View::from_slice(&A)];
    assert!(matches!(
        einsum("i->i->", &mut v, &inputs),
        Err(EinError::Parse { .. })
    ));
    assert!(matches!(
        einsum("i,i->", &mut v, &inputs),
        Err(EinError::InvalidSpecification { .. })
    ));
    assert!(matches!(
        sum("", ["#"], &mut v, &inputs),
        Err(EinError::InvalidSpecification { .. })
    ));
}
