//! einplan demo - runs a handful of contractions and prints the results.
//!
//! With an argument, the argument is parsed as notation and its loop nest is
//! printed instead, e.g. `einplan "ij,jk->ik"`. Set `RUST_LOG=debug` to see
//! plan compilation, `RUST_LOG=trace` for the bounds bound at each call.

use std::env;

use flexi_logger::{Logger, LoggerHandle};
use log::info;

use einplan::{sum, transform, Mapped, Plan, Result, Sequence, TensorBuf, TensorView};

type View<'a> = TensorView<'a, f64>;

/// Log to stderr at the level given by `RUST_LOG`, warnings by default.
fn setup_logging() -> Option<LoggerHandle> {
    match Logger::try_with_env_or_str("warn").and_then(|logger| logger.start()) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Logging disabled: {}", e);
            None
        }
    }
}

fn main() {
    let _logger = setup_logging();
    let args: Vec<String> = env::args().collect();

    let outcome = match args.get(1) {
        Some(notation) => explain(notation),
        None => demo(),
    };
    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the loop order of a notation with up to three inputs.
fn explain(notation: &str) -> Result<()> {
    let inputs = einplan::parse_notation(notation)?.inputs.len();
    let (plan, order, reduced) = match inputs {
        1 => describe(Plan::<1>::parse(notation)?),
        2 => describe(Plan::<2>::parse(notation)?),
        3 => describe(Plan::<3>::parse(notation)?),
        n => {
            println!("{} inputs: only plans over 1 to 3 inputs are shown", n);
            return Ok(());
        }
    };
    println!("plan:    {}", plan);
    println!("loops:   {}", order);
    println!("reduced: {}", if reduced.is_empty() { "-" } else { reduced.as_str() });
    Ok(())
}

fn describe<const N: usize>(plan: Plan<N>) -> (String, String, String) {
    let join = |labels: Vec<einplan::Label>| -> String {
        labels.iter().map(|l| l.to_string()).collect()
    };
    (plan.to_string(), join(plan.loop_order()), join(plan.reduced_labels()))
}

fn demo() -> Result<()> {
    let a = [1.0, 2.0, 3.0, 4.0];
    let b = [3.0, -2.0];
    let m = TensorView::new(&a, &[2, 2])?;
    let v = TensorView::from_slice(&a);
    let w = TensorView::from_slice(&b);

    info!("running demo contractions");
    println!("A = [[1, 2], [3, 4]], a = [1, 2, 3, 4], b = [3, -2]\n");

    let mut total = 0.0f64;
    sum("", ["i"], &mut total, &[v.clone()])?;
    println!("sum(a)           = {}", total);

    sum("", ["i", "i"], &mut total, &[v.clone(), v.clone()])?;
    println!("a . a            = {}", total);

    let mut squares = vec![0.0f64; 4];
    sum("i", ["i", "i"], &mut squares, &[v.clone(), v.clone()])?;
    println!("a * a            = {:?}", squares);

    let mut fourth = vec![0.0f64; 4];
    let sq = TensorView::from_slice(&squares);
    sum("i", ["i", "i"], &mut fourth, &[sq.clone(), sq])?;
    println!("(a * a)^2        = {:?}", fourth);

    let mut c = vec![0.0f64; 2];
    sum("i", ["ij", "j"], &mut c, &[m.clone(), w.clone()])?;
    println!("A b              = {:?}", c);

    sum("i", ["ji", "j"], &mut c, &[m.clone(), w.clone()])?;
    println!("A^T b            = {:?}", c);

    sum("i", ["ij", "j", "j"], &mut c, &[m.clone(), w.clone(), w.clone()])?;
    println!("A (b * b)        = {:?}", c);

    // Operands of different kinds in one call
    sum("i", ["ij", "j"], &mut c, &(m.clone(), Sequence::new(&b)))?;
    println!("A b (sequence)   = {:?}", c);

    let mut cubes = vec![0.0f64; 4];
    let squared = Mapped::new(v.clone(), |e: f64| e * e);
    sum("i", ["i", "i"], &mut cubes, &(v.clone(), squared))?;
    println!("a * (a * a)      = {:?}", cubes);

    let mut at = TensorBuf::<f64>::zeros(&[2, 2]);
    sum("ji", ["ij"], &mut at, &[m.clone()])?;
    println!("A^T              = {:?}", at.data());

    sum("", ["ii"], &mut total, &[m.clone()])?;
    println!("tr A             = {}", total);

    println!();

    transform("", ["i"], &mut total, |[x]: &[View; 1]| x.iter().product(), &[v.clone()])?;
    println!("prod(a)          = {}", total);

    transform(
        "",
        ["i"],
        &mut total,
        |[x]: &[View; 1]| x.iter().map(|e| e * e).sum::<f64>().sqrt(),
        &[v.clone()],
    )?;
    println!("|a|              = {}", total);

    let mut maxima = vec![0.0f64; 2];
    transform(
        "j",
        ["ij"],
        &mut maxima,
        |[col]: &[View; 1]| col.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        &[m],
    )?;
    println!("max_i A[i][j]    = {:?}", maxima);

    Ok(())
}
