//! Evaluate a clamped ramp as a piecewise function.
//!
//! Run with `cargo run --example piecewise_basic`.

use piecewise::prelude::*;

fn main() -> Result<()> {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);

    let data: Vec<f64> = (-4..=4).map(f64::from).collect();
    let x = Tensor::<CpuRuntime>::from_slice(&data, &[data.len()], &device);

    // x < 0 -> -1, x > 2 -> 2 (checked last, so it wins on overlap), else 0.5
    let conds: CondList<CpuRuntime> = vec![
        Condition::Flags(data.iter().map(|&v| v < 0.0).collect()),
        Condition::Flags(data.iter().map(|&v| v > 2.0).collect()),
    ]
    .into();
    let y = client.piecewise(&x, &conds, &PiecewiseFn::values(&[-1.0, 2.0, 0.5]))?;

    println!("x = {x}");
    println!("y = {:?}", y.to_vec::<f64>());

    let threaded = client.with_parallelism(
        ParallelismConfig::new(Some(2), Some(1)).with_strategy(ResolveStrategy::ThreadBarrier),
    );
    let z = threaded.piecewise(&x, &conds, &PiecewiseFn::values(&[-1.0, 2.0, 0.5]))?;
    assert_eq!(y.to_vec::<f64>(), z.to_vec::<f64>());

    let s = client.piecewise_scalar(3.0, DType::F64, &true.into(), &PiecewiseFn::values(&[7.0]))?;
    println!("scalar -> {s} {:?} (0-d: {})", s.to_vec::<f64>(), s.is_scalar());
    Ok(())
}
