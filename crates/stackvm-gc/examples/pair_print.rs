//! Build a pair, print it, collect and tear the VM down.
//!
//! Run with `cargo run --example pair_print` to see the collector's debug
//! events on stderr.

use stackvm_gc::{Vm, VmError};

fn main() -> Result<(), VmError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .init();

    let mut vm = Vm::new();
    vm.push_string("This is a test")?;
    vm.push_float(5.3)?;
    let pair = vm.push_pair()?;

    vm.print(pair);
    println!();

    // Garbage the pair can no longer reach.
    for i in 0..10 {
        vm.push_int(i)?;
        vm.pop()?;
    }
    let metrics = vm.collect();
    println!(
        "collection {}: reclaimed {}, {} live, next threshold {}",
        metrics.gc_id.0,
        metrics.objects_reclaimed,
        metrics.objects_surviving,
        metrics.threshold_after
    );

    let teardown = vm.destroy();
    println!("teardown reclaimed {}", teardown.objects_reclaimed);
    Ok(())
}
