//! Allocation-triggered collection and threshold recompute tests.

use stackvm_gc::{
    CollectionType, ThresholdPolicy, Vm, VmConfig, DEFAULT_INITIAL_THRESHOLD, MIN_THRESHOLD,
};

fn vm_with(threshold: usize, policy: ThresholdPolicy) -> Vm {
    Vm::with_config(
        VmConfig::default()
            .with_initial_threshold(threshold)
            .with_threshold_policy(policy),
    )
}

#[test]
fn test_default_threshold() {
    let vm = Vm::new();
    assert_eq!(vm.threshold(), DEFAULT_INITIAL_THRESHOLD);
    assert_eq!(vm.config().threshold_policy, ThresholdPolicy::PreCollection);
}

#[test]
fn test_allocation_at_threshold_collects_first() {
    let mut vm = vm_with(4, ThresholdPolicy::PreCollection);
    let kept = vm.push_int(0).unwrap();
    for i in 1..4 {
        vm.push_int(i).unwrap();
        vm.pop().unwrap();
    }
    assert_eq!(vm.object_count(), 4);
    assert_eq!(vm.totals().total_collections(), 0);

    // count == threshold: this allocation collects before it allocates.
    vm.push_int(99).unwrap();

    let metrics = vm.last_metrics();
    assert_eq!(metrics.collection_type, CollectionType::Threshold);
    assert_eq!(metrics.objects_before, 4);
    assert_eq!(metrics.objects_reclaimed, 3);
    assert_eq!(metrics.objects_surviving, 1);
    assert_eq!(metrics.threshold_before, 4);
    assert_eq!(metrics.threshold_after, 8);
    assert_eq!(vm.threshold(), 8);
    assert_eq!(vm.object_count(), 2);
    assert!(vm.is_live(kept));
}

#[test]
fn test_below_threshold_never_collects() {
    let mut vm = vm_with(4, ThresholdPolicy::PreCollection);
    for i in 0..3 {
        vm.push_int(i).unwrap();
        vm.pop().unwrap();
    }
    vm.push_int(3).unwrap();
    assert_eq!(vm.object_count(), 4);
    assert_eq!(vm.totals().total_collections(), 0);
}

#[test]
fn test_pre_collection_threshold_never_shrinks() {
    let mut vm = vm_with(8, ThresholdPolicy::PreCollection);
    for i in 0..8 {
        vm.push_int(i).unwrap();
        vm.pop().unwrap();
    }
    vm.push_int(8).unwrap();

    // Every object but the new one was garbage, yet the threshold doubles
    // the count seen before the collection.
    assert_eq!(vm.last_metrics().objects_surviving, 0);
    assert_eq!(vm.threshold(), 16);
}

#[test]
fn test_survivor_threshold_tracks_working_set() {
    let mut vm = vm_with(8, ThresholdPolicy::Survivors);
    vm.push_int(0).unwrap();
    vm.push_int(1).unwrap();
    for i in 2..8 {
        vm.push_int(i).unwrap();
        vm.pop().unwrap();
    }
    vm.push_int(8).unwrap();

    let metrics = vm.last_metrics();
    assert_eq!(metrics.objects_surviving, 2);
    assert_eq!(vm.threshold(), 4);
}

#[test]
fn test_explicit_collect_recomputes_threshold() {
    let mut vm = Vm::new();
    vm.push_int(1).unwrap();
    vm.push_int(2).unwrap();
    vm.pop().unwrap();
    vm.pop().unwrap();
    vm.collect();

    // Pre-collection count was 2.
    assert_eq!(vm.threshold(), 4);
}

#[test]
fn test_empty_collect_keeps_trigger_reachable() {
    let mut vm = Vm::new();
    vm.collect();
    assert_eq!(vm.threshold(), MIN_THRESHOLD);

    vm.push_int(1).unwrap();
    vm.pop().unwrap();
    // count (1) == threshold (1): collects, then allocates.
    vm.push_int(2).unwrap();
    assert_eq!(vm.totals().total_threshold_collections(), 1);
    assert_eq!(vm.object_count(), 1);
}

#[test]
fn test_churn_stays_bounded() {
    let mut vm = vm_with(1000, ThresholdPolicy::PreCollection);
    for i in 0..1000 {
        for j in 0..20 {
            vm.push_int(i * 20 + j).unwrap();
        }
        for _ in 0..20 {
            vm.pop().unwrap();
        }
        assert!(vm.object_count() <= vm.threshold());
    }
    assert_eq!(vm.totals().total_objects_allocated(), 20_000);
    assert!(vm.totals().total_threshold_collections() > 0);
    assert_eq!(
        vm.totals().total_objects_reclaimed() + vm.object_count(),
        20_000
    );
}

#[test]
fn test_threshold_is_deterministic() {
    let run = || {
        let mut vm = vm_with(3, ThresholdPolicy::PreCollection);
        let mut thresholds = Vec::new();
        for i in 0..50 {
            vm.push_int(i).unwrap();
            if i % 3 != 0 {
                vm.pop().unwrap();
            }
            thresholds.push(vm.threshold());
        }
        thresholds
    };
    assert_eq!(run(), run());
}
