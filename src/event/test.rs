use std::collections::HashSet;

use super::*;
use crate::ffi::bindings::*;

#[test]
fn slot_order_is_stable() {
    assert_eq!(CounterKind::COUNT, 34);
    assert_eq!(CounterKind::CpuClock.index(), 0);
    assert_eq!(CounterKind::MajorPageFaults.index(), 6);
    assert_eq!(CounterKind::CpuCycles.index(), 7);
    assert_eq!(CounterKind::BusCycles.index(), 13);
    assert_eq!(CounterKind::L1dReads.index(), 14);
    assert_eq!(CounterKind::BpuReadMisses.index(), 32);
    assert_eq!(CounterKind::WallTime.index(), CounterKind::SLOTS);

    for (index, kind) in CounterKind::ALL.into_iter().enumerate() {
        assert_eq!(kind.index(), index);
        assert_eq!(CounterKind::from_index(index), Some(kind));
    }
    assert_eq!(CounterKind::from_index(CounterKind::COUNT), None);
}

#[test]
fn names_are_unique() {
    let mut seen = HashSet::new();
    for kind in CounterKind::ALL {
        assert!(seen.insert(kind.name()), "duplicate name {}", kind.name());
    }
}

#[test]
fn only_wall_time_lacks_a_kernel_event() {
    for kind in CounterKind::ALL {
        assert_eq!(
            kind.event_config().is_none(),
            kind == CounterKind::WallTime,
            "{}",
            kind.name()
        );
    }
}

#[test]
fn event_configs_match_the_kernel_abi() {
    let cfg = CounterKind::PageFaults.event_config().unwrap();
    assert_eq!(cfg.ty, PERF_TYPE_SOFTWARE);
    assert_eq!(cfg.config, PERF_COUNT_SW_PAGE_FAULTS as u64);

    let cfg = CounterKind::Instructions.event_config().unwrap();
    assert_eq!(cfg.ty, PERF_TYPE_HARDWARE);
    assert_eq!(cfg.config, PERF_COUNT_HW_INSTRUCTIONS as u64);

    let cfg = CounterKind::L1dReadMisses.event_config().unwrap();
    assert_eq!(cfg.ty, PERF_TYPE_HW_CACHE);
    assert_eq!(
        cfg.config,
        PERF_COUNT_HW_CACHE_L1D as u64
            | (PERF_COUNT_HW_CACHE_OP_READ as u64) << 8
            | (PERF_COUNT_HW_CACHE_RESULT_MISS as u64) << 16
    );
}
