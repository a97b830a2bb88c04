use super::*;
use crate::ffi::bindings as b;

#[test]
fn task_targets_drop_kernel_slices() {
    let target = Target::from((Proc::CURRENT, Cpu::ALL));
    assert_eq!(target.pid, 0);
    assert_eq!(target.cpu, -1);

    let attr = counter_attr(CounterKind::Instructions, &target).unwrap();
    assert_eq!(attr.type_, b::PERF_TYPE_HARDWARE);
    assert_eq!(attr.config, b::PERF_COUNT_HW_INSTRUCTIONS as u64);
    assert_eq!(attr.inherit(), 1);
    assert_eq!(attr.disabled(), 1);
    assert_eq!(attr.enable_on_exec(), 0);
    assert_eq!(attr.exclude_kernel(), 1);
    assert_eq!(attr.exclude_hv(), 1);
}

#[test]
fn system_wide_targets_keep_kernel_slices() {
    let target = Target::from((Proc::ALL, Cpu(2)));
    assert_eq!(target.pid, -1);
    assert_eq!(target.cpu, 2);
    assert!(!target.is_task());

    let attr = counter_attr(CounterKind::CpuCycles, &target).unwrap();
    assert_eq!(attr.disabled(), 1);
    assert_eq!(attr.exclude_kernel(), 0);
    assert_eq!(attr.exclude_hv(), 0);
}

#[test]
fn pairings_commute() {
    let a = Target::from((Proc(42), Cpu(1)));
    let b = Target::from((Cpu(1), Proc(42)));
    assert_eq!((a.pid, a.cpu), (b.pid, b.cpu));
}

#[test]
fn wall_time_has_no_attr() {
    let target = Target::from((Proc::CURRENT, Cpu::ALL));
    assert!(counter_attr(CounterKind::WallTime, &target).is_none());
}
