//! Tests against the live perf facility.
//!
//! Construction needs `perf_event_open` to be permitted for unprivileged
//! callers; where a sandbox or a hardened kernel forbids it, these tests
//! skip themselves instead of failing.

use std::hint::black_box;

use perf_tracker::config::{Cpu, Proc};
use perf_tracker::error::Error;
use perf_tracker::event::CounterKind;
use perf_tracker::tracker::{Toggle, Tracker};

fn open_current() -> Option<Tracker> {
    match Tracker::new((Proc::CURRENT, Cpu::ALL)) {
        Ok(tracker) => Some(tracker),
        Err(Error::System(err))
            if matches!(err.raw_os_error(), Some(libc::EACCES | libc::EPERM)) =>
        {
            eprintln!("skipping: perf_event_open is not permitted here");
            None
        }
        Err(err) => panic!("tracker construction failed: {err}"),
    }
}

/// Enables `kind`, or signals a skip for machines that lack it.
fn enable(tracker: &mut Tracker, kind: CounterKind) -> bool {
    match tracker.toggle(kind, Toggle::Enable) {
        Ok(()) => true,
        Err(Error::CounterUnavailable(_)) => {
            eprintln!("skipping: no {} on this machine", kind.name());
            false
        }
        Err(err) => panic!("enabling {} failed: {err}", kind.name()),
    }
}

fn spin(rounds: u64) -> u64 {
    let mut acc = 0_u64;
    for i in 0..rounds {
        acc = acc.wrapping_add(black_box(i));
    }
    acc
}

#[test]
fn instructions_grow_across_snapshots() {
    let Some(mut tracker) = open_current() else {
        return;
    };
    if !enable(&mut tracker, CounterKind::Instructions) {
        return;
    }

    black_box(spin(100_000));
    let first = tracker.read(CounterKind::Instructions).expect("read");
    assert!(first > 0);

    let mut snapshot = Vec::new();
    tracker.log(&mut snapshot, 0).expect("log");
    let text = String::from_utf8(snapshot).unwrap();
    let line = text
        .lines()
        .find(|line| line.starts_with("instructions[0]: "))
        .expect("instructions line");
    let logged: u64 = line["instructions[0]: ".len()..].parse().unwrap();
    assert!(logged > 0);

    black_box(spin(100_000));
    let second = tracker.read(CounterKind::Instructions).expect("read");
    assert!(second > first);

    let mut snapshot = Vec::new();
    tracker.log(&mut snapshot, 1).expect("log");
    let text = String::from_utf8(snapshot).unwrap();
    let line = text
        .lines()
        .find(|line| line.starts_with("instructions[1]: "))
        .expect("instructions line");
    let later: u64 = line["instructions[1]: ".len()..].parse().unwrap();
    assert!(later > logged);
    assert!(text.lines().last().unwrap().starts_with("wall-time[1]: "));
}

#[test]
fn disable_blocks_reads() {
    let Some(mut tracker) = open_current() else {
        return;
    };
    // software event, present without a PMU
    let kind = CounterKind::PageFaults;
    if !enable(&mut tracker, kind) {
        return;
    }

    tracker.read(kind).expect("enabled read");
    tracker.toggle(kind, Toggle::Disable).expect("disable");
    assert!(matches!(
        tracker.read(kind),
        Err(Error::CounterDisabled(_))
    ));

    tracker.toggle(kind, Toggle::Enable).expect("re-enable");
    tracker.read(kind).expect("read after re-enable");
}

#[test]
fn reset_leaves_the_counter_enabled() {
    let Some(mut tracker) = open_current() else {
        return;
    };
    let kind = CounterKind::TaskClock;
    if !enable(&mut tracker, kind) {
        return;
    }

    black_box(spin(10_000));
    tracker.toggle(kind, Toggle::Reset).expect("reset");
    tracker.read(kind).expect("read after reset");
}

#[test]
fn wall_time_is_monotonic() {
    let Some(tracker) = open_current() else {
        return;
    };
    let mut prev = 0;
    for _ in 0..10 {
        let now = tracker.read(CounterKind::WallTime).expect("wall time");
        assert!(now >= prev);
        prev = now;
    }
}

#[test]
fn averaged_snapshots_keep_reporting() {
    let Some(mut tracker) = open_current() else {
        return;
    };
    let kind = CounterKind::TaskClock;
    if !enable(&mut tracker, kind) {
        return;
    }

    let mut out = Vec::new();
    black_box(spin(50_000));
    tracker.log_mean(&mut out, 0).expect("log_mean");
    black_box(spin(50_000));
    tracker.log_mean(&mut out, 1).expect("log_mean");

    let text = String::from_utf8(out).unwrap();
    let task_lines = text
        .lines()
        .filter(|line| line.starts_with("task-clock["))
        .count();
    assert_eq!(task_lines, 2);
}

#[test]
fn nonexistent_pid_fails_fatally() {
    // never a live pid, construction must not hand back a tracker
    let result = Tracker::new((Proc(0x7fff_fff0), Cpu::ALL));
    assert!(matches!(result, Err(Error::System(_))));
}
