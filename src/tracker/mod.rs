//! Counter tracking for one target.

use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::time::Instant;

use arrayvec::ArrayVec;
use log::{debug, error, warn};

use crate::config::{counter_attr, Target};
use crate::error::{fatal_open_errno, Error, Result};
use crate::event::CounterKind;
use crate::ffi::{bindings as b, syscall};
use crate::stats::RunningStats;


/// One catalog entry's kernel handle and toggle state.
#[derive(Debug, Default)]
struct Slot {
    /// `None` when the machine lacks the event.
    perf: Option<File>,
    enabled: bool,
}

impl Slot {
    /// Precondition ladder shared by reads and snapshots.
    fn readable(&self, kind: CounterKind) -> Result<&File> {
        let Some(perf) = self.perf.as_ref() else {
            return Err(Error::CounterUnavailable(kind));
        };
        if !self.enabled {
            return Err(Error::CounterDisabled(kind));
        }
        Ok(perf)
    }
}

/// Control operations for [`Tracker::toggle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Toggle {
    /// Start counting.
    Enable,
    /// Stop counting. The value is kept but refuses reads until the next
    /// [`Enable`][Self::Enable].
    Disable,
    /// Zero the value, leaving the enabled state alone.
    Reset,
    /// Enable until the given number of overflows, then auto-disable.
    /// The count must be nonzero.
    RefreshOverflow(u64),
    /// Change the overflow period.
    SetPeriod(u64),
    /// Pause or resume the ring buffer attached to the counter, if any.
    PauseOutput(bool),
}

/// Owns the full catalog of counters opened for one target.
///
/// Construction opens every counter the machine provides; the rest are
/// tracked as unavailable and silently left out of snapshots. All counters
/// start disabled. Dropping the tracker closes every handle.
pub struct Tracker {
    target: Target,
    slots: ArrayVec<Slot, { CounterKind::SLOTS }>,
    stats: [RunningStats; CounterKind::COUNT],
    start: Instant,
}

impl Tracker {
    /// Opens every catalog counter for `target`.
    ///
    /// An event this machine cannot count marks its slot unavailable and
    /// construction carries on. Errno classes that point at a broken call,
    /// a dead target or an exhausted system abort construction instead,
    /// closing whatever was opened so far.
    pub fn new(target: impl Into<Target>) -> Result<Self> {
        let target = target.into();
        let mut slots = ArrayVec::new();

        for kind in CounterKind::ALL {
            let Some(mut attr) = counter_attr(kind, &target) else {
                continue;
            };
            let opened = syscall::perf_event_open(
                &mut attr,
                target.pid,
                target.cpu,
                -1,
                b::PERF_FLAG_FD_CLOEXEC.into(),
            );
            match opened {
                Ok(perf) => slots.push(Slot {
                    perf: Some(perf),
                    enabled: false,
                }),
                Err(err) if err.raw_os_error().is_some_and(fatal_open_errno) => {
                    error!("cannot open {}: {err}", kind.name());
                    return Err(err.into());
                }
                Err(err) => {
                    warn!("{} is unavailable: {err}", kind.name());
                    slots.push(Slot::default());
                }
            }
        }

        debug!(
            "tracking {} of {} counters for pid {} cpu {}",
            slots.iter().filter(|slot| slot.perf.is_some()).count(),
            slots.len(),
            target.pid,
            target.cpu,
        );

        Ok(Tracker {
            target,
            slots,
            stats: [RunningStats::default(); CounterKind::COUNT],
            start: Instant::now(),
        })
    }

    /// The pairing this tracker was opened for.
    pub fn target(&self) -> Target {
        self.target
    }

    /// Applies `action` to one counter.
    ///
    /// [`Enable`][Toggle::Enable] and [`Disable`][Toggle::Disable] record
    /// the new state only once the kernel has accepted it; the other
    /// actions never touch the enabled state. A kernel refusal surfaces as
    /// [`Error::System`] and leaves the slot exactly as it was.
    pub fn toggle(&mut self, kind: CounterKind, action: Toggle) -> Result<()> {
        let Some(slot) = self.slots.get_mut(kind.index()) else {
            return Err(Error::CounterInvalid(kind));
        };
        let Some(perf) = slot.perf.as_ref() else {
            return Err(Error::CounterUnavailable(kind));
        };

        let applied = match action {
            Toggle::Enable => syscall::enable(perf),
            Toggle::Disable => syscall::disable(perf),
            Toggle::Reset => syscall::reset(perf),
            Toggle::RefreshOverflow(0) => {
                return Err(Error::UnsupportedConfiguration(
                    "overflow refresh count must be nonzero",
                ))
            }
            Toggle::RefreshOverflow(count) => syscall::refresh(perf, count),
            Toggle::SetPeriod(period) => syscall::set_period(perf, period),
            Toggle::PauseOutput(pause) => syscall::pause_output(perf, pause),
        };
        if let Err(err) = applied {
            warn!("configuring {} failed: {err}", kind.name());
            return Err(err.into());
        }

        match action {
            Toggle::Enable => slot.enabled = true,
            Toggle::Disable => slot.enabled = false,
            _ => {}
        }
        Ok(())
    }

    /// Reads one counter's current value.
    ///
    /// [`WallTime`][CounterKind::WallTime] always succeeds and reads as
    /// nanoseconds since the tracker was opened; every other kind must be
    /// available and enabled.
    pub fn read(&self, kind: CounterKind) -> Result<u64> {
        match self.slots.get(kind.index()) {
            Some(slot) => Ok(syscall::read_count(slot.readable(kind)?)?),
            None => Ok(self.start.elapsed().as_nanos() as u64),
        }
    }

    /// Writes one tagged snapshot of every enabled counter to `sink`.
    ///
    /// Unavailable and disabled counters are left out; the wall-time line,
    /// in seconds at nanosecond precision, always closes the snapshot. The
    /// snapshot is formatted in full before any byte reaches `sink`, so a
    /// failed call writes nothing.
    pub fn log<W: Write>(&self, sink: &mut W, tag: u64) -> Result<()> {
        let text = render(&self.slots, self.start, None, tag)?;
        sink.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Like [`log`][Self::log], but folds every value into that counter's
    /// [`RunningStats`] and prints the running mean (rounded to an integer
    /// for counters) instead of the instantaneous value. Smooths noise
    /// across repeated snapshots at the cost of raw fidelity.
    pub fn log_mean<W: Write>(&mut self, sink: &mut W, tag: u64) -> Result<()> {
        let text = render(&self.slots, self.start, Some(&mut self.stats), tag)?;
        sink.write_all(text.as_bytes())?;
        Ok(())
    }
}

/// Formats one snapshot, optionally folding values into `stats`.
fn render(
    slots: &[Slot],
    start: Instant,
    mut stats: Option<&mut [RunningStats; CounterKind::COUNT]>,
    tag: u64,
) -> Result<String> {
    let mut text = String::new();

    for kind in CounterKind::ALL {
        let Some(slot) = slots.get(kind.index()) else {
            // wall time, after the loop
            break;
        };
        let value = match slot.readable(kind) {
            Ok(perf) => syscall::read_count(perf)?,
            Err(Error::CounterUnavailable(_)) => {
                debug!("snapshot skips {}: unavailable", kind.name());
                continue;
            }
            Err(Error::CounterDisabled(_)) => continue,
            Err(err) => return Err(err),
        };
        let shown = match stats.as_mut() {
            Some(stats) => {
                let entry = &mut stats[kind.index()];
                entry.update(value as f64);
                entry.mean().round() as u64
            }
            None => value,
        };
        // writes into a String cannot fail
        let _ = writeln!(text, "{}[{tag}]: {shown}", kind.name());
    }

    let elapsed = start.elapsed().as_nanos() as u64;
    let secs = match stats {
        Some(stats) => {
            let entry = &mut stats[CounterKind::WallTime.index()];
            entry.update(elapsed as f64);
            entry.mean() / 1e9
        }
        None => elapsed as f64 / 1e9,
    };
    let _ = writeln!(text, "{}[{tag}]: {secs:.9}", CounterKind::WallTime.name());

    Ok(text)
}
