//! Poll-style tracking of Linux performance counters.
//!
//! A [`Tracker`][tracker::Tracker] opens the full fixed catalog of
//! software, hardware and cache counters
//! ([`CounterKind`][event::CounterKind]) for one target, a process or
//! thread, a CPU, or a task pinned to a CPU, via
//! [`perf_event_open(2)`](https://man7.org/linux/man-pages/man2/perf_event_open.2.html).
//! Events the machine cannot count are tracked as unavailable instead of
//! failing the whole set. Counters start disabled, are toggled one by one,
//! and are read individually or written out as tagged text snapshots, one
//! `name[tag]: value` line per enabled counter plus a closing wall-time
//! line.
//!
//! # Example
//!
//! ```rust no_run
//! use std::io;
//!
//! use perf_tracker::config::{Cpu, Proc};
//! use perf_tracker::error::Result;
//! use perf_tracker::event::CounterKind;
//! use perf_tracker::tracker::{Toggle, Tracker};
//!
//! fn main() -> Result<()> {
//!     let mut tracker = Tracker::new((Proc::CURRENT, Cpu::ALL))?;
//!
//!     tracker.toggle(CounterKind::CpuCycles, Toggle::Enable)?;
//!     tracker.toggle(CounterKind::Instructions, Toggle::Enable)?;
//!
//!     let answer = (0..1_000_000_u64).sum::<u64>();
//!
//!     let cycles = tracker.read(CounterKind::CpuCycles)?;
//!     eprintln!("{answer} after {cycles} cycles");
//!
//!     tracker.log(&mut io::stdout().lock(), 0)?;
//!     Ok(())
//! }
//! ```
//!
//! Counters opened for a specific task count only user-space events, so
//! they work under the default `kernel.perf_event_paranoid` setting.
//! System-wide targets need `CAP_PERFMON` or a relaxed paranoid level.

pub mod config;
pub mod error;
pub mod event;
mod ffi;
pub mod stats;
pub mod tracker;
