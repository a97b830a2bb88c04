//! Kernel ABI and raw call plumbing.
//!
//! [`bindings`] is the pregenerated `perf_event.h` surface from
//! `perf-event-open-sys`; [`syscall`] wraps the raw calls in `io::Result`
//! and is the only place in the crate that touches `unsafe`.

pub(crate) mod syscall;

pub(crate) use perf_event_open_sys::bindings;

pub(crate) type Attr = bindings::perf_event_attr;
