//! Crate error type and failure classification.

use std::io;

use crate::event::CounterKind;

pub type Result<T> = std::result::Result<T, Error>;

/// How a tracker operation can fail.
///
/// [`CounterUnavailable`][Self::CounterUnavailable] and
/// [`CounterDisabled`][Self::CounterDisabled] describe expected machine or
/// caller state and are worth matching on; the other variants are caller
/// bugs or kernel refusals.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The action cannot apply to this kind, e.g. toggling
    /// [`WallTime`][CounterKind::WallTime].
    #[error("{} cannot be toggled", .0.name())]
    CounterInvalid(CounterKind),

    /// The machine or kernel lacks this counter; its slot never opened.
    #[error("counter {} is unavailable on this machine", .0.name())]
    CounterUnavailable(CounterKind),

    /// The counter exists but is not currently enabled.
    #[error("counter {} is disabled", .0.name())]
    CounterDisabled(CounterKind),

    /// A toggle payload the kernel facility does not accept.
    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(&'static str),

    /// The underlying syscall or ioctl failed.
    #[error("perf system call failed")]
    System(#[from] io::Error),
}

// Errno classes from perf_event_open(2) that abort tracker construction;
// anything else marks the one counter unavailable and moves on.
pub(crate) fn fatal_open_errno(errno: i32) -> bool {
    matches!(
        errno,
        libc::E2BIG
            | libc::EACCES
            | libc::EBADF
            | libc::EBUSY
            | libc::EFAULT
            | libc::EINTR
            | libc::EMFILE
            | libc::ENOSPC
            | libc::EOVERFLOW
            | libc::EPERM
            | libc::ESRCH
    )
}
