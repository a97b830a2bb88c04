use std::fs::File;
use std::io::{Error, ErrorKind, Result};
use std::mem::size_of;
use std::os::fd::{AsRawFd, FromRawFd};

use perf_event_open_sys as sys;

use super::Attr;

// `PERF_EVENT_IOC_PERIOD`, i.e. `_IOW('$', 4, __u64)`. The generated
// wrapper takes the period by value while the kernel reads it through a
// pointer, so this request goes through `libc::ioctl` directly.
const PERIOD_REQUEST: libc::c_ulong = 0x4008_2404;

fn cvt(ret: libc::c_int) -> Result<libc::c_int> {
    if ret == -1 {
        Err(Error::last_os_error())
    } else {
        Ok(ret)
    }
}

pub fn perf_event_open(
    attr: &mut Attr,
    pid: i32,
    cpu: i32,
    group_fd: i32,
    flags: u64,
) -> Result<File> {
    let fd = unsafe { sys::perf_event_open(attr, pid, cpu, group_fd, flags as _) };
    if fd == -1 {
        Err(Error::last_os_error())
    } else {
        Ok(unsafe { File::from_raw_fd(fd) })
    }
}

pub fn enable(file: &File) -> Result<()> {
    cvt(unsafe { sys::ioctls::ENABLE(file.as_raw_fd(), 0) }).map(drop)
}

pub fn disable(file: &File) -> Result<()> {
    cvt(unsafe { sys::ioctls::DISABLE(file.as_raw_fd(), 0) }).map(drop)
}

pub fn reset(file: &File) -> Result<()> {
    cvt(unsafe { sys::ioctls::RESET(file.as_raw_fd(), 0) }).map(drop)
}

/// Enables the counter until `count` overflows have happened.
pub fn refresh(file: &File, count: u64) -> Result<()> {
    cvt(unsafe { sys::ioctls::REFRESH(file.as_raw_fd(), count as _) }).map(drop)
}

pub fn set_period(file: &File, period: u64) -> Result<()> {
    let mut period = period;
    cvt(unsafe {
        libc::ioctl(
            file.as_raw_fd(),
            PERIOD_REQUEST,
            &mut period as *mut u64,
        )
    })
    .map(drop)
}

pub fn pause_output(file: &File, pause: bool) -> Result<()> {
    cvt(unsafe { sys::ioctls::PAUSE_OUTPUT(file.as_raw_fd(), pause.into()) }).map(drop)
}

/// Reads the counter value behind `file`.
///
/// The kernel hands counting-mode values out as one native-endian `u64`;
/// anything shorter means the fd is not a readable perf event.
pub fn read_count(file: &File) -> Result<u64> {
    let mut buf = [0_u8; size_of::<u64>()];
    let ret = unsafe { libc::read(file.as_raw_fd(), buf.as_mut_ptr() as *mut _, buf.len()) };
    if ret == -1 {
        return Err(Error::last_os_error());
    }
    if ret as usize != buf.len() {
        return Err(ErrorKind::UnexpectedEof.into());
    }
    Ok(u64::from_ne_bytes(buf))
}
