//! Target descriptors and per-counter kernel configuration.

use std::mem::size_of;

use crate::event::CounterKind;
use crate::ffi::Attr;

#[cfg(test)]
mod test;

/// The whole-system half of a target pairing.
#[derive(Clone, Copy, Debug)]
pub struct All;

/// A CPU index.
#[derive(Clone, Copy, Debug)]
pub struct Cpu(pub u32);

impl Cpu {
    pub const ALL: All = All;
}

/// A process or thread id.
#[derive(Clone, Copy, Debug)]
pub struct Proc(pub u32);

impl Proc {
    pub const ALL: All = All;
    pub const CURRENT: Proc = Proc(0);
}

/// What a tracker observes: a task, a CPU, or a task pinned to a CPU.
#[derive(Clone, Copy, Debug)]
pub struct Target {
    pub(crate) pid: i32,
    pub(crate) cpu: i32,
}

macro_rules! into_target {
    ($ty: ty, $destruct: tt, $pid: expr, $cpu: expr) => {
        impl From<$ty> for Target {
            fn from($destruct: $ty) -> Self {
                Target {
                    pid: $pid as _,
                    cpu: $cpu as _,
                }
            }
        }
    };
}

into_target!((Proc, Cpu), (Proc(pid), Cpu(cpu)), pid, cpu);
into_target!((Cpu, Proc), (Cpu(cpu), Proc(pid)), pid, cpu);

into_target!((Proc, All), (Proc(pid), _), pid, -1);
into_target!((All, Proc), (_, Proc(pid)), pid, -1);

into_target!((Cpu, All), (Cpu(cpu), _), -1, cpu);
into_target!((All, Cpu), (_, Cpu(cpu)), -1, cpu);

// `(All, All)` has no conversion: pid -1 with cpu -1 is invalid at the
// kernel boundary, see perf_event_open(2).

impl Target {
    /// Whether this observes one task rather than the whole system.
    pub(crate) fn is_task(&self) -> bool {
        self.pid != -1
    }
}

/// Builds the attr for one catalog entry.
///
/// Counters are inherited by child tasks, start disabled and stay disabled
/// across `execve`. Task-scoped counters drop the kernel and hypervisor
/// slices, which lets them open without `CAP_PERFMON` under the default
/// `kernel.perf_event_paranoid` setting.
pub(crate) fn counter_attr(kind: CounterKind, target: &Target) -> Option<Attr> {
    let cfg = kind.event_config()?;

    let mut attr = Attr::default();
    attr.size = size_of::<Attr>() as _;
    attr.type_ = cfg.ty;
    attr.config = cfg.config;
    attr.set_inherit(1);
    attr.set_disabled(1);
    if target.is_task() {
        attr.set_exclude_kernel(1);
        attr.set_exclude_hv(1);
    }
    Some(attr)
}
