//! The fixed catalog of trackable counters.

use crate::ffi::bindings::*;

#[cfg(test)]
mod test;

/// Event type and config pair, ready to drop into a `perf_event_attr`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct EventConfig {
    pub ty: u32,
    pub config: u64,
}

/// Every counter a [`Tracker`][crate::tracker::Tracker] opens, in slot
/// order.
///
/// The declaration order is the slot index and the order of log snapshot
/// lines; kinds are only ever appended, never reordered.
/// [`WallTime`][Self::WallTime] stays last: it is synthetic, has no kernel
/// handle and derives from the tracker's start time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CounterKind {
    /// The per-CPU high-resolution timer.
    CpuClock,
    /// CPU time consumed by the monitored task.
    TaskClock,
    /// Context switches.
    ContextSwitches,
    /// Migrations to another CPU.
    CpuMigrations,
    /// Page faults, minor and major combined.
    PageFaults,
    /// Page faults served without disk access.
    MinorPageFaults,
    /// Page faults that needed disk access.
    MajorPageFaults,

    /// Total cycles, affected by frequency scaling.
    CpuCycles,
    /// Retired instructions.
    Instructions,
    /// Cache accesses, usually last-level references.
    CacheReferences,
    /// Cache accesses that missed, usually last-level misses.
    CacheMisses,
    /// Retired branch instructions.
    BranchInstructions,
    /// Mispredicted branch instructions.
    BranchMisses,
    /// Bus cycles.
    BusCycles,

    // L1 data cache
    L1dReads,
    L1dReadMisses,
    L1dWrites,
    L1dWriteMisses,
    L1dPrefetches,
    // L1 instruction cache
    L1iReads,
    L1iReadMisses,
    // last-level cache
    LlcReads,
    LlcReadMisses,
    LlcWrites,
    LlcWriteMisses,
    // data TLB
    DtlbReads,
    DtlbReadMisses,
    DtlbWrites,
    DtlbWriteMisses,
    // instruction TLB
    ItlbReads,
    ItlbReadMisses,
    // branch prediction unit
    BpuReads,
    BpuReadMisses,

    /// Monotonic nanoseconds since the tracker was opened.
    WallTime,
}

impl CounterKind {
    /// Total number of kinds, wall time included.
    pub const COUNT: usize = 34;

    /// Number of kinds backed by a kernel handle (all but wall time).
    pub(crate) const SLOTS: usize = Self::COUNT - 1;

    /// Every kind in slot order, wall time last.
    pub const ALL: [CounterKind; Self::COUNT] = [
        Self::CpuClock,
        Self::TaskClock,
        Self::ContextSwitches,
        Self::CpuMigrations,
        Self::PageFaults,
        Self::MinorPageFaults,
        Self::MajorPageFaults,
        Self::CpuCycles,
        Self::Instructions,
        Self::CacheReferences,
        Self::CacheMisses,
        Self::BranchInstructions,
        Self::BranchMisses,
        Self::BusCycles,
        Self::L1dReads,
        Self::L1dReadMisses,
        Self::L1dWrites,
        Self::L1dWriteMisses,
        Self::L1dPrefetches,
        Self::L1iReads,
        Self::L1iReadMisses,
        Self::LlcReads,
        Self::LlcReadMisses,
        Self::LlcWrites,
        Self::LlcWriteMisses,
        Self::DtlbReads,
        Self::DtlbReadMisses,
        Self::DtlbWrites,
        Self::DtlbWriteMisses,
        Self::ItlbReads,
        Self::ItlbReadMisses,
        Self::BpuReads,
        Self::BpuReadMisses,
        Self::WallTime,
    ];

    /// Slot index of this kind.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The kind at `index`, if any.
    pub fn from_index(index: usize) -> Option<CounterKind> {
        Self::ALL.get(index).copied()
    }

    /// Name as it appears in log snapshots, `perf(1)` vocabulary.
    pub const fn name(self) -> &'static str {
        match self {
            Self::CpuClock => "cpu-clock",
            Self::TaskClock => "task-clock",
            Self::ContextSwitches => "context-switches",
            Self::CpuMigrations => "cpu-migrations",
            Self::PageFaults => "page-faults",
            Self::MinorPageFaults => "minor-faults",
            Self::MajorPageFaults => "major-faults",
            Self::CpuCycles => "cpu-cycles",
            Self::Instructions => "instructions",
            Self::CacheReferences => "cache-references",
            Self::CacheMisses => "cache-misses",
            Self::BranchInstructions => "branch-instructions",
            Self::BranchMisses => "branch-misses",
            Self::BusCycles => "bus-cycles",
            Self::L1dReads => "L1-dcache-loads",
            Self::L1dReadMisses => "L1-dcache-load-misses",
            Self::L1dWrites => "L1-dcache-stores",
            Self::L1dWriteMisses => "L1-dcache-store-misses",
            Self::L1dPrefetches => "L1-dcache-prefetches",
            Self::L1iReads => "L1-icache-loads",
            Self::L1iReadMisses => "L1-icache-load-misses",
            Self::LlcReads => "LLC-loads",
            Self::LlcReadMisses => "LLC-load-misses",
            Self::LlcWrites => "LLC-stores",
            Self::LlcWriteMisses => "LLC-store-misses",
            Self::DtlbReads => "dTLB-loads",
            Self::DtlbReadMisses => "dTLB-load-misses",
            Self::DtlbWrites => "dTLB-stores",
            Self::DtlbWriteMisses => "dTLB-store-misses",
            Self::ItlbReads => "iTLB-loads",
            Self::ItlbReadMisses => "iTLB-load-misses",
            Self::BpuReads => "branch-loads",
            Self::BpuReadMisses => "branch-load-misses",
            Self::WallTime => "wall-time",
        }
    }

    /// The kernel event behind this kind, `None` for wall time.
    pub(crate) fn event_config(self) -> Option<EventConfig> {
        let (ty, config) = match self {
            Self::CpuClock => (PERF_TYPE_SOFTWARE, PERF_COUNT_SW_CPU_CLOCK as u64),
            Self::TaskClock => (PERF_TYPE_SOFTWARE, PERF_COUNT_SW_TASK_CLOCK as u64),
            Self::ContextSwitches => (PERF_TYPE_SOFTWARE, PERF_COUNT_SW_CONTEXT_SWITCHES as u64),
            Self::CpuMigrations => (PERF_TYPE_SOFTWARE, PERF_COUNT_SW_CPU_MIGRATIONS as u64),
            Self::PageFaults => (PERF_TYPE_SOFTWARE, PERF_COUNT_SW_PAGE_FAULTS as u64),
            Self::MinorPageFaults => (PERF_TYPE_SOFTWARE, PERF_COUNT_SW_PAGE_FAULTS_MIN as u64),
            Self::MajorPageFaults => (PERF_TYPE_SOFTWARE, PERF_COUNT_SW_PAGE_FAULTS_MAJ as u64),
            Self::CpuCycles => (PERF_TYPE_HARDWARE, PERF_COUNT_HW_CPU_CYCLES as u64),
            Self::Instructions => (PERF_TYPE_HARDWARE, PERF_COUNT_HW_INSTRUCTIONS as u64),
            Self::CacheReferences => (PERF_TYPE_HARDWARE, PERF_COUNT_HW_CACHE_REFERENCES as u64),
            Self::CacheMisses => (PERF_TYPE_HARDWARE, PERF_COUNT_HW_CACHE_MISSES as u64),
            Self::BranchInstructions => {
                (PERF_TYPE_HARDWARE, PERF_COUNT_HW_BRANCH_INSTRUCTIONS as u64)
            }
            Self::BranchMisses => (PERF_TYPE_HARDWARE, PERF_COUNT_HW_BRANCH_MISSES as u64),
            Self::BusCycles => (PERF_TYPE_HARDWARE, PERF_COUNT_HW_BUS_CYCLES as u64),
            Self::L1dReads => cache(PERF_COUNT_HW_CACHE_L1D, READ, ACCESS),
            Self::L1dReadMisses => cache(PERF_COUNT_HW_CACHE_L1D, READ, MISS),
            Self::L1dWrites => cache(PERF_COUNT_HW_CACHE_L1D, WRITE, ACCESS),
            Self::L1dWriteMisses => cache(PERF_COUNT_HW_CACHE_L1D, WRITE, MISS),
            Self::L1dPrefetches => cache(PERF_COUNT_HW_CACHE_L1D, PREFETCH, ACCESS),
            Self::L1iReads => cache(PERF_COUNT_HW_CACHE_L1I, READ, ACCESS),
            Self::L1iReadMisses => cache(PERF_COUNT_HW_CACHE_L1I, READ, MISS),
            Self::LlcReads => cache(PERF_COUNT_HW_CACHE_LL, READ, ACCESS),
            Self::LlcReadMisses => cache(PERF_COUNT_HW_CACHE_LL, READ, MISS),
            Self::LlcWrites => cache(PERF_COUNT_HW_CACHE_LL, WRITE, ACCESS),
            Self::LlcWriteMisses => cache(PERF_COUNT_HW_CACHE_LL, WRITE, MISS),
            Self::DtlbReads => cache(PERF_COUNT_HW_CACHE_DTLB, READ, ACCESS),
            Self::DtlbReadMisses => cache(PERF_COUNT_HW_CACHE_DTLB, READ, MISS),
            Self::DtlbWrites => cache(PERF_COUNT_HW_CACHE_DTLB, WRITE, ACCESS),
            Self::DtlbWriteMisses => cache(PERF_COUNT_HW_CACHE_DTLB, WRITE, MISS),
            Self::ItlbReads => cache(PERF_COUNT_HW_CACHE_ITLB, READ, ACCESS),
            Self::ItlbReadMisses => cache(PERF_COUNT_HW_CACHE_ITLB, READ, MISS),
            Self::BpuReads => cache(PERF_COUNT_HW_CACHE_BPU, READ, ACCESS),
            Self::BpuReadMisses => cache(PERF_COUNT_HW_CACHE_BPU, READ, MISS),
            Self::WallTime => return None,
        };
        Some(EventConfig { ty, config })
    }
}

const READ: u32 = PERF_COUNT_HW_CACHE_OP_READ;
const WRITE: u32 = PERF_COUNT_HW_CACHE_OP_WRITE;
const PREFETCH: u32 = PERF_COUNT_HW_CACHE_OP_PREFETCH;
const ACCESS: u32 = PERF_COUNT_HW_CACHE_RESULT_ACCESS;
const MISS: u32 = PERF_COUNT_HW_CACHE_RESULT_MISS;

// Cache events compose the level, the operation and the result into one
// config word: `id | (op << 8) | (result << 16)`.
const fn cache(id: u32, op: u32, result: u32) -> (u32, u64) {
    (
        PERF_TYPE_HW_CACHE,
        id as u64 | (op as u64) << 8 | (result as u64) << 16,
    )
}
