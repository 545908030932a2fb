//! Run diagnostics: recoverable fault counters and activity totals.

use crate::{FaultClass, FaultCode};

/// Counters the core keeps while running. Hosts read them after (or during)
/// a run; every counter saturates instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DiagCoreFields {
    /// Most recent fault, `None` on a clean run.
    pub last_fault_code: Option<FaultCode>,
    /// PC of the instruction that raised the most recent fault.
    pub last_fault_pc: u16,
    /// Zero-based cycle of the most recent fault.
    pub last_fault_cycle: u64,
    /// Out-of-range data memory accesses.
    pub fault_count_memory: u32,
    /// Out-of-range I/O register indices.
    pub fault_count_io: u32,
    /// Refused disk requests.
    pub fault_count_disk: u32,
    /// Refused monitor writes.
    pub fault_count_monitor: u32,
    /// Unassigned opcodes.
    pub fault_count_decode: u32,
    /// Executed instructions, `halt` included.
    pub instruction_count: u64,
    /// Interrupt handler entries.
    pub interrupts_entered: u32,
}

impl DiagCoreFields {
    /// All counters zero, no fault recorded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `code` as the latest fault and bumps its class counter.
    #[allow(clippy::missing_const_for_fn)]
    pub fn record_fault(&mut self, code: FaultCode, pc: u16, cycle: u64) {
        self.last_fault_code = Some(code);
        self.last_fault_pc = pc;
        self.last_fault_cycle = cycle;
        let counter = match code.class() {
            FaultClass::Memory => &mut self.fault_count_memory,
            FaultClass::Io => &mut self.fault_count_io,
            FaultClass::Disk => &mut self.fault_count_disk,
            FaultClass::Monitor => &mut self.fault_count_monitor,
            FaultClass::Decode => &mut self.fault_count_decode,
        };
        *counter = counter.saturating_add(1);
    }

    /// Counts one executed instruction.
    #[allow(clippy::missing_const_for_fn)]
    pub fn increment_instruction_count(&mut self) {
        self.instruction_count = self.instruction_count.saturating_add(1);
    }

    /// Counts one interrupt handler entry.
    #[allow(clippy::missing_const_for_fn)]
    pub fn record_interrupt(&mut self) {
        self.interrupts_entered = self.interrupts_entered.saturating_add(1);
    }

    /// Faults of every class added together.
    #[must_use]
    pub const fn total_faults(&self) -> u64 {
        self.fault_count_memory as u64
            + self.fault_count_io as u64
            + self.fault_count_disk as u64
            + self.fault_count_monitor as u64
            + self.fault_count_decode as u64
    }
}
