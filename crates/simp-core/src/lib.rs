//! Cycle-stepped machine model for the SIMP processor.
//!
//! The crate owns the whole machine: register file, instruction and data
//! memories, the memory-mapped I/O register bank, the timer, disk and monitor
//! devices, the external interrupt schedule, interrupt dispatch, and the
//! execute stage. Hosts build a [`CoreState`], load images into it, and drive
//! it with [`step_cycle`] or [`run`]. File formats live outside this crate.

/// Recoverable fault taxonomy.
pub mod fault;
pub use fault::{FaultClass, FaultCode};

/// Register file, program counter, and run state.
pub mod state;
pub use state::{ArchitecturalState, Register, RunState, PC_MASK, REGISTER_COUNT};

/// Instruction and data memories.
pub mod memory;
pub use memory::{
    DataMemory, InstructionMemory, DATA_MEMORY_DEPTH, INSTRUCTION_MASK, INSTRUCTION_MEMORY_DEPTH,
};

pub mod bus;
pub use bus::{width_mask, IoAccess, IoBus, IoRegister, IO_REGISTER_COUNT, IO_REGISTER_WIDTHS};

/// Timer, disk, monitor, and external interrupt source.
pub mod peripherals;
pub use peripherals::{
    Disk, DiskCommand, DiskEvent, DiskState, Irq2Schedule, Monitor, MonitorEvent,
    DEFAULT_DISK_LATENCY_CYCLES, DISK_BYTES, DISK_SECTORS, MONITOR_HEIGHT, MONITOR_WIDTH,
    SECTOR_SIZE,
};

/// Interrupt entry and return.
pub mod interrupt;
pub use interrupt::{dispatch, irq_pending, return_from_interrupt, Dispatch};

/// Opcode table.
pub mod encoding;
pub use encoding::{Opcode, OPCODE_TABLE};

/// Instruction field extraction.
pub mod decoder;
pub use decoder::{encode_instruction, sign_extend_12, DecodedInstruction, Decoder};

/// Execute stage.
pub mod execute;
pub use execute::{execute_instruction, ExecuteOutcome, ExecuteState};

/// Fault counters and activity totals.
pub mod diag;
pub use diag::DiagCoreFields;

/// Host-facing state, configuration, and trace hooks.
pub mod api;
pub use api::{
    CoreConfig, CoreState, CycleOutcome, NullSink, RunOutcome, StopReason, TraceEvent, TraceSink,
};

/// Cycle loop.
pub mod cycle;
pub use cycle::{run, step_cycle};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
