//! Host-facing machine state, configuration, and trace hooks.

use crate::bus::{IoBus, IoRegister};
use crate::diag::DiagCoreFields;
use crate::memory::{DataMemory, InstructionMemory};
use crate::peripherals::{
    Disk, Irq2Schedule, Monitor, DEFAULT_DISK_LATENCY_CYCLES, MONITOR_HEIGHT, MONITOR_WIDTH,
};
use crate::state::{ArchitecturalState, RunState, REGISTER_COUNT};
use crate::FaultCode;

/// Top-level immutable configuration for a machine run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CoreConfig {
    /// Stop after this many cycles even without `halt`. `None` runs until halt.
    pub max_cycles: Option<u64>,
    /// Monitor frame buffer width in pixels.
    pub monitor_width: usize,
    /// Monitor frame buffer height in pixels.
    pub monitor_height: usize,
    /// Cycles between accepting a disk command and raising IRQ1.
    pub disk_latency_cycles: u32,
    /// Enables trace callback dispatch.
    pub tracing_enabled: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            max_cycles: None,
            monitor_width: MONITOR_WIDTH,
            monitor_height: MONITOR_HEIGHT,
            disk_latency_cycles: DEFAULT_DISK_LATENCY_CYCLES,
            tracing_enabled: false,
        }
    }
}

/// Complete machine state driven by the cycle loop.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CoreState {
    /// Register file and program counter.
    pub arch: ArchitecturalState,
    /// Program image.
    pub imem: InstructionMemory,
    /// Data memory.
    pub dmem: DataMemory,
    /// Memory-mapped I/O register bank.
    pub io: IoBus,
    /// Disk image and controller.
    pub disk: Disk,
    /// Monitor frame buffer.
    pub monitor: Monitor,
    /// External interrupt schedule.
    pub irq2: Irq2Schedule,
    /// Current execution state.
    pub run_state: RunState,
    /// Cycles executed so far.
    pub cycles: u64,
    /// Fault counters and activity totals.
    pub diag: DiagCoreFields,
}

impl Default for CoreState {
    fn default() -> Self {
        Self::with_config(&CoreConfig::default())
    }
}

impl CoreState {
    /// Creates a zeroed machine sized by `config`.
    #[must_use]
    pub fn with_config(config: &CoreConfig) -> Self {
        Self {
            arch: ArchitecturalState::default(),
            imem: InstructionMemory::default(),
            dmem: DataMemory::default(),
            io: IoBus::default(),
            disk: Disk::new(config.disk_latency_cycles),
            monitor: Monitor::new(config.monitor_width, config.monitor_height),
            irq2: Irq2Schedule::default(),
            run_state: RunState::Running,
            cycles: 0,
            diag: DiagCoreFields::default(),
        }
    }

    /// Returns `true` once `halt` has executed.
    #[must_use]
    pub const fn is_halted(&self) -> bool {
        self.run_state.is_halted()
    }
}

/// Result of one call to [`crate::step_cycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CycleOutcome {
    /// One instruction executed; the machine keeps running.
    Retired,
    /// The machine is halted.
    Halted,
}

/// Why [`crate::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// A `halt` instruction executed.
    Halted,
    /// The configured cycle bound was reached first.
    CycleLimit,
}

/// Aggregated outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunOutcome {
    /// Cycles executed during this call.
    pub cycles: u64,
    /// Why the run stopped.
    pub stop: StopReason,
}

/// Trace events emitted in execution order when tracing is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceEvent {
    /// Snapshot taken after decode, before execute.
    InstructionStart {
        /// Zero-based cycle index.
        cycle: u64,
        /// Program counter used for this fetch.
        pc: u16,
        /// Raw 48-bit instruction word.
        raw: u64,
        /// Register file with the immediates already loaded.
        registers: [u32; REGISTER_COUNT],
    },
    /// `in` or `out` against a valid I/O register.
    IoAccess {
        /// Zero-based cycle index.
        cycle: u64,
        /// Register touched.
        register: IoRegister,
        /// Value read, or value stored after masking.
        value: u32,
        /// True for `out`.
        is_write: bool,
    },
    /// Control was transferred to the interrupt handler.
    InterruptEntered {
        /// Zero-based cycle index.
        cycle: u64,
        /// Program counter saved in `irqreturn`.
        return_pc: u16,
        /// Handler entry address.
        handler: u16,
    },
    /// A recoverable fault was detected and the operation dropped.
    Fault {
        /// Zero-based cycle index.
        cycle: u64,
        /// Program counter when the fault was observed.
        pc: u16,
        /// Fault code.
        cause: FaultCode,
    },
}

/// Sink trait for trace hooks.
pub trait TraceSink {
    /// Records an event in execution order.
    fn on_event(&mut self, event: TraceEvent);
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn on_event(&mut self, _event: TraceEvent) {}
}

impl TraceSink for Vec<TraceEvent> {
    fn on_event(&mut self, event: TraceEvent) {
        self.push(event);
    }
}
