//! Interrupt dispatch.
//!
//! Three lines (timer, disk, external) share one handler address. The
//! dispatcher only asks whether any enabled line is pending; handler code
//! reads the status registers to find out which one fired and clears it.

use crate::bus::{IoBus, IoRegister};
use crate::state::{ArchitecturalState, RunState};

const IRQ_LINES: [(IoRegister, IoRegister); 3] = [
    (IoRegister::Irq0Enable, IoRegister::Irq0Status),
    (IoRegister::Irq1Enable, IoRegister::Irq1Status),
    (IoRegister::Irq2Enable, IoRegister::Irq2Status),
];

/// Result of one dispatch check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dispatch {
    /// No enabled line is pending.
    None,
    /// A line is pending but a handler is already running.
    Deferred,
    /// Control was transferred to the handler.
    Entered {
        /// Program counter saved into `irqreturn`.
        return_pc: u16,
        /// Handler address taken from `irqhandler`.
        handler: u16,
    },
}

/// Returns `true` when at least one enabled line has its status bit set.
#[must_use]
pub fn irq_pending(bus: &IoBus) -> bool {
    IRQ_LINES
        .iter()
        .any(|(enable, status)| bus.is_set(*enable) && bus.is_set(*status))
}

/// Enters the handler when an enabled line is pending and no handler runs.
pub fn dispatch(
    bus: &mut IoBus,
    arch: &mut ArchitecturalState,
    run_state: &mut RunState,
) -> Dispatch {
    if !irq_pending(bus) {
        return Dispatch::None;
    }
    if run_state.in_isr() {
        return Dispatch::Deferred;
    }

    let return_pc = arch.pc();
    bus.set(IoRegister::IrqReturn, u32::from(return_pc));
    arch.jump_to(bus.get(IoRegister::IrqHandler));
    *run_state = RunState::HandlerContext;

    Dispatch::Entered {
        return_pc,
        handler: arch.pc(),
    }
}

/// Leaves the running handler: `PC ← irqreturn`.
///
/// Pending status bits are left for the handler code or the raising device
/// to clear.
pub fn return_from_interrupt(
    bus: &IoBus,
    arch: &mut ArchitecturalState,
    run_state: &mut RunState,
) {
    arch.jump_to(bus.get(IoRegister::IrqReturn));
    if run_state.in_isr() {
        *run_state = RunState::Running;
    }
}
