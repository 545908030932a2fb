//! Register file, program counter, and run state of the core.

/// Register file and program counter.
pub mod registers;
/// Run-state machine (running, inside a handler, halted).
pub mod run_state;

pub use registers::{ArchitecturalState, Register, PC_MASK, REGISTER_COUNT};
pub use run_state::RunState;
