//! Split instruction and data memories.

/// Word-addressed data memory.
pub mod data;
/// Read-only 48-bit instruction store.
pub mod instruction;

pub use data::{DataMemory, DATA_MEMORY_DEPTH};
pub use instruction::{InstructionMemory, INSTRUCTION_MASK, INSTRUCTION_MEMORY_DEPTH};
