//! File-driven host for the SIMP machine model.
//!
//! Reads the instruction, data, disk, and external interrupt images, runs the
//! machine from `simp-core` to completion, and writes the traces and final
//! state dumps.

/// Error types.
pub mod errors;
pub use errors::{ImageError, OutputError, SimError};

/// Input image parsing.
pub mod image;
pub use image::{load_data, load_disk, load_instructions, load_irq2};

/// Final state dumps.
pub mod output;

/// Trace file writers.
pub mod trace;
pub use trace::{TraceFiles, TraceStream};

/// End-to-end run orchestration.
pub mod run;
pub use run::{load_machine, run_simulation, SimPaths, SIM_PATH_COUNT};

#[cfg(test)]
use tempfile as _;
use tracing_subscriber as _;
