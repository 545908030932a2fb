//! Loads the input images, drives the core, and writes every output.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use simp_core::{run, CoreConfig, CoreState, RunOutcome};
use tracing::info;

use crate::errors::{OutputError, SimError};
use crate::image::{load_data, load_disk, load_instructions, load_irq2};
use crate::output::{
    write_cycles, write_data_memory, write_disk, write_file, write_monitor_text,
    write_monitor_yuv, write_registers,
};
use crate::trace::{TraceFiles, TraceStream};

/// Input and output file paths, in command-line order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimPaths {
    /// Instruction memory image.
    pub imemin: PathBuf,
    /// Data memory image.
    pub dmemin: PathBuf,
    /// Disk image.
    pub diskin: PathBuf,
    /// External interrupt schedule.
    pub irq2in: PathBuf,
    /// Final data memory.
    pub dmemout: PathBuf,
    /// Final `R3..R15`.
    pub regout: PathBuf,
    /// Per-instruction trace.
    pub trace: PathBuf,
    /// I/O register access trace.
    pub hwregtrace: PathBuf,
    /// Total cycle count.
    pub cycles: PathBuf,
    /// LED writes.
    pub leds: PathBuf,
    /// Seven-segment display writes.
    pub display7seg: PathBuf,
    /// Final disk image.
    pub diskout: PathBuf,
    /// Monitor pixels as text.
    pub monitor_txt: PathBuf,
    /// Monitor pixels as raw bytes.
    pub monitor_yuv: PathBuf,
}

/// Number of paths a [`SimPaths`] is built from.
pub const SIM_PATH_COUNT: usize = 14;

impl SimPaths {
    /// Builds the path set from exactly 14 paths in command-line order.
    #[must_use]
    pub fn from_array(paths: [PathBuf; SIM_PATH_COUNT]) -> Self {
        let [
            imemin,
            dmemin,
            diskin,
            irq2in,
            dmemout,
            regout,
            trace,
            hwregtrace,
            cycles,
            leds,
            display7seg,
            diskout,
            monitor_txt,
            monitor_yuv,
        ] = paths;
        Self {
            imemin,
            dmemin,
            diskin,
            irq2in,
            dmemout,
            regout,
            trace,
            hwregtrace,
            cycles,
            leds,
            display7seg,
            diskout,
            monitor_txt,
            monitor_yuv,
        }
    }
}

/// Loads every input image into a fresh machine.
///
/// # Errors
///
/// Returns the first [`crate::ImageError`] encountered.
pub fn load_machine(paths: &SimPaths, config: &CoreConfig) -> Result<CoreState, SimError> {
    let mut state = CoreState::with_config(config);
    state.imem = load_instructions(&paths.imemin)?;
    state.dmem = load_data(&paths.dmemin)?;
    state.disk.load(&load_disk(&paths.diskin)?);
    state.irq2 = load_irq2(&paths.irq2in)?;
    Ok(state)
}

/// Runs a complete simulation: load, execute, dump.
///
/// # Errors
///
/// Returns a [`SimError`] when an input fails to load or an output fails to
/// write. Load errors are reported before any output file is touched.
pub fn run_simulation(paths: &SimPaths, config: &CoreConfig) -> Result<RunOutcome, SimError> {
    let mut state = load_machine(paths, config)?;
    info!(irq2_events = state.irq2.pending().len(), "machine loaded");

    let mut traces = TraceFiles::new(
        create(&paths.trace)?,
        create(&paths.hwregtrace)?,
        create(&paths.leds)?,
        create(&paths.display7seg)?,
    );
    let config = CoreConfig {
        tracing_enabled: true,
        ..config.clone()
    };
    let outcome = run(&mut state, &config, &mut traces);
    traces.finish().map_err(|(stream, source)| OutputError {
        path: trace_path(paths, stream).to_path_buf(),
        source,
    })?;

    info!(
        cycles = state.cycles,
        stop = ?outcome.stop,
        faults = state.diag.total_faults(),
        "run finished"
    );

    write_outputs(paths, &state)?;
    Ok(outcome)
}

fn write_outputs(paths: &SimPaths, state: &CoreState) -> Result<(), OutputError> {
    write_file(&paths.dmemout, |out| write_data_memory(out, &state.dmem))?;
    write_file(&paths.regout, |out| write_registers(out, &state.arch))?;
    write_file(&paths.cycles, |out| write_cycles(out, state.cycles))?;
    write_file(&paths.diskout, |out| write_disk(out, &state.disk))?;
    write_file(&paths.monitor_txt, |out| {
        write_monitor_text(out, &state.monitor)
    })?;
    write_file(&paths.monitor_yuv, |out| {
        write_monitor_yuv(out, &state.monitor)
    })
}

fn create(path: &Path) -> Result<BufWriter<File>, OutputError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| OutputError {
            path: path.to_path_buf(),
            source,
        })
}

fn trace_path(paths: &SimPaths, stream: TraceStream) -> &Path {
    match stream {
        TraceStream::Instructions => &paths.trace,
        TraceStream::HwRegisters => &paths.hwregtrace,
        TraceStream::Leds => &paths.leds,
        TraceStream::Display7Seg => &paths.display7seg,
    }
}
