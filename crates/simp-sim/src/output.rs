//! End-of-run dumps of machine state.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use simp_core::{ArchitecturalState, DataMemory, Disk, Monitor, Register};

use crate::errors::OutputError;

/// First register written to the register dump. `R0..R2` are not saved.
const FIRST_SAVED_REGISTER: usize = 3;

/// Writes every data memory word as `%08X`, one per line.
///
/// # Errors
///
/// Propagates write failures from `out`.
pub fn write_data_memory(out: &mut impl Write, memory: &DataMemory) -> io::Result<()> {
    for word in memory.words() {
        writeln!(out, "{word:08X}")?;
    }
    Ok(())
}

/// Writes `R3..R15` as `%08X`, one per line.
///
/// # Errors
///
/// Propagates write failures from `out`.
pub fn write_registers(out: &mut impl Write, arch: &ArchitecturalState) -> io::Result<()> {
    for reg in &Register::ALL[FIRST_SAVED_REGISTER..] {
        writeln!(out, "{:08X}", arch.gpr(*reg))?;
    }
    Ok(())
}

/// Writes the cycle count in decimal.
///
/// # Errors
///
/// Propagates write failures from `out`.
pub fn write_cycles(out: &mut impl Write, cycles: u64) -> io::Result<()> {
    writeln!(out, "{cycles}")
}

/// Writes every disk byte as `%02X`, one per line.
///
/// # Errors
///
/// Propagates write failures from `out`.
pub fn write_disk(out: &mut impl Write, disk: &Disk) -> io::Result<()> {
    write_byte_lines(out, disk.bytes())
}

/// Writes every pixel as `%02X`, one per line, row-major.
///
/// # Errors
///
/// Propagates write failures from `out`.
pub fn write_monitor_text(out: &mut impl Write, monitor: &Monitor) -> io::Result<()> {
    write_byte_lines(out, monitor.pixels())
}

/// Writes the raw row-major pixel bytes.
///
/// # Errors
///
/// Propagates write failures from `out`.
pub fn write_monitor_yuv(out: &mut impl Write, monitor: &Monitor) -> io::Result<()> {
    out.write_all(monitor.pixels())
}

/// Creates `path` and hands a buffered writer to `body`.
///
/// # Errors
///
/// Returns an [`OutputError`] naming `path` when creating, writing, or
/// flushing fails.
pub fn write_file(
    path: &Path,
    body: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>,
) -> Result<(), OutputError> {
    let attempt = || -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        body(&mut out)?;
        out.flush()
    };
    attempt().map_err(|source| OutputError {
        path: path.to_path_buf(),
        source,
    })
}

fn write_byte_lines(out: &mut impl Write, bytes: &[u8]) -> io::Result<()> {
    for byte in bytes {
        writeln!(out, "{byte:02X}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        write_cycles, write_data_memory, write_disk, write_monitor_text, write_monitor_yuv,
        write_registers,
    };
    use simp_core::{ArchitecturalState, DataMemory, Disk, Monitor, Register};

    fn render(f: impl FnOnce(&mut Vec<u8>) -> std::io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).expect("writing to a Vec cannot fail");
        String::from_utf8(out).expect("dumps are ASCII")
    }

    #[test]
    fn data_dump_has_one_line_per_word() {
        let memory = DataMemory::from_words(&[0xDEAD_BEEF, 7]);
        let text = render(|out| write_data_memory(out, &memory));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4096);
        assert_eq!(lines[0], "DEADBEEF");
        assert_eq!(lines[1], "00000007");
        assert_eq!(lines[4095], "00000000");
    }

    #[test]
    fn register_dump_skips_r0_to_r2() {
        let mut arch = ArchitecturalState::default();
        arch.set_immediates(0x111, 0x222);
        arch.set_gpr(Register::R3, 0xA);
        arch.set_gpr(Register::R15, 0xFFFF_FFFF);
        let text = render(|out| write_registers(out, &arch));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0], "0000000A");
        assert_eq!(lines[12], "FFFFFFFF");
    }

    #[test]
    fn cycles_are_decimal() {
        assert_eq!(render(|out| write_cycles(out, 1030)), "1030\n");
    }

    #[test]
    fn disk_dump_covers_every_byte() {
        let mut disk = Disk::default();
        disk.load(&[0xAB, 0x01]);
        let text = render(|out| write_disk(out, &disk));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 128 * 512);
        assert_eq!(&lines[..3], &["AB", "01", "00"]);
    }

    #[test]
    fn monitor_dumps_are_row_major() {
        let monitor = Monitor::new(2, 2);
        let text = render(|out| write_monitor_text(out, &monitor));
        assert_eq!(text, "00\n00\n00\n00\n");

        let mut raw = Vec::new();
        write_monitor_yuv(&mut raw, &monitor).expect("vec write");
        assert_eq!(raw, vec![0; 4]);
    }
}
