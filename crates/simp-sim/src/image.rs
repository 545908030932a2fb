//! Line-oriented input image readers.
//!
//! Every image holds one value per line. Blank lines are skipped, lines past
//! the target's capacity are ignored, and anything else that fails to parse
//! aborts the load with the file name and line number.

use std::fs;
use std::path::Path;

use simp_core::{
    DataMemory, InstructionMemory, Irq2Schedule, DATA_MEMORY_DEPTH, DISK_BYTES,
    INSTRUCTION_MEMORY_DEPTH,
};

use crate::errors::ImageError;

const INSTRUCTION_DIGITS: usize = 12;
const DATA_DIGITS: usize = 8;
const DISK_DIGITS: usize = 2;

/// Reads a whole image file.
///
/// # Errors
///
/// Returns [`ImageError::Io`] when the file cannot be read.
pub fn read_image(path: &Path) -> Result<String, ImageError> {
    fs::read_to_string(path).map_err(|source| ImageError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses an instruction image: up to 12 hex digits per line.
///
/// # Errors
///
/// Returns [`ImageError::Parse`] on the first malformed line.
pub fn parse_instructions(path: &Path, text: &str) -> Result<InstructionMemory, ImageError> {
    let words = parse_lines(path, text, INSTRUCTION_MEMORY_DEPTH, |value| {
        parse_hex(value, INSTRUCTION_DIGITS)
    })?;
    Ok(InstructionMemory::from_words(&words))
}

/// Parses a data memory image: up to 8 hex digits per line.
///
/// # Errors
///
/// Returns [`ImageError::Parse`] on the first malformed line.
pub fn parse_data(path: &Path, text: &str) -> Result<DataMemory, ImageError> {
    let words = parse_lines(path, text, DATA_MEMORY_DEPTH, |value| {
        parse_hex(value, DATA_DIGITS).and_then(|word| u32::try_from(word).ok())
    })?;
    Ok(DataMemory::from_words(&words))
}

/// Parses a disk image: one hex byte per line, sectors in order.
///
/// # Errors
///
/// Returns [`ImageError::Parse`] on the first malformed line.
pub fn parse_disk(path: &Path, text: &str) -> Result<Vec<u8>, ImageError> {
    parse_lines(path, text, DISK_BYTES, |value| {
        parse_hex(value, DISK_DIGITS).and_then(|byte| u8::try_from(byte).ok())
    })
}

/// Parses the external interrupt schedule: one decimal cycle number per line.
///
/// Entries are sorted so an out-of-order file still fires every listed cycle.
///
/// # Errors
///
/// Returns [`ImageError::Parse`] on the first malformed line.
pub fn parse_irq2(path: &Path, text: &str) -> Result<Irq2Schedule, ImageError> {
    let mut cycles = parse_lines(path, text, usize::MAX, |value| value.parse::<u64>().ok())?;
    cycles.sort_unstable();
    Ok(Irq2Schedule::new(cycles))
}

/// Reads and parses an instruction image file.
///
/// # Errors
///
/// Returns an [`ImageError`] when the file is unreadable or malformed.
pub fn load_instructions(path: &Path) -> Result<InstructionMemory, ImageError> {
    parse_instructions(path, &read_image(path)?)
}

/// Reads and parses a data memory image file.
///
/// # Errors
///
/// Returns an [`ImageError`] when the file is unreadable or malformed.
pub fn load_data(path: &Path) -> Result<DataMemory, ImageError> {
    parse_data(path, &read_image(path)?)
}

/// Reads and parses a disk image file.
///
/// # Errors
///
/// Returns an [`ImageError`] when the file is unreadable or malformed.
pub fn load_disk(path: &Path) -> Result<Vec<u8>, ImageError> {
    parse_disk(path, &read_image(path)?)
}

/// Reads and parses an external interrupt schedule file.
///
/// # Errors
///
/// Returns an [`ImageError`] when the file is unreadable or malformed.
pub fn load_irq2(path: &Path) -> Result<Irq2Schedule, ImageError> {
    parse_irq2(path, &read_image(path)?)
}

fn parse_lines<T>(
    path: &Path,
    text: &str,
    capacity: usize,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Vec<T>, ImageError> {
    let mut values = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if values.len() == capacity {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value = parse(trimmed).ok_or_else(|| ImageError::Parse {
            path: path.to_path_buf(),
            line: index + 1,
            text: trimmed.to_string(),
        })?;
        values.push(value);
    }
    Ok(values)
}

fn parse_hex(text: &str, max_digits: usize) -> Option<u64> {
    if text.len() > max_digits || !text.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return None;
    }
    u64::from_str_radix(text, 16).ok()
}
