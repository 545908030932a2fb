//! Block disk controller.
//!
//! The transfer itself happens on the cycle the command is accepted; only the
//! completion interrupt is held back by the busy countdown.

use tracing::debug;

use crate::bus::{IoBus, IoRegister};
use crate::memory::DataMemory;
use crate::FaultCode;

/// Number of sectors on the disk.
pub const DISK_SECTORS: usize = 128;
/// Bytes per sector.
pub const SECTOR_SIZE: usize = 512;
/// Total disk capacity in bytes.
pub const DISK_BYTES: usize = DISK_SECTORS * SECTOR_SIZE;
/// Cycles between accepting a command and raising IRQ1.
pub const DEFAULT_DISK_LATENCY_CYCLES: u32 = 1024;

const BYTES_PER_WORD: usize = 4;

/// Operation requested through `diskcmd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DiskCommand {
    /// Copy a sector into data memory.
    Read,
    /// Copy data memory into a sector.
    Write,
}

impl DiskCommand {
    /// Decodes a `diskcmd` value. Zero and unknown values yield `None`.
    #[must_use]
    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            1 => Some(Self::Read),
            2 => Some(Self::Write),
            _ => None,
        }
    }
}

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DiskState {
    /// Accepting commands.
    #[default]
    Ready,
    /// Transfer done, completion pending.
    Busy {
        /// Cycles left before completion.
        remaining: u32,
    },
}

/// What one controller tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiskEvent {
    /// Ready with no command, or a rejected command still latched.
    Idle,
    /// Counting down an in-flight command.
    Busy {
        /// Cycles left after this tick.
        remaining: u32,
    },
    /// A command was accepted and its transfer performed.
    Started {
        /// Accepted command.
        command: DiskCommand,
        /// Sector transferred.
        sector: u32,
        /// Buffer words that fell outside data memory.
        faulted_words: u16,
    },
    /// The countdown expired and IRQ1 was raised.
    Completed,
    /// A new request was refused.
    Rejected(FaultCode),
}

/// Disk image plus controller state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Disk {
    data: Box<[u8]>,
    state: DiskState,
    latency: u32,
    last_rejected: Option<(u32, u32)>,
}

impl Default for Disk {
    fn default() -> Self {
        Self::new(DEFAULT_DISK_LATENCY_CYCLES)
    }
}

impl Disk {
    /// Creates an empty disk with the given completion latency.
    #[must_use]
    pub fn new(latency: u32) -> Self {
        Self {
            data: vec![0; DISK_BYTES].into_boxed_slice(),
            state: DiskState::Ready,
            latency,
            last_rejected: None,
        }
    }

    /// Copies an image onto the disk starting at sector 0, byte 0.
    ///
    /// Bytes past the disk capacity are ignored.
    pub fn load(&mut self, image: &[u8]) {
        for (slot, byte) in self.data.iter_mut().zip(image) {
            *slot = *byte;
        }
    }

    /// Returns the whole disk image, sector after sector.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns one sector, or `None` past the end of the disk.
    #[must_use]
    pub fn sector(&self, sector: usize) -> Option<&[u8]> {
        self.data.chunks_exact(SECTOR_SIZE).nth(sector)
    }

    /// Returns the controller state.
    #[must_use]
    pub const fn state(&self) -> DiskState {
        self.state
    }

    /// Runs one controller cycle against the register bank and data memory.
    pub fn tick(&mut self, bus: &mut IoBus, memory: &mut DataMemory) -> DiskEvent {
        if let DiskState::Busy { remaining } = self.state {
            let remaining = remaining.saturating_sub(1);
            if remaining > 0 {
                self.state = DiskState::Busy { remaining };
                return DiskEvent::Busy { remaining };
            }

            self.state = DiskState::Ready;
            bus.set(IoRegister::DiskCmd, 0);
            bus.set(IoRegister::DiskStatus, 0);
            bus.set(IoRegister::Irq1Status, 1);
            debug!("disk operation complete");
            return DiskEvent::Completed;
        }

        let raw_command = bus.get(IoRegister::DiskCmd);
        if raw_command == 0 {
            self.last_rejected = None;
            return DiskEvent::Idle;
        }

        let sector = bus.get(IoRegister::DiskSector);
        let request = validate_request(raw_command, sector);
        let (command, sector_index) = match request {
            Ok(accepted) => accepted,
            Err(cause) => {
                // A refused request stays latched in the registers until the
                // program changes them; report it once.
                if self.last_rejected == Some((raw_command, sector)) {
                    return DiskEvent::Idle;
                }
                self.last_rejected = Some((raw_command, sector));
                return DiskEvent::Rejected(cause);
            }
        };
        self.last_rejected = None;

        let buffer = bus.get(IoRegister::DiskBuffer);
        let faulted_words = match command {
            DiskCommand::Read => self.read_sector(sector_index, buffer, memory),
            DiskCommand::Write => self.write_sector(sector_index, buffer, memory),
        };

        self.state = DiskState::Busy {
            remaining: self.latency.max(1),
        };
        bus.set(IoRegister::DiskStatus, 1);
        debug!(?command, sector, buffer, "disk command accepted");

        DiskEvent::Started {
            command,
            sector,
            faulted_words,
        }
    }

    fn read_sector(&self, sector: usize, buffer: u32, memory: &mut DataMemory) -> u16 {
        let base = sector * SECTOR_SIZE;
        let mut faulted = 0_u16;

        for (word_offset, chunk) in self.data[base..base + SECTOR_SIZE]
            .chunks_exact(BYTES_PER_WORD)
            .enumerate()
        {
            let addr = word_address(buffer, word_offset);
            let Ok(mut word) = memory.read(addr) else {
                faulted += 1;
                continue;
            };
            for (byte_index, byte) in chunk.iter().enumerate() {
                let shift = byte_shift(byte_index);
                word = (word & !(0xFF << shift)) | (u32::from(*byte) << shift);
            }
            if memory.write(addr, word).is_err() {
                faulted += 1;
            }
        }

        faulted
    }

    fn write_sector(&mut self, sector: usize, buffer: u32, memory: &DataMemory) -> u16 {
        let base = sector * SECTOR_SIZE;
        let mut faulted = 0_u16;

        for (word_offset, chunk) in self.data[base..base + SECTOR_SIZE]
            .chunks_exact_mut(BYTES_PER_WORD)
            .enumerate()
        {
            let word = memory
                .read(word_address(buffer, word_offset))
                .unwrap_or_else(|_| {
                    faulted += 1;
                    0
                });
            for (byte_index, byte) in chunk.iter_mut().enumerate() {
                *byte = (word >> byte_shift(byte_index)).to_be_bytes()[3];
            }
        }

        faulted
    }
}

fn validate_request(raw_command: u32, sector: u32) -> Result<(DiskCommand, usize), FaultCode> {
    let command = DiskCommand::from_u32(raw_command).ok_or(FaultCode::InvalidDiskCommand)?;
    let index = usize::try_from(sector)
        .ok()
        .filter(|index| *index < DISK_SECTORS)
        .ok_or(FaultCode::InvalidDiskSector)?;
    Ok((command, index))
}

#[allow(clippy::cast_possible_truncation)]
const fn word_address(buffer: u32, word_offset: usize) -> u32 {
    buffer.wrapping_add(word_offset as u32)
}

// Byte 0 of each word is the most significant.
#[allow(clippy::cast_possible_truncation)]
const fn byte_shift(byte_index: usize) -> u32 {
    ((BYTES_PER_WORD - 1 - byte_index) * 8) as u32
}
