use thiserror::Error;

/// Fault classes used for diagnostics aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FaultClass {
    /// Data memory addressing violation.
    Memory,
    /// I/O register bus addressing violation.
    Io,
    /// Disk controller rejected a request.
    Disk,
    /// Monitor rejected a pixel write.
    Monitor,
    /// Instruction word could not be executed.
    Decode,
}

/// Recoverable runtime faults.
///
/// None of these stop the machine: the offending operation turns into a
/// no-op (reads yield zero, writes and commands are dropped) and execution
/// continues with the next cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum FaultCode {
    /// Data memory word index outside the memory depth.
    #[error("data memory address out of range")]
    InvalidDataAddress = 0x01,
    /// I/O register index outside the register bank.
    #[error("i/o register index out of range")]
    InvalidIoRegister = 0x02,
    /// Disk sector register named a sector past the end of the disk.
    #[error("disk sector out of range")]
    InvalidDiskSector = 0x03,
    /// Disk command register held a value that is neither read nor write.
    #[error("unknown disk command")]
    InvalidDiskCommand = 0x04,
    /// Monitor address decoded to a row or column outside the frame buffer.
    #[error("monitor address outside the frame buffer")]
    InvalidMonitorAddress = 0x05,
    /// Opcode byte does not name an instruction.
    #[error("unsupported opcode")]
    UnsupportedOpcode = 0x06,
}

impl FaultCode {
    /// Converts a fault code to its stable byte value.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Converts a stable byte value back into a fault code.
    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::InvalidDataAddress),
            0x02 => Some(Self::InvalidIoRegister),
            0x03 => Some(Self::InvalidDiskSector),
            0x04 => Some(Self::InvalidDiskCommand),
            0x05 => Some(Self::InvalidMonitorAddress),
            0x06 => Some(Self::UnsupportedOpcode),
            _ => None,
        }
    }

    /// Returns the diagnostics fault class for this fault code.
    #[must_use]
    pub const fn class(self) -> FaultClass {
        match self {
            Self::InvalidDataAddress => FaultClass::Memory,
            Self::InvalidIoRegister => FaultClass::Io,
            Self::InvalidDiskSector | Self::InvalidDiskCommand => FaultClass::Disk,
            Self::InvalidMonitorAddress => FaultClass::Monitor,
            Self::UnsupportedOpcode => FaultClass::Decode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FaultClass, FaultCode};

    #[test]
    fn every_defined_byte_maps_back_to_itself() {
        for code in 0x01u8..=0x06 {
            let fault = FaultCode::from_u8(code).expect("defined taxonomy code");
            assert_eq!(fault.as_u8(), code);
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert!(FaultCode::from_u8(0x00).is_none());
        assert!(FaultCode::from_u8(0x07).is_none());
        assert!(FaultCode::from_u8(0xFF).is_none());
    }

    #[test]
    fn each_code_belongs_to_one_class() {
        assert_eq!(FaultCode::InvalidDataAddress.class(), FaultClass::Memory);
        assert_eq!(FaultCode::InvalidIoRegister.class(), FaultClass::Io);
        assert_eq!(FaultCode::InvalidDiskSector.class(), FaultClass::Disk);
        assert_eq!(FaultCode::InvalidDiskCommand.class(), FaultClass::Disk);
        assert_eq!(FaultCode::InvalidMonitorAddress.class(), FaultClass::Monitor);
        assert_eq!(FaultCode::UnsupportedOpcode.class(), FaultClass::Decode);
    }

    #[test]
    fn display_text_is_lowercase_prose() {
        assert_eq!(
            FaultCode::InvalidIoRegister.to_string(),
            "i/o register index out of range"
        );
    }
}
