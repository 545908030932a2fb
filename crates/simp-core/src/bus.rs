//! Memory-mapped I/O register bank.
//!
//! The bank is the only state shared between the CPU and the devices. Every
//! store goes through the width table, so a slot never holds bits beyond its
//! declared width.

use crate::FaultCode;

/// Number of addressable I/O registers.
pub const IO_REGISTER_COUNT: usize = 23;

/// Declared bit width of each I/O register, indexed by register number.
pub const IO_REGISTER_WIDTHS: [u8; IO_REGISTER_COUNT] = [
    1, 1, 1, 1, 1, 1, 12, 12, 32, 32, 32, 1, 32, 32, 2, 7, 12, 1, 32, 32, 16, 8, 1,
];

/// Named I/O register slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum IoRegister {
    /// Timer interrupt enable.
    Irq0Enable = 0,
    /// Disk interrupt enable.
    Irq1Enable = 1,
    /// External interrupt enable.
    Irq2Enable = 2,
    /// Timer interrupt pending.
    Irq0Status = 3,
    /// Disk interrupt pending.
    Irq1Status = 4,
    /// External interrupt pending.
    Irq2Status = 5,
    /// Interrupt handler entry address.
    IrqHandler = 6,
    /// Address saved on interrupt entry.
    IrqReturn = 7,
    /// Free-running cycle counter.
    Clks = 8,
    /// LED bank.
    Leds = 9,
    /// Seven-segment display.
    Display7Seg = 10,
    /// Timer enable.
    TimerEnable = 11,
    /// Timer count.
    TimerCurrent = 12,
    /// Timer period.
    TimerMax = 13,
    /// Disk command (0 none, 1 read, 2 write).
    DiskCmd = 14,
    /// Disk sector number.
    DiskSector = 15,
    /// Data memory address of the disk transfer buffer.
    DiskBuffer = 16,
    /// Disk status (0 ready, 1 busy).
    DiskStatus = 17,
    /// Reserved.
    Reserved0 = 18,
    /// Reserved.
    Reserved1 = 19,
    /// Monitor linear pixel address.
    MonitorAddr = 20,
    /// Monitor pixel value.
    MonitorData = 21,
    /// Monitor command (1 write pixel).
    MonitorCmd = 22,
}

impl IoRegister {
    /// Ordered list of all registers.
    pub const ALL: [Self; IO_REGISTER_COUNT] = [
        Self::Irq0Enable,
        Self::Irq1Enable,
        Self::Irq2Enable,
        Self::Irq0Status,
        Self::Irq1Status,
        Self::Irq2Status,
        Self::IrqHandler,
        Self::IrqReturn,
        Self::Clks,
        Self::Leds,
        Self::Display7Seg,
        Self::TimerEnable,
        Self::TimerCurrent,
        Self::TimerMax,
        Self::DiskCmd,
        Self::DiskSector,
        Self::DiskBuffer,
        Self::DiskStatus,
        Self::Reserved0,
        Self::Reserved1,
        Self::MonitorAddr,
        Self::MonitorData,
        Self::MonitorCmd,
    ];

    /// Returns the bank index of this register.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Resolves a bus index computed by an instruction.
    #[must_use]
    pub const fn from_index(index: u32) -> Option<Self> {
        if (index as usize) < IO_REGISTER_COUNT {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Declared bit width of this register.
    #[must_use]
    pub const fn width(self) -> u8 {
        IO_REGISTER_WIDTHS[self.index()]
    }

    /// Lower-case register name as it appears in hardware traces.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Irq0Enable => "irq0enable",
            Self::Irq1Enable => "irq1enable",
            Self::Irq2Enable => "irq2enable",
            Self::Irq0Status => "irq0status",
            Self::Irq1Status => "irq1status",
            Self::Irq2Status => "irq2status",
            Self::IrqHandler => "irqhandler",
            Self::IrqReturn => "irqreturn",
            Self::Clks => "clks",
            Self::Leds => "leds",
            Self::Display7Seg => "display7seg",
            Self::TimerEnable => "timerenable",
            Self::TimerCurrent => "timercurrent",
            Self::TimerMax => "timermax",
            Self::DiskCmd => "diskcmd",
            Self::DiskSector => "disksector",
            Self::DiskBuffer => "diskbuffer",
            Self::DiskStatus => "diskstatus",
            Self::Reserved0 => "reserved0",
            Self::Reserved1 => "reserved1",
            Self::MonitorAddr => "monitoraddr",
            Self::MonitorData => "monitordata",
            Self::MonitorCmd => "monitorcmd",
        }
    }
}

/// Returns the storage mask for a bit width, or `None` for width 0
/// (reserved slot, writes are dropped).
#[must_use]
pub const fn width_mask(width: u8) -> Option<u32> {
    match width {
        0 => None,
        32..=u8::MAX => Some(u32::MAX),
        bits => Some((1_u32 << bits) - 1),
    }
}

/// One CPU access to the register bank, reported for hardware tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IoAccess {
    /// Register touched.
    pub register: IoRegister,
    /// Value read, or value stored after masking.
    pub value: u32,
    /// True for `out`, false for `in`.
    pub is_write: bool,
}

/// The I/O register bank.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct IoBus {
    regs: [u32; IO_REGISTER_COUNT],
}

impl IoBus {
    /// Reads a register by bus index.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::InvalidIoRegister`] for indices outside the bank.
    pub fn read(&self, index: u32) -> Result<u32, FaultCode> {
        IoRegister::from_index(index)
            .map(|reg| self.get(reg))
            .ok_or(FaultCode::InvalidIoRegister)
    }

    /// Writes a register by bus index, masked to the register width.
    ///
    /// Returns the value actually stored.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::InvalidIoRegister`] for indices outside the bank;
    /// nothing is stored in that case.
    pub fn write(&mut self, index: u32, value: u32) -> Result<u32, FaultCode> {
        let reg = IoRegister::from_index(index).ok_or(FaultCode::InvalidIoRegister)?;
        self.set(reg, value);
        Ok(self.get(reg))
    }

    /// Reads a named register.
    #[must_use]
    pub const fn get(&self, reg: IoRegister) -> u32 {
        self.regs[reg.index()]
    }

    /// Writes a named register, masked to its width.
    pub const fn set(&mut self, reg: IoRegister, value: u32) {
        if let Some(mask) = width_mask(reg.width()) {
            self.regs[reg.index()] = value & mask;
        }
    }

    /// Returns `true` when a named register holds a non-zero value.
    #[must_use]
    pub const fn is_set(&self, reg: IoRegister) -> bool {
        self.get(reg) != 0
    }

    /// Copies the whole register bank.
    #[must_use]
    pub const fn registers(&self) -> [u32; IO_REGISTER_COUNT] {
        self.regs
    }
}
