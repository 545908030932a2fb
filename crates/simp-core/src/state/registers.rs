/// Number of architecturally visible registers (`R0..R15`).
pub const REGISTER_COUNT: usize = 16;
/// Mask applied to every program counter value (12-bit instruction address).
pub const PC_MASK: u16 = 0x0FFF;

/// Architecturally visible register identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Register {
    R0 = 0,
    R1 = 1,
    R2 = 2,
    R3 = 3,
    R4 = 4,
    R5 = 5,
    R6 = 6,
    R7 = 7,
    R8 = 8,
    R9 = 9,
    R10 = 10,
    R11 = 11,
    R12 = 12,
    R13 = 13,
    R14 = 14,
    R15 = 15,
}

impl Register {
    /// Hard-wired zero register.
    pub const ZERO: Self = Self::R0;
    /// First immediate register, loaded by the decoder.
    pub const IMM1: Self = Self::R1;
    /// Second immediate register, loaded by the decoder.
    pub const IMM2: Self = Self::R2;

    /// Ordered list of all architectural registers.
    pub const ALL: [Self; REGISTER_COUNT] = [
        Self::R0,
        Self::R1,
        Self::R2,
        Self::R3,
        Self::R4,
        Self::R5,
        Self::R6,
        Self::R7,
        Self::R8,
        Self::R9,
        Self::R10,
        Self::R11,
        Self::R12,
        Self::R13,
        Self::R14,
        Self::R15,
    ];

    /// Returns the array index for this register (`0..=15`).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Decodes a 4-bit register field into an architectural register.
    #[must_use]
    pub const fn from_u4(bits: u8) -> Option<Self> {
        if (bits as usize) < REGISTER_COUNT {
            Some(Self::ALL[bits as usize])
        } else {
            None
        }
    }

    /// Returns `true` when general-purpose instructions may write this register.
    #[must_use]
    pub const fn is_writable(self) -> bool {
        !matches!(self, Self::R0 | Self::R1 | Self::R2)
    }
}

/// Register file and program counter of the SIMP core.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ArchitecturalState {
    gpr: [u32; REGISTER_COUNT],
    pc: u16,
}

impl ArchitecturalState {
    /// Reads a register. `R0` always reads zero.
    #[must_use]
    pub const fn gpr(&self, reg: Register) -> u32 {
        self.gpr[reg.index()]
    }

    /// Writes a register on behalf of an instruction.
    ///
    /// Writes to `R0` and to the immediate pair are ignored.
    pub const fn set_gpr(&mut self, reg: Register, value: u32) {
        if reg.is_writable() {
            self.gpr[reg.index()] = value;
        }
    }

    /// Decoder-owned update path for the immediate pair.
    pub const fn set_immediates(&mut self, imm1: u32, imm2: u32) {
        self.gpr[Register::IMM1.index()] = imm1;
        self.gpr[Register::IMM2.index()] = imm2;
    }

    /// Copies the whole register file.
    #[must_use]
    pub const fn registers(&self) -> [u32; REGISTER_COUNT] {
        self.gpr
    }

    /// Reads the program counter.
    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }

    /// Writes the program counter, keeping only the low 12 bits.
    pub const fn set_pc(&mut self, value: u16) {
        self.pc = value & PC_MASK;
    }

    /// Jumps to the low 12 bits of a register value.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn jump_to(&mut self, target: u32) {
        self.pc = (target & PC_MASK as u32) as u16;
    }

    /// Advances the program counter by one slot, wrapping at 4096.
    pub const fn advance_pc(&mut self) {
        self.pc = self.pc.wrapping_add(1) & PC_MASK;
    }
}
