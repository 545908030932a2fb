//! Opcode table for the SIMP instruction set.

/// Instruction opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum Opcode {
    /// `rd ← rs + rt + rm`
    Add = 0,
    /// `rd ← rs - rt - rm`
    Sub = 1,
    /// `rd ← rs * rt + rm`
    Mac = 2,
    /// `rd ← rs & rt & rm`
    And = 3,
    /// `rd ← rs | rt | rm`
    Or = 4,
    /// `rd ← rs ^ rt ^ rm`
    Xor = 5,
    /// `rd ← rs << rt`
    Sll = 6,
    /// `rd ← rs >> rt`, sign-propagating.
    Sra = 7,
    /// `rd ← rs >> rt`, zero-filling.
    Srl = 8,
    /// Branch if `rs == rt`.
    Beq = 9,
    /// Branch if `rs != rt`.
    Bne = 10,
    /// Branch if `rs < rt` (signed).
    Blt = 11,
    /// Branch if `rs > rt` (signed).
    Bgt = 12,
    /// Branch if `rs <= rt` (signed).
    Ble = 13,
    /// Branch if `rs >= rt` (signed).
    Bge = 14,
    /// `rd ← PC + 1; PC ← rm`
    Jal = 15,
    /// `rd ← mem[rs + rt] + rm`
    Lw = 16,
    /// `mem[rs + rt] ← rm + rd`
    Sw = 17,
    /// Return from interrupt.
    Reti = 18,
    /// `rd ← io[rs + rt]`
    In = 19,
    /// `io[rs + rt] ← rm`
    Out = 20,
    /// Stop the machine.
    Halt = 21,
}

/// Opcode byte to opcode mapping, in encoding order.
pub const OPCODE_TABLE: [(u8, Opcode); 22] = [
    (0, Opcode::Add),
    (1, Opcode::Sub),
    (2, Opcode::Mac),
    (3, Opcode::And),
    (4, Opcode::Or),
    (5, Opcode::Xor),
    (6, Opcode::Sll),
    (7, Opcode::Sra),
    (8, Opcode::Srl),
    (9, Opcode::Beq),
    (10, Opcode::Bne),
    (11, Opcode::Blt),
    (12, Opcode::Bgt),
    (13, Opcode::Ble),
    (14, Opcode::Bge),
    (15, Opcode::Jal),
    (16, Opcode::Lw),
    (17, Opcode::Sw),
    (18, Opcode::Reti),
    (19, Opcode::In),
    (20, Opcode::Out),
    (21, Opcode::Halt),
];

impl Opcode {
    /// Resolves an opcode byte. Unassigned values yield `None`.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        if (value as usize) < OPCODE_TABLE.len() {
            Some(OPCODE_TABLE[value as usize].1)
        } else {
            None
        }
    }

    /// Encoded opcode byte.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Assembly mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mac => "mac",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Sll => "sll",
            Self::Sra => "sra",
            Self::Srl => "srl",
            Self::Beq => "beq",
            Self::Bne => "bne",
            Self::Blt => "blt",
            Self::Bgt => "bgt",
            Self::Ble => "ble",
            Self::Bge => "bge",
            Self::Jal => "jal",
            Self::Lw => "lw",
            Self::Sw => "sw",
            Self::Reti => "reti",
            Self::In => "in",
            Self::Out => "out",
            Self::Halt => "halt",
        }
    }
}
