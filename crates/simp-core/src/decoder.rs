//! Instruction decoder.
//!
//! Layout of a 48-bit instruction word, most significant bits first:
//!
//! ```text
//! 47      40 39  36 35  32 31  28 27  24 23        12 11         0
//! | opcode  |  rd  |  rs  |  rt  |  rm  |    imm1    |    imm2    |
//! ```

#![allow(missing_docs)]

use crate::encoding::Opcode;
use crate::memory::INSTRUCTION_MASK;
use crate::state::Register;

const IMMEDIATE_BITS: u32 = 12;
const IMMEDIATE_MASK: u64 = 0xFFF;

/// Decoded instruction with all extracted fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedInstruction {
    /// The raw 48-bit word this was decoded from.
    pub raw: u64,
    /// Opcode byte, possibly unassigned.
    pub opcode: u8,
    pub rd: Register,
    pub rs: Register,
    pub rt: Register,
    pub rm: Register,
    /// Sign-extended first immediate.
    pub imm1: u32,
    /// Sign-extended second immediate.
    pub imm2: u32,
}

impl DecodedInstruction {
    /// Resolves the opcode byte.
    #[must_use]
    pub const fn operation(&self) -> Option<Opcode> {
        Opcode::from_u8(self.opcode)
    }
}

pub struct Decoder;

impl Decoder {
    /// Splits a 48-bit word into its fields. Every word decodes; unassigned
    /// opcodes surface at execute time.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn decode(raw: u64) -> DecodedInstruction {
        let raw = raw & INSTRUCTION_MASK;
        DecodedInstruction {
            raw,
            opcode: (raw >> 40) as u8,
            rd: register_field(raw, 36),
            rs: register_field(raw, 32),
            rt: register_field(raw, 28),
            rm: register_field(raw, 24),
            imm1: sign_extend_12(((raw >> 12) & IMMEDIATE_MASK) as u32),
            imm2: sign_extend_12((raw & IMMEDIATE_MASK) as u32),
        }
    }
}

/// Assembles a 48-bit instruction word. Immediates keep their low 12 bits.
#[must_use]
pub const fn encode_instruction(
    opcode: u8,
    rd: Register,
    rs: Register,
    rt: Register,
    rm: Register,
    imm1: u32,
    imm2: u32,
) -> u64 {
    ((opcode as u64) << 40)
        | ((rd as u64) << 36)
        | ((rs as u64) << 32)
        | ((rt as u64) << 28)
        | ((rm as u64) << 24)
        | ((imm1 as u64 & IMMEDIATE_MASK) << 12)
        | (imm2 as u64 & IMMEDIATE_MASK)
}

/// Sign-extends a 12-bit field to 32 bits.
#[must_use]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
pub const fn sign_extend_12(value: u32) -> u32 {
    let shift = 32 - IMMEDIATE_BITS;
    (((value << shift) as i32) >> shift) as u32
}

#[allow(clippy::cast_possible_truncation)]
const fn register_field(raw: u64, shift: u32) -> Register {
    match Register::from_u4(((raw >> shift) & 0xF) as u8) {
        Some(reg) => reg,
        None => Register::R0,
    }
}
