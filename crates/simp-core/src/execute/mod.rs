//! Execute stage for the SIMP instruction set.
//!
//! Operands are read from the register file once, before any side effect, so
//! an instruction naming the same register as source and destination sees the
//! old value. Every instruction except taken branches, `jal`, `reti` and
//! `halt` falls through to `PC + 1`.

#![allow(missing_docs)]

use crate::bus::{IoAccess, IoRegister};
use crate::decoder::DecodedInstruction;
use crate::encoding::Opcode;
use crate::interrupt::return_from_interrupt;
use crate::state::{ArchitecturalState, RunState};
use crate::{CoreState, FaultCode};

/// Outcome of executing a single instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteOutcome {
    /// Instruction retired; the machine keeps running.
    Retired,
    /// `halt` executed.
    Halted,
}

/// Side effects the cycle loop reports after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecuteState {
    /// I/O register access performed by `in` or `out`.
    pub io_access: Option<IoAccess>,
    /// Recoverable fault raised by this instruction.
    pub fault: Option<FaultCode>,
}

#[derive(Debug, Clone, Copy)]
struct Operands {
    rd: u32,
    rs: u32,
    rt: u32,
    rm: u32,
}

impl Operands {
    const fn read(instr: &DecodedInstruction, arch: &ArchitecturalState) -> Self {
        Self {
            rd: arch.gpr(instr.rd),
            rs: arch.gpr(instr.rs),
            rt: arch.gpr(instr.rt),
            rm: arch.gpr(instr.rm),
        }
    }
}

/// Executes one decoded instruction against the machine state.
///
/// The decoder must already have loaded the immediates into `R1`/`R2`.
pub fn execute_instruction(
    instr: &DecodedInstruction,
    state: &mut CoreState,
) -> (ExecuteOutcome, ExecuteState) {
    let mut exec = ExecuteState::default();

    let Some(opcode) = instr.operation() else {
        exec.fault = Some(FaultCode::UnsupportedOpcode);
        state.arch.advance_pc();
        return (ExecuteOutcome::Retired, exec);
    };

    let ops = Operands::read(instr, &state.arch);
    match opcode {
        Opcode::Add
        | Opcode::Sub
        | Opcode::Mac
        | Opcode::And
        | Opcode::Or
        | Opcode::Xor
        | Opcode::Sll
        | Opcode::Sra
        | Opcode::Srl => {
            state.arch.set_gpr(instr.rd, alu(opcode, ops));
            state.arch.advance_pc();
        }
        Opcode::Beq | Opcode::Bne | Opcode::Blt | Opcode::Bgt | Opcode::Ble | Opcode::Bge => {
            if branch_taken(opcode, ops.rs, ops.rt) {
                state.arch.jump_to(ops.rm);
            } else {
                state.arch.advance_pc();
            }
        }
        Opcode::Jal => {
            let link = u32::from(state.arch.pc()) + 1;
            state.arch.set_gpr(instr.rd, link);
            state.arch.jump_to(ops.rm);
        }
        Opcode::Lw => {
            let loaded = state
                .dmem
                .read(ops.rs.wrapping_add(ops.rt))
                .unwrap_or_else(|cause| {
                    exec.fault = Some(cause);
                    0
                });
            state.arch.set_gpr(instr.rd, loaded.wrapping_add(ops.rm));
            state.arch.advance_pc();
        }
        Opcode::Sw => {
            let addr = ops.rs.wrapping_add(ops.rt);
            if let Err(cause) = state.dmem.write(addr, ops.rm.wrapping_add(ops.rd)) {
                exec.fault = Some(cause);
            }
            state.arch.advance_pc();
        }
        Opcode::Reti => {
            return_from_interrupt(&state.io, &mut state.arch, &mut state.run_state);
        }
        Opcode::In => {
            let index = ops.rs.wrapping_add(ops.rt);
            let value = match state.io.read(index) {
                Ok(value) => {
                    exec.io_access = io_access(index, value, false);
                    value
                }
                Err(cause) => {
                    exec.fault = Some(cause);
                    0
                }
            };
            state.arch.set_gpr(instr.rd, value);
            state.arch.advance_pc();
        }
        Opcode::Out => {
            let index = ops.rs.wrapping_add(ops.rt);
            match state.io.write(index, ops.rm) {
                Ok(stored) => exec.io_access = io_access(index, stored, true),
                Err(cause) => exec.fault = Some(cause),
            }
            state.arch.advance_pc();
        }
        Opcode::Halt => {
            state.run_state = RunState::Halted;
            return (ExecuteOutcome::Halted, exec);
        }
    }

    (ExecuteOutcome::Retired, exec)
}

#[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
const fn alu(opcode: Opcode, ops: Operands) -> u32 {
    let Operands { rs, rt, rm, .. } = ops;
    match opcode {
        Opcode::Add => rs.wrapping_add(rt).wrapping_add(rm),
        Opcode::Sub => rs.wrapping_sub(rt).wrapping_sub(rm),
        Opcode::Mac => rs.wrapping_mul(rt).wrapping_add(rm),
        Opcode::And => rs & rt & rm,
        Opcode::Or => rs | rt | rm,
        Opcode::Xor => rs ^ rt ^ rm,
        // Shift amounts keep the low five bits of rt.
        Opcode::Sll => rs.wrapping_shl(rt),
        Opcode::Sra => (rs as i32).wrapping_shr(rt) as u32,
        Opcode::Srl => rs.wrapping_shr(rt),
        _ => 0,
    }
}

#[allow(clippy::cast_possible_wrap)]
const fn branch_taken(opcode: Opcode, rs: u32, rt: u32) -> bool {
    let (a, b) = (rs as i32, rt as i32);
    match opcode {
        Opcode::Beq => a == b,
        Opcode::Bne => a != b,
        Opcode::Blt => a < b,
        Opcode::Bgt => a > b,
        Opcode::Ble => a <= b,
        Opcode::Bge => a >= b,
        _ => false,
    }
}

const fn io_access(index: u32, value: u32, is_write: bool) -> Option<IoAccess> {
    match IoRegister::from_index(index) {
        Some(register) => Some(IoAccess {
            register,
            value,
            is_write,
        }),
        None => None,
    }
}
