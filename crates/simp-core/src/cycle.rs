//! Per-cycle orchestration.
//!
//! One cycle runs, in this order: `clks` increment, timer, external
//! interrupt schedule, disk controller, interrupt dispatch, monitor, then
//! fetch/decode/execute of exactly one instruction. Device effects raised
//! earlier in the cycle are visible to later stages of the same cycle.

use tracing::{debug, warn};

use crate::api::{
    CoreConfig, CoreState, CycleOutcome, RunOutcome, StopReason, TraceEvent, TraceSink,
};
use crate::bus::IoRegister;
use crate::decoder::Decoder;
use crate::execute::{execute_instruction, ExecuteOutcome};
use crate::interrupt::{self, Dispatch};
use crate::peripherals::{timer, DiskEvent, MonitorEvent};
use crate::FaultCode;

/// Runs one full machine cycle.
///
/// A halted machine is left untouched and reports [`CycleOutcome::Halted`].
pub fn step_cycle(
    state: &mut CoreState,
    config: &CoreConfig,
    sink: &mut dyn TraceSink,
) -> CycleOutcome {
    if state.run_state.is_halted() {
        return CycleOutcome::Halted;
    }
    let cycle = state.cycles;

    let clks = state.io.get(IoRegister::Clks).wrapping_add(1);
    state.io.set(IoRegister::Clks, clks);

    timer::tick(&mut state.io);
    // Schedule entries count cycles from one.
    state.irq2.tick(&mut state.io, cycle + 1);

    match state.disk.tick(&mut state.io, &mut state.dmem) {
        DiskEvent::Rejected(cause) => report_fault(state, config, sink, cause),
        DiskEvent::Started { faulted_words, .. } if faulted_words > 0 => {
            report_fault(state, config, sink, FaultCode::InvalidDataAddress);
        }
        _ => {}
    }

    if let Dispatch::Entered { return_pc, handler } =
        interrupt::dispatch(&mut state.io, &mut state.arch, &mut state.run_state)
    {
        state.diag.record_interrupt();
        debug!(cycle, return_pc, handler, "interrupt handler entered");
        emit(
            config,
            sink,
            TraceEvent::InterruptEntered {
                cycle,
                return_pc,
                handler,
            },
        );
    }

    if let MonitorEvent::Rejected(cause) = state.monitor.service(&mut state.io) {
        report_fault(state, config, sink, cause);
    }

    let pc = state.arch.pc();
    let raw = state.imem.fetch(pc);
    let instr = Decoder::decode(raw);
    state.arch.set_immediates(instr.imm1, instr.imm2);
    emit(
        config,
        sink,
        TraceEvent::InstructionStart {
            cycle,
            pc,
            raw,
            registers: state.arch.registers(),
        },
    );

    let (outcome, exec) = execute_instruction(&instr, state);
    state.diag.increment_instruction_count();
    if let Some(access) = exec.io_access {
        emit(
            config,
            sink,
            TraceEvent::IoAccess {
                cycle,
                register: access.register,
                value: access.value,
                is_write: access.is_write,
            },
        );
    }
    if let Some(cause) = exec.fault {
        record_fault(state, config, sink, cause, pc);
    }

    state.cycles += 1;
    match outcome {
        ExecuteOutcome::Retired => CycleOutcome::Retired,
        ExecuteOutcome::Halted => {
            debug!(cycle, pc, "halt");
            CycleOutcome::Halted
        }
    }
}

/// Steps cycles until `halt` or the configured cycle bound.
///
/// The bound applies to the machine's total cycle count, so a resumed run
/// stops at the same place an uninterrupted one would.
pub fn run(state: &mut CoreState, config: &CoreConfig, sink: &mut dyn TraceSink) -> RunOutcome {
    let start = state.cycles;
    let stop = loop {
        if config.max_cycles.is_some_and(|limit| state.cycles >= limit) {
            break StopReason::CycleLimit;
        }
        if step_cycle(state, config, sink) == CycleOutcome::Halted {
            break StopReason::Halted;
        }
    };

    RunOutcome {
        cycles: state.cycles - start,
        stop,
    }
}

fn report_fault(
    state: &mut CoreState,
    config: &CoreConfig,
    sink: &mut dyn TraceSink,
    cause: FaultCode,
) {
    let pc = state.arch.pc();
    record_fault(state, config, sink, cause, pc);
}

fn record_fault(
    state: &mut CoreState,
    config: &CoreConfig,
    sink: &mut dyn TraceSink,
    cause: FaultCode,
    pc: u16,
) {
    let cycle = state.cycles;
    warn!(cycle, pc, code = cause.as_u8(), "{cause}");
    state.diag.record_fault(cause, pc, cycle);
    emit(config, sink, TraceEvent::Fault { cycle, pc, cause });
}

fn emit(config: &CoreConfig, sink: &mut dyn TraceSink, event: TraceEvent) {
    if config.tracing_enabled {
        sink.on_event(event);
    }
}

#[cfg(test)]
mod tests {
    use super::{run, step_cycle};
    use crate::api::{CoreConfig, CoreState, CycleOutcome, NullSink, StopReason, TraceEvent};
    use crate::bus::IoRegister;
    use crate::decoder::encode_instruction;
    use crate::encoding::Opcode;
    use crate::memory::InstructionMemory;
    use crate::state::Register::{R0, R1, R2, R3};
    use crate::FaultCode;

    fn traced() -> CoreConfig {
        CoreConfig {
            tracing_enabled: true,
            ..CoreConfig::default()
        }
    }

    fn program(words: &[u64]) -> CoreState {
        let mut state = CoreState::default();
        state.imem = InstructionMemory::from_words(words);
        state
    }

    const fn halt() -> u64 {
        encode_instruction(Opcode::Halt.as_u8(), R0, R0, R0, R0, 0, 0)
    }

    #[test]
    fn clks_counts_every_cycle() {
        let add = encode_instruction(Opcode::Add.as_u8(), R3, R0, R0, R0, 0, 0);
        let mut state = program(&[add, add, add, halt()]);

        let outcome = run(&mut state, &CoreConfig::default(), &mut NullSink);

        assert_eq!(outcome.stop, StopReason::Halted);
        assert_eq!(outcome.cycles, 4);
        assert_eq!(state.io.get(IoRegister::Clks), 4);
        assert_eq!(state.diag.instruction_count, 4);
    }

    #[test]
    fn halted_machine_does_not_step() {
        let mut state = program(&[halt()]);
        let config = traced();
        let mut events: Vec<TraceEvent> = Vec::new();

        assert_eq!(step_cycle(&mut state, &config, &mut events), CycleOutcome::Halted);
        let snapshot = state.clone();
        assert_eq!(step_cycle(&mut state, &config, &mut events), CycleOutcome::Halted);

        assert_eq!(state, snapshot);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn cycle_limit_stops_a_looping_program() {
        // beq R0, R0 -> PC <- R0: spins on address 0.
        let spin = encode_instruction(Opcode::Beq.as_u8(), R0, R0, R0, R0, 0, 0);
        let mut state = program(&[spin]);
        let config = CoreConfig {
            max_cycles: Some(10),
            ..CoreConfig::default()
        };

        let outcome = run(&mut state, &config, &mut NullSink);
        assert_eq!(outcome.stop, StopReason::CycleLimit);
        assert_eq!(outcome.cycles, 10);

        let again = run(&mut state, &config, &mut NullSink);
        assert_eq!(again.cycles, 0);
        assert_eq!(again.stop, StopReason::CycleLimit);
    }

    #[test]
    fn trace_snapshot_includes_decoded_immediates() {
        let add = encode_instruction(Opcode::Add.as_u8(), R3, R1, R2, R0, 0x800, 7);
        let mut state = program(&[add, halt()]);
        let mut events: Vec<TraceEvent> = Vec::new();

        run(&mut state, &traced(), &mut events);

        let TraceEvent::InstructionStart {
            cycle,
            pc,
            raw,
            registers,
        } = events[0]
        else {
            panic!("expected instruction start, got {:?}", events[0]);
        };
        assert_eq!((cycle, pc, raw), (0, 0, add));
        assert_eq!(registers[1], 0xFFFF_F800);
        assert_eq!(registers[2], 7);
        assert_eq!(registers[3], 0);
    }

    #[test]
    fn tracing_disabled_emits_nothing() {
        let mut state = program(&[halt()]);
        let mut events: Vec<TraceEvent> = Vec::new();
        run(&mut state, &CoreConfig::default(), &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn unsupported_opcode_is_reported_and_skipped() {
        let bogus = encode_instruction(0x40, R0, R0, R0, R0, 0, 0);
        let mut state = program(&[bogus, halt()]);
        let mut events: Vec<TraceEvent> = Vec::new();

        let outcome = run(&mut state, &traced(), &mut events);

        assert_eq!(outcome.cycles, 2);
        assert_eq!(state.diag.fault_count_decode, 1);
        assert_eq!(state.diag.last_fault_pc, 0);
        assert!(events.contains(&TraceEvent::Fault {
            cycle: 0,
            pc: 0,
            cause: FaultCode::UnsupportedOpcode,
        }));
    }

    #[test]
    fn invalid_disk_command_is_reported_once() {
        // out io[14] <- 3 (diskcmd), then spin.
        let out = encode_instruction(Opcode::Out.as_u8(), R0, R0, R1, R2, 14, 3);
        let spin = encode_instruction(Opcode::Beq.as_u8(), R0, R0, R0, R1, 1, 0);
        let mut state = program(&[out, spin]);
        let config = CoreConfig {
            max_cycles: Some(20),
            ..traced()
        };

        run(&mut state, &config, &mut NullSink);

        assert_eq!(state.diag.fault_count_disk, 1);
        assert_eq!(state.diag.last_fault_code, Some(FaultCode::InvalidDiskCommand));
        assert_eq!(state.io.get(IoRegister::DiskStatus), 0);
    }
}
