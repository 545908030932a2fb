//! Whole-machine scenarios driven through the cycle loop.

use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;
use tracing as _;

use simp_core::Register::{R0, R1, R2, R3, R4};
use simp_core::{
    encode_instruction, run, step_cycle, CoreConfig, CoreState, CycleOutcome, DiskState,
    InstructionMemory, IoRegister, Irq2Schedule, NullSink, Opcode, Register, StopReason, TraceEvent,
    DISK_BYTES, SECTOR_SIZE,
};

fn asm(
    op: Opcode,
    rd: Register,
    rs: Register,
    rt: Register,
    rm: Register,
    imm1: u32,
    imm2: u32,
) -> u64 {
    encode_instruction(op.as_u8(), rd, rs, rt, rm, imm1, imm2)
}

/// `out io[imm1] <- imm2`
fn out_imm(index: u32, value: u32) -> u64 {
    asm(Opcode::Out, R0, R1, R0, R2, index, value)
}

/// `beq R0, R0 -> imm1`
fn jump(target: u32) -> u64 {
    asm(Opcode::Beq, R0, R0, R0, R1, target, 0)
}

fn halt() -> u64 {
    asm(Opcode::Halt, R0, R0, R0, R0, 0, 0)
}

fn machine(image: &[(usize, u64)]) -> CoreState {
    let mut words = vec![0_u64; 4096];
    for (addr, word) in image {
        words[*addr] = *word;
    }
    let mut state = CoreState::default();
    state.imem = InstructionMemory::from_words(&words);
    state
}

fn traced() -> CoreConfig {
    CoreConfig {
        tracing_enabled: true,
        ..CoreConfig::default()
    }
}

fn executed_pcs(events: &[TraceEvent]) -> Vec<u16> {
    events
        .iter()
        .filter_map(|event| match event {
            TraceEvent::InstructionStart { pc, .. } => Some(*pc),
            _ => None,
        })
        .collect()
}

fn interrupt_cycles(events: &[TraceEvent]) -> Vec<u64> {
    events
        .iter()
        .filter_map(|event| match event {
            TraceEvent::InterruptEntered { cycle, .. } => Some(*cycle),
            _ => None,
        })
        .collect()
}

#[test]
fn add_then_halt_runs_exactly_two_cycles() {
    let mut state = machine(&[(0, asm(Opcode::Add, R4, R0, R0, R0, 0, 0)), (1, halt())]);
    let mut events: Vec<TraceEvent> = Vec::new();

    let outcome = run(&mut state, &traced(), &mut events);

    assert_eq!(outcome.stop, StopReason::Halted);
    assert_eq!(outcome.cycles, 2);
    assert_eq!(state.cycles, 2);
    assert_eq!(state.arch.gpr(R4), 0);
    assert_eq!(executed_pcs(&events), vec![0, 1]);
    assert_eq!(state.arch.pc(), 1);

    assert_eq!(step_cycle(&mut state, &traced(), &mut events), CycleOutcome::Halted);
    assert_eq!(state.cycles, 2);
    assert_eq!(events.len(), 2);
}

#[test]
fn disk_read_completes_after_latency_and_interrupts_same_cycle() {
    let mut state = machine(&[
        (0, out_imm(16, 0x100)),
        (1, out_imm(15, 3)),
        (2, out_imm(1, 1)),
        (3, out_imm(6, 0x010)),
        (4, out_imm(14, 1)),
        (5, jump(5)),
        (0x010, halt()),
    ]);
    let mut image = vec![0_u8; DISK_BYTES];
    image[3 * SECTOR_SIZE..3 * SECTOR_SIZE + 4].copy_from_slice(&[0x11, 0x22, 0x33, 0x44]);
    image[3 * SECTOR_SIZE + 511] = 0x99;
    state.disk.load(&image);

    let config = traced();
    let mut events: Vec<TraceEvent> = Vec::new();

    // Cycles 0..=4 program the controller; cycle 5 accepts the command.
    for _ in 0..6 {
        step_cycle(&mut state, &config, &mut events);
    }
    assert_eq!(state.io.get(IoRegister::DiskStatus), 1);
    assert!(matches!(state.disk.state(), DiskState::Busy { .. }));
    assert_eq!(state.dmem.read(0x100), Ok(0x1122_3344));
    assert_eq!(state.dmem.read(0x17F), Ok(0x0000_0099));

    // Still busy through cycle 1028.
    while state.cycles < 1029 {
        assert_eq!(step_cycle(&mut state, &config, &mut events), CycleOutcome::Retired);
        assert_eq!(state.io.get(IoRegister::Irq1Status), 0);
        assert_eq!(state.io.get(IoRegister::DiskStatus), 1);
    }

    // Cycle 1029 completes the transfer, dispatches IRQ1, and runs the handler.
    assert_eq!(step_cycle(&mut state, &config, &mut events), CycleOutcome::Halted);
    assert_eq!(state.io.get(IoRegister::DiskStatus), 0);
    assert_eq!(state.io.get(IoRegister::DiskCmd), 0);
    assert_eq!(state.io.get(IoRegister::Irq1Status), 1);
    assert_eq!(state.io.get(IoRegister::IrqReturn), 5);
    assert_eq!(interrupt_cycles(&events), vec![1029]);
    assert_eq!(executed_pcs(&events).last(), Some(&0x010));
}

#[test]
fn timer_interrupt_fires_every_max_plus_one_cycles() {
    let mut state = machine(&[
        (0, out_imm(13, 5)),
        (1, out_imm(0, 1)),
        (2, out_imm(6, 0x020)),
        (3, out_imm(11, 1)),
        (4, asm(Opcode::Add, R3, R3, R1, R0, 1, 0)),
        (5, jump(4)),
        // handler: clear irq0status, count, return
        (0x020, out_imm(3, 0)),
        (0x021, asm(Opcode::Add, R4, R4, R1, R0, 1, 0)),
        (0x022, asm(Opcode::Reti, R0, R0, R0, R0, 0, 0)),
    ]);
    let config = CoreConfig {
        max_cycles: Some(30),
        ..traced()
    };
    let mut events: Vec<TraceEvent> = Vec::new();

    let outcome = run(&mut state, &config, &mut events);

    assert_eq!(outcome.stop, StopReason::CycleLimit);
    assert_eq!(interrupt_cycles(&events), vec![9, 15, 21, 27]);
    assert_eq!(state.diag.interrupts_entered, 4);
    assert_eq!(state.arch.gpr(R4), 4);
}

#[test]
fn external_interrupt_uses_one_based_cycle_numbers() {
    let mut state = machine(&[
        (0, out_imm(2, 1)),
        (1, out_imm(6, 0x030)),
        (2, jump(2)),
        (0x030, halt()),
    ]);
    state.irq2 = Irq2Schedule::new(vec![3]);
    let mut events: Vec<TraceEvent> = Vec::new();

    let outcome = run(&mut state, &traced(), &mut events);

    assert_eq!(outcome.stop, StopReason::Halted);
    assert_eq!(state.cycles, 3);
    assert_eq!(interrupt_cycles(&events), vec![2]);
    assert_eq!(state.io.get(IoRegister::Irq2Status), 1);
    assert_eq!(state.io.get(IoRegister::IrqReturn), 2);
}

#[test]
fn branch_target_keeps_low_twelve_bits() {
    let mut state = machine(&[(0, asm(Opcode::Beq, R0, R0, R0, R3, 0, 0)), (0x345, halt())]);
    state.arch.set_gpr(R3, 0x12345);
    let mut events: Vec<TraceEvent> = Vec::new();

    run(&mut state, &traced(), &mut events);

    assert_eq!(executed_pcs(&events), vec![0, 0x345]);
}

#[test]
fn store_then_load_carry_the_extra_operand() {
    let mut state = machine(&[
        (0, asm(Opcode::Sw, R3, R1, R0, R2, 0x50, 3)),
        (1, asm(Opcode::Lw, R4, R1, R0, R2, 0x50, 10)),
        (2, halt()),
    ]);
    state.arch.set_gpr(R3, 4);

    run(&mut state, &CoreConfig::default(), &mut NullSink);

    assert_eq!(state.dmem.read(0x50), Ok(7));
    assert_eq!(state.arch.gpr(R4), 17);
}

#[test]
fn monitor_request_is_serviced_before_the_next_instruction() {
    let mut state = machine(&[
        (0, out_imm(20, 0x101)),
        (1, out_imm(21, 0xAB)),
        (2, out_imm(22, 1)),
        (3, halt()),
    ]);
    let mut events: Vec<TraceEvent> = Vec::new();

    run(&mut state, &traced(), &mut events);

    assert_eq!(state.monitor.pixel(1, 1), Some(0xAB));
    assert_eq!(state.io.get(IoRegister::MonitorCmd), 0);

    let writes: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            TraceEvent::IoAccess {
                cycle,
                register,
                value,
                is_write: true,
            } => Some((*cycle, *register, *value)),
            _ => None,
        })
        .collect();
    assert_eq!(
        writes,
        vec![
            (0, IoRegister::MonitorAddr, 0x101),
            (1, IoRegister::MonitorData, 0xAB),
            (2, IoRegister::MonitorCmd, 1),
        ]
    );
}
