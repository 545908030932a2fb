use crate::bus::{IoBus, IoRegister};

/// Advances the timer by one cycle.
///
/// While `timerenable` is set the counter climbs to `timermax`; the tick that
/// finds it already at `timermax` raises IRQ0 and restarts the count, so the
/// interrupt period is `timermax + 1` cycles. A disabled timer keeps its
/// count. Returns `true` when IRQ0 was raised this cycle.
pub fn tick(bus: &mut IoBus) -> bool {
    if !bus.is_set(IoRegister::TimerEnable) {
        return false;
    }

    let current = bus.get(IoRegister::TimerCurrent);
    if current == bus.get(IoRegister::TimerMax) {
        bus.set(IoRegister::Irq0Status, 1);
        bus.set(IoRegister::TimerCurrent, 0);
        true
    } else {
        bus.set(IoRegister::TimerCurrent, current.wrapping_add(1));
        false
    }
}
