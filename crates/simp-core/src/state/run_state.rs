/// Execution-state machine for host-observable core control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// Executing ordinary program code.
    #[default]
    Running,
    /// Executing inside an interrupt handler; further dispatch is held off
    /// until `reti`.
    HandlerContext,
    /// `halt` retired; no further cycles run.
    Halted,
}

impl RunState {
    /// Returns `true` while an interrupt handler is active.
    #[must_use]
    pub const fn in_isr(self) -> bool {
        matches!(self, Self::HandlerContext)
    }

    /// Returns `true` once the machine has halted.
    #[must_use]
    pub const fn is_halted(self) -> bool {
        matches!(self, Self::Halted)
    }
}

#[cfg(test)]
mod tests {
    use super::RunState;

    #[test]
    fn machine_starts_running() {
        assert_eq!(RunState::default(), RunState::Running);
    }

    #[test]
    fn isr_and_halt_accessors_report_only_their_variant() {
        assert!(!RunState::Running.in_isr());
        assert!(RunState::HandlerContext.in_isr());
        assert!(!RunState::Halted.in_isr());

        assert!(!RunState::Running.is_halted());
        assert!(!RunState::HandlerContext.is_halted());
        assert!(RunState::Halted.is_halted());
    }
}
