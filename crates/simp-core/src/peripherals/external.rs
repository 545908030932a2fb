use crate::bus::{IoBus, IoRegister};

/// Cycles at which the external interrupt line (IRQ2) is asserted.
///
/// Entries are consumed in order through a cursor; an entry for a cycle that
/// has already gone by is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Irq2Schedule {
    cycles: Vec<u64>,
    cursor: usize,
}

impl Irq2Schedule {
    /// Builds a schedule from cycle numbers in ascending order.
    #[must_use]
    pub const fn new(cycles: Vec<u64>) -> Self {
        Self { cycles, cursor: 0 }
    }

    /// Entries not yet reached.
    #[must_use]
    pub fn pending(&self) -> &[u64] {
        &self.cycles[self.cursor..]
    }

    /// Consumes entries up to `cycle` and reports whether any matched it.
    pub fn poll(&mut self, cycle: u64) -> bool {
        let mut hit = false;
        while let Some(&next) = self.cycles.get(self.cursor) {
            if next > cycle {
                break;
            }
            hit |= next == cycle;
            self.cursor += 1;
        }
        hit
    }

    /// Raises `irq2status` when the schedule fires at `cycle`.
    pub fn tick(&mut self, bus: &mut IoBus, cycle: u64) -> bool {
        let fired = self.poll(cycle);
        if fired {
            bus.set(IoRegister::Irq2Status, 1);
        }
        fired
    }
}
