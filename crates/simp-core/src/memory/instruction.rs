use crate::state::PC_MASK;

/// Number of instruction slots (one per 12-bit program counter value).
pub const INSTRUCTION_MEMORY_DEPTH: usize = 4096;
/// Mask for one 48-bit instruction word.
pub const INSTRUCTION_MASK: u64 = 0xFFFF_FFFF_FFFF;

/// Instruction memory. Read-only once the image is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct InstructionMemory {
    slots: Box<[u64]>,
}

impl Default for InstructionMemory {
    fn default() -> Self {
        Self {
            slots: vec![0; INSTRUCTION_MEMORY_DEPTH].into_boxed_slice(),
        }
    }
}

impl InstructionMemory {
    /// Builds an instruction memory from an image, starting at slot 0.
    ///
    /// Words are truncated to 48 bits; anything past the last slot is dropped
    /// and unfilled slots stay zero.
    #[must_use]
    pub fn from_words(words: &[u64]) -> Self {
        let mut memory = Self::default();
        for (slot, word) in memory.slots.iter_mut().zip(words) {
            *slot = word & INSTRUCTION_MASK;
        }
        memory
    }

    /// Fetches the instruction at a program counter value.
    #[must_use]
    pub fn fetch(&self, pc: u16) -> u64 {
        self.slots[usize::from(pc & PC_MASK)]
    }

    /// Returns every slot in address order.
    #[must_use]
    pub fn words(&self) -> &[u64] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::{InstructionMemory, INSTRUCTION_MEMORY_DEPTH};

    #[test]
    fn image_is_truncated_to_48_bits_and_zero_filled() {
        let memory = InstructionMemory::from_words(&[0xFFFF_0123_4567_89AB, 0x15]);
        assert_eq!(memory.fetch(0), 0x0123_4567_89AB);
        assert_eq!(memory.fetch(1), 0x15);
        assert_eq!(memory.fetch(2), 0);
        assert_eq!(memory.words().len(), INSTRUCTION_MEMORY_DEPTH);
    }

    #[test]
    fn oversized_image_is_clipped_to_depth() {
        let words = vec![1_u64; INSTRUCTION_MEMORY_DEPTH + 10];
        let memory = InstructionMemory::from_words(&words);
        assert_eq!(memory.words().len(), INSTRUCTION_MEMORY_DEPTH);
    }

    #[test]
    fn fetch_masks_program_counter() {
        let mut words = vec![0_u64; 6];
        words[5] = 0xAB;
        let memory = InstructionMemory::from_words(&words);
        assert_eq!(memory.fetch(0x1005), 0xAB);
    }
}
