use crate::FaultCode;

/// Number of 32-bit words in data memory.
pub const DATA_MEMORY_DEPTH: usize = 4096;

/// Word-addressed data memory.
///
/// Addresses come straight out of register arithmetic, so every access is
/// range-checked and a miss reports [`FaultCode::InvalidDataAddress`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DataMemory {
    words: Box<[u32]>,
}

impl Default for DataMemory {
    fn default() -> Self {
        Self {
            words: vec![0; DATA_MEMORY_DEPTH].into_boxed_slice(),
        }
    }
}

impl DataMemory {
    /// Builds a data memory from an image, starting at word 0.
    #[must_use]
    pub fn from_words(words: &[u32]) -> Self {
        let mut memory = Self::default();
        for (slot, word) in memory.words.iter_mut().zip(words) {
            *slot = *word;
        }
        memory
    }

    /// Reads one word.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::InvalidDataAddress`] when `addr` is past the end
    /// of memory.
    pub fn read(&self, addr: u32) -> Result<u32, FaultCode> {
        usize::try_from(addr)
            .ok()
            .and_then(|index| self.words.get(index).copied())
            .ok_or(FaultCode::InvalidDataAddress)
    }

    /// Writes one word.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::InvalidDataAddress`] when `addr` is past the end
    /// of memory; nothing is stored in that case.
    pub fn write(&mut self, addr: u32, value: u32) -> Result<(), FaultCode> {
        let slot = usize::try_from(addr)
            .ok()
            .and_then(|index| self.words.get_mut(index))
            .ok_or(FaultCode::InvalidDataAddress)?;
        *slot = value;
        Ok(())
    }

    /// Returns every word in address order.
    #[must_use]
    pub fn words(&self) -> &[u32] {
        &self.words
    }
}

#[cfg(test)]
mod tests {
    use super::{DataMemory, DATA_MEMORY_DEPTH};
    use crate::FaultCode;

    #[test]
    fn canonical_backing_store_is_zeroed() {
        let memory = DataMemory::default();
        assert_eq!(memory.words().len(), DATA_MEMORY_DEPTH);
        assert!(memory.words().iter().all(|word| *word == 0));
    }

    #[test]
    fn write_then_read_returns_value() {
        let mut memory = DataMemory::from_words(&[1, 2, 3]);
        assert_eq!(memory.read(2), Ok(3));
        memory.write(4095, 0xCAFE_F00D).expect("last word is addressable");
        assert_eq!(memory.read(4095), Ok(0xCAFE_F00D));
    }

    #[test]
    fn out_of_range_access_faults_without_side_effects() {
        let mut memory = DataMemory::default();
        assert_eq!(memory.read(4096), Err(FaultCode::InvalidDataAddress));
        assert_eq!(memory.read(u32::MAX), Err(FaultCode::InvalidDataAddress));
        assert_eq!(
            memory.write(4096, 1),
            Err(FaultCode::InvalidDataAddress)
        );
        assert_eq!(memory, DataMemory::default());
    }
}
