//! Seeded random source for the simulated firmware
//!
//! splitmix64: small, fast, and good enough to stand in for the
//! monitor's entropy source in tests. Explicitly seeded, per the rule
//! that simulations contain no unseeded randomness.

#[derive(Debug, Clone)]
pub(crate) struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub(crate) fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    pub(crate) fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let word = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = SplitMix64::new(1);
        let mut b = SplitMix64::new(1);
        for _ in 0..16 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_fill_bytes_handles_partial_chunk() {
        let mut rng = SplitMix64::new(3);
        let mut buf = [0u8; 13];
        rng.fill_bytes(&mut buf);
        // 13 bytes = one full word plus a 5-byte tail; tail must match
        // the prefix of the second word.
        let mut rng2 = SplitMix64::new(3);
        let w0 = rng2.next_u64().to_le_bytes();
        let w1 = rng2.next_u64().to_le_bytes();
        assert_eq!(&buf[..8], &w0);
        assert_eq!(&buf[8..], &w1[..5]);
    }
}
