//! Deterministic PCG32 generator.
//!
//! Each render worker owns exactly one `Pcg32` and threads it through every
//! call that needs randomness. Nothing in the workspace constructs a
//! generator on the fly inside a sampling routine.

use rand::{Error, RngCore, SeedableRng};

const MULTIPLIER: u64 = 6364136223846793005;
const DEFAULT_STATE: u64 = 0x853c49e6748fea9b;
const DEFAULT_STREAM: u64 = 0xa02bdbf7bb3c0a7;

/// PCG-XSH-RR with 64-bit state and 32-bit output.
///
/// Two generators with the same seed but different streams produce
/// independent sequences, which is how per-worker and per-row sub-streams
/// are derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pcg32 {
    state: u64,
    inc: u64,
}

impl Pcg32 {
    /// Create a generator from an initial state and a stream selector.
    pub fn new(seed: u64, stream: u64) -> Self {
        let mut rng = Self {
            state: 0,
            inc: (stream << 1) | 1,
        };
        rng.step();
        rng.state = rng.state.wrapping_add(seed);
        rng.step();
        rng
    }

    #[inline]
    fn step(&mut self) {
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(self.inc);
    }

    /// Next raw 32-bit output.
    #[inline]
    pub fn gen_u32(&mut self) -> u32 {
        let old = self.state;
        self.step();
        let xorshifted = (((old >> 18) ^ old) >> 27) as u32;
        let rot = (old >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Uniform float in [0, 1).
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        unit_f32(self.gen_u32())
    }
}

impl Default for Pcg32 {
    fn default() -> Self {
        Self::new(DEFAULT_STATE, DEFAULT_STREAM)
    }
}

impl RngCore for Pcg32 {
    fn next_u32(&mut self) -> u32 {
        self.gen_u32()
    }

    fn next_u64(&mut self) -> u64 {
        let lo = u64::from(self.gen_u32());
        let hi = u64::from(self.gen_u32());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.gen_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Pcg32 {
    /// Little-endian seed followed by little-endian stream.
    type Seed = [u8; 16];

    fn from_seed(seed: Self::Seed) -> Self {
        let mut state = [0u8; 8];
        let mut stream = [0u8; 8];
        state.copy_from_slice(&seed[..8]);
        stream.copy_from_slice(&seed[8..]);
        Self::new(u64::from_le_bytes(state), u64::from_le_bytes(stream))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state, DEFAULT_STREAM)
    }
}

/// Map 32 random bits onto [0, 1) using the top 24 bits, so the result is
/// exactly representable and never rounds up to 1.0.
#[inline]
fn unit_f32(bits: u32) -> f32 {
    (bits >> 8) as f32 * (1.0 / 16_777_216.0)
}

/// Uniform float in [0, 1) from any generator.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    unit_f32(rng.next_u32())
}
