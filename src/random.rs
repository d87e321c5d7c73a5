//! Sources of uniformly distributed indices for the password generator.

use chacha20::ChaCha20;
use chacha20::cipher::{KeyIvInit, StreamCipher};
use rand::Rng;
use rand::rngs::ThreadRng;
use zeroize::Zeroizing;

const BUFFER_LEN: usize = 512;

pub trait RandomSource {
    /// Returns an index drawn uniformly from `0..bound`. `bound` must be non-zero.
    fn below(&mut self, bound: usize) -> usize;
}

/// The thread-local generator from `rand`, seeded from the operating system.
pub struct ThreadSource(ThreadRng);

impl ThreadSource {
    pub fn new() -> Self {
        Self(rand::thread_rng())
    }
}

impl Default for ThreadSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for ThreadSource {
    fn below(&mut self, bound: usize) -> usize {
        self.0.gen_range(0..bound)
    }
}

/// Deterministic source reading a ChaCha20 keystream keyed by a 32-byte seed.
///
/// The same seed always yields the same sequence of indices, which makes
/// generated passwords reproducible.
pub struct KeystreamSource {
    cipher: ChaCha20,
    buffer: Zeroizing<Vec<u8>>,
    pos: usize,
}

impl KeystreamSource {
    pub fn new(seed: &[u8; 32]) -> Self {
        let mut cipher = ChaCha20::new(seed.into(), &[0u8; 12].into());
        let mut buffer = Zeroizing::new(vec![0u8; BUFFER_LEN]);
        cipher.apply_keystream(&mut buffer);

        Self {
            cipher,
            buffer,
            pos: 0,
        }
    }

    fn next_u32(&mut self) -> u32 {
        if self.pos + 4 > self.buffer.len() {
            self.buffer.fill(0);
            self.cipher.apply_keystream(&mut self.buffer);
            self.pos = 0;
        }

        let bytes = [
            self.buffer[self.pos],
            self.buffer[self.pos + 1],
            self.buffer[self.pos + 2],
            self.buffer[self.pos + 3],
        ];
        self.pos += 4;

        u32::from_le_bytes(bytes)
    }
}

impl RandomSource for KeystreamSource {
    fn below(&mut self, bound: usize) -> usize {
        assert!(bound > 0, "bound must be non-zero");
        let bound = u32::try_from(bound).unwrap_or(u32::MAX);

        // Reject draws from the incomplete top bucket so every index is equally likely.
        let rejection_threshold = (u32::MAX / bound) * bound;

        loop {
            let random_u32 = self.next_u32();
            if random_u32 < rejection_threshold {
                return (random_u32 % bound) as usize;
            }
        }
    }
}
