//! Pseudo-random zero sharing.
//!
//! Every pair of neighbouring parties `(i, i + 1 mod n)` shares a BLAKE3
//! keystream derived from a session seed. Party `i` combines the stream it
//! shares with its successor and the one it shares with its predecessor, so
//! the streams cancel when all shares are summed (or XORed).

use blake3::Hasher;
use rand_core::RngCore;

const ZERO_SHARING_DOMAIN: &[u8] = b"cryptensor::prss::zero";

/// Derives shares of zero for a fixed number of parties.
#[derive(Clone)]
pub struct ZeroSharing {
    seed: [u8; 32],
    parties: usize,
}

impl ZeroSharing {
    pub fn new(seed: [u8; 32], parties: usize) -> Self {
        Self { seed, parties }
    }

    pub fn from_rng<R: RngCore + ?Sized>(rng: &mut R, parties: usize) -> Self {
        let mut seed = [0u8; 32];
        rng.fill_bytes(&mut seed);
        Self::new(seed, parties)
    }

    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Per-party shares of zero under additive sharing over `Z_2^64`.
    pub fn arithmetic(&self, len: usize) -> Vec<Vec<u64>> {
        self.combine(len, |next, prev| next.wrapping_sub(prev))
    }

    /// Per-party shares of zero under XOR sharing.
    pub fn binary(&self, len: usize) -> Vec<Vec<u64>> {
        self.combine(len, |next, prev| next ^ prev)
    }

    fn combine(&self, len: usize, op: impl Fn(u64, u64) -> u64) -> Vec<Vec<u64>> {
        let streams: Vec<Vec<u64>> = (0..self.parties)
            .map(|pair| self.pair_stream(pair, len))
            .collect();
        (0..self.parties)
            .map(|party| {
                let prev = (party + self.parties - 1) % self.parties;
                streams[party]
                    .iter()
                    .zip(streams[prev].iter())
                    .map(|(n, p)| op(*n, *p))
                    .collect()
            })
            .collect()
    }

    fn pair_stream(&self, pair: usize, len: usize) -> Vec<u64> {
        if len == 0 {
            return Vec::new();
        }
        let mut hasher = Hasher::new();
        hasher.update(ZERO_SHARING_DOMAIN);
        hasher.update(&self.seed);
        hasher.update(&(pair as u64).to_le_bytes());
        hasher.update(&(len as u64).to_le_bytes());
        let mut reader = hasher.finalize_xof();
        let mut keystream = vec![0u8; len * 8];
        reader.fill(&mut keystream);
        keystream
            .chunks_exact(8)
            .map(|chunk| {
                let mut word = [0u8; 8];
                word.copy_from_slice(chunk);
                u64::from_le_bytes(word)
            })
            .collect()
    }
}

impl std::fmt::Debug for ZeroSharing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZeroSharing")
            .field("parties", &self.parties)
            .finish_non_exhaustive()
    }
}
