use std::fmt;

use xxhash_rust::xxh3::Xxh3;

use crate::foundation::core::{ClipRef, TrackId};

const XXH3_SEED: u64 = 0x8b5ad4a0c7d8e9f1;

/// Order-sensitive digest of which clips sit on which track, in what order.
///
/// Clip durations are folded in as well, so a trimmed clip also reads as a change and
/// gets its transition re-clamped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TopologySnapshot {
    /// High 64 bits of the xxh3-128 digest.
    pub hi: u64,
    /// Low 64 bits.
    pub lo: u64,
}

impl TopologySnapshot {
    /// Digest of tracks whose clips are already ordered by start time.
    pub fn of_tracks<'a>(
        tracks: impl IntoIterator<Item = (&'a TrackId, &'a [ClipRef])>,
    ) -> Self {
        let mut h = StableHasher::new();
        let mut n_tracks = 0u32;
        for (track, clips) in tracks {
            n_tracks += 1;
            h.write_str(track.as_str());
            h.write_u32(clips.len() as u32);
            for c in clips {
                h.write_str(c.id.as_str());
                h.write_f64(c.duration_secs);
            }
        }
        // Terminator keeps "no tracks" distinct from the seed state.
        h.write_u32(n_tracks);
        h.finish()
    }
}

impl fmt::Display for TopologySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    // Length prefix so ("ab","c") and ("a","bc") hash apart.
    fn write_str(&mut self, s: &str) {
        self.write_u32(s.len() as u32);
        self.write_bytes(s.as_bytes());
    }

    fn finish(self) -> TopologySnapshot {
        let v = self.inner.digest128();
        TopologySnapshot {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sync/topology.rs"]
mod tests;
