use rand::{rngs::StdRng, SeedableRng};

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// FNV-1a 64-bit hash of a label's ASCII bytes. Stable across runs and
/// platforms, unlike hasher-trait defaults.
pub fn fnv1a(label: &str) -> u64 {
    let mut h = FNV_OFFSET_BASIS;
    for b in label.as_bytes() {
        h ^= u64::from(*b);
        h = h.wrapping_mul(FNV_PRIME);
    }
    h
}

/// Seed for one transformation's random stream: the run seed combined with
/// the stream label via wraparound multiplication (modulo 2^64). Every
/// stream derives from the run seed independently, so toggling one
/// transformation never shifts another's draws.
pub fn stream_seed(run_seed: u64, label: &str) -> u64 {
    run_seed.wrapping_mul(fnv1a(label))
}

/// A generator for the given run seed and stream label.
pub fn stream_rng(run_seed: u64, label: &str) -> StdRng {
    StdRng::seed_from_u64(stream_seed(run_seed, label))
}
