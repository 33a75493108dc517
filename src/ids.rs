//! Identifier generation for produced analyses.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};
use uuid::{Builder, Uuid};

// ---

/// Generate a random (v4) UUID.
///
/// Bytes come from the operating system CSPRNG. If that source is unavailable
/// the bytes are drawn from a PRNG seeded with the current time instead; the
/// version and variant bits are set either way.
pub fn new_analysis_id() -> Uuid {
    // ---
    let mut bytes = [0u8; 16];
    match OsRng.try_fill_bytes(&mut bytes) {
        Ok(()) => Builder::from_random_bytes(bytes).into_uuid(),
        Err(e) => {
            tracing::warn!("OS random source unavailable ({}), using seeded fallback", e);
            fallback_id(time_seed())
        }
    }
}

fn fallback_id(seed: u64) -> Uuid {
    // ---
    let mut bytes = [0u8; 16];
    StdRng::seed_from_u64(seed).fill_bytes(&mut bytes);
    Builder::from_random_bytes(bytes).into_uuid()
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
