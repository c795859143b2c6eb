//! Transfer slip number generation.
//!
//! Format: `TS-YYYYMMDD-NNNN` (UTC date, four random digits). Candidates
//! are regenerated on collision; the store's unique constraint is the
//! final guarantee.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::RngExt;

use custody_core::error::AppError;
use custody_core::result::AppResult;

use crate::ports::{SlipNumberPort, TransferStore};

/// Slip number prefix for transfer requests.
pub const SLIP_PREFIX: &str = "TS";

/// Collision retries before giving up.
const MAX_ATTEMPTS: u32 = 16;

/// Build one slip number candidate for the given instant.
pub fn slip_candidate(now: DateTime<Utc>) -> String {
    let digits: u32 = rand::rng().random_range(0..10_000);
    format!("{}-{}-{:04}", SLIP_PREFIX, now.format("%Y%m%d"), digits)
}

/// [`SlipNumberPort`] implementation probing the transfer store for
/// collisions.
pub struct SlipNumberGenerator {
    store: Arc<dyn TransferStore>,
}

impl SlipNumberGenerator {
    /// Create a new generator.
    pub fn new(store: Arc<dyn TransferStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SlipNumberPort for SlipNumberGenerator {
    async fn generate_unique_slip(&self) -> AppResult<String> {
        for _ in 0..MAX_ATTEMPTS {
            let candidate = slip_candidate(Utc::now());
            if !self.store.slip_exists(&candidate).await? {
                return Ok(candidate);
            }
        }
        Err(AppError::internal(
            "Could not generate a unique transfer slip number",
        ))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_candidate_format() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let slip = slip_candidate(now);
        assert_eq!(slip.len(), "TS-20240101-0000".len());
        assert!(slip.starts_with("TS-20240101-"));
        let digits = &slip["TS-20240101-".len()..];
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }
}
