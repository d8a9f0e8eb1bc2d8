//! Shared entity plumbing
//!
//! Aggregates embed [`Timestamps`] by value instead of inheriting from a
//! common base type. The aggregate decides when to call `touch`.

use chrono::{DateTime, Utc};

/// Creation and last-update timestamps carried by every aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamps {
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Timestamps {
    /// Fresh pair where creation and last update coincide
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild from persisted values, no regeneration
    pub fn from_parts(created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            updated_at,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Advance the last-update timestamp to now
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_has_equal_timestamps() {
        let ts = Timestamps::now();
        assert_eq!(ts.created_at(), ts.updated_at());
    }

    #[test]
    fn test_from_parts_preserves_values() {
        let created = Utc::now() - chrono::Duration::days(2);
        let updated = Utc::now() - chrono::Duration::days(1);

        let ts = Timestamps::from_parts(created, updated);
        assert_eq!(ts.created_at(), created);
        assert_eq!(ts.updated_at(), updated);
    }

    #[test]
    fn test_touch_advances_updated_at() {
        let mut ts = Timestamps::now();
        let before = ts.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(10));
        ts.touch();

        assert!(ts.updated_at() > before);
        assert!(ts.created_at() < ts.updated_at());
    }
}
