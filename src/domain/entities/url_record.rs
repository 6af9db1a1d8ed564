//! URL record entity representing a short code to URL mapping.

use chrono::{DateTime, Utc};

/// A stored short link.
///
/// Records are immutable once created: there is no update or delete path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    /// Storage-assigned surrogate key, strictly positive.
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    /// Opaque token of the anonymous submitter.
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

impl UrlRecord {
    /// Creates a new UrlRecord instance.
    pub fn new(
        id: i64,
        original_url: String,
        short_code: String,
        owner_id: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            original_url,
            short_code,
            owner_id,
            created_at,
        }
    }
}

/// Input data for inserting a record. Storage assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlRecord {
    pub original_url: String,
    pub short_code: String,
    pub owner_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_record_creation() {
        let now = Utc::now();
        let record = UrlRecord::new(
            1,
            "https://example.com/page".to_string(),
            "aB3dE6gH".to_string(),
            "user-1".to_string(),
            now,
        );

        assert_eq!(record.id, 1);
        assert_eq!(record.original_url, "https://example.com/page");
        assert_eq!(record.short_code, "aB3dE6gH");
        assert_eq!(record.owner_id, "user-1");
        assert_eq!(record.created_at, now);
    }

    #[test]
    fn test_new_url_record_creation() {
        let new_record = NewUrlRecord {
            original_url: "https://rust-lang.org".to_string(),
            short_code: "xyz78901".to_string(),
            owner_id: "owner".to_string(),
        };

        assert_eq!(new_record.short_code, "xyz78901");
        assert_eq!(new_record.original_url, "https://rust-lang.org");
    }
}
