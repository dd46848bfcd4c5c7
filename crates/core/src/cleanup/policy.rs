//! Receipt retention rules.

use chrono::{DateTime, Duration, Utc};

/// Contribution kind kept for a week instead of a day.
pub const TITHE_KIND: &str = "Dízimo";

/// A financial record that still has a receipt file attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredReceipt {
    /// Financial record key.
    pub record_id: String,
    /// Contribution kind.
    pub kind: String,
    /// Public URL of the receipt file.
    pub receipt_url: String,
    /// When the contribution was submitted; records without one are kept.
    pub submitted_at: Option<DateTime<Utc>>,
}

/// How long receipt files are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Window for tithes.
    pub tithe: Duration,
    /// Window for every other contribution kind.
    pub default: Duration,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            tithe: Duration::hours(168),
            default: Duration::hours(24),
        }
    }
}

impl RetentionPolicy {
    /// Retention window for a contribution kind.
    #[must_use]
    pub fn window_for(&self, kind: &str) -> Duration {
        if kind == TITHE_KIND {
            self.tithe
        } else {
            self.default
        }
    }

    /// Returns true when the receipt is strictly older than its window.
    ///
    /// Receipts without a submission date never expire.
    #[must_use]
    pub fn is_expired(&self, receipt: &StoredReceipt, now: DateTime<Utc>) -> bool {
        receipt
            .submitted_at
            .is_some_and(|submitted| now - submitted > self.window_for(&receipt.kind))
    }
}

/// Extracts the stored file name from a receipt URL.
///
/// Query strings and fragments are dropped. Returns `None` when the URL has
/// no final path segment.
#[must_use]
pub fn receipt_file_name(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn receipt(kind: &str, age: Option<Duration>, now: DateTime<Utc>) -> StoredReceipt {
        StoredReceipt {
            record_id: "rec".to_string(),
            kind: kind.to_string(),
            receipt_url: "https://files.example/a.png".to_string(),
            submitted_at: age.map(|a| now - a),
        }
    }

    #[rstest]
    #[case(TITHE_KIND, Duration::hours(167), false)]
    #[case(TITHE_KIND, Duration::hours(168), false)]
    #[case(TITHE_KIND, Duration::hours(168) + Duration::seconds(1), true)]
    #[case("Oferta", Duration::hours(23), false)]
    #[case("Oferta", Duration::hours(24), false)]
    #[case("Oferta", Duration::hours(25), true)]
    #[case("", Duration::hours(30), true)]
    fn test_is_expired(#[case] kind: &str, #[case] age: Duration, #[case] expected: bool) {
        let now = Utc::now();
        let policy = RetentionPolicy::default();
        assert_eq!(policy.is_expired(&receipt(kind, Some(age), now), now), expected);
    }

    #[test]
    fn test_without_submission_date_never_expires() {
        let now = Utc::now();
        let policy = RetentionPolicy::default();
        assert!(!policy.is_expired(&receipt("Oferta", None, now), now));
    }

    #[rstest]
    #[case("https://res.example/image/upload/v1700000000/abc123.jpg", Some("abc123.jpg"))]
    #[case("https://files.example/comprovantes/pix.pdf?token=xyz#page=1", Some("pix.pdf"))]
    #[case("pix.png", Some("pix.png"))]
    #[case("https://files.example/comprovantes/", None)]
    #[case("", None)]
    fn test_receipt_file_name(#[case] url: &str, #[case] expected: Option<&str>) {
        assert_eq!(receipt_file_name(url), expected);
    }
}
