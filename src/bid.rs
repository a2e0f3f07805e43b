//! The record stored in a [`BidTable`](crate::BidTable)

use std::fmt;

use crate::error::TableError;

/// A single auction bid.
///
/// The table only ever looks at [`Bid::id`]; the remaining fields are payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bid {
    /// Numeric identifier, kept as text the way it appears in the source data
    id: String,
    /// Title of the auctioned item
    title: String,
    /// Fund the proceeds go to
    fund: String,
    /// Winning amount
    amount: f64,
}

impl Bid {
    /// Creates a bid from its fields
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        fund: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self { id: id.into(), title: title.into(), fund: fund.into(), amount }
    }

    /// Returns the bid id
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the item title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the fund name
    #[must_use]
    pub fn fund(&self) -> &str {
        &self.fund
    }

    /// Returns the bid amount
    #[must_use]
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Parses the id into the numeric key the table hashes
    ///
    /// # Errors
    ///
    /// Returns [`TableError::MalformedKey`] if the id is not a non-negative integer, or
    /// [`TableError::NonCanonicalKey`] if it has a sign or leading zeros.
    pub fn key(&self) -> Result<u64, TableError> {
        parse_key(&self.id)
    }
}

/// Parses a bid id into its numeric key
///
/// # Errors
///
/// Returns [`TableError::MalformedKey`] if `id` is not a non-negative integer, and
/// [`TableError::NonCanonicalKey`] if it carries a sign or leading zeros. Ids are compared as
/// text, so `"05"` would otherwise be a second record sharing the key of `"5"`.
pub fn parse_key(id: &str) -> Result<u64, TableError> {
    let key = id
        .parse::<u64>()
        .map_err(|source| TableError::MalformedKey { id: id.to_string(), source })?;
    if key.to_string() == id {
        Ok(key)
    } else {
        Err(TableError::NonCanonicalKey { id: id.to_string(), key })
    }
}

impl fmt::Display for Bid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} | {} | {}", self.id, self.title, self.amount, self.fund)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_amount() {
        let bid = Bid::default();
        assert!(bid.amount().abs() < f64::EPSILON);
        assert!(bid.id().is_empty());
    }

    #[test]
    fn test_key() {
        let bid = Bid::new("98223", "Table", "General Fund", 12.5);
        assert_eq!(bid.key(), Ok(98_223));
        assert_eq!(parse_key("0"), Ok(0));
    }

    #[test]
    fn test_malformed_key() {
        for id in ["", "-1", "12a", "1.5", " 7"] {
            assert!(
                matches!(parse_key(id), Err(TableError::MalformedKey { .. })),
                "{id:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_non_canonical_key() {
        for id in ["+5", "05", "007", "+0", "00"] {
            assert!(
                matches!(parse_key(id), Err(TableError::NonCanonicalKey { .. })),
                "{id:?} should be rejected"
            );
        }
        assert_eq!(
            parse_key("05"),
            Err(TableError::NonCanonicalKey { id: "05".to_string(), key: 5 })
        );
        assert_eq!(parse_key("50"), Ok(50));
    }

    #[test]
    fn test_display() {
        let bid = Bid::new("98109", "Chair", "Enterprise", 27.5);
        assert_eq!(bid.to_string(), "98109: Chair | 27.5 | Enterprise");
    }
}
