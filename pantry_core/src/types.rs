//! Core domain types for perishable inventory tracking.
//!
//! This module defines the fundamental types used throughout the system:
//! - Lots (one batch of a good, with quantity and optional expiration date)
//! - Goods (a named sequence of lots)
//! - Identity and quantity policies selected through configuration

use crate::{Error, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Date format accepted for expiration dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Policies
// ============================================================================

/// How good names are compared when deciding whether two adds hit the same good
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NameIdentity {
    /// "Eggs" and "eggs" are two distinct goods
    #[default]
    CaseSensitive,
    /// "Eggs" and "eggs" share one good, displayed with the first-seen spelling
    CaseFolded,
}

impl NameIdentity {
    /// Key under which a name is stored
    pub fn key(self, name: &str) -> String {
        match self {
            NameIdentity::CaseSensitive => name.to_string(),
            NameIdentity::CaseFolded => name.to_lowercase(),
        }
    }
}

/// Which quantities a new lot may carry
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuantityPolicy {
    /// Any decimal, including zero and negative values
    #[default]
    AcceptAny,
    /// Negative quantities are rejected with `Error::InvalidQuantity`
    NonNegative,
}

// ============================================================================
// Lot and Good
// ============================================================================

/// One batch of a good
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Lot {
    quantity: Decimal,
    expiration_date: Option<NaiveDate>,
}

impl Lot {
    /// Create a lot without any validation
    pub fn new(quantity: Decimal, expiration_date: Option<NaiveDate>) -> Self {
        Self {
            quantity,
            expiration_date,
        }
    }

    /// Validated constructor used by the inventory
    ///
    /// Parses `expiration_date` (if any) and applies `policy` to the quantity.
    /// `name` is only used for error reporting.
    pub fn checked(
        name: &str,
        quantity: Decimal,
        expiration_date: Option<&str>,
        policy: QuantityPolicy,
    ) -> Result<Self> {
        let expiration_date = expiration_date.map(parse_date).transpose()?.flatten();

        if policy == QuantityPolicy::NonNegative && quantity < Decimal::ZERO {
            return Err(Error::InvalidQuantity {
                name: name.to_string(),
                quantity,
            });
        }

        Ok(Self::new(quantity, expiration_date))
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn expiration_date(&self) -> Option<NaiveDate> {
        self.expiration_date
    }

    /// True if the lot carries a date on or before `deadline`
    ///
    /// Lots without an expiration date never expire.
    pub fn expires_by(&self, deadline: NaiveDate) -> bool {
        self.expiration_date.is_some_and(|date| date <= deadline)
    }
}

/// A named good and its lots in insertion order
///
/// Only the inventory creates goods, always together with their first lot.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Good {
    pub(crate) name: String,
    pub(crate) lots: Vec<Lot>,
}

impl Good {
    pub(crate) fn new(name: &str, first: Lot) -> Self {
        Self {
            name: name.to_string(),
            lots: vec![first],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lots(&self) -> &[Lot] {
        &self.lots
    }

    /// Sum of all lot quantities, saturating on overflow
    pub fn total(&self) -> Decimal {
        sum_quantities(self.lots.iter().map(Lot::quantity))
    }
}

/// Sum quantities, clamping to `Decimal::MAX` / `Decimal::MIN` on overflow
pub fn sum_quantities(quantities: impl IntoIterator<Item = Decimal>) -> Decimal {
    quantities.into_iter().fold(Decimal::ZERO, |total, quantity| {
        total.checked_add(quantity).unwrap_or_else(|| {
            tracing::warn!("Quantity total overflowed adding {} to {}, saturating", quantity, total);
            if quantity.is_sign_negative() {
                Decimal::MIN
            } else {
                Decimal::MAX
            }
        })
    })
}

/// Parse a `YYYY-MM-DD` date; an empty string means "no date"
pub fn parse_date(value: &str) -> Result<Option<NaiveDate>> {
    if value.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(Some)
        .map_err(|source| Error::DateFormat {
            value: value.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2023-07-15").unwrap(), Some(date(2023, 7, 15)));
        assert_eq!(parse_date("").unwrap(), None);
    }

    #[test]
    fn test_parse_date_rejects_other_formats() {
        for bad in ["15.07.2023", "2023/07/15", "2023-13-01", "tomorrow"] {
            let err = parse_date(bad).unwrap_err();
            assert!(matches!(err, Error::DateFormat { ref value, .. } if value == bad));
        }
    }

    #[test]
    fn test_expires_by_is_inclusive() {
        let lot = Lot::new(dec!(1), Some(date(2023, 10, 1)));
        assert!(lot.expires_by(date(2023, 10, 1)));
        assert!(lot.expires_by(date(2023, 10, 2)));
        assert!(!lot.expires_by(date(2023, 9, 30)));
    }

    #[test]
    fn test_lot_without_date_never_expires() {
        let lot = Lot::new(dec!(2.5), None);
        assert!(!lot.expires_by(NaiveDate::MAX));
    }

    #[test]
    fn test_checked_accepts_negative_by_default() {
        let lot = Lot::checked("Water", dec!(-1), None, QuantityPolicy::AcceptAny).unwrap();
        assert_eq!(lot.quantity(), dec!(-1));
    }

    #[test]
    fn test_checked_non_negative_policy() {
        let err = Lot::checked("Water", dec!(-0.5), None, QuantityPolicy::NonNegative).unwrap_err();
        assert!(matches!(err, Error::InvalidQuantity { ref name, .. } if name == "Water"));

        let zero = Lot::checked("Water", dec!(0), None, QuantityPolicy::NonNegative).unwrap();
        assert!(zero.quantity().is_zero());
    }

    #[test]
    fn test_checked_reports_bad_date_before_quantity() {
        let err = Lot::checked("Eggs", dec!(-1), Some("2023-7-x"), QuantityPolicy::NonNegative)
            .unwrap_err();
        assert!(matches!(err, Error::DateFormat { .. }));
    }

    #[test]
    fn test_good_total() {
        let good = Good {
            name: "Eggs".into(),
            lots: vec![
                Lot::new(dec!(10), Some(date(2023, 9, 30))),
                Lot::new(dec!(3), None),
            ],
        };
        assert_eq!(good.total(), dec!(13));
    }

    #[test]
    fn test_sum_quantities_saturates() {
        assert_eq!(sum_quantities([Decimal::MAX, dec!(1)]), Decimal::MAX);
        assert_eq!(sum_quantities([Decimal::MIN, dec!(-1)]), Decimal::MIN);
        assert_eq!(sum_quantities(Vec::new()), Decimal::ZERO);
    }

    #[test]
    fn test_identity_key() {
        assert_eq!(NameIdentity::CaseSensitive.key("Eggs"), "Eggs");
        assert_eq!(NameIdentity::CaseFolded.key("Eggs"), "eggs");
    }
}
