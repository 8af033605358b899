use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::transaction::Transaction;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown marketplace: {0}")]
    UnknownMarketplace(String),
    #[error("unknown transaction status: {0}")]
    UnknownStatus(String),
    #[error("unknown return category: {0}")]
    UnknownCategory(String),
}

/// Sales channel a transaction was placed through
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum Marketplace {
    Amazon,
    Flipkart,
    Myntra,
    Ajio,
    Nykaa,
}

impl Marketplace {
    /// Every configured marketplace, in display order
    pub const ALL: [Marketplace; 5] = [
        Marketplace::Amazon,
        Marketplace::Flipkart,
        Marketplace::Myntra,
        Marketplace::Ajio,
        Marketplace::Nykaa,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Marketplace::Amazon => "Amazon",
            Marketplace::Flipkart => "Flipkart",
            Marketplace::Myntra => "Myntra",
            Marketplace::Ajio => "Ajio",
            Marketplace::Nykaa => "Nykaa",
        }
    }
}

impl fmt::Display for Marketplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Marketplace {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Marketplace::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::UnknownMarketplace(s.to_string()))
    }
}

/// Quick-filter selection: either every marketplace or exactly one.
///
/// Serialized as the plain string `"All"` or the marketplace name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MarketplaceSelection {
    #[default]
    All,
    Only(Marketplace),
}

impl MarketplaceSelection {
    /// Whether a transaction placed on `marketplace` passes this selection
    pub fn includes(&self, marketplace: Marketplace) -> bool {
        match self {
            MarketplaceSelection::All => true,
            MarketplaceSelection::Only(m) => *m == marketplace,
        }
    }

    /// Apply the selection to a transaction set, preserving input order
    pub fn filter<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        transactions
            .iter()
            .filter(|t| self.includes(t.marketplace))
            .collect()
    }
}

impl fmt::Display for MarketplaceSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketplaceSelection::All => write!(f, "All"),
            MarketplaceSelection::Only(m) => write!(f, "{m}"),
        }
    }
}

impl FromStr for MarketplaceSelection {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(MarketplaceSelection::All)
        } else {
            s.parse().map(MarketplaceSelection::Only)
        }
    }
}

impl TryFrom<String> for MarketplaceSelection {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MarketplaceSelection> for String {
    fn from(selection: MarketplaceSelection) -> Self {
        selection.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transaction::TransactionStatus;
    use chrono::DateTime;
    use rust_decimal_macros::dec;

    fn tx(id: &str, marketplace: Marketplace) -> Transaction {
        Transaction {
            id: id.to_string(),
            marketplace,
            amount: dec!(10),
            status: TransactionStatus::Reconciled,
            timestamp: DateTime::parse_from_rfc3339("2024-05-01T10:00:00+05:30").unwrap(),
            utr: None,
        }
    }

    #[test]
    fn parse_marketplace_case_insensitive() {
        assert_eq!("amazon".parse::<Marketplace>(), Ok(Marketplace::Amazon));
        assert_eq!("NYKAA".parse::<Marketplace>(), Ok(Marketplace::Nykaa));
        assert_eq!(
            "ebay".parse::<Marketplace>(),
            Err(ParseError::UnknownMarketplace("ebay".to_string()))
        );
    }

    #[test]
    fn parse_selection() {
        assert_eq!("All".parse::<MarketplaceSelection>(), Ok(MarketplaceSelection::All));
        assert_eq!(
            "Flipkart".parse::<MarketplaceSelection>(),
            Ok(MarketplaceSelection::Only(Marketplace::Flipkart))
        );
        assert!("".parse::<MarketplaceSelection>().is_err());
    }

    #[test]
    fn all_keeps_every_transaction() {
        let txs = vec![tx("a", Marketplace::Amazon), tx("b", Marketplace::Ajio)];
        assert_eq!(MarketplaceSelection::All.filter(&txs).len(), 2);
    }

    #[test]
    fn only_keeps_matching_in_order() {
        let txs = vec![
            tx("a", Marketplace::Amazon),
            tx("b", Marketplace::Ajio),
            tx("c", Marketplace::Amazon),
        ];
        let ids: Vec<_> = MarketplaceSelection::Only(Marketplace::Amazon)
            .filter(&txs)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn selection_serializes_as_plain_string() {
        let json = serde_json::to_string(&MarketplaceSelection::Only(Marketplace::Myntra)).unwrap();
        assert_eq!(json, "\"Myntra\"");
        let back: MarketplaceSelection = serde_json::from_str("\"All\"").unwrap();
        assert_eq!(back, MarketplaceSelection::All);
    }
}
