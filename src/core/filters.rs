use super::marketplace::Marketplace;
use super::transaction::{ReturnCategory, ReturnRecord, Transaction, TransactionStatus};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Inclusive on both ends; an open end matches everything on that side
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountRange {
    #[serde(default)]
    pub min: Option<Decimal>,
    #[serde(default)]
    pub max: Option<Decimal>,
}

impl AmountRange {
    pub fn contains(&self, amount: Decimal) -> bool {
        self.min.is_none_or(|m| amount >= m) && self.max.is_none_or(|m| amount <= m)
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Criteria from the advanced filter panel.
///
/// This path is separate from the marketplace quick-filter: it narrows the
/// detail tables and never feeds the headline metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub date_range: DateRange,
    #[serde(default)]
    pub marketplace: Option<Marketplace>,
    #[serde(default)]
    pub status: Option<TransactionStatus>,
    #[serde(default)]
    pub amount_range: AmountRange,
    #[serde(default)]
    pub category: Option<ReturnCategory>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Number of criteria that currently restrict results
    pub fn active_count(&self) -> usize {
        [
            !self.date_range.is_empty(),
            self.marketplace.is_some(),
            self.status.is_some(),
            !self.amount_range.is_empty(),
            self.category.is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    /// Category has no bearing on transactions and is ignored here
    pub fn matches_transaction(&self, tx: &Transaction) -> bool {
        self.date_range.contains(tx.date())
            && self.marketplace.is_none_or(|m| tx.marketplace == m)
            && self.status.is_none_or(|s| tx.status == s)
            && self.amount_range.contains(tx.amount)
    }

    /// Status has no bearing on returns. Returns without a marketplace or
    /// timestamp are kept when that criterion is set.
    pub fn matches_return(&self, ret: &ReturnRecord) -> bool {
        let date_ok = ret
            .timestamp
            .is_none_or(|ts| self.date_range.contains(ts.date_naive()));
        let marketplace_ok = match (self.marketplace, ret.marketplace) {
            (Some(wanted), Some(actual)) => wanted == actual,
            _ => true,
        };
        date_ok
            && marketplace_ok
            && self.category.is_none_or(|c| ret.category == c)
            && self.amount_range.contains(ret.refund_amount)
    }

    pub fn apply_transactions<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        transactions
            .iter()
            .filter(|t| self.matches_transaction(t))
            .collect()
    }

    pub fn apply_returns<'a>(&self, returns: &'a [ReturnRecord]) -> Vec<&'a ReturnRecord> {
        returns.iter().filter(|r| self.matches_return(r)).collect()
    }
}

/// Values offered by the filter panel's drop-downs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub marketplaces: Vec<Marketplace>,
    pub statuses: Vec<TransactionStatus>,
    pub categories: Vec<ReturnCategory>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        FilterOptions {
            marketplaces: Marketplace::ALL.to_vec(),
            statuses: TransactionStatus::ALL.to_vec(),
            categories: ReturnCategory::ALL.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use rust_decimal_macros::dec;

    fn tx(
        id: &str,
        date: &str,
        marketplace: Marketplace,
        amount: Decimal,
        status: TransactionStatus,
    ) -> Transaction {
        Transaction {
            id: id.to_string(),
            marketplace,
            amount,
            status,
            timestamp: DateTime::parse_from_rfc3339(&format!("{date}T12:00:00+05:30")).unwrap(),
            utr: None,
        }
    }

    fn ret(
        id: &str,
        amount: Decimal,
        category: ReturnCategory,
        marketplace: Option<Marketplace>,
    ) -> ReturnRecord {
        ReturnRecord {
            id: id.to_string(),
            refund_amount: amount,
            category,
            order_id: None,
            marketplace,
            timestamp: None,
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn default_matches_everything() {
        let criteria = FilterCriteria::default();
        assert!(criteria.is_empty());
        assert!(criteria.matches_transaction(&tx(
            "T1",
            "2024-01-01",
            Marketplace::Ajio,
            dec!(1),
            TransactionStatus::Pending
        )));
        assert!(criteria.matches_return(&ret("R1", dec!(1), ReturnCategory::Damaged, None)));
    }

    #[test]
    fn combined_transaction_criteria() {
        let txs = vec![
            tx("T1", "2024-05-01", Marketplace::Amazon, dec!(500), TransactionStatus::Pending),
            tx("T2", "2024-05-10", Marketplace::Amazon, dec!(50), TransactionStatus::Pending),
            tx("T3", "2024-05-10", Marketplace::Flipkart, dec!(500), TransactionStatus::Pending),
            tx("T4", "2024-06-01", Marketplace::Amazon, dec!(500), TransactionStatus::Pending),
            tx("T5", "2024-05-10", Marketplace::Amazon, dec!(500), TransactionStatus::Reconciled),
        ];
        let criteria = FilterCriteria {
            date_range: DateRange {
                start: Some(date("2024-05-01")),
                end: Some(date("2024-05-31")),
            },
            marketplace: Some(Marketplace::Amazon),
            status: Some(TransactionStatus::Pending),
            amount_range: AmountRange {
                min: Some(dec!(100)),
                max: None,
            },
            category: None,
        };

        assert_eq!(criteria.active_count(), 4);
        let ids: Vec<_> = criteria
            .apply_transactions(&txs)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["T1"]);
    }

    #[test]
    fn return_criteria() {
        let returns = vec![
            ret("R1", dec!(40), ReturnCategory::SizeIssue, Some(Marketplace::Myntra)),
            ret("R2", dec!(40), ReturnCategory::Damaged, Some(Marketplace::Myntra)),
            ret("R3", dec!(40), ReturnCategory::SizeIssue, Some(Marketplace::Nykaa)),
            ret("R4", dec!(40), ReturnCategory::SizeIssue, None),
        ];
        let criteria = FilterCriteria {
            marketplace: Some(Marketplace::Myntra),
            category: Some(ReturnCategory::SizeIssue),
            ..Default::default()
        };
        let ids: Vec<_> = criteria
            .apply_returns(&returns)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["R1", "R4"]);
    }

    #[test]
    fn date_range_inclusive() {
        let range = DateRange {
            start: Some(date("2024-05-01")),
            end: Some(date("2024-05-31")),
        };
        assert!(range.contains(date("2024-05-01")));
        assert!(range.contains(date("2024-05-31")));
        assert!(!range.contains(date("2024-06-01")));
    }

    #[test]
    fn criteria_deserialize_with_missing_fields() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"status": "discrepancy"}"#).unwrap();
        assert_eq!(criteria.status, Some(TransactionStatus::Discrepancy));
        assert_eq!(criteria.active_count(), 1);
    }

    #[test]
    fn options_list_configured_values() {
        let options = FilterOptions::default();
        assert_eq!(options.marketplaces.len(), 5);
        assert_eq!(options.statuses.len(), 3);
        assert_eq!(options.categories.len(), 5);
    }
}
