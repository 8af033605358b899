use super::forecast::ForecastPoint;
use super::marketplace::{Marketplace, ParseError};
use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DataError {
    #[error("duplicate transaction id: {0}")]
    DuplicateTransactionId(String),
    #[error("duplicate return id: {0}")]
    DuplicateReturnId(String),
    #[error("negative amount {amount} on transaction {id}")]
    NegativeAmount { id: String, amount: Decimal },
    #[error("negative refund amount {amount} on return {id}")]
    NegativeRefund { id: String, amount: Decimal },
}

/// Outcome of matching a transaction against its settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Reconciled,
    Pending,
    Discrepancy,
}

impl TransactionStatus {
    pub const ALL: [TransactionStatus; 3] = [
        TransactionStatus::Reconciled,
        TransactionStatus::Pending,
        TransactionStatus::Discrepancy,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TransactionStatus::Reconciled => "reconciled",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Discrepancy => "discrepancy",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TransactionStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionStatus::ALL
            .into_iter()
            .find(|st| st.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::UnknownStatus(s.to_string()))
    }
}

/// Reason a customer sent an order back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReturnCategory {
    SizeIssue,
    QualityIssue,
    WrongItem,
    Damaged,
    NotAsDescribed,
}

impl ReturnCategory {
    pub const ALL: [ReturnCategory; 5] = [
        ReturnCategory::SizeIssue,
        ReturnCategory::QualityIssue,
        ReturnCategory::WrongItem,
        ReturnCategory::Damaged,
        ReturnCategory::NotAsDescribed,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ReturnCategory::SizeIssue => "size_issue",
            ReturnCategory::QualityIssue => "quality_issue",
            ReturnCategory::WrongItem => "wrong_item",
            ReturnCategory::Damaged => "damaged",
            ReturnCategory::NotAsDescribed => "not_as_described",
        }
    }
}

impl fmt::Display for ReturnCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ReturnCategory {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReturnCategory::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::UnknownCategory(s.to_string()))
    }
}

/// A marketplace sale as supplied by the data provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Transaction {
    /// Unique identifier for this transaction
    pub id: String,
    pub marketplace: Marketplace,
    /// Order value, never negative
    #[schemars(with = "f64")]
    pub amount: Decimal,
    pub status: TransactionStatus,
    /// When the order was placed (RFC3339 with offset)
    #[schemars(with = "String")]
    pub timestamp: DateTime<FixedOffset>,
    /// Unique transaction reference of the matching bank settlement, if known
    #[serde(default)]
    pub utr: Option<String>,
}

impl Transaction {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// A customer return and the refund paid out for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReturnRecord {
    pub id: String,
    /// Amount refunded to the customer, never negative
    #[schemars(with = "f64")]
    pub refund_amount: Decimal,
    pub category: ReturnCategory,
    /// Original order, when the provider links it
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub marketplace: Option<Marketplace>,
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub timestamp: Option<DateTime<FixedOffset>>,
}

/// Input root for dataset JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Dataset {
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub returns: Vec<ReturnRecord>,
    #[serde(default)]
    pub forecast: Vec<ForecastPoint>,
}

impl Dataset {
    /// Reject records that break the provider's guarantees
    pub fn validate(&self) -> Result<(), DataError> {
        let mut seen = HashSet::new();
        for tx in &self.transactions {
            if !seen.insert(tx.id.as_str()) {
                return Err(DataError::DuplicateTransactionId(tx.id.clone()));
            }
            if tx.amount < Decimal::ZERO {
                return Err(DataError::NegativeAmount {
                    id: tx.id.clone(),
                    amount: tx.amount,
                });
            }
        }

        let mut seen = HashSet::new();
        for ret in &self.returns {
            if !seen.insert(ret.id.as_str()) {
                return Err(DataError::DuplicateReturnId(ret.id.clone()));
            }
            if ret.refund_amount < Decimal::ZERO {
                return Err(DataError::NegativeRefund {
                    id: ret.id.clone(),
                    amount: ret.refund_amount,
                });
            }
        }
        Ok(())
    }
}

/// Read a full dataset from JSON, sorting transactions by timestamp
pub fn read_dataset_json<R: Read>(reader: R) -> anyhow::Result<Dataset> {
    let mut dataset: Dataset = serde_json::from_reader(reader)?;
    dataset.validate()?;
    dataset.transactions.sort_by_key(|t| t.timestamp);
    log::info!(
        "Read {} transactions, {} returns, {} forecast points",
        dataset.transactions.len(),
        dataset.returns.len(),
        dataset.forecast.len()
    );
    Ok(dataset)
}

/// Read transactions only from CSV (header row required)
pub fn read_transactions_csv<R: Read>(reader: R) -> anyhow::Result<Vec<Transaction>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut transactions = Vec::new();
    for result in rdr.deserialize() {
        let record: Transaction = result?;
        transactions.push(record);
    }
    log::info!("Read {} csv records", transactions.len());
    let dataset = Dataset {
        transactions,
        ..Default::default()
    };
    dataset.validate()?;
    let mut transactions = dataset.transactions;
    transactions.sort_by_key(|t| t.timestamp);
    Ok(transactions)
}
