//! Transactions command - detail table through the quick filter and the advanced criteria

use super::{format_inr, read_dataset};
use crate::core::{
    AmountRange, DateRange, FilterCriteria, Marketplace, MarketplaceSelection, ReturnCategory,
    ReturnRecord, Transaction, TransactionStatus,
};
use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct TransactionsCommand {
    /// JSON dataset (or CSV of transactions); "-" reads stdin
    #[arg(short, long)]
    data: PathBuf,

    /// Marketplace quick-filter ("All", "Amazon", ...)
    #[arg(short, long, default_value = "All")]
    marketplace: MarketplaceSelection,

    /// Advanced filter: marketplace
    #[arg(long)]
    filter_marketplace: Option<Marketplace>,

    /// Advanced filter: reconciliation status
    #[arg(short, long)]
    status: Option<TransactionStatus>,

    /// Advanced filter: return category (with --returns)
    #[arg(long)]
    category: Option<ReturnCategory>,

    /// Advanced filter: earliest date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Advanced filter: latest date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Advanced filter: minimum amount
    #[arg(long)]
    min: Option<Decimal>,

    /// Advanced filter: maximum amount
    #[arg(long)]
    max: Option<Decimal>,

    /// List return records instead of transactions
    #[arg(long)]
    returns: bool,

    /// Output as CSV instead of formatted table
    #[arg(long)]
    csv: bool,
}

impl TransactionsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let data = read_dataset(&self.data)?;
        let criteria = self.criteria();
        if !criteria.is_empty() {
            log::debug!("{} advanced filter criteria active", criteria.active_count());
        }

        if self.returns {
            let rows: Vec<ReturnRow> = criteria
                .apply_returns(&data.returns)
                .into_iter()
                .map(ReturnRow::from)
                .collect();
            self.output(&rows)
        } else {
            let quick = self.marketplace.filter(&data.transactions);
            let rows: Vec<TransactionRow> = quick
                .into_iter()
                .filter(|t| criteria.matches_transaction(t))
                .map(TransactionRow::from)
                .collect();
            self.output(&rows)
        }
    }

    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            date_range: DateRange {
                start: self.from,
                end: self.to,
            },
            marketplace: self.filter_marketplace,
            status: self.status,
            amount_range: AmountRange {
                min: self.min,
                max: self.max,
            },
            category: self.category,
        }
    }

    fn output<R: Tabled + serde::Serialize>(&self, rows: &[R]) -> anyhow::Result<()> {
        if self.csv {
            let mut wtr = csv::Writer::from_writer(io::stdout());
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
            return Ok(());
        }

        if rows.is_empty() {
            println!("No records found matching filters");
            return Ok(());
        }

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        Ok(())
    }
}

#[derive(Debug, Clone, Tabled, serde::Serialize)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Marketplace")]
    marketplace: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "UTR")]
    utr: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(tx: &Transaction) -> Self {
        TransactionRow {
            id: tx.id.clone(),
            date: tx.date().format("%Y-%m-%d").to_string(),
            marketplace: tx.marketplace.to_string(),
            amount: format_inr(tx.amount),
            status: tx.status.to_string(),
            utr: tx.utr.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Tabled, serde::Serialize)]
struct ReturnRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Order")]
    order_id: String,
    #[tabled(rename = "Marketplace")]
    marketplace: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Refund")]
    refund: String,
}

impl From<&ReturnRecord> for ReturnRow {
    fn from(ret: &ReturnRecord) -> Self {
        ReturnRow {
            id: ret.id.clone(),
            order_id: ret.order_id.clone().unwrap_or_default(),
            marketplace: ret.marketplace.map(|m| m.to_string()).unwrap_or_default(),
            category: ret.category.to_string(),
            refund: format_inr(ret.refund_amount),
        }
    }
}
