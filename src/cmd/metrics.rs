//! Metrics command - headline dashboard figures, GST summary and forecast accuracy

use super::{format_inr, read_dataset};
use crate::core::{
    calculate_metrics, calculate_tax_summary, forecast_accuracy, DashboardMetrics,
    JsonFileRateCards, MarketplaceSelection, RateCardLoader, TaxConfig, TaxSummary,
};
use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct MetricsCommand {
    /// JSON dataset (or CSV of transactions); "-" reads stdin
    #[arg(short, long)]
    data: PathBuf,

    /// Marketplace quick-filter ("All", "Amazon", "Flipkart", ...)
    #[arg(short, long, default_value = "All")]
    marketplace: MarketplaceSelection,

    /// GST rate as a fraction (default 0.05)
    #[arg(long)]
    tax_rate: Option<Decimal>,

    /// GSTIN shown on the tax summary
    #[arg(long)]
    gstin: Option<String>,

    /// JSON file of rate cards to load alongside the metrics
    #[arg(long)]
    rate_cards: Option<PathBuf>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct MetricsOutput {
    metrics: DashboardMetrics,
    tax: TaxSummary,
    forecast_accuracy: Decimal,
    rate_card_count: usize,
}

impl MetricsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let mut loader = match &self.rate_cards {
            Some(path) => RateCardLoader::spawn(Arc::new(JsonFileRateCards { path: path.clone() })),
            None => RateCardLoader::idle(),
        };

        let data = read_dataset(&self.data)?;
        let tax_config = self.tax_config()?;

        let metrics = calculate_metrics(&data.transactions, &data.returns, self.marketplace);
        let tax = calculate_tax_summary(&metrics, &data.returns, &tax_config);
        let accuracy = forecast_accuracy(&data.forecast);
        let rate_card_count = loader.wait().map_or(0, |cards| cards.len());

        let output = MetricsOutput {
            metrics,
            tax,
            forecast_accuracy: accuracy,
            rate_card_count,
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_metrics(&output);
        }
        Ok(())
    }

    fn tax_config(&self) -> anyhow::Result<TaxConfig> {
        let defaults = TaxConfig::default();
        let config = TaxConfig {
            gstin: self.gstin.clone().unwrap_or(defaults.gstin),
            rate: self.tax_rate.unwrap_or(defaults.rate),
        };
        config.validate()?;
        Ok(config)
    }
}

fn print_metrics(output: &MetricsOutput) {
    let m = &output.metrics;
    let tax = &output.tax;

    println!();
    println!("DASHBOARD METRICS ({})", m.marketplace);
    println!();
    println!("SALES");
    println!("  Transactions: {}", m.transaction_count);
    println!(
        "  Total Sales: {} | Avg Order Value: {}",
        format_inr(m.total_sales),
        format_inr(m.average_order_value)
    );
    println!();
    println!("RETURNS");
    println!("  Returns: {} | Return Rate: {:.2}%", m.total_returns, m.return_rate);
    println!();
    println!("RECONCILIATION");
    println!(
        "  Pending: {} | Discrepancies: {}",
        m.pending_reconciliations, m.total_discrepancies
    );
    println!();
    println!("GST SUMMARY ({})", tax.gstin);
    println!(
        "  Taxable Value: {} | GST @ {:.0}%: {}",
        format_inr(tax.taxable_value),
        tax.rate * dec!(100),
        format_inr(tax.tax_amount)
    );
    if tax.is_credit() {
        println!("  Refunds exceed sales for this period");
    }
    println!();
    println!("FORECAST ACCURACY: {:.2}%", output.forecast_accuracy);
    if output.rate_card_count > 0 {
        println!("RATE CARDS: {}", output.rate_card_count);
    }
    println!();
}
