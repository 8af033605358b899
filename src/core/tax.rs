use super::metrics::DashboardMetrics;
use super::transaction::ReturnRecord;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Goods and services tax settings for the seller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxConfig {
    /// GST identification number reported alongside the summary
    pub gstin: String,
    /// Flat rate applied to the taxable value (0.05 = 5%)
    pub rate: Decimal,
}

/// Tax settings rejected before any summary is computed
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TaxConfigError {
    #[error("GST rate {0} is outside 0..=1")]
    RateOutOfRange(Decimal),
}

impl TaxConfig {
    pub fn validate(&self) -> Result<(), TaxConfigError> {
        if self.rate < Decimal::ZERO || self.rate > Decimal::ONE {
            return Err(TaxConfigError::RateOutOfRange(self.rate));
        }
        Ok(())
    }
}

impl Default for TaxConfig {
    fn default() -> Self {
        TaxConfig {
            gstin: "29ABCDE1234F1ZG".to_string(),
            rate: dec!(0.05),
        }
    }
}

/// GST position for the current metrics snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxSummary {
    pub gstin: String,
    pub rate: Decimal,
    /// Sales less refunds. Negative when refunds exceed sales, which is
    /// reported as-is.
    pub taxable_value: Decimal,
    pub tax_amount: Decimal,
}

impl TaxSummary {
    pub fn is_credit(&self) -> bool {
        self.taxable_value < Decimal::ZERO
    }
}

pub fn calculate_tax_summary(
    metrics: &DashboardMetrics,
    returns: &[ReturnRecord],
    config: &TaxConfig,
) -> TaxSummary {
    let total_refunds = returns.iter().fold(Decimal::ZERO, |sum, r| {
        sum.checked_add(r.refund_amount).unwrap_or_else(|| {
            log::warn!("Refund total overflowed at {}, saturating", r.id);
            Decimal::MAX
        })
    });
    let taxable_value = metrics.total_sales.saturating_sub(total_refunds);
    let tax_amount = taxable_value
        .checked_mul(config.rate)
        .unwrap_or_else(|| {
            log::warn!("Tax on {} at rate {} overflowed, saturating", taxable_value, config.rate);
            taxable_value.saturating_mul(config.rate)
        })
        .round_dp(2);

    if taxable_value < Decimal::ZERO {
        log::debug!(
            "Refunds {} exceed sales {}: taxable value {}",
            total_refunds,
            metrics.total_sales,
            taxable_value
        );
    }

    TaxSummary {
        gstin: config.gstin.clone(),
        rate: config.rate,
        taxable_value,
        tax_amount,
    }
}
