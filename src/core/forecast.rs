use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One period of a sales forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ForecastPoint {
    #[schemars(with = "String")]
    pub period: NaiveDate,
    #[schemars(with = "f64")]
    pub predicted: Decimal,
    /// Observed value; absent for periods that have not happened yet
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub actual: Option<Decimal>,
}

/// Score a forecast series as `100 - MAPE`, floored at zero.
///
/// Only points with a non-zero actual value contribute. A series with no
/// such points scores zero. A percentage error too large to represent
/// drives the MAPE past 100, so the series scores zero.
pub fn forecast_accuracy(series: &[ForecastPoint]) -> Decimal {
    let mut sum_pct_error = Decimal::ZERO;
    let mut count = 0u32;
    for (period, predicted, actual) in series
        .iter()
        .filter_map(|p| p.actual.filter(|a| !a.is_zero()).map(|a| (p.period, p.predicted, a)))
    {
        let total = percentage_error(predicted, actual)
            .and_then(|pct| sum_pct_error.checked_add(pct));
        match total {
            Some(total) => sum_pct_error = total,
            None => {
                log::warn!("Forecast error for {} out of range, accuracy floored at 0", period);
                return Decimal::ZERO;
            }
        }
        count += 1;
    }

    if count == 0 {
        return Decimal::ZERO;
    }

    let mape = sum_pct_error / Decimal::from(count);
    log::debug!("Forecast MAPE over {} points: {}", count, mape);
    (dec!(100) - mape).max(Decimal::ZERO).round_dp(2)
}

/// `|actual - predicted| / |actual| * 100`, or `None` on overflow
fn percentage_error(predicted: Decimal, actual: Decimal) -> Option<Decimal> {
    actual
        .checked_sub(predicted)?
        .checked_div(actual)?
        .abs()
        .checked_mul(dec!(100))
}
