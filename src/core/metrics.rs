use super::marketplace::MarketplaceSelection;
use super::transaction::{ReturnRecord, Transaction, TransactionStatus};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;

/// Headline indicators for the dashboard, derived from one marketplace selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardMetrics {
    pub marketplace: MarketplaceSelection,
    /// Number of transactions that passed the marketplace filter
    pub transaction_count: usize,
    pub total_sales: Decimal,
    /// Count of all return records; returns are not marketplace-filtered
    pub total_returns: usize,
    /// Returns per filtered transaction, as a percentage
    pub return_rate: Decimal,
    pub pending_reconciliations: usize,
    pub total_discrepancies: usize,
    /// Mean order value rounded to a whole unit, zero when nothing passed the filter
    pub average_order_value: Decimal,
}

/// Return rate as a percentage of `transaction_count`.
///
/// The divisor is floored at one so an empty transaction set still yields a
/// finite rate.
pub fn return_rate(transaction_count: usize, total_returns: usize) -> Decimal {
    let divisor = Decimal::from(transaction_count.max(1));
    (Decimal::from(total_returns) / divisor * dec!(100)).round_dp(2)
}

/// Compute dashboard metrics in a single pass over the filtered transactions.
///
/// Return records are counted in full regardless of `marketplace`, so per
/// marketplace results do not add up to the "All" result for return figures.
pub fn calculate_metrics(
    transactions: &[Transaction],
    returns: &[ReturnRecord],
    marketplace: MarketplaceSelection,
) -> DashboardMetrics {
    let mut transaction_count = 0usize;
    let mut total_sales = Decimal::ZERO;
    let mut pending_reconciliations = 0usize;
    let mut total_discrepancies = 0usize;

    for tx in transactions.iter().filter(|t| marketplace.includes(t.marketplace)) {
        transaction_count += 1;
        total_sales = total_sales.checked_add(tx.amount).unwrap_or_else(|| {
            log::warn!("Sales total overflowed at {}, saturating", tx.id);
            Decimal::MAX
        });
        match tx.status {
            TransactionStatus::Pending => pending_reconciliations += 1,
            TransactionStatus::Discrepancy => total_discrepancies += 1,
            TransactionStatus::Reconciled => {}
        }
    }

    let total_returns = returns.len();
    let average_order_value = if transaction_count == 0 {
        Decimal::ZERO
    } else {
        (total_sales / Decimal::from(transaction_count))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    };

    log::debug!(
        "Metrics for {}: {} transactions, sales {}, {} returns",
        marketplace,
        transaction_count,
        total_sales,
        total_returns
    );

    DashboardMetrics {
        marketplace,
        transaction_count,
        total_sales,
        total_returns,
        return_rate: return_rate(transaction_count, total_returns),
        pending_reconciliations,
        total_discrepancies,
        average_order_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::marketplace::Marketplace;
    use crate::core::transaction::ReturnCategory;
    use chrono::DateTime;

    fn tx(
        id: &str,
        marketplace: Marketplace,
        amount: Decimal,
        status: TransactionStatus,
    ) -> Transaction {
        Transaction {
            id: id.to_string(),
            marketplace,
            amount,
            status,
            timestamp: DateTime::parse_from_rfc3339("2024-05-01T10:00:00+05:30").unwrap(),
            utr: None,
        }
    }

    fn refund(id: &str, amount: Decimal) -> ReturnRecord {
        ReturnRecord {
            id: id.to_string(),
            refund_amount: amount,
            category: ReturnCategory::SizeIssue,
            order_id: None,
            marketplace: None,
            timestamp: None,
        }
    }

    fn two_marketplaces() -> Vec<Transaction> {
        vec![
            tx("T1", Marketplace::Amazon, dec!(100), TransactionStatus::Reconciled),
            tx("T2", Marketplace::Flipkart, dec!(200), TransactionStatus::Pending),
        ]
    }

    #[test]
    fn all_marketplaces() {
        let returns = vec![refund("R1", dec!(50))];
        let m = calculate_metrics(&two_marketplaces(), &returns, MarketplaceSelection::All);

        assert_eq!(m.transaction_count, 2);
        assert_eq!(m.total_sales, dec!(300));
        assert_eq!(m.total_returns, 1);
        assert_eq!(m.pending_reconciliations, 1);
        assert_eq!(m.total_discrepancies, 0);
        assert_eq!(m.average_order_value, dec!(150));
        assert_eq!(m.return_rate, dec!(50));
    }

    #[test]
    fn single_marketplace_keeps_all_returns() {
        let returns = vec![refund("R1", dec!(50))];
        let m = calculate_metrics(
            &two_marketplaces(),
            &returns,
            MarketplaceSelection::Only(Marketplace::Amazon),
        );

        assert_eq!(m.transaction_count, 1);
        assert_eq!(m.total_sales, dec!(100));
        assert_eq!(m.average_order_value, dec!(100));
        assert_eq!(m.total_returns, 1);
        assert_eq!(m.return_rate, dec!(100));
        assert_eq!(m.pending_reconciliations, 0);
    }

    #[test]
    fn empty_filtered_set_is_zero_not_error() {
        let returns = vec![refund("R1", dec!(10)), refund("R2", dec!(20))];
        let m = calculate_metrics(
            &two_marketplaces(),
            &returns,
            MarketplaceSelection::Only(Marketplace::Nykaa),
        );

        assert_eq!(m.transaction_count, 0);
        assert_eq!(m.total_sales, Decimal::ZERO);
        assert_eq!(m.average_order_value, Decimal::ZERO);
        // divisor floored at one
        assert_eq!(m.return_rate, dec!(200));
    }

    #[test]
    fn no_transactions_at_all() {
        let m = calculate_metrics(&[], &[], MarketplaceSelection::All);
        assert_eq!(m.total_sales, Decimal::ZERO);
        assert_eq!(m.average_order_value, Decimal::ZERO);
        assert_eq!(m.return_rate, Decimal::ZERO);
    }

    #[test]
    fn average_rounds_half_away_from_zero() {
        let txs = vec![
            tx("T1", Marketplace::Myntra, dec!(100), TransactionStatus::Reconciled),
            tx("T2", Marketplace::Myntra, dec!(101), TransactionStatus::Discrepancy),
        ];
        let m = calculate_metrics(&txs, &[], MarketplaceSelection::All);
        assert_eq!(m.average_order_value, dec!(101));
        assert_eq!(m.total_discrepancies, 1);
    }

    #[test]
    fn counts_never_exceed_filtered_set() {
        let txs = vec![
            tx("T1", Marketplace::Ajio, dec!(5), TransactionStatus::Pending),
            tx("T2", Marketplace::Ajio, dec!(5), TransactionStatus::Discrepancy),
            tx("T3", Marketplace::Amazon, dec!(5), TransactionStatus::Pending),
        ];
        for selection in [
            MarketplaceSelection::All,
            MarketplaceSelection::Only(Marketplace::Ajio),
            MarketplaceSelection::Only(Marketplace::Amazon),
        ] {
            let m = calculate_metrics(&txs, &[], selection);
            assert!(m.pending_reconciliations <= m.transaction_count);
            assert!(m.total_discrepancies <= m.transaction_count);
        }
    }

    #[test]
    fn per_marketplace_results_do_not_compose_for_returns() {
        let txs = two_marketplaces();
        let returns = vec![refund("R1", dec!(50))];
        let all = calculate_metrics(&txs, &returns, MarketplaceSelection::All);

        let parts: Vec<_> = Marketplace::ALL
            .into_iter()
            .map(|m| calculate_metrics(&txs, &returns, MarketplaceSelection::Only(m)))
            .collect();

        let sales: Decimal = parts.iter().map(|p| p.total_sales).sum();
        let returns_sum: usize = parts.iter().map(|p| p.total_returns).sum();

        assert_eq!(sales, all.total_sales);
        assert_ne!(returns_sum, all.total_returns);
        assert_eq!(returns_sum, Marketplace::ALL.len() * all.total_returns);
    }

    #[test]
    fn return_rate_is_finite_and_non_negative() {
        for (count, returns) in [(0, 0), (0, 7), (3, 1), (1000, 3)] {
            assert!(return_rate(count, returns) >= Decimal::ZERO);
        }
        assert_eq!(return_rate(3, 1), dec!(33.33));
        assert_eq!(return_rate(0, 4), dec!(400));
    }

    #[test]
    fn sales_total_saturates_instead_of_overflowing() {
        let txs = vec![
            tx("T1", Marketplace::Amazon, Decimal::MAX, TransactionStatus::Reconciled),
            tx("T2", Marketplace::Amazon, Decimal::MAX, TransactionStatus::Pending),
        ];
        let m = calculate_metrics(&txs, &[], MarketplaceSelection::All);

        assert_eq!(m.transaction_count, 2);
        assert_eq!(m.total_sales, Decimal::MAX);
        assert_eq!(m.pending_reconciliations, 1);
        assert!(m.average_order_value > Decimal::ZERO);
    }
}
