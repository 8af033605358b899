pub mod controller;
pub mod filters;
pub mod forecast;
pub mod marketplace;
pub mod metrics;
pub mod navigation;
pub mod rate_cards;
pub mod tax;
pub mod transaction;

// Flat public surface for domain types and functions.
pub use controller::{DashboardConfig, DashboardController, DashboardEvent, SectionView, ViewModel};
pub use filters::{AmountRange, DateRange, FilterCriteria, FilterOptions};
pub use forecast::{forecast_accuracy, ForecastPoint};
pub use marketplace::{Marketplace, MarketplaceSelection, ParseError};
pub use metrics::{calculate_metrics, return_rate, DashboardMetrics};
pub use navigation::{NavigationError, NavigationState, NavigationStore, SectionId, SubSection};
pub use rate_cards::{JsonFileRateCards, RateCard, RateCardLoader, RateCardSource};
pub use tax::{calculate_tax_summary, TaxConfig, TaxSummary};
#[allow(unused_imports)]
pub use transaction::{
    read_dataset_json, read_transactions_csv, DataError, Dataset, ReturnCategory, ReturnRecord,
    Transaction, TransactionStatus,
};
