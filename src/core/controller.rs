use super::filters::{FilterCriteria, FilterOptions};
use super::forecast::forecast_accuracy;
use super::marketplace::MarketplaceSelection;
use super::metrics::{calculate_metrics, DashboardMetrics};
use super::navigation::{NavigationError, NavigationState, NavigationStore, SectionId, SubSection};
use super::rate_cards::{RateCard, RateCardLoader};
use super::tax::{calculate_tax_summary, TaxConfig, TaxSummary};
use super::transaction::{Dataset, ReturnRecord, Transaction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Session-wide settings for the controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub tax: TaxConfig,
    /// Section shown when the session starts
    pub home: SectionId,
    /// Record a section's default sub-section on first visit instead of up front
    pub lazy_navigation: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            tax: TaxConfig::default(),
            home: SectionId::Dashboard,
            lazy_navigation: false,
        }
    }
}

/// Discrete interaction sent back by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "value", rename_all = "snake_case")]
pub enum DashboardEvent {
    ChangeSection(SectionId),
    ChangeSubSection(SubSection),
    SetMarketplace(MarketplaceSelection),
    ToggleFilterPanel(bool),
    SetFilterCriteria(FilterCriteria),
}

/// Content for whichever section is active
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "section", rename_all = "snake_case")]
pub enum SectionView<'a> {
    Dashboard {
        metrics: &'a DashboardMetrics,
        tax: TaxSummary,
        rate_cards: &'a [RateCard],
    },
    Analytics {
        sub_section: SubSection,
        forecast_accuracy: Decimal,
    },
    Settlements {
        sub_section: SubSection,
    },
    Transactions {
        marketplace: MarketplaceSelection,
        transactions: Vec<&'a Transaction>,
    },
    Returns {
        returns: &'a [ReturnRecord],
    },
    RateCards {
        rate_cards: &'a [RateCard],
    },
    Tickets,
    Settings {
        sub_section: SubSection,
    },
}

/// Everything the presentation layer needs to draw the current screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel<'a> {
    pub navigation: &'a NavigationState,
    pub marketplace: MarketplaceSelection,
    pub filter_panel_open: bool,
    pub filters: &'a FilterCriteria,
    pub filter_options: FilterOptions,
    pub content: SectionView<'a>,
}

/// Reacts to dashboard events and derives the view model from the latest inputs
pub struct DashboardController {
    config: DashboardConfig,
    data: Dataset,
    navigation: NavigationStore,
    marketplace: MarketplaceSelection,
    metrics: DashboardMetrics,
    filter_panel_open: bool,
    filters: FilterCriteria,
    rate_cards: Vec<RateCard>,
    rate_card_loader: RateCardLoader,
}

impl DashboardController {
    pub fn new(data: Dataset, config: DashboardConfig) -> Self {
        let marketplace = MarketplaceSelection::All;
        let metrics = calculate_metrics(&data.transactions, &data.returns, marketplace);
        let navigation = if config.lazy_navigation {
            NavigationStore::lazy(config.home)
        } else {
            NavigationStore::new(config.home)
        };
        DashboardController {
            navigation,
            config,
            data,
            marketplace,
            metrics,
            filter_panel_open: false,
            filters: FilterCriteria::default(),
            rate_cards: Vec::new(),
            rate_card_loader: RateCardLoader::idle(),
        }
    }

    /// Attach the session's rate-card fetch; results are picked up on later events
    pub fn with_rate_cards(mut self, loader: RateCardLoader) -> Self {
        self.rate_card_loader = loader;
        self
    }

    /// Apply one event. Rejected navigation leaves all state as it was.
    pub fn handle(&mut self, event: DashboardEvent) -> Result<(), NavigationError> {
        self.poll_rate_cards();
        match event {
            DashboardEvent::ChangeSection(section) => self.navigation.change_section(section),
            DashboardEvent::ChangeSubSection(sub_section) => {
                self.navigation.change_sub_section(sub_section)?
            }
            DashboardEvent::SetMarketplace(marketplace) => self.set_marketplace(marketplace),
            DashboardEvent::ToggleFilterPanel(open) => self.filter_panel_open = open,
            DashboardEvent::SetFilterCriteria(filters) => self.filters = filters,
        }
        Ok(())
    }

    /// Publish a finished rate-card fetch, if one has arrived
    pub fn poll_rate_cards(&mut self) {
        if let Some(cards) = self.rate_card_loader.poll() {
            self.rate_cards = cards;
        }
    }

    /// Block on an outstanding rate-card fetch
    pub fn wait_for_rate_cards(&mut self) {
        if let Some(cards) = self.rate_card_loader.wait() {
            self.rate_cards = cards;
        }
    }

    fn set_marketplace(&mut self, marketplace: MarketplaceSelection) {
        self.marketplace = marketplace;
        self.metrics = calculate_metrics(&self.data.transactions, &self.data.returns, marketplace);
    }

    pub fn navigation(&self) -> &NavigationStore {
        &self.navigation
    }

    pub fn marketplace(&self) -> MarketplaceSelection {
        self.marketplace
    }

    pub fn metrics(&self) -> &DashboardMetrics {
        &self.metrics
    }

    pub fn filters(&self) -> &FilterCriteria {
        &self.filters
    }

    pub fn filter_panel_open(&self) -> bool {
        self.filter_panel_open
    }

    pub fn rate_cards(&self) -> &[RateCard] {
        &self.rate_cards
    }

    pub fn tax_summary(&self) -> TaxSummary {
        calculate_tax_summary(&self.metrics, &self.data.returns, &self.config.tax)
    }

    pub fn forecast_accuracy(&self) -> Decimal {
        forecast_accuracy(&self.data.forecast)
    }

    /// Transactions through the marketplace quick-filter only
    pub fn visible_transactions(&self) -> Vec<&Transaction> {
        self.marketplace.filter(&self.data.transactions)
    }

    pub fn view_model(&self) -> ViewModel<'_> {
        let sub_section = self.navigation.active_sub_section();
        let content = match self.navigation.active_section() {
            SectionId::Dashboard => SectionView::Dashboard {
                metrics: &self.metrics,
                tax: self.tax_summary(),
                rate_cards: &self.rate_cards,
            },
            SectionId::Analytics => SectionView::Analytics {
                sub_section,
                forecast_accuracy: self.forecast_accuracy(),
            },
            SectionId::Settlements => SectionView::Settlements { sub_section },
            SectionId::Transactions => SectionView::Transactions {
                marketplace: self.marketplace,
                transactions: self.visible_transactions(),
            },
            SectionId::Returns => SectionView::Returns {
                returns: &self.data.returns,
            },
            SectionId::RateCards => SectionView::RateCards {
                rate_cards: &self.rate_cards,
            },
            SectionId::Tickets => SectionView::Tickets,
            SectionId::Settings => SectionView::Settings { sub_section },
        };

        ViewModel {
            navigation: self.navigation.state(),
            marketplace: self.marketplace,
            filter_panel_open: self.filter_panel_open,
            filters: &self.filters,
            filter_options: FilterOptions::default(),
            content,
        }
    }
}
