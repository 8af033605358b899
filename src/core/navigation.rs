//! Two-level navigation: a top-level section plus a remembered sub-section per section.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("unknown section: {0}")]
    UnknownSection(String),
    #[error("unknown sub-section: {0}")]
    UnknownSubSection(String),
    #[error("sub-section '{sub_section}' does not belong to section '{section}'")]
    IllegalSubSection {
        section: SectionId,
        sub_section: SubSection,
    },
}

/// Top-level dashboard section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    Dashboard,
    Analytics,
    Settlements,
    Transactions,
    Returns,
    RateCards,
    Tickets,
    Settings,
}

impl SectionId {
    /// Configured sections, in navigation order
    pub const ALL: [SectionId; 8] = [
        SectionId::Dashboard,
        SectionId::Analytics,
        SectionId::Settlements,
        SectionId::Transactions,
        SectionId::Returns,
        SectionId::RateCards,
        SectionId::Tickets,
        SectionId::Settings,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            SectionId::Dashboard => "dashboard",
            SectionId::Analytics => "analytics",
            SectionId::Settlements => "settlements",
            SectionId::Transactions => "transactions",
            SectionId::Returns => "returns",
            SectionId::RateCards => "rate_cards",
            SectionId::Tickets => "tickets",
            SectionId::Settings => "settings",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SectionId::Dashboard => "Dashboard",
            SectionId::Analytics => "Analytics",
            SectionId::Settlements => "Settlements",
            SectionId::Transactions => "Transactions",
            SectionId::Returns => "Returns",
            SectionId::RateCards => "Rate Cards",
            SectionId::Tickets => "Support",
            SectionId::Settings => "Settings",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SectionId::Dashboard => "Overview & key metrics",
            SectionId::Analytics => "AI-powered insights",
            SectionId::Settlements => "Payment settlements",
            SectionId::Transactions => "UTR reconciliation",
            SectionId::Returns => "Return analytics",
            SectionId::RateCards => "Marketplace fee configuration",
            SectionId::Tickets => "Ticket management",
            SectionId::Settings => "System configuration",
        }
    }

    /// Sub-sections that may be selected while this section is active
    pub fn sub_sections(&self) -> &'static [SubSection] {
        match self {
            SectionId::Analytics => &[
                SubSection::Overview,
                SubSection::Forecasting,
                SubSection::Audit,
            ],
            SectionId::Settlements => &[
                SubSection::Payments,
                SubSection::Returns,
                SubSection::Settlements,
                SubSection::ProjectedIncome,
            ],
            SectionId::Settings => &[
                SubSection::Integrations,
                SubSection::Users,
                SubSection::Automation,
            ],
            SectionId::Dashboard
            | SectionId::Transactions
            | SectionId::Returns
            | SectionId::RateCards
            | SectionId::Tickets => &[SubSection::Overview],
        }
    }

    pub fn default_sub_section(&self) -> SubSection {
        match self {
            SectionId::Analytics => SubSection::Overview,
            SectionId::Settlements => SubSection::Payments,
            SectionId::Settings => SubSection::Integrations,
            _ => SubSection::Overview,
        }
    }

    pub fn allows(&self, sub_section: SubSection) -> bool {
        self.sub_sections().contains(&sub_section)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for SectionId {
    type Err = NavigationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionId::ALL
            .into_iter()
            .find(|section| section.id() == s.trim())
            .ok_or_else(|| NavigationError::UnknownSection(s.to_string()))
    }
}

/// Secondary view inside a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubSection {
    Overview,
    Forecasting,
    Audit,
    Payments,
    Returns,
    Settlements,
    ProjectedIncome,
    Integrations,
    Users,
    Automation,
}

impl SubSection {
    pub const ALL: [SubSection; 10] = [
        SubSection::Overview,
        SubSection::Forecasting,
        SubSection::Audit,
        SubSection::Payments,
        SubSection::Returns,
        SubSection::Settlements,
        SubSection::ProjectedIncome,
        SubSection::Integrations,
        SubSection::Users,
        SubSection::Automation,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            SubSection::Overview => "overview",
            SubSection::Forecasting => "forecasting",
            SubSection::Audit => "audit",
            SubSection::Payments => "payments",
            SubSection::Returns => "returns",
            SubSection::Settlements => "settlements",
            SubSection::ProjectedIncome => "projected_income",
            SubSection::Integrations => "integrations",
            SubSection::Users => "users",
            SubSection::Automation => "automation",
        }
    }
}

impl fmt::Display for SubSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for SubSection {
    type Err = NavigationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubSection::ALL
            .into_iter()
            .find(|sub| sub.id() == s.trim())
            .ok_or_else(|| NavigationError::UnknownSubSection(s.to_string()))
    }
}

/// Snapshot of the navigation selection handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    pub active_section: SectionId,
    pub sub_section_of: BTreeMap<SectionId, SubSection>,
}

/// Owns the navigation state for one session.
///
/// `new` seeds every section with its default sub-section up front;
/// `change_section` additionally fills in the default for a section that has
/// no entry yet. With eager seeding the second path never fires, but it keeps
/// the store correct when built with [`NavigationStore::lazy`].
#[derive(Debug, Clone)]
pub struct NavigationStore {
    state: NavigationState,
}

impl NavigationStore {
    pub fn new(home: SectionId) -> Self {
        let sub_section_of = SectionId::ALL
            .into_iter()
            .map(|section| (section, section.default_sub_section()))
            .collect();
        NavigationStore {
            state: NavigationState {
                active_section: home,
                sub_section_of,
            },
        }
    }

    /// Store that only knows the home section; others get defaults on first visit
    pub fn lazy(home: SectionId) -> Self {
        let mut sub_section_of = BTreeMap::new();
        sub_section_of.insert(home, home.default_sub_section());
        NavigationStore {
            state: NavigationState {
                active_section: home,
                sub_section_of,
            },
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn active_section(&self) -> SectionId {
        self.state.active_section
    }

    pub fn sub_section_of(&self, section: SectionId) -> Option<SubSection> {
        self.state.sub_section_of.get(&section).copied()
    }

    pub fn active_sub_section(&self) -> SubSection {
        let section = self.state.active_section;
        self.sub_section_of(section)
            .unwrap_or_else(|| section.default_sub_section())
    }

    pub fn change_section(&mut self, target: SectionId) {
        log::debug!("Section {} -> {}", self.state.active_section, target);
        self.state.active_section = target;
        self.state
            .sub_section_of
            .entry(target)
            .or_insert_with(|| target.default_sub_section());
    }

    /// Select a sub-section of the active section, rejecting ones it does not declare
    pub fn change_sub_section(&mut self, sub_section: SubSection) -> Result<(), NavigationError> {
        let section = self.state.active_section;
        if !section.allows(sub_section) {
            log::warn!("Rejected sub-section {} for section {}", sub_section, section);
            return Err(NavigationError::IllegalSubSection {
                section,
                sub_section,
            });
        }
        self.state.sub_section_of.insert(section, sub_section);
        Ok(())
    }
}

impl Default for NavigationStore {
    fn default() -> Self {
        NavigationStore::new(SectionId::Dashboard)
    }
}
