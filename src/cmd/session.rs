//! Session command - replay presentation events through a dashboard controller

use super::{format_inr, read_dataset};
use crate::core::{
    DashboardConfig, DashboardController, DashboardEvent, JsonFileRateCards, RateCardLoader,
    SectionId, SectionView, TaxConfig, ViewModel,
};
use anyhow::Context;
use clap::Args;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct SessionCommand {
    /// JSON dataset (or CSV of transactions); "-" reads stdin
    #[arg(short, long)]
    data: PathBuf,

    /// JSON array of events, e.g. [{"event": "change_section", "value": "analytics"}]
    #[arg(short, long)]
    script: PathBuf,

    /// Section to start on
    #[arg(long, default_value = "dashboard")]
    home: SectionId,

    /// Fill in each section's default sub-section on first visit only
    #[arg(long)]
    lazy_navigation: bool,

    /// JSON file of rate cards fetched at session start
    #[arg(long)]
    rate_cards: Option<PathBuf>,

    /// Output the final view model as JSON
    #[arg(long)]
    json: bool,
}

impl SessionCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let data = read_dataset(&self.data)?;
        let events = self.read_script()?;

        let config = DashboardConfig {
            tax: TaxConfig::default(),
            home: self.home,
            lazy_navigation: self.lazy_navigation,
        };
        let mut controller = DashboardController::new(data, config);
        if let Some(path) = &self.rate_cards {
            let loader = RateCardLoader::spawn(Arc::new(JsonFileRateCards { path: path.clone() }));
            controller = controller.with_rate_cards(loader);
        }

        let mut rejected = 0usize;
        for (i, event) in events.into_iter().enumerate() {
            if let Err(err) = controller.handle(event) {
                log::warn!("Event {} rejected: {}", i + 1, err);
                rejected += 1;
            }
        }
        controller.wait_for_rate_cards();

        let view = controller.view_model();
        if self.json {
            println!("{}", serde_json::to_string_pretty(&view)?);
        } else {
            print_view(&view, rejected);
        }
        Ok(())
    }

    fn read_script(&self) -> anyhow::Result<Vec<DashboardEvent>> {
        let file = File::open(&self.script)
            .with_context(|| format!("opening event script {}", self.script.display()))?;
        let events: Vec<DashboardEvent> = serde_json::from_reader(BufReader::new(file))?;
        log::info!("Read {} events", events.len());
        Ok(events)
    }
}

fn print_view(view: &ViewModel<'_>, rejected: usize) {
    let nav = view.navigation;
    let section = nav.active_section;

    println!();
    println!("SESSION STATE");
    println!("  Section: {} ({})", section.label(), section.description());
    if let Some(sub) = nav.sub_section_of.get(&section) {
        println!("  Sub-section: {}", sub);
    }
    println!("  Marketplace: {}", view.marketplace);
    println!(
        "  Filter panel: {} ({} criteria)",
        if view.filter_panel_open { "open" } else { "closed" },
        view.filters.active_count()
    );
    if rejected > 0 {
        println!("  Rejected events: {}", rejected);
    }
    println!();

    match &view.content {
        SectionView::Dashboard {
            metrics,
            tax,
            rate_cards,
        } => {
            println!(
                "  Sales: {} | Returns: {} ({:.2}%) | Pending: {} | Discrepancies: {}",
                format_inr(metrics.total_sales),
                metrics.total_returns,
                metrics.return_rate,
                metrics.pending_reconciliations,
                metrics.total_discrepancies
            );
            println!(
                "  Taxable: {} | GST: {} | Rate cards: {}",
                format_inr(tax.taxable_value),
                format_inr(tax.tax_amount),
                rate_cards.len()
            );
        }
        SectionView::Analytics {
            forecast_accuracy, ..
        } => println!("  Forecast accuracy: {:.2}%", forecast_accuracy),
        SectionView::Transactions { transactions, .. } => {
            println!("  Transactions shown: {}", transactions.len())
        }
        SectionView::Returns { returns } => println!("  Returns shown: {}", returns.len()),
        SectionView::RateCards { rate_cards } => println!("  Rate cards: {}", rate_cards.len()),
        SectionView::Settlements { .. } | SectionView::Tickets | SectionView::Settings { .. } => {}
    }
    println!();
}
