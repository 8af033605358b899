use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;

/// Marketplace fee configuration, passed through to the dashboard untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateCard(pub serde_json::Value);

/// Remote (or otherwise slow) supplier of rate cards
pub trait RateCardSource: Send + Sync {
    fn fetch(&self) -> anyhow::Result<Vec<RateCard>>;
}

/// Rate cards stored as a JSON array on disk
#[derive(Debug, Clone)]
pub struct JsonFileRateCards {
    pub path: PathBuf,
}

impl RateCardSource for JsonFileRateCards {
    fn fetch(&self) -> anyhow::Result<Vec<RateCard>> {
        let file = File::open(&self.path)
            .with_context(|| format!("opening rate cards {}", self.path.display()))?;
        let cards: Vec<RateCard> = serde_json::from_reader(BufReader::new(file))?;
        log::info!("{} rate cards fetched", cards.len());
        Ok(cards)
    }
}

/// One-shot background fetch of rate cards.
///
/// The fetch runs on its own thread; the owner polls for the outcome between
/// events. A failed fetch is logged and then forgotten.
pub struct RateCardLoader {
    receiver: Option<mpsc::Receiver<anyhow::Result<Vec<RateCard>>>>,
}

impl RateCardLoader {
    pub fn spawn(source: Arc<dyn RateCardSource>) -> Self {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let _ = tx.send(source.fetch());
        });
        RateCardLoader { receiver: Some(rx) }
    }

    /// A loader with nothing in flight
    pub fn idle() -> Self {
        RateCardLoader { receiver: None }
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.receiver.is_some()
    }

    /// Non-blocking check; yields the cards once when the fetch succeeds
    pub fn poll(&mut self) -> Option<Vec<RateCard>> {
        let receiver = self.receiver.as_ref()?;
        match receiver.try_recv() {
            Ok(result) => self.finish(result),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                log::error!("Error loading rate cards: fetch thread exited without a result");
                self.receiver = None;
                None
            }
        }
    }

    /// Block until the fetch finishes
    pub fn wait(&mut self) -> Option<Vec<RateCard>> {
        let receiver = self.receiver.as_ref()?;
        match receiver.recv() {
            Ok(result) => self.finish(result),
            Err(_) => {
                log::error!("Error loading rate cards: fetch thread exited without a result");
                self.receiver = None;
                None
            }
        }
    }

    fn finish(&mut self, result: anyhow::Result<Vec<RateCard>>) -> Option<Vec<RateCard>> {
        self.receiver = None;
        match result {
            Ok(cards) => Some(cards),
            Err(err) => {
                log::error!("Error loading rate cards: {err:#}");
                None
            }
        }
    }
}
