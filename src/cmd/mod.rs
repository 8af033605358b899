pub mod metrics;
pub mod schema;
pub mod session;
pub mod transactions;

use crate::core::{read_dataset_json, read_transactions_csv, Dataset};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Read a dataset (JSON, or CSV of transactions only) from a file or stdin with "-"
pub fn read_dataset(path: &Path) -> anyhow::Result<Dataset> {
    if path.as_os_str() == "-" {
        read_from_stdin()
    } else {
        read_from_file(path)
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn read_from_file(path: &Path) -> anyhow::Result<Dataset> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    if is_csv(path) {
        let transactions = read_transactions_csv(reader)?;
        Ok(Dataset {
            transactions,
            ..Default::default()
        })
    } else {
        read_dataset_json(reader)
    }
}

fn read_from_stdin() -> anyhow::Result<Dataset> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    read_dataset_json(io::Cursor::new(buffer))
}

pub(crate) fn format_inr(amount: rust_decimal::Decimal) -> String {
    if amount < rust_decimal::Decimal::ZERO {
        format!("-₹{:.2}", amount.abs())
    } else {
        format!("₹{:.2}", amount)
    }
}
