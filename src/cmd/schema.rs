//! Schema command - print expected input formats

use crate::core::Dataset;
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema, csv-header or csv-fields
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the dataset input
    JsonSchema,
    /// CSV header row for transaction-only input
    CsvHeader,
    /// CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => {
                let schema = schema_for!(Dataset);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::CsvHeader => {
                let names: Vec<_> = CSV_FIELDS.iter().map(|(name, _, _)| *name).collect();
                println!("{}", names.join(","));
            }
            SchemaFormat::CsvFields => {
                println!("CSV Transaction Format");
                println!("======================");
                println!();
                for (name, required, description) in CSV_FIELDS {
                    let req = if *required { "required" } else { "optional" };
                    println!("{:12} ({:8})  {}", name, req, description);
                }
                println!();
                println!("CSV input carries transactions only; use JSON for returns and forecasts");
            }
        }
        Ok(())
    }
}

const CSV_FIELDS: &[(&str, bool, &str)] = &[
    ("id", true, "Unique transaction identifier"),
    ("marketplace", true, "Amazon, Flipkart, Myntra, Ajio or Nykaa"),
    ("amount", true, "Order value (non-negative)"),
    ("status", true, "reconciled, pending or discrepancy"),
    ("timestamp", true, "RFC3339 datetime with offset"),
    ("utr", false, "Bank settlement reference"),
];
