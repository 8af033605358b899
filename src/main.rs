mod cmd;
mod core;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "recondash",
    version,
    about = "Marketplace reconciliation dashboard: sales, returns, GST and navigation state"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Headline metrics, GST summary and forecast accuracy
    Metrics(cmd::metrics::MetricsCommand),
    /// Transaction or return detail table with filters
    Transactions(cmd::transactions::TransactionsCommand),
    /// Replay dashboard events and print the resulting view
    Session(cmd::session::SessionCommand),
    /// Print the expected input formats
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Metrics(metrics) => metrics.exec(),
        Command::Transactions(transactions) => transactions.exec(),
        Command::Session(session) => session.exec(),
        Command::Schema(schema) => schema.exec(),
    }
}
