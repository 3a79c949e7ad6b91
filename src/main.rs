use clap::Parser;
use remind_server::{dispatch, settings::Settings, Result};
use std::{path::PathBuf, process};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(name = env!("CARGO_BIN_NAME"))]
pub struct Cli {
    #[clap(subcommand)]
    cmd: Option<Cmd>,

    /// Configuration file to use
    #[arg(short = 'c', default_value = "settings.toml")]
    config: PathBuf,
}

impl Cli {
    async fn run(&self) -> Result {
        let settings = Settings::new(&self.config)?;

        tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new(&settings.log))
            .with(tracing_subscriber::fmt::layer())
            .init();

        if let Some(cmd) = self.cmd.as_ref() {
            cmd.run(settings).await?;
        } else {
            remind_server::server::run(settings).await?;
        }

        Ok(())
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum Cmd {
    Birthdays(Birthdays),
    Next(Next),
    Vacations(Vacations),
}

impl Cmd {
    async fn run(&self, settings: Settings) -> Result {
        match self {
            Self::Birthdays(cmd) => cmd.run(settings).await,
            Self::Next(cmd) => cmd.run(settings).await,
            Self::Vacations(cmd) => cmd.run(settings).await,
        }
    }
}

/// Print the categorized birthday table data
#[derive(Debug, clap::Args)]
pub struct Birthdays {}

impl Birthdays {
    async fn run(&self, settings: Settings) -> Result {
        let entries = dispatch::birthday_table_data(&settings).await?;
        print_json(&entries)
    }
}

/// Print the nearest upcoming birthdays
#[derive(Debug, clap::Args)]
pub struct Next {
    /// Number of distinct nearest entries to select, ties included
    #[arg(long)]
    count: Option<usize>,
}

impl Next {
    async fn run(&self, settings: Settings) -> Result {
        let k = self.count.unwrap_or(settings.report.top_k);
        let entries = dispatch::next_birthdays_data(&settings, k).await?;
        print_json(&entries)
    }
}

/// Print the current and upcoming vacations
#[derive(Debug, clap::Args)]
pub struct Vacations {}

impl Vacations {
    async fn run(&self, settings: Settings) -> Result {
        let entries = dispatch::vacations_data(&settings).await?;
        print_json(&entries)
    }
}

pub fn print_json<T: ?Sized + serde::Serialize>(value: &T) -> Result {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result {
    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        eprintln!("error: {:?}", e);
        process::exit(1);
    }

    Ok(())
}
