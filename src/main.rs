//! Command-line runner for the stock skirmish scenario.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use skirmish::demo::Skirmish;
use skirmish::{init_logging, Event, Rules};

/// A turn-based hex skirmish
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// JSON file overriding the default rules
    #[arg(short, long)]
    rules: Option<PathBuf>,
    /// Maximum number of control loop polls
    #[arg(short, long, default_value_t = 200)]
    steps: usize,
    /// Print the recorded events as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let rules = args
        .rules
        .as_deref()
        .map(Rules::load)
        .transpose()?
        .unwrap_or_default();
    let mut skirmish = Skirmish::new(rules).context("failed to set up the skirmish")?;
    let taken = skirmish.run(args.steps)?;

    if args.json {
        let mut out = io::stdout().lock();
        serde_json::to_writer_pretty(&mut out, skirmish.events())?;
        writeln!(out)?;
    } else {
        for event in skirmish.events() {
            if let Event::Message { text } = event {
                info!("{text}");
            }
        }
    }

    let survivors: Vec<_> = skirmish
        .world()
        .store
        .iter()
        .map(|entity| skirmish.world().describe(entity))
        .collect();
    info!(
        "{} events over {taken} steps; remaining: {}",
        skirmish.events().len(),
        survivors.join(", ")
    );
    Ok(())
}
