//! Brokerage Performance Reporting
//!
//! This tool aggregates CRM, transaction, accounting, marketing, and job
//! service exports into CSV reports and a console summary. When no CSV
//! data is present it runs against a deterministic synthetic data set.

mod config;
mod constants;
mod errors;
mod frame;
mod group;
mod join;
mod metrics;
mod rank;
mod reports;
mod store;
mod synth;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use config::FileConfig;
use metrics::UniformScorer;
use store::RecordStore;

/// Default config file path
const CONFIG_FILE: &str = "config.toml";

#[derive(Parser, Debug)]
#[command(name = "broker-reports")]
#[command(about = "Performance reporting over brokerage and job-service exports")]
struct Args {
    /// Data directory holding the CSV exports
    #[arg(short, long, default_value = "./data", global = true)]
    data_dir: PathBuf,

    /// Output directory for generated CSV reports
    #[arg(short, long, default_value = "./output", global = true)]
    output_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,

    /// Filter reports to a specific year (e.g., 2025)
    #[arg(long)]
    year: Option<i32>,

    /// Seed for synthetic data generation (ignored when CSV data exists)
    #[arg(long)]
    seed: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inspect agents
    Agents {
        #[command(subcommand)]
        action: AgentsCommand,
    },

    /// Inspect ad campaigns
    Campaigns {
        #[command(subcommand)]
        action: CampaignsCommand,
    },

    /// Inspect leads
    Leads {
        #[command(subcommand)]
        action: LeadsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum AgentsCommand {
    /// List agents with lead, deal, and commission totals
    List,
}

#[derive(Subcommand, Debug)]
enum CampaignsCommand {
    /// List campaigns with spend and simulated return
    List,
}

#[derive(Subcommand, Debug)]
enum LeadsCommand {
    /// Show the highest-scored leads
    Top {
        /// Number of leads to show
        #[arg(long, default_value_t = constants::TOP_LEADS_COUNT)]
        n: usize,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    std::fs::create_dir_all(&args.data_dir)?;
    std::fs::create_dir_all(&args.output_dir)?;

    let file_config = FileConfig::load_or_default(std::path::Path::new(CONFIG_FILE))?;
    let store = load_store(&args, &file_config)?;

    if let Some(command) = args.command {
        return handle_command(command, &store, &file_config);
    }

    run_report_generation(args, store, file_config)
}

/// Build the record store: CSV exports when present, otherwise the
/// deterministic synthetic set. Lead scores are assigned either way.
fn load_store(args: &Args, file_config: &FileConfig) -> Result<RecordStore> {
    let mut store = if RecordStore::has_csv_data(&args.data_dir) {
        if args.verbose {
            println!("Loading CSV exports from {}", args.data_dir.display());
        }
        RecordStore::load_dir(&args.data_dir)?
    } else {
        let seed = args.seed.unwrap_or(constants::DEFAULT_SYNTH_SEED);
        if args.verbose {
            println!(
                "No CSV data in {}; generating synthetic records (seed {})",
                args.data_dir.display(),
                seed
            );
        }
        synth::synthetic_store(seed)
    };

    let mut scorer = UniformScorer::seeded(file_config.simulation.lead_score_seed);
    store.assign_lead_scores(&mut scorer);

    if args.verbose {
        println!(
            "Loaded: {} leads, {} deals, {} invoices, {} campaigns, {} agents, {} listings, {} jobs\n",
            store.leads.len(),
            store.deals.len(),
            store.invoices.len(),
            store.campaigns.len(),
            store.agents.len(),
            store.listings.len(),
            store.jobs.len(),
        );
    }

    Ok(store)
}

/// Handle inspection subcommands
fn handle_command(command: Command, store: &RecordStore, file_config: &FileConfig) -> Result<()> {
    match command {
        Command::Agents {
            action: AgentsCommand::List,
        } => {
            let perf = reports::agent_performance(store, None);
            if perf.is_empty() {
                println!("No agents loaded.");
                return Ok(());
            }

            println!(
                "{:<20} {:>8} {:>8} {:>14} {:>12}",
                "Agent", "Leads", "Closed", "Commission", "Avg Delay"
            );
            println!("{}", "-".repeat(66));

            let mut total_commission = 0.0;
            for agent in &perf {
                println!(
                    "{:<20} {:>8} {:>8} {:>13.2} {:>12}",
                    truncate(&agent.full_name, 19),
                    agent.leads,
                    agent.closed_deals,
                    agent.total_commission,
                    agent
                        .mean_close_delay
                        .map(|d| format!("{:.1}d", d))
                        .unwrap_or_else(|| "-".to_string()),
                );
                total_commission += agent.total_commission;
            }
            println!("{}", "-".repeat(66));
            println!("{:<20} {:>30.2}", "Total", total_commission);
            println!("\n{} agent(s)", perf.len());
            Ok(())
        }

        Command::Campaigns {
            action: CampaignsCommand::List,
        } => {
            let campaigns = reports::campaign_roi(store, &file_config.simulation);
            if campaigns.is_empty() {
                println!("No campaigns with closed deals to report.");
                return Ok(());
            }

            println!(
                "{:<20} {:<12} {:>8} {:>8} {:>10} {:>8}",
                "Campaign", "Platform", "Leads", "Closed", "Spend", "ROI"
            );
            println!("{}", "-".repeat(72));

            for c in &campaigns {
                println!(
                    "{:<20} {:<12} {:>8} {:>8} {:>9.2} {:>8}",
                    truncate(&c.utm_campaign, 19),
                    c.platform,
                    c.leads_generated,
                    c.closed_deals,
                    c.ad_spend,
                    c.roi.map(|r| format!("{:.2}", r)).unwrap_or_else(|| "-".to_string()),
                );
            }
            println!("{}", "-".repeat(72));
            println!("\n{} campaign(s)", campaigns.len());
            Ok(())
        }

        Command::Leads {
            action: LeadsCommand::Top { n },
        } => {
            let top = reports::top_leads(store, n)?;
            if top.is_empty() {
                println!("No scored leads.");
                return Ok(());
            }

            println!(
                "{:<20} {:<26} {:<14} {:>8}",
                "Name", "Email", "Stage", "Score"
            );
            println!("{}", "-".repeat(70));

            for row in top.iter() {
                println!(
                    "{:<20} {:<26} {:<14} {:>8.3}",
                    truncate(row.str_val("full_name").unwrap_or("-"), 19),
                    truncate(row.str_val("email").unwrap_or("-"), 25),
                    row.str_val("stage").unwrap_or("-"),
                    row.f64_val("lead_score").unwrap_or(0.0),
                );
            }
            println!("{}", "-".repeat(70));
            println!("\n{} lead(s)", top.len());
            Ok(())
        }
    }
}

/// Truncate string for display. Operates on characters, not bytes, so
/// accented names from CSV exports never split mid-character.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

/// Run the main report generation workflow
fn run_report_generation(args: Args, store: RecordStore, file_config: FileConfig) -> Result<()> {
    println!("Brokerage Performance Reporting");
    println!("=============================================\n");

    if let Some(year) = args.year {
        println!("Generating reports for year {}...", year);
    } else {
        println!("Generating reports...");
    }

    let report_data = reports::ReportData {
        store: &store,
        simulation: &file_config.simulation,
    };
    reports::generate_all_reports(&args.output_dir, &report_data, args.year)?;

    reports::print_summary(&report_data, args.year)?;

    println!("\nDone! Reports written to: {}", args.output_dir.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_strings_untouched() {
        assert_eq!(truncate("Ann Archer", 19), "Ann Archer");
        assert_eq!(truncate("", 5), "");
    }

    #[test]
    fn test_truncate_long_strings_get_ellipsis() {
        assert_eq!(truncate("A Very Long Agent Name", 10), "A Very ...");
    }

    #[test]
    fn test_truncate_multibyte_names() {
        // the cut must land on a character boundary, not a byte offset
        assert_eq!(truncate("Émilie Durand-Beaumont", 10), "Émilie ...");
        assert_eq!(truncate("Ñandú Peña", 10), "Ñandú Peña");
    }
}
