//! Report generation (CSV outputs and console summary)
//!
//! Each report is a pure pipeline over the record store: frame views,
//! inner joins, group-by aggregation, then a stable top-n sort. The CSV
//! writers and the console summary only render the resulting frames.

use anyhow::Result;
use chrono::Datelike;
use csv::Writer;
use std::path::Path;

use crate::config::SimulationConfig;
use crate::constants;
use crate::errors::EngineResult;
use crate::frame::{Frame, Value};
use crate::group::{Agg, group_by};
use crate::join::inner_join;
use crate::metrics;
use crate::rank::top_n;
use crate::store::{DealStatus, RecordStore};

/// Bundled report inputs to reduce function argument counts
pub struct ReportData<'a> {
    pub store: &'a RecordStore,
    pub simulation: &'a SimulationConfig,
}

/// Keep only rows whose date in `column` falls in `year` (all rows when
/// no filter is given). Rows with no date in that column are dropped by
/// the filter, matching the "absence, not zero" rule.
fn filter_year(frame: &Frame, column: &str, year: Option<i32>) -> Frame {
    match year {
        None => frame.clone(),
        Some(y) => frame.filter(|r| r.date_val(column).is_some_and(|d| d.year() == y)),
    }
}

// =============================================================================
// Brokerage pipelines
// =============================================================================

/// Total commission on invoices attached to Under Contract deals.
/// Sum over an empty joined set is 0.0.
pub fn commission_forecast(store: &RecordStore, year: Option<i32>) -> EngineResult<f64> {
    let under_contract = store
        .deals_frame()
        .filter(|r| r.str_val("deal_status") == Some("Under Contract"));
    let under_contract = filter_year(&under_contract, "expected_close_date", year);

    let joined = inner_join(
        &under_contract,
        &store.invoices_frame(),
        "loop_id",
        "deal_id",
        "invoice",
    )?;
    Ok(metrics::expected_commission(
        &joined.numeric_column("net_commission")?,
    ))
}

/// Closed-deal commission per agent, descending, ties in input order.
///
/// Commission sums over deal-invoice rows; the deal count is grouped on
/// the deals side alone, before the invoice join multiplies rows, so a
/// deal with several invoices still counts once.
pub fn agent_leaderboard(store: &RecordStore, year: Option<i32>) -> EngineResult<Frame> {
    let closed = store
        .deals_frame()
        .filter(|r| r.str_val("deal_status") == Some("Closed"));
    let closed = filter_year(&closed, "actual_close_date", year);

    let joined = inner_join(&closed, &store.invoices_frame(), "loop_id", "deal_id", "invoice")?;
    // agents.agent_id collides with the invoice column and becomes
    // agent_id_agent; full_name comes through unsuffixed
    let joined = inner_join(&joined, &store.agents_frame(), "agent_id", "agent_id", "agent")?;
    let commission = group_by(
        &joined,
        &["full_name"],
        &[Agg::sum("total_commission", "net_commission")],
    )?;

    let per_agent = inner_join(
        &closed,
        &store.agents_frame(),
        "listing_agent_id",
        "agent_id",
        "agent",
    )?;
    let deal_counts = group_by(
        &per_agent,
        &["full_name"],
        &[Agg::count("closed_deals", "loop_id")],
    )?;

    let merged = inner_join(&commission, &deal_counts, "full_name", "full_name", "deals")?;
    let mut board = Frame::new(&["full_name", "total_commission", "closed_deals"]);
    for row in merged.iter() {
        board.push_row(vec![
            row.get("full_name").cloned().unwrap_or(Value::Null),
            row.get("total_commission").cloned().unwrap_or(Value::Null),
            row.get("closed_deals").cloned().unwrap_or(Value::Null),
        ])?;
    }
    top_n(&board, "total_commission", board.len(), true)
}

/// Lead count per pipeline stage, most populated first.
pub fn pipeline_stages(store: &RecordStore, year: Option<i32>) -> EngineResult<Frame> {
    let leads = filter_year(&store.leads_frame(), "created_at", year);
    let grouped = group_by(&leads, &["stage"], &[Agg::count("leads", "id")])?;
    top_n(&grouped, "leads", grouped.len(), true)
}

/// Per-agent rollup across leads, deals, and invoices.
#[derive(Debug, Clone)]
pub struct AgentPerformance {
    pub full_name: String,
    pub leads: usize,
    pub closed_deals: usize,
    pub total_commission: f64,
    /// Mean (actual - expected) close delay in days; None when the agent
    /// has no closed deals with an actual close date.
    pub mean_close_delay: Option<f64>,
}

pub fn agent_performance(store: &RecordStore, year: Option<i32>) -> Vec<AgentPerformance> {
    let in_year = |d: chrono::NaiveDate| year.is_none_or(|y| d.year() == y);

    store
        .agents
        .iter()
        .map(|agent| {
            let leads = store
                .leads
                .iter()
                .filter(|l| l.agent_assigned == agent.full_name && in_year(l.created_at))
                .count();

            let closed: Vec<_> = store
                .deals
                .iter()
                .filter(|d| {
                    d.listing_agent_id == agent.agent_id
                        && d.status == DealStatus::Closed
                        && d.actual_close_date.is_some_and(&in_year)
                })
                .collect();

            let total_commission: f64 = store
                .invoices
                .iter()
                .filter(|i| i.agent_id == agent.agent_id && in_year(i.invoice_date))
                .map(|i| i.net_commission)
                .sum();

            let delays: Vec<i64> = closed
                .iter()
                .filter_map(|d| {
                    d.actual_close_date
                        .map(|actual| metrics::close_delay_days(d.expected_close_date, actual))
                })
                .collect();

            AgentPerformance {
                full_name: agent.full_name.clone(),
                leads,
                closed_deals: closed.len(),
                total_commission,
                mean_close_delay: metrics::mean_close_delay(&delays),
            }
        })
        .collect()
}

/// Per-campaign marketing economics. All deal counts and revenue figures
/// here are simulated (see metrics.rs); campaigns whose cost-per-close is
/// undefined are excluded entirely, and the lead ratio is None when its
/// own denominator is zero.
#[derive(Debug, Clone)]
pub struct CampaignRoi {
    pub utm_campaign: String,
    pub platform: String,
    pub leads_generated: u32,
    pub closed_deals: u32,
    pub ad_spend: f64,
    pub cost_per_closed_deal: f64,
    pub revenue: f64,
    pub roi: Option<f64>,
    pub leads_to_close: Option<f64>,
}

pub fn campaign_roi(store: &RecordStore, sim: &SimulationConfig) -> Vec<CampaignRoi> {
    store
        .campaigns
        .iter()
        .filter_map(|c| {
            let closed = metrics::simulated_closed_deals(c.leads_generated, sim.closure_rate_divisor);
            let cost = metrics::cost_per_closed_deal(c.ad_spend, closed)?;
            let revenue = metrics::simulated_revenue(closed, sim.per_deal_revenue);
            Some(CampaignRoi {
                utm_campaign: c.utm_campaign.clone(),
                platform: c.platform.clone(),
                leads_generated: c.leads_generated,
                closed_deals: closed,
                ad_spend: c.ad_spend,
                cost_per_closed_deal: cost,
                revenue,
                roi: metrics::roi(revenue, c.ad_spend),
                leads_to_close: metrics::leads_to_close_ratio(closed, c.leads_generated),
            })
        })
        .collect()
}

/// Closed listings per city with mean sale price, busiest city first.
pub fn city_summary(store: &RecordStore, year: Option<i32>) -> EngineResult<Frame> {
    let closed = store
        .listings_frame()
        .filter(|r| r.str_val("status") == Some("Closed"));
    let closed = filter_year(&closed, "close_date", year);

    let grouped = group_by(
        &closed,
        &["city"],
        &[
            Agg::count("listings", "mls_id"),
            Agg::mean("avg_sale_price", "sale_price"),
        ],
    )?;
    top_n(&grouped, "listings", grouped.len(), true)
}

/// Highest-scored leads. Unscored leads are absent, not zero.
pub fn top_leads(store: &RecordStore, n: usize) -> EngineResult<Frame> {
    let scored = store
        .leads_frame()
        .filter(|r| r.f64_val("lead_score").is_some());
    top_n(&scored, "lead_score", n, true)
}

// =============================================================================
// Job-service pipelines
// =============================================================================

fn completed_jobs(store: &RecordStore, year: Option<i32>) -> Frame {
    let completed = store
        .jobs_frame()
        .filter(|r| r.str_val("status") == Some("Completed"));
    filter_year(&completed, "date", year)
}

/// Completed-job revenue per day, in date order.
pub fn daily_revenue(store: &RecordStore, year: Option<i32>) -> EngineResult<Frame> {
    let grouped = group_by(
        &completed_jobs(store, year),
        &["date"],
        &[Agg::sum("revenue", "revenue")],
    )?;
    top_n(&grouped, "date", grouped.len(), false)
}

/// Completed jobs and revenue per technician, top earner first.
pub fn technician_leaderboard(store: &RecordStore, year: Option<i32>) -> EngineResult<Frame> {
    let grouped = group_by(
        &completed_jobs(store, year),
        &["technician"],
        &[Agg::count("jobs", "date"), Agg::sum("revenue", "revenue")],
    )?;
    top_n(&grouped, "revenue", grouped.len(), true)
}

/// Completed jobs and revenue per job type, most frequent first.
pub fn job_type_breakdown(store: &RecordStore, year: Option<i32>) -> EngineResult<Frame> {
    let grouped = group_by(
        &completed_jobs(store, year),
        &["job_type"],
        &[Agg::count("jobs", "date"), Agg::sum("revenue", "revenue")],
    )?;
    top_n(&grouped, "jobs", grouped.len(), true)
}

// =============================================================================
// CSV writers
// =============================================================================

/// Generate all CSV reports
pub fn generate_all_reports(
    output_dir: &Path,
    data: &ReportData,
    year_filter: Option<i32>,
) -> Result<()> {
    generate_agent_leaderboard(output_dir, data.store, year_filter)?;
    generate_pipeline_stages(output_dir, data.store, year_filter)?;
    generate_agent_performance(output_dir, data.store, year_filter)?;
    generate_campaign_roi(output_dir, data.store, data.simulation)?;
    generate_city_summary(output_dir, data.store, year_filter)?;
    generate_top_leads(output_dir, data.store)?;
    generate_daily_revenue(output_dir, data.store, year_filter)?;
    generate_technician_leaderboard(output_dir, data.store, year_filter)?;
    generate_job_types(output_dir, data.store, year_filter)?;

    Ok(())
}

fn generate_agent_leaderboard(
    output_dir: &Path,
    store: &RecordStore,
    year: Option<i32>,
) -> Result<()> {
    let path = output_dir.join(constants::AGENT_LEADERBOARD_FILENAME);
    let mut wtr = Writer::from_path(&path)?;
    wtr.write_record(["Agent", "Closed_Deals", "Total_Commission"])?;

    let board = agent_leaderboard(store, year)?;
    for row in board.iter() {
        wtr.write_record([
            row.str_val("full_name").unwrap_or(""),
            &format!("{:.0}", row.f64_val("closed_deals").unwrap_or(0.0)),
            &format!("{:.2}", row.f64_val("total_commission").unwrap_or(0.0)),
        ])?;
    }

    wtr.flush()?;
    println!("  Generated: {}", path.display());
    Ok(())
}

fn generate_pipeline_stages(
    output_dir: &Path,
    store: &RecordStore,
    year: Option<i32>,
) -> Result<()> {
    let path = output_dir.join(constants::PIPELINE_STAGES_FILENAME);
    let mut wtr = Writer::from_path(&path)?;
    wtr.write_record(["Stage", "Leads"])?;

    let stages = pipeline_stages(store, year)?;
    for row in stages.iter() {
        wtr.write_record([
            row.str_val("stage").unwrap_or(""),
            &format!("{:.0}", row.f64_val("leads").unwrap_or(0.0)),
        ])?;
    }

    wtr.flush()?;
    println!("  Generated: {}", path.display());
    Ok(())
}

fn generate_agent_performance(
    output_dir: &Path,
    store: &RecordStore,
    year: Option<i32>,
) -> Result<()> {
    let path = output_dir.join(constants::AGENT_PERFORMANCE_FILENAME);
    let mut wtr = Writer::from_path(&path)?;
    wtr.write_record([
        "Agent",
        "Leads",
        "Closed_Deals",
        "Total_Commission",
        "Avg_Close_Delay_Days",
    ])?;

    for perf in agent_performance(store, year) {
        wtr.write_record([
            &perf.full_name,
            &perf.leads.to_string(),
            &perf.closed_deals.to_string(),
            &format!("{:.2}", perf.total_commission),
            // undefined mean stays blank, never 0
            &perf
                .mean_close_delay
                .map(|d| format!("{:.1}", d))
                .unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    println!("  Generated: {}", path.display());
    Ok(())
}

fn generate_campaign_roi(
    output_dir: &Path,
    store: &RecordStore,
    sim: &SimulationConfig,
) -> Result<()> {
    let path = output_dir.join(constants::CAMPAIGN_ROI_FILENAME);
    let mut wtr = Writer::from_path(&path)?;
    wtr.write_record([
        "Campaign",
        "Platform",
        "Leads_Generated",
        "Closed_Deals",
        "Ad_Spend",
        "Cost_Per_Closed_Deal",
        "Simulated_Revenue",
        "ROI",
        "Leads_To_Close_Ratio",
    ])?;

    for roi in campaign_roi(store, sim) {
        wtr.write_record([
            &roi.utm_campaign,
            &roi.platform,
            &roi.leads_generated.to_string(),
            &roi.closed_deals.to_string(),
            &format!("{:.2}", roi.ad_spend),
            &format!("{:.2}", roi.cost_per_closed_deal),
            &format!("{:.2}", roi.revenue),
            &roi.roi.map(|r| format!("{:.2}", r)).unwrap_or_default(),
            &roi.leads_to_close
                .map(|r| format!("{:.3}", r))
                .unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    println!("  Generated: {}", path.display());
    Ok(())
}

fn generate_city_summary(output_dir: &Path, store: &RecordStore, year: Option<i32>) -> Result<()> {
    let path = output_dir.join(constants::CITY_SUMMARY_FILENAME);
    let mut wtr = Writer::from_path(&path)?;
    wtr.write_record(["City", "Closed_Listings", "Avg_Sale_Price"])?;

    let cities = city_summary(store, year)?;
    for row in cities.iter() {
        wtr.write_record([
            row.str_val("city").unwrap_or(""),
            &format!("{:.0}", row.f64_val("listings").unwrap_or(0.0)),
            &row.f64_val("avg_sale_price")
                .map(|p| format!("{:.2}", p))
                .unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    println!("  Generated: {}", path.display());
    Ok(())
}

fn generate_top_leads(output_dir: &Path, store: &RecordStore) -> Result<()> {
    let path = output_dir.join(constants::TOP_LEADS_FILENAME);
    let mut wtr = Writer::from_path(&path)?;
    wtr.write_record(["Name", "Email", "Source", "Stage", "Score"])?;

    let leads = top_leads(store, constants::TOP_LEADS_COUNT)?;
    for row in leads.iter() {
        wtr.write_record([
            row.str_val("full_name").unwrap_or(""),
            row.str_val("email").unwrap_or(""),
            row.str_val("lead_source").unwrap_or(""),
            row.str_val("stage").unwrap_or(""),
            &format!("{:.3}", row.f64_val("lead_score").unwrap_or(0.0)),
        ])?;
    }

    wtr.flush()?;
    println!("  Generated: {}", path.display());
    Ok(())
}

fn generate_daily_revenue(output_dir: &Path, store: &RecordStore, year: Option<i32>) -> Result<()> {
    let path = output_dir.join(constants::DAILY_REVENUE_FILENAME);
    let mut wtr = Writer::from_path(&path)?;
    wtr.write_record(["Date", "Revenue"])?;

    let daily = daily_revenue(store, year)?;
    for row in daily.iter() {
        wtr.write_record([
            &row.get("date").map(|v| v.to_string()).unwrap_or_default(),
            &format!("{:.2}", row.f64_val("revenue").unwrap_or(0.0)),
        ])?;
    }

    wtr.flush()?;
    println!("  Generated: {}", path.display());
    Ok(())
}

fn generate_technician_leaderboard(
    output_dir: &Path,
    store: &RecordStore,
    year: Option<i32>,
) -> Result<()> {
    let path = output_dir.join(constants::TECHNICIAN_LEADERBOARD_FILENAME);
    let mut wtr = Writer::from_path(&path)?;
    wtr.write_record(["Technician", "Jobs", "Revenue"])?;

    let board = technician_leaderboard(store, year)?;
    for row in board.iter() {
        wtr.write_record([
            row.str_val("technician").unwrap_or(""),
            &format!("{:.0}", row.f64_val("jobs").unwrap_or(0.0)),
            &format!("{:.2}", row.f64_val("revenue").unwrap_or(0.0)),
        ])?;
    }

    wtr.flush()?;
    println!("  Generated: {}", path.display());
    Ok(())
}

fn generate_job_types(output_dir: &Path, store: &RecordStore, year: Option<i32>) -> Result<()> {
    let path = output_dir.join(constants::JOB_TYPES_FILENAME);
    let mut wtr = Writer::from_path(&path)?;
    wtr.write_record(["Job_Type", "Jobs", "Revenue"])?;

    let breakdown = job_type_breakdown(store, year)?;
    for row in breakdown.iter() {
        wtr.write_record([
            row.str_val("job_type").unwrap_or(""),
            &format!("{:.0}", row.f64_val("jobs").unwrap_or(0.0)),
            &format!("{:.2}", row.f64_val("revenue").unwrap_or(0.0)),
        ])?;
    }

    wtr.flush()?;
    println!("  Generated: {}", path.display());
    Ok(())
}

// =============================================================================
// Console summary
// =============================================================================

/// Print summary to console
pub fn print_summary(data: &ReportData, year_filter: Option<i32>) -> Result<()> {
    let store = data.store;

    println!("\n============================================================");
    if let Some(year) = year_filter {
        println!("               PERFORMANCE SUMMARY ({})", year);
    } else {
        println!("                   PERFORMANCE SUMMARY");
    }
    println!("============================================================\n");

    let forecast = commission_forecast(store, year_filter)?;
    let board = agent_leaderboard(store, year_filter)?;
    let in_year = |d: chrono::NaiveDate| year_filter.is_none_or(|y| d.year() == y);
    // counted from the deals table, not from deal-invoice join rows
    let closed_deals = store
        .deals
        .iter()
        .filter(|d| d.status == DealStatus::Closed && d.actual_close_date.is_some_and(&in_year))
        .count();
    let closed_commission: f64 = board
        .iter()
        .map(|r| r.f64_val("total_commission").unwrap_or(0.0))
        .sum();

    println!("PIPELINE:");
    println!("  Leads:                {:>10}", store.leads.len());
    println!("  Deals:                {:>10}", store.deals.len());
    println!("  Listings:             {:>10}", store.listings.len());
    println!("  Expected Commission:  ${:>10.2}  (Under Contract)", forecast);

    println!("\nCLOSED BUSINESS:");
    println!("  Closed Deals:         {:>10}", closed_deals);
    println!("  Total Commission:     ${:>10.2}", closed_commission);
    if let Some(top) = board.iter().next() {
        println!(
            "  Top Agent:            {} (${:.2})",
            top.str_val("full_name").unwrap_or("-"),
            top.f64_val("total_commission").unwrap_or(0.0)
        );
    }

    let campaigns = campaign_roi(store, data.simulation);
    let total_spend: f64 = campaigns.iter().map(|c| c.ad_spend).sum();
    let simulated_closed: u32 = campaigns.iter().map(|c| c.closed_deals).sum();
    println!("\nMARKETING (simulated closures):");
    println!("  Campaigns Reported:   {:>10}", campaigns.len());
    println!("  Ad Spend:             ${:>10.2}", total_spend);
    println!("  Simulated Closings:   {:>10}", simulated_closed);

    let jobs = technician_leaderboard(store, year_filter)?;
    let job_count: f64 = jobs.iter().map(|r| r.f64_val("jobs").unwrap_or(0.0)).sum();
    let job_revenue: f64 = jobs
        .iter()
        .map(|r| r.f64_val("revenue").unwrap_or(0.0))
        .sum();
    println!("\nJOB SERVICE:");
    println!("  Completed Jobs:       {:>10.0}", job_count);
    println!("  Revenue:              ${:>10.2}", job_revenue);

    println!("\n============================================================");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::date;
    use crate::store::{Agent, AdCampaign, Deal, DealStatus, Invoice, Job, JobStatus, Listing, ListingStatus};

    fn worked_store() -> RecordStore {
        RecordStore {
            agents: vec![
                Agent {
                    agent_id: "A1".to_string(),
                    full_name: "Ann Archer".to_string(),
                },
                Agent {
                    agent_id: "A2".to_string(),
                    full_name: "Ben Holt".to_string(),
                },
            ],
            deals: vec![
                Deal {
                    loop_id: "L1".to_string(),
                    listing_agent_id: "A1".to_string(),
                    status: DealStatus::Closed,
                    expected_close_date: date("2025-02-01"),
                    actual_close_date: Some(date("2025-02-06")),
                },
                Deal {
                    loop_id: "L2".to_string(),
                    listing_agent_id: "A2".to_string(),
                    status: DealStatus::Closed,
                    expected_close_date: date("2025-02-10"),
                    actual_close_date: Some(date("2025-02-10")),
                },
                Deal {
                    loop_id: "L3".to_string(),
                    listing_agent_id: "A1".to_string(),
                    status: DealStatus::UnderContract,
                    expected_close_date: date("2025-04-01"),
                    actual_close_date: None,
                },
            ],
            invoices: vec![
                Invoice {
                    deal_id: "L1".to_string(),
                    agent_id: "A1".to_string(),
                    net_commission: 300.0,
                    invoice_date: date("2025-02-01"),
                    paid_date: Some(date("2025-02-06")),
                },
                Invoice {
                    deal_id: "L1".to_string(),
                    agent_id: "A1".to_string(),
                    net_commission: 200.0,
                    invoice_date: date("2025-02-02"),
                    paid_date: Some(date("2025-02-06")),
                },
                Invoice {
                    deal_id: "L2".to_string(),
                    agent_id: "A2".to_string(),
                    net_commission: 500.0,
                    invoice_date: date("2025-02-09"),
                    paid_date: None,
                },
                Invoice {
                    deal_id: "L3".to_string(),
                    agent_id: "A1".to_string(),
                    net_commission: 800.0,
                    invoice_date: date("2025-03-20"),
                    paid_date: None,
                },
            ],
            campaigns: vec![
                AdCampaign {
                    utm_campaign: "spring_push_01".to_string(),
                    platform: "Google".to_string(),
                    ad_spend: 1000.0,
                    leads_generated: 40,
                },
                AdCampaign {
                    utm_campaign: "dud_campaign".to_string(),
                    platform: "Facebook".to_string(),
                    ad_spend: 400.0,
                    leads_generated: 3,
                },
            ],
            listings: vec![Listing {
                mls_id: "MLS-1".to_string(),
                city: "Riverton".to_string(),
                status: ListingStatus::Closed,
                sale_price: 400_000.0,
                list_date: date("2025-01-01"),
                close_date: Some(date("2025-02-15")),
            }],
            jobs: vec![
                Job {
                    date: date("2025-02-03"),
                    job_type: "Plumbing".to_string(),
                    technician: "Alex".to_string(),
                    status: JobStatus::Completed,
                    revenue: 250.0,
                },
                Job {
                    date: date("2025-02-03"),
                    job_type: "HVAC".to_string(),
                    technician: "Jordan".to_string(),
                    status: JobStatus::Scheduled,
                    revenue: 0.0,
                },
            ],
            leads: Vec::new(),
        }
    }

    #[test]
    fn test_leaderboard_worked_example_tie_order() {
        // Ann: 300 + 200, Ben: 500 -> equal totals, Ann first (input order)
        let board = agent_leaderboard(&worked_store(), None).unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board.row(0).str_val("full_name"), Some("Ann Archer"));
        assert_eq!(board.row(0).f64_val("total_commission"), Some(500.0));
        assert_eq!(board.row(1).str_val("full_name"), Some("Ben Holt"));
        assert_eq!(board.row(1).f64_val("total_commission"), Some(500.0));
    }

    #[test]
    fn test_leaderboard_counts_deals_not_invoices() {
        // Ann's one closed deal carries two invoices; the invoice join
        // multiplies commission rows but must not inflate the deal count
        let store = worked_store();
        let board = agent_leaderboard(&store, None).unwrap();
        let ann = board
            .iter()
            .find(|r| r.str_val("full_name") == Some("Ann Archer"))
            .unwrap();
        assert_eq!(ann.f64_val("closed_deals"), Some(1.0));
        assert_eq!(ann.f64_val("total_commission"), Some(500.0));

        let ben = board
            .iter()
            .find(|r| r.str_val("full_name") == Some("Ben Holt"))
            .unwrap();
        assert_eq!(ben.f64_val("closed_deals"), Some(1.0));

        let distinct_closed = store
            .deals
            .iter()
            .filter(|d| d.status == DealStatus::Closed)
            .count();
        let counted: f64 = board
            .iter()
            .map(|r| r.f64_val("closed_deals").unwrap())
            .sum();
        assert_eq!(counted, distinct_closed as f64);
    }

    #[test]
    fn test_forecast_counts_only_under_contract() {
        // pools are disjoint: L3 (800) forecast, L1/L2 closed
        let forecast = commission_forecast(&worked_store(), None).unwrap();
        assert_eq!(forecast, 800.0);
    }

    #[test]
    fn test_forecast_over_empty_set_is_zero() {
        let mut store = worked_store();
        store.deals.retain(|d| d.status != DealStatus::UnderContract);
        assert_eq!(commission_forecast(&store, None).unwrap(), 0.0);
    }

    #[test]
    fn test_campaign_with_no_closures_excluded() {
        let sim = SimulationConfig::default();
        let rois = campaign_roi(&worked_store(), &sim);
        assert_eq!(rois.len(), 1);
        assert_eq!(rois[0].utm_campaign, "spring_push_01");
        assert_eq!(rois[0].cost_per_closed_deal, 100.0);
        assert_eq!(rois[0].roi, Some(49.0));
    }

    #[test]
    fn test_agent_performance_close_delay() {
        let perf = agent_performance(&worked_store(), None);
        let ann = perf.iter().find(|p| p.full_name == "Ann Archer").unwrap();
        assert_eq!(ann.closed_deals, 1);
        assert_eq!(ann.mean_close_delay, Some(5.0));
        assert_eq!(ann.total_commission, 1300.0);

        let mut store = worked_store();
        store.deals.retain(|d| d.listing_agent_id != "A1");
        let perf = agent_performance(&store, None);
        let ann = perf.iter().find(|p| p.full_name == "Ann Archer").unwrap();
        assert_eq!(ann.mean_close_delay, None);
    }

    #[test]
    fn test_year_filter_restricts_rows() {
        let mut store = worked_store();
        store.deals.push(Deal {
            loop_id: "L4".to_string(),
            listing_agent_id: "A2".to_string(),
            status: DealStatus::Closed,
            expected_close_date: date("2024-06-01"),
            actual_close_date: Some(date("2024-06-20")),
        });
        store.invoices.push(Invoice {
            deal_id: "L4".to_string(),
            agent_id: "A2".to_string(),
            net_commission: 9999.0,
            invoice_date: date("2024-06-01"),
            paid_date: None,
        });

        let board = agent_leaderboard(&store, Some(2025)).unwrap();
        let ben = board
            .iter()
            .find(|r| r.str_val("full_name") == Some("Ben Holt"))
            .unwrap();
        assert_eq!(ben.f64_val("total_commission"), Some(500.0));
    }

    #[test]
    fn test_jobs_pipelines_only_count_completed() {
        let board = technician_leaderboard(&worked_store(), None).unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board.row(0).str_val("technician"), Some("Alex"));

        let daily = daily_revenue(&worked_store(), None).unwrap();
        assert_eq!(daily.len(), 1);
        assert_eq!(daily.row(0).f64_val("revenue"), Some(250.0));
    }

    #[test]
    fn test_top_leads_skips_unscored() {
        let mut store = worked_store();
        store.leads = vec![
            crate::store::test_support::lead("Pat One"),
            crate::store::test_support::lead("Sam Two"),
        ];
        store.leads[0].lead_score = Some(0.9);
        // second lead left unscored

        let top = top_leads(&store, 10).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top.row(0).str_val("full_name"), Some("Pat One"));
    }

    #[test]
    fn test_generate_all_reports_writes_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let sim = SimulationConfig::default();
        let store = worked_store();
        let data = ReportData {
            store: &store,
            simulation: &sim,
        };
        generate_all_reports(dir.path(), &data, None).unwrap();

        for name in [
            constants::AGENT_LEADERBOARD_FILENAME,
            constants::PIPELINE_STAGES_FILENAME,
            constants::AGENT_PERFORMANCE_FILENAME,
            constants::CAMPAIGN_ROI_FILENAME,
            constants::CITY_SUMMARY_FILENAME,
            constants::TOP_LEADS_FILENAME,
            constants::DAILY_REVENUE_FILENAME,
            constants::TECHNICIAN_LEADERBOARD_FILENAME,
            constants::JOB_TYPES_FILENAME,
        ] {
            assert!(dir.path().join(name).exists(), "missing report {name}");
        }

        let leaderboard =
            std::fs::read_to_string(dir.path().join(constants::AGENT_LEADERBOARD_FILENAME))
                .unwrap();
        assert!(leaderboard.contains("Ann Archer"));
        assert!(leaderboard.contains("500.00"));
    }
}
