//! Centralized constants for the reporting tool
//!
//! Simulation knobs (per-deal revenue, closure rate) have defaults here but
//! are overridable via config.toml.

// =============================================================================
// Input Table File Names
// =============================================================================

pub const LEADS_FILENAME: &str = "leads.csv";
pub const DEALS_FILENAME: &str = "deals.csv";
pub const INVOICES_FILENAME: &str = "invoices.csv";
pub const CAMPAIGNS_FILENAME: &str = "ad_campaigns.csv";
pub const AGENTS_FILENAME: &str = "agents.csv";
pub const LISTINGS_FILENAME: &str = "listings.csv";
pub const JOBS_FILENAME: &str = "jobs.csv";

// =============================================================================
// Report File Names
// =============================================================================

pub const AGENT_LEADERBOARD_FILENAME: &str = "agent_leaderboard.csv";
pub const PIPELINE_STAGES_FILENAME: &str = "pipeline_stages.csv";
pub const AGENT_PERFORMANCE_FILENAME: &str = "agent_performance.csv";
pub const CAMPAIGN_ROI_FILENAME: &str = "campaign_roi.csv";
pub const CITY_SUMMARY_FILENAME: &str = "city_summary.csv";
pub const TOP_LEADS_FILENAME: &str = "top_leads.csv";
pub const DAILY_REVENUE_FILENAME: &str = "daily_revenue.csv";
pub const TECHNICIAN_LEADERBOARD_FILENAME: &str = "technician_leaderboard.csv";
pub const JOB_TYPES_FILENAME: &str = "job_types.csv";

// =============================================================================
// Formats
// =============================================================================

/// External date representation for all date-typed fields
pub const DATE_FMT: &str = "%Y-%m-%d";

// =============================================================================
// Simulation Defaults (placeholder business logic, see metrics.rs)
// =============================================================================

/// Assumed commission revenue per closed deal in USD
pub const DEFAULT_PER_DEAL_REVENUE: f64 = 5000.0;

/// One closed deal per this many generated leads
pub const DEFAULT_CLOSURE_RATE_DIVISOR: u32 = 4;

/// Seed for the placeholder lead scorer
pub const DEFAULT_LEAD_SCORE_SEED: u64 = 7;

/// Seed for synthetic record generation
pub const DEFAULT_SYNTH_SEED: u64 = 42;

/// Leaderboard length for the top-leads report
pub const TOP_LEADS_COUNT: usize = 10;
