//! Typed in-memory record store
//!
//! One table per entity, parsed from CSV exports at load time. Date
//! fields are normalized into `chrono::NaiveDate` up front; anything that
//! fails to parse aborts that table's load with `MalformedInput` so no
//! partial rows are admitted. Rows are immutable after load, with one
//! sanctioned exception: `assign_lead_scores`.

use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::constants;
use crate::errors::{EngineError, EngineResult};
use crate::frame::{Frame, Value};
use crate::metrics::LeadScorer;

// =============================================================================
// Entities
// =============================================================================

/// Sales lead from the CRM export.
#[derive(Debug, Clone)]
pub struct Lead {
    pub id: u64,
    pub full_name: String,
    pub email: String,
    pub lead_source: String,
    pub agent_assigned: String,
    pub stage: String,
    pub created_at: NaiveDate,
    pub last_activity: NaiveDate,
    pub last_stage_change: NaiveDate,
    pub next_task_due: NaiveDate,
    /// Set by `assign_lead_scores`; None until scored.
    pub lead_score: Option<f64>,
}

/// Transaction-management deal record.
#[derive(Debug, Clone)]
pub struct Deal {
    pub loop_id: String,
    pub listing_agent_id: String,
    pub status: DealStatus,
    pub expected_close_date: NaiveDate,
    pub actual_close_date: Option<NaiveDate>,
}

/// Deal lifecycle status. Under Contract and Closed gate disjoint metric
/// pools (forecast vs. realized); anything else is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DealStatus {
    UnderContract,
    Closed,
    Other(String),
}

impl DealStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "Under Contract" => DealStatus::UnderContract,
            "Closed" => DealStatus::Closed,
            other => DealStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DealStatus::UnderContract => write!(f, "Under Contract"),
            DealStatus::Closed => write!(f, "Closed"),
            DealStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Accounting invoice tied to a deal.
#[derive(Debug, Clone)]
pub struct Invoice {
    pub deal_id: String,
    pub agent_id: String,
    pub net_commission: f64,
    pub invoice_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
}

/// Paid advertising campaign totals.
#[derive(Debug, Clone)]
pub struct AdCampaign {
    pub utm_campaign: String,
    pub platform: String,
    pub ad_spend: f64,
    pub leads_generated: u32,
}

#[derive(Debug, Clone)]
pub struct Agent {
    pub agent_id: String,
    pub full_name: String,
}

/// MLS listing record.
#[derive(Debug, Clone)]
pub struct Listing {
    pub mls_id: String,
    pub city: String,
    pub status: ListingStatus,
    pub sale_price: f64,
    pub list_date: NaiveDate,
    pub close_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingStatus {
    Active,
    Pending,
    Closed,
    Other(String),
}

impl ListingStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "Active" => ListingStatus::Active,
            "Pending" => ListingStatus::Pending,
            "Closed" => ListingStatus::Closed,
            other => ListingStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingStatus::Active => write!(f, "Active"),
            ListingStatus::Pending => write!(f, "Pending"),
            ListingStatus::Closed => write!(f, "Closed"),
            ListingStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Job-service work order.
#[derive(Debug, Clone)]
pub struct Job {
    pub date: NaiveDate,
    pub job_type: String,
    pub technician: String,
    pub status: JobStatus,
    pub revenue: f64,
}

/// Job lifecycle status. This is a closed set; an unknown status in the
/// input is a malformed row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Completed,
    Scheduled,
    Cancelled,
    NoShow,
}

impl JobStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Completed" => Some(JobStatus::Completed),
            "Scheduled" => Some(JobStatus::Scheduled),
            "Cancelled" => Some(JobStatus::Cancelled),
            "No Show" => Some(JobStatus::NoShow),
            _ => None,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Completed => write!(f, "Completed"),
            JobStatus::Scheduled => write!(f, "Scheduled"),
            JobStatus::Cancelled => write!(f, "Cancelled"),
            JobStatus::NoShow => write!(f, "No Show"),
        }
    }
}

// =============================================================================
// Date normalization
// =============================================================================

fn parse_date(
    table: &'static str,
    field: &'static str,
    row: usize,
    raw: &str,
) -> EngineResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, constants::DATE_FMT).map_err(|_| EngineError::MalformedInput {
        table,
        field,
        row,
        value: raw.to_string(),
    })
}

fn parse_opt_date(
    table: &'static str,
    field: &'static str,
    row: usize,
    raw: Option<&str>,
) -> EngineResult<Option<NaiveDate>> {
    match raw {
        None => Ok(None),
        Some("") => Ok(None),
        Some(s) => parse_date(table, field, row, s).map(Some),
    }
}

// =============================================================================
// CSV loading
// =============================================================================

#[derive(Debug, Deserialize)]
struct LeadRow {
    id: u64,
    full_name: String,
    email: String,
    lead_source: String,
    agent_assigned: String,
    stage: String,
    created_at: String,
    last_activity: String,
    last_stage_change: String,
    next_task_due: String,
}

#[derive(Debug, Deserialize)]
struct DealRow {
    loop_id: String,
    listing_agent_id: String,
    deal_status: String,
    expected_close_date: String,
    actual_close_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InvoiceRow {
    deal_id: String,
    agent_id: String,
    net_commission: f64,
    invoice_date: String,
    paid_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CampaignRow {
    utm_campaign: String,
    platform: String,
    ad_spend: f64,
    leads_generated: u32,
}

#[derive(Debug, Deserialize)]
struct AgentRow {
    agent_id: String,
    full_name: String,
}

#[derive(Debug, Deserialize)]
struct ListingRow {
    mls_id: String,
    city: String,
    status: String,
    sale_price: f64,
    list_date: String,
    close_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JobRow {
    date: String,
    job_type: String,
    technician: String,
    status: String,
    revenue: f64,
}

pub fn load_leads(path: &Path) -> EngineResult<Vec<Lead>> {
    const TABLE: &str = "leads";
    let mut rdr = csv::Reader::from_path(path)?;
    let mut out = Vec::new();
    for (i, result) in rdr.deserialize().enumerate() {
        let raw: LeadRow = result?;
        let row = i + 1;
        out.push(Lead {
            id: raw.id,
            full_name: raw.full_name,
            email: raw.email,
            lead_source: raw.lead_source,
            agent_assigned: raw.agent_assigned,
            stage: raw.stage,
            created_at: parse_date(TABLE, "created_at", row, &raw.created_at)?,
            last_activity: parse_date(TABLE, "last_activity", row, &raw.last_activity)?,
            last_stage_change: parse_date(TABLE, "last_stage_change", row, &raw.last_stage_change)?,
            next_task_due: parse_date(TABLE, "next_task_due", row, &raw.next_task_due)?,
            lead_score: None,
        });
    }
    Ok(out)
}

pub fn load_deals(path: &Path) -> EngineResult<Vec<Deal>> {
    const TABLE: &str = "deals";
    let mut rdr = csv::Reader::from_path(path)?;
    let mut out = Vec::new();
    for (i, result) in rdr.deserialize().enumerate() {
        let raw: DealRow = result?;
        let row = i + 1;
        out.push(Deal {
            loop_id: raw.loop_id,
            listing_agent_id: raw.listing_agent_id,
            status: DealStatus::parse(&raw.deal_status),
            expected_close_date: parse_date(
                TABLE,
                "expected_close_date",
                row,
                &raw.expected_close_date,
            )?,
            actual_close_date: parse_opt_date(
                TABLE,
                "actual_close_date",
                row,
                raw.actual_close_date.as_deref(),
            )?,
        });
    }
    Ok(out)
}

pub fn load_invoices(path: &Path) -> EngineResult<Vec<Invoice>> {
    const TABLE: &str = "invoices";
    let mut rdr = csv::Reader::from_path(path)?;
    let mut out = Vec::new();
    for (i, result) in rdr.deserialize().enumerate() {
        let raw: InvoiceRow = result?;
        let row = i + 1;
        out.push(Invoice {
            deal_id: raw.deal_id,
            agent_id: raw.agent_id,
            net_commission: raw.net_commission,
            invoice_date: parse_date(TABLE, "invoice_date", row, &raw.invoice_date)?,
            paid_date: parse_opt_date(TABLE, "paid_date", row, raw.paid_date.as_deref())?,
        });
    }
    Ok(out)
}

pub fn load_campaigns(path: &Path) -> EngineResult<Vec<AdCampaign>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let mut out = Vec::new();
    for result in rdr.deserialize() {
        let raw: CampaignRow = result?;
        out.push(AdCampaign {
            utm_campaign: raw.utm_campaign,
            platform: raw.platform,
            ad_spend: raw.ad_spend,
            leads_generated: raw.leads_generated,
        });
    }
    Ok(out)
}

pub fn load_agents(path: &Path) -> EngineResult<Vec<Agent>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let mut out = Vec::new();
    for result in rdr.deserialize() {
        let raw: AgentRow = result?;
        out.push(Agent {
            agent_id: raw.agent_id,
            full_name: raw.full_name,
        });
    }
    Ok(out)
}

pub fn load_listings(path: &Path) -> EngineResult<Vec<Listing>> {
    const TABLE: &str = "listings";
    let mut rdr = csv::Reader::from_path(path)?;
    let mut out = Vec::new();
    for (i, result) in rdr.deserialize().enumerate() {
        let raw: ListingRow = result?;
        let row = i + 1;
        out.push(Listing {
            mls_id: raw.mls_id,
            city: raw.city,
            status: ListingStatus::parse(&raw.status),
            sale_price: raw.sale_price,
            list_date: parse_date(TABLE, "list_date", row, &raw.list_date)?,
            close_date: parse_opt_date(TABLE, "close_date", row, raw.close_date.as_deref())?,
        });
    }
    Ok(out)
}

pub fn load_jobs(path: &Path) -> EngineResult<Vec<Job>> {
    const TABLE: &str = "jobs";
    let mut rdr = csv::Reader::from_path(path)?;
    let mut out = Vec::new();
    for (i, result) in rdr.deserialize().enumerate() {
        let raw: JobRow = result?;
        let row = i + 1;
        let status = JobStatus::parse(&raw.status).ok_or_else(|| EngineError::MalformedInput {
            table: TABLE,
            field: "status",
            row,
            value: raw.status.clone(),
        })?;
        out.push(Job {
            date: parse_date(TABLE, "date", row, &raw.date)?,
            job_type: raw.job_type,
            technician: raw.technician,
            status,
            revenue: raw.revenue,
        });
    }
    Ok(out)
}

// =============================================================================
// Record store
// =============================================================================

/// Owns every loaded row for the session. Downstream components operate
/// on frames copied out of it and never write back.
#[derive(Debug, Default)]
pub struct RecordStore {
    pub leads: Vec<Lead>,
    pub deals: Vec<Deal>,
    pub invoices: Vec<Invoice>,
    pub campaigns: Vec<AdCampaign>,
    pub agents: Vec<Agent>,
    pub listings: Vec<Listing>,
    pub jobs: Vec<Job>,
}

impl RecordStore {
    /// Load all tables from CSV files in `dir`. The jobs table is
    /// optional; the brokerage tables are required.
    pub fn load_dir(dir: &Path) -> EngineResult<Self> {
        let jobs_path = dir.join(constants::JOBS_FILENAME);
        Ok(Self {
            leads: load_leads(&dir.join(constants::LEADS_FILENAME))?,
            deals: load_deals(&dir.join(constants::DEALS_FILENAME))?,
            invoices: load_invoices(&dir.join(constants::INVOICES_FILENAME))?,
            campaigns: load_campaigns(&dir.join(constants::CAMPAIGNS_FILENAME))?,
            agents: load_agents(&dir.join(constants::AGENTS_FILENAME))?,
            listings: load_listings(&dir.join(constants::LISTINGS_FILENAME))?,
            jobs: if jobs_path.exists() {
                load_jobs(&jobs_path)?
            } else {
                Vec::new()
            },
        })
    }

    /// Whether `dir` holds a CSV data set (keyed on the leads table).
    pub fn has_csv_data(dir: &Path) -> bool {
        dir.join(constants::LEADS_FILENAME).exists()
    }

    /// The one sanctioned mutation: assign a score to every lead via the
    /// given scoring strategy.
    pub fn assign_lead_scores(&mut self, scorer: &mut dyn LeadScorer) {
        for i in 0..self.leads.len() {
            let score = scorer.score(&self.leads[i]);
            self.leads[i].lead_score = Some(score);
        }
    }

    // -------------------------------------------------------------------------
    // Frame views (read-only copies for the relational pipeline)
    // -------------------------------------------------------------------------

    pub fn leads_frame(&self) -> Frame {
        let mut f = Frame::new(&[
            "id",
            "full_name",
            "email",
            "lead_source",
            "agent_assigned",
            "stage",
            "created_at",
            "lead_score",
        ]);
        for lead in &self.leads {
            // push_row cannot fail here: arity is fixed above
            let _ = f.push_row(vec![
                Value::Int(lead.id as i64),
                Value::str(&lead.full_name),
                Value::str(&lead.email),
                Value::str(&lead.lead_source),
                Value::str(&lead.agent_assigned),
                Value::str(&lead.stage),
                Value::Date(lead.created_at),
                lead.lead_score.map(Value::Float).unwrap_or(Value::Null),
            ]);
        }
        f
    }

    pub fn deals_frame(&self) -> Frame {
        let mut f = Frame::new(&[
            "loop_id",
            "listing_agent_id",
            "deal_status",
            "expected_close_date",
            "actual_close_date",
        ]);
        for deal in &self.deals {
            let _ = f.push_row(vec![
                Value::str(&deal.loop_id),
                Value::str(&deal.listing_agent_id),
                Value::str(deal.status.to_string()),
                Value::Date(deal.expected_close_date),
                deal.actual_close_date
                    .map(Value::Date)
                    .unwrap_or(Value::Null),
            ]);
        }
        f
    }

    pub fn invoices_frame(&self) -> Frame {
        let mut f = Frame::new(&[
            "deal_id",
            "agent_id",
            "net_commission",
            "invoice_date",
            "paid_date",
        ]);
        for invoice in &self.invoices {
            let _ = f.push_row(vec![
                Value::str(&invoice.deal_id),
                Value::str(&invoice.agent_id),
                Value::Float(invoice.net_commission),
                Value::Date(invoice.invoice_date),
                invoice.paid_date.map(Value::Date).unwrap_or(Value::Null),
            ]);
        }
        f
    }

    pub fn campaigns_frame(&self) -> Frame {
        let mut f = Frame::new(&["utm_campaign", "platform", "ad_spend", "leads_generated"]);
        for campaign in &self.campaigns {
            let _ = f.push_row(vec![
                Value::str(&campaign.utm_campaign),
                Value::str(&campaign.platform),
                Value::Float(campaign.ad_spend),
                Value::Int(i64::from(campaign.leads_generated)),
            ]);
        }
        f
    }

    pub fn agents_frame(&self) -> Frame {
        let mut f = Frame::new(&["agent_id", "full_name"]);
        for agent in &self.agents {
            let _ = f.push_row(vec![
                Value::str(&agent.agent_id),
                Value::str(&agent.full_name),
            ]);
        }
        f
    }

    pub fn listings_frame(&self) -> Frame {
        let mut f = Frame::new(&[
            "mls_id",
            "city",
            "status",
            "sale_price",
            "list_date",
            "close_date",
        ]);
        for listing in &self.listings {
            let _ = f.push_row(vec![
                Value::str(&listing.mls_id),
                Value::str(&listing.city),
                Value::str(listing.status.to_string()),
                Value::Float(listing.sale_price),
                Value::Date(listing.list_date),
                listing.close_date.map(Value::Date).unwrap_or(Value::Null),
            ]);
        }
        f
    }

    pub fn jobs_frame(&self) -> Frame {
        let mut f = Frame::new(&["date", "job_type", "technician", "status", "revenue"]);
        for job in &self.jobs {
            let _ = f.push_row(vec![
                Value::Date(job.date),
                Value::str(&job.job_type),
                Value::str(&job.technician),
                Value::str(job.status.to_string()),
                Value::Float(job.revenue),
            ]);
        }
        f
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, constants::DATE_FMT).unwrap()
    }

    pub fn lead(name: &str) -> Lead {
        Lead {
            id: 1,
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            lead_source: "Zillow".to_string(),
            agent_assigned: "Ann Archer".to_string(),
            stage: "New".to_string(),
            created_at: date("2025-01-05"),
            last_activity: date("2025-01-10"),
            last_stage_change: date("2025-01-08"),
            next_task_due: date("2025-01-15"),
            lead_score: None,
        }
    }
}
