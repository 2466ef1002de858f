//! Deterministic synthetic record generation
//!
//! Used when no CSV exports are present. All randomness flows through an
//! explicit `StdRng` seeded by the caller, so a given seed always yields
//! the same store; tests pin both the seed and the reference date.

use chrono::{Duration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::store::{
    AdCampaign, Agent, Deal, DealStatus, Invoice, Job, JobStatus, Lead, Listing, ListingStatus,
    RecordStore,
};

const AGENT_NAMES: &[&str] = &[
    "Ann Archer",
    "Ben Holt",
    "Cara Diaz",
    "Drew Eng",
    "Elena Frost",
];

const FIRST_NAMES: &[&str] = &[
    "Alex", "Jordan", "Taylor", "Morgan", "Casey", "Riley", "Quinn", "Avery",
];
const LAST_NAMES: &[&str] = &[
    "Reed", "Park", "Nguyen", "Silva", "Khan", "Ortiz", "Weber", "Ito",
];

const LEAD_SOURCES: &[&str] = &["Zillow", "Referral", "Open House", "Facebook", "Walk-in"];
const LEAD_STAGES: &[&str] = &["New", "Contacted", "Nurture", "Appointment", "Under Contract"];

const CITIES: &[&str] = &[
    "Riverton",
    "Lakewood",
    "Fairview",
    "Oak Hill",
    "Maplewood",
    "Brookside",
];

const PLATFORMS: &[&str] = &["Google", "Facebook", "Instagram"];

const JOB_TYPES: &[&str] = &[
    "Plumbing",
    "Electrical",
    "Drywall",
    "Painting",
    "HVAC",
    "Carpentry",
];
const TECHNICIANS: &[&str] = &["Alex", "Jordan", "Taylor", "Morgan", "Casey"];

fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> &'a T {
    &items[rng.random_range(0..items.len())]
}

/// Build a full synthetic store for `today`.
pub fn generate(seed: u64, today: NaiveDate) -> RecordStore {
    let mut rng = StdRng::seed_from_u64(seed);

    let agents: Vec<Agent> = AGENT_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| Agent {
            agent_id: format!("A{}", i + 1),
            full_name: name.to_string(),
        })
        .collect();

    let leads = gen_leads(&mut rng, &agents, today);
    let deals = gen_deals(&mut rng, &agents, today);
    let invoices = gen_invoices(&mut rng, &deals);
    let campaigns = gen_campaigns(&mut rng);
    let listings = gen_listings(&mut rng, today);
    let jobs = gen_jobs(&mut rng, today);

    RecordStore {
        leads,
        deals,
        invoices,
        campaigns,
        agents,
        listings,
        jobs,
    }
}

/// Synthetic store keyed to the current date.
pub fn synthetic_store(seed: u64) -> RecordStore {
    generate(seed, Utc::now().date_naive())
}

fn gen_leads(rng: &mut StdRng, agents: &[Agent], today: NaiveDate) -> Vec<Lead> {
    (0..40)
        .map(|i| {
            let first = pick(rng, FIRST_NAMES);
            let last = pick(rng, LAST_NAMES);
            let created = today - Duration::days(rng.random_range(1..120));
            let activity = created + Duration::days(rng.random_range(0..14));
            Lead {
                id: i + 1,
                full_name: format!("{} {}", first, last),
                email: format!("{}.{}{}@example.com", first.to_lowercase(), last.to_lowercase(), i),
                lead_source: pick(rng, LEAD_SOURCES).to_string(),
                agent_assigned: pick(rng, agents).full_name.clone(),
                stage: pick(rng, LEAD_STAGES).to_string(),
                created_at: created,
                last_activity: activity,
                last_stage_change: activity,
                next_task_due: today + Duration::days(rng.random_range(1..10)),
                lead_score: None,
            }
        })
        .collect()
}

fn gen_deals(rng: &mut StdRng, agents: &[Agent], today: NaiveDate) -> Vec<Deal> {
    (0..25)
        .map(|i| {
            let r = rng.random::<f64>();
            let status = if r < 0.5 {
                DealStatus::Closed
            } else if r < 0.8 {
                DealStatus::UnderContract
            } else {
                DealStatus::Other("Pre-Offer".to_string())
            };
            let expected = match status {
                DealStatus::Closed => today - Duration::days(rng.random_range(10..90)),
                _ => today + Duration::days(rng.random_range(5..60)),
            };
            let actual = match status {
                // Closed deals land within two weeks of the expected date
                DealStatus::Closed => {
                    Some(expected + Duration::days(rng.random_range(-5..15)))
                }
                _ => None,
            };
            Deal {
                loop_id: format!("LP-{:03}", i + 1),
                listing_agent_id: pick(rng, agents).agent_id.clone(),
                status,
                expected_close_date: expected,
                actual_close_date: actual,
            }
        })
        .collect()
}

fn gen_invoices(rng: &mut StdRng, deals: &[Deal]) -> Vec<Invoice> {
    deals
        .iter()
        .filter(|d| !matches!(d.status, DealStatus::Other(_)))
        .map(|deal| {
            let commission = rng.random_range(2_000..12_000) as f64;
            Invoice {
                deal_id: deal.loop_id.clone(),
                agent_id: deal.listing_agent_id.clone(),
                net_commission: commission,
                invoice_date: deal.expected_close_date - Duration::days(7),
                paid_date: deal.actual_close_date,
            }
        })
        .collect()
}

fn gen_campaigns(rng: &mut StdRng) -> Vec<AdCampaign> {
    (0..6)
        .map(|i| AdCampaign {
            utm_campaign: format!("spring_push_{:02}", i + 1),
            platform: pick(rng, PLATFORMS).to_string(),
            ad_spend: rng.random_range(500..5_000) as f64,
            leads_generated: rng.random_range(0..60),
        })
        .collect()
}

fn gen_listings(rng: &mut StdRng, today: NaiveDate) -> Vec<Listing> {
    (0..30)
        .map(|i| {
            let r = rng.random::<f64>();
            let status = if r < 0.5 {
                ListingStatus::Closed
            } else if r < 0.8 {
                ListingStatus::Active
            } else {
                ListingStatus::Pending
            };
            let list_date = today - Duration::days(rng.random_range(30..180));
            let close_date = match status {
                ListingStatus::Closed => {
                    Some(list_date + Duration::days(rng.random_range(20..90)))
                }
                _ => None,
            };
            Listing {
                mls_id: format!("MLS-{:04}", i + 1),
                city: pick(rng, CITIES).to_string(),
                status,
                sale_price: rng.random_range(250_000..900_000) as f64,
                list_date,
                close_date,
            }
        })
        .collect()
}

fn gen_jobs(rng: &mut StdRng, today: NaiveDate) -> Vec<Job> {
    let mut jobs = Vec::new();

    // 90 days of past jobs
    for offset in (1..=90).rev() {
        let r = rng.random::<f64>();
        let status = if r < 0.85 {
            JobStatus::Completed
        } else if r < 0.95 {
            JobStatus::Cancelled
        } else {
            JobStatus::NoShow
        };
        jobs.push(Job {
            date: today - Duration::days(offset),
            job_type: pick(rng, JOB_TYPES).to_string(),
            technician: pick(rng, TECHNICIANS).to_string(),
            status,
            revenue: rng.random_range(100..1_000) as f64,
        });
    }

    // Today's schedule
    let num_today = rng.random_range(5..=10);
    for _ in 0..num_today {
        jobs.push(Job {
            date: today,
            job_type: pick(rng, JOB_TYPES).to_string(),
            technician: pick(rng, TECHNICIANS).to_string(),
            status: JobStatus::Scheduled,
            revenue: 0.0,
        });
    }

    // A week of upcoming jobs
    for offset in 1..=7 {
        jobs.push(Job {
            date: today + Duration::days(offset),
            job_type: pick(rng, JOB_TYPES).to_string(),
            technician: pick(rng, TECHNICIANS).to_string(),
            status: JobStatus::Scheduled,
            revenue: 0.0,
        });
    }

    jobs
}
