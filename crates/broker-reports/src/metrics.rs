//! Derived business metrics
//!
//! Every formula is a named pure function over explicit numeric inputs.
//! "Undefined" (zero denominator, empty input set) is `None`, never a
//! silent 0.0 or NaN; callers omit the affected row or column.
//!
//! Several formulas are simulated placeholders carried over from the
//! source data model (fixed closure rate, fixed per-deal revenue, random
//! lead scores). They are deliberately not authoritative business rules:
//! the constants live in config.toml and the scorer is a trait so a real
//! model can replace it without touching the pipeline.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::store::Lead;

/// Signed difference between actual and expected close in whole days.
pub fn close_delay_days(expected: NaiveDate, actual: NaiveDate) -> i64 {
    (actual - expected).num_days()
}

/// Mean close delay over a deal set; undefined for an empty set.
pub fn mean_close_delay(delays: &[i64]) -> Option<f64> {
    if delays.is_empty() {
        return None;
    }
    Some(delays.iter().sum::<i64>() as f64 / delays.len() as f64)
}

/// Sum of commission values. Sum over an empty set is 0.0 by definition,
/// in contrast to mean, which is undefined over empty sets.
pub fn expected_commission(commissions: &[f64]) -> f64 {
    commissions.iter().sum()
}

/// Simulated closure count: one closed deal per `closure_divisor` leads
/// (integer division). Placeholder for observed deal attribution.
pub fn simulated_closed_deals(leads_generated: u32, closure_divisor: u32) -> u32 {
    if closure_divisor == 0 {
        return 0;
    }
    leads_generated / closure_divisor
}

/// Ad spend per closed deal; undefined when nothing closed.
pub fn cost_per_closed_deal(ad_spend: f64, closed_deals: u32) -> Option<f64> {
    if closed_deals == 0 {
        return None;
    }
    Some(ad_spend / f64::from(closed_deals))
}

/// Simulated campaign revenue: a fixed per-deal amount. Placeholder, not
/// observed revenue.
pub fn simulated_revenue(closed_deals: u32, per_deal_revenue: f64) -> f64 {
    f64::from(closed_deals) * per_deal_revenue
}

/// Return on investment: (revenue - spend) / spend. Undefined at zero
/// spend.
pub fn roi(revenue: f64, ad_spend: f64) -> Option<f64> {
    if ad_spend == 0.0 {
        return None;
    }
    Some((revenue - ad_spend) / ad_spend)
}

/// Closed deals per generated lead; undefined when no leads were
/// generated.
pub fn leads_to_close_ratio(closed_deals: u32, leads_generated: u32) -> Option<f64> {
    if leads_generated == 0 {
        return None;
    }
    Some(f64::from(closed_deals) / f64::from(leads_generated))
}

/// Scoring strategy for ranking leads. The bundled implementation is a
/// placeholder; a trained model can implement the same trait.
pub trait LeadScorer {
    /// Score in [0, 1); higher is more promising.
    fn score(&mut self, lead: &Lead) -> f64;
}

/// Placeholder scorer: uniform values in [0, 1) from an explicit seeded
/// RNG, so runs are reproducible and tests deterministic.
pub struct UniformScorer {
    rng: StdRng,
}

impl UniformScorer {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl LeadScorer for UniformScorer {
    fn score(&mut self, _lead: &Lead) -> f64 {
        self.rng.random::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_close_delay_signed_days() {
        assert_eq!(close_delay_days(date("2025-03-01"), date("2025-03-11")), 10);
        assert_eq!(close_delay_days(date("2025-03-11"), date("2025-03-01")), -10);
    }

    #[test]
    fn test_mean_close_delay_undefined_on_empty() {
        assert_eq!(mean_close_delay(&[]), None);
        assert_eq!(mean_close_delay(&[4, 6]), Some(5.0));
    }

    #[test]
    fn test_expected_commission_empty_set_is_zero() {
        assert_eq!(expected_commission(&[]), 0.0);
        assert_eq!(expected_commission(&[300.0, 200.0]), 500.0);
    }

    #[test]
    fn test_campaign_worked_example() {
        // ad_spend 1000, leads 40 -> closed 10 -> cpcd 100.0, roi 49.0
        let closed = simulated_closed_deals(40, 4);
        assert_eq!(closed, 10);
        assert_eq!(cost_per_closed_deal(1000.0, closed), Some(100.0));
        let revenue = simulated_revenue(closed, 5000.0);
        assert_eq!(roi(revenue, 1000.0), Some(49.0));
        assert_eq!(leads_to_close_ratio(closed, 40), Some(0.25));
    }

    #[test]
    fn test_undefined_metrics_are_none_not_zero() {
        assert_eq!(cost_per_closed_deal(1000.0, 0), None);
        assert_eq!(roi(5000.0, 0.0), None);
        assert_eq!(leads_to_close_ratio(3, 0), None);
    }

    #[test]
    fn test_closure_divisor_rounds_down() {
        assert_eq!(simulated_closed_deals(7, 4), 1);
        assert_eq!(simulated_closed_deals(3, 4), 0);
        assert_eq!(simulated_closed_deals(3, 0), 0);
    }

    #[test]
    fn test_uniform_scorer_deterministic_per_seed() {
        let lead = crate::store::test_support::lead("Pat Doe");
        let mut a = UniformScorer::seeded(11);
        let mut b = UniformScorer::seeded(11);
        for _ in 0..20 {
            let sa = a.score(&lead);
            assert_eq!(sa, b.score(&lead));
            assert!((0.0..1.0).contains(&sa));
        }
    }
}
