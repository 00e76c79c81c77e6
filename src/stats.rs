//! Campaign statistics model and the reduction that derives spend figures.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::StatsError;

/// Decimal places kept for monetary figures.
const MONEY_DP: u32 = 2;

/// One calendar day from the campaign's graph export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsElem {
    pub date: NaiveDate,
    pub views: u64,
    pub joined: u64,
}

/// Summary fields scraped from the campaign dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderStats {
    pub tg_link: String,
    pub status: String,
    /// Cost per thousand views, in euros.
    #[serde(with = "rust_decimal::serde::float")]
    pub cpm: Decimal,
    /// Reported view total with thousands separators removed; kept as text.
    pub total_views: String,
}

/// Complete statistics for one campaign.
///
/// Only obtainable through [`Statistics::compute`], so the derived totals
/// always agree with `graph_stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statistics {
    tg_link: String,
    status: String,
    #[serde(with = "rust_decimal::serde::float")]
    cpm: Decimal,
    total_views: String,
    total_joined: u64,
    #[serde(with = "rust_decimal::serde::float")]
    total_spent: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    subscriber_cost: Decimal,
    graph_stats: Vec<StatsElem>,
}

impl Statistics {
    /// Reduces the daily series against the header's CPM.
    ///
    /// Spend is `Σ views · cpm / 1000` summed exactly and rounded once;
    /// subscriber cost is the rounded spend over total joins, rounded again.
    /// Both use banker's rounding to two places. The current CPM is applied to
    /// every day since the platform publishes no CPM history.
    ///
    /// # Errors
    ///
    /// [`StatsError::DivisionByZero`] when no subscribers joined, which
    /// includes an empty series. [`StatsError::Overflow`] when the join total
    /// exceeds `u64` or the spend exceeds the decimal range.
    pub fn compute(
        campaign_id: &str,
        header: HeaderStats,
        graph_stats: Vec<StatsElem>,
    ) -> Result<Self, StatsError> {
        let overflow = |quantity: &'static str| StatsError::Overflow {
            campaign_id: campaign_id.to_string(),
            quantity,
        };

        let total_joined = graph_stats
            .iter()
            .try_fold(0u64, |acc, d| acc.checked_add(d.joined))
            .ok_or_else(|| overflow("total_joined"))?;

        if total_joined == 0 {
            return Err(StatsError::DivisionByZero {
                campaign_id: campaign_id.to_string(),
            });
        }

        let raw_spent = graph_stats
            .iter()
            .try_fold(Decimal::ZERO, |acc, d| {
                Decimal::from(d.views)
                    .checked_mul(header.cpm)?
                    .checked_div(Decimal::ONE_THOUSAND)
                    .and_then(|day| acc.checked_add(day))
            })
            .ok_or_else(|| overflow("total_spent"))?;
        let total_spent = raw_spent.round_dp(MONEY_DP);
        let subscriber_cost = total_spent
            .checked_div(Decimal::from(total_joined))
            .ok_or_else(|| overflow("subscriber_cost"))?
            .round_dp(MONEY_DP);

        Ok(Self {
            tg_link: header.tg_link,
            status: header.status,
            cpm: header.cpm,
            total_views: header.total_views,
            total_joined,
            total_spent,
            subscriber_cost,
            graph_stats,
        })
    }

    pub fn tg_link(&self) -> &str {
        &self.tg_link
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn cpm(&self) -> Decimal {
        self.cpm
    }

    pub fn total_views(&self) -> &str {
        &self.total_views
    }

    pub fn total_joined(&self) -> u64 {
        self.total_joined
    }

    pub fn total_spent(&self) -> Decimal {
        self.total_spent
    }

    pub fn subscriber_cost(&self) -> Decimal {
        self.subscriber_cost
    }

    pub fn graph_stats(&self) -> &[StatsElem] {
        &self.graph_stats
    }
}
