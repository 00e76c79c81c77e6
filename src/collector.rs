//! Fetch-and-compute entry point for a single campaign.

use reqwest::Url;
use reqwest::header::HeaderValue;
use tracing::info;

use crate::config::Config;
use crate::error::StatsError;
use crate::fetch::{BasicClient, HttpClient, fetch_text};
use crate::graph::parse_graph;
use crate::header::{HeaderExtractor, InfoRowExtractor, parse_header};
use crate::stats::{HeaderStats, Statistics, StatsElem};

/// Collects [`Statistics`] for campaigns on one platform instance.
///
/// Holds no per-campaign state; concurrent calls are independent and each
/// performs its own two requests.
pub struct Collector<C, E = InfoRowExtractor> {
    client: C,
    extractor: E,
    base_url: Url,
    user_agent: HeaderValue,
}

impl Collector<BasicClient> {
    /// Production collector: default reqwest client and the current page layout.
    pub fn from_config(config: &Config) -> Result<Self, StatsError> {
        Self::new(BasicClient::new(), InfoRowExtractor::default(), config)
    }
}

impl<C: HttpClient, E: HeaderExtractor> Collector<C, E> {
    pub fn new(client: C, extractor: E, config: &Config) -> Result<Self, StatsError> {
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| {
            StatsError::InvalidConfig(format!("base url `{}`: {e}", config.base_url))
        })?;
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| StatsError::InvalidConfig(format!("user agent: {e}")))?;

        Ok(Self {
            client,
            extractor,
            base_url,
            user_agent,
        })
    }

    /// `{base}/stats/{campaign_id}`
    pub fn stats_url(&self, campaign_id: &str) -> Result<Url, StatsError> {
        self.join(&format!("stats/{campaign_id}"))
    }

    /// `{base}/csv/?prefix=shared/{campaign_id}&period=day`
    pub fn graph_url(&self, campaign_id: &str) -> Result<Url, StatsError> {
        let mut url = self.join("csv/")?;
        url.query_pairs_mut()
            .append_pair("prefix", &format!("shared/{campaign_id}"))
            .append_pair("period", "day");
        Ok(url)
    }

    fn join(&self, path: &str) -> Result<Url, StatsError> {
        self.base_url
            .join(path)
            .map_err(|e| StatsError::InvalidConfig(format!("cannot resolve `{path}`: {e}")))
    }

    /// Fetches and scrapes the campaign dashboard.
    #[tracing::instrument(skip(self))]
    pub async fn header_stats(&self, campaign_id: &str) -> Result<HeaderStats, StatsError> {
        let page = fetch_text(&self.client, self.stats_url(campaign_id)?, &self.user_agent).await?;
        parse_header(&self.extractor, campaign_id, &page)
    }

    /// Fetches and parses the daily graph export.
    #[tracing::instrument(skip(self))]
    pub async fn graph_stats(&self, campaign_id: &str) -> Result<Vec<StatsElem>, StatsError> {
        let export = fetch_text(&self.client, self.graph_url(campaign_id)?, &self.user_agent).await?;
        parse_graph(&export)
    }

    /// Fetches both sources concurrently and reduces them.
    ///
    /// The first failure from either source fails the whole call and the other
    /// in-flight request is dropped; no partial result is returned.
    #[tracing::instrument(skip(self))]
    pub async fn collect(&self, campaign_id: &str) -> Result<Statistics, StatsError> {
        let (header, graph) = tokio::try_join!(
            self.header_stats(campaign_id),
            self.graph_stats(campaign_id)
        )?;

        let stats = Statistics::compute(campaign_id, header, graph)?;

        info!(
            days = stats.graph_stats().len(),
            total_joined = stats.total_joined(),
            total_spent = %stats.total_spent(),
            subscriber_cost = %stats.subscriber_cost(),
            "Campaign statistics collected"
        );
        Ok(stats)
    }
}
