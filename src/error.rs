//! Error taxonomy for the collection pipeline.

use thiserror::Error;

/// Coarse classification of a [`StatsError`], for callers that need to map
/// failures onto their own response codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The campaign does not exist on the platform.
    NotFound,
    /// The remote page or export no longer has the expected structure.
    UpstreamShape,
    /// The remote endpoint could not be reached or answered with an error status.
    Transport,
    /// The aggregate is undefined for the fetched data.
    Computation,
    /// The collector was built with an unusable base URL or header value.
    Configuration,
}

impl ErrorKind {
    /// HTTP status a boundary layer would typically answer with.
    ///
    /// | Kind          | Status |
    /// |---------------|--------|
    /// | NotFound      | 404    |
    /// | UpstreamShape | 502    |
    /// | Transport     | 503    |
    /// | Computation   | 422    |
    /// | Configuration | 500    |
    pub fn status_hint(self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::UpstreamShape => 502,
            ErrorKind::Transport => 503,
            ErrorKind::Computation => 422,
            ErrorKind::Configuration => 500,
        }
    }
}

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("campaign `{campaign_id}` does not exist")]
    CampaignNotExists { campaign_id: String },

    #[error("unexpected dashboard markup for campaign `{campaign_id}`: {detail}")]
    MarkupShape { campaign_id: String, detail: String },

    #[error("malformed graph record at line {line} (`{content}`): {reason}")]
    MalformedRecord {
        line: u64,
        content: String,
        reason: String,
    },

    #[error("fetch failed for {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("cannot compute subscriber cost for campaign `{campaign_id}`: no subscribers joined")]
    DivisionByZero { campaign_id: String },

    #[error("{quantity} out of range for campaign `{campaign_id}`")]
    Overflow {
        campaign_id: String,
        quantity: &'static str,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl StatsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StatsError::CampaignNotExists { .. } => ErrorKind::NotFound,
            StatsError::MarkupShape { .. } | StatsError::MalformedRecord { .. } => {
                ErrorKind::UpstreamShape
            }
            StatsError::Fetch { .. } => ErrorKind::Transport,
            StatsError::DivisionByZero { .. } | StatsError::Overflow { .. } => {
                ErrorKind::Computation
            }
            StatsError::InvalidConfig(_) => ErrorKind::Configuration,
        }
    }

    pub(crate) fn markup(campaign_id: &str, detail: impl Into<String>) -> Self {
        StatsError::MarkupShape {
            campaign_id: campaign_id.to_string(),
            detail: detail.into(),
        }
    }
}
