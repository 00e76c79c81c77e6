//! Dashboard page scraping.
//!
//! The platform answers `200 OK` for unknown campaigns and serves its generic
//! landing copy instead, so existence is decided by [`classify`] before any
//! field is read. Field extraction is positional against the page's info rows
//! and sits behind [`HeaderExtractor`] so a new page layout can be supported
//! by swapping the implementation.

use std::str::FromStr;

use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::error::StatsError;
use crate::stats::HeaderStats;

/// Sentence from the platform's landing copy, served in place of a missing campaign.
pub const NOT_FOUND_SENTINEL: &str = "In addition to sending private messages and chatting in \
     private groups, Telegram users can subscribe to";

pub const DEFAULT_ROW_CLASS: &str = "pr-review-ad-info";

// Row 0 carries the ad title.
const LINK_ROW: usize = 1;
const STATUS_ROW: usize = 2;
const CPM_ROW: usize = 3;
const VIEWS_ROW: usize = 4;

const CURRENCY_SYMBOL: char = '€';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageClass<'a> {
    Found(&'a str),
    NotFound,
}

/// Content-sniffs a dashboard page for the missing-campaign placeholder.
pub fn classify(page: &str) -> PageClass<'_> {
    if page.contains(NOT_FOUND_SENTINEL) {
        PageClass::NotFound
    } else {
        PageClass::Found(page)
    }
}

/// Reads [`HeaderStats`] out of one version of the dashboard markup.
pub trait HeaderExtractor {
    fn classify<'a>(&self, page: &'a str) -> PageClass<'a> {
        classify(page)
    }

    /// Extracts the four header fields from a page already classified as found.
    fn extract(&self, campaign_id: &str, page: &str) -> Result<HeaderStats, StatsError>;
}

/// Classifies `page`, then extracts its header fields.
///
/// # Errors
///
/// [`StatsError::CampaignNotExists`] for the placeholder page (no extraction is
/// attempted), [`StatsError::MarkupShape`] when the expected nodes are missing.
pub fn parse_header<E: HeaderExtractor + ?Sized>(
    extractor: &E,
    campaign_id: &str,
    page: &str,
) -> Result<HeaderStats, StatsError> {
    match extractor.classify(page) {
        PageClass::NotFound => {
            warn!(campaign_id, "Dashboard returned the not-found placeholder");
            Err(StatsError::CampaignNotExists {
                campaign_id: campaign_id.to_string(),
            })
        }
        PageClass::Found(page) => extractor.extract(campaign_id, page),
    }
}

/// Extractor for the layout where every field is a row element carrying
/// `row_class`, with a label cell followed by a value cell.
#[derive(Debug, Clone)]
pub struct InfoRowExtractor {
    row_class: String,
}

impl Default for InfoRowExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_ROW_CLASS)
    }
}

impl InfoRowExtractor {
    pub fn new(row_class: impl Into<String>) -> Self {
        Self {
            row_class: row_class.into(),
        }
    }
}

impl HeaderExtractor for InfoRowExtractor {
    fn extract(&self, campaign_id: &str, page: &str) -> Result<HeaderStats, StatsError> {
        let row_selector = selector(campaign_id, &format!(".{}", self.row_class))?;
        let anchor_selector = selector(campaign_id, "a")?;

        let document = Html::parse_document(page);
        let rows: Vec<ElementRef> = document.select(&row_selector).collect();
        debug!(campaign_id, rows = rows.len(), "Info rows located");

        let value_cell = |index: usize, field: &str| {
            rows.get(index)
                .and_then(|row| row.children().filter_map(ElementRef::wrap).nth(1))
                .ok_or_else(|| {
                    StatsError::markup(
                        campaign_id,
                        format!(
                            "no value cell for {field} in info row {index} ({} rows found)",
                            rows.len()
                        ),
                    )
                })
        };

        let tg_link = value_cell(LINK_ROW, "link")?
            .select(&anchor_selector)
            .next()
            .and_then(|a| a.value().attr("href"))
            .ok_or_else(|| StatsError::markup(campaign_id, "link cell has no anchor href"))?
            .to_string();

        let status = cell_text(value_cell(STATUS_ROW, "status")?);

        let cpm_text = cell_text(value_cell(CPM_ROW, "cpm")?);
        let cpm = parse_cpm(&cpm_text).ok_or_else(|| {
            StatsError::markup(campaign_id, format!("cpm `{cpm_text}` is not a decimal amount"))
        })?;

        let total_views = cell_text(value_cell(VIEWS_ROW, "views")?).replace(',', "");

        Ok(HeaderStats {
            tg_link,
            status,
            cpm,
            total_views,
        })
    }
}

fn selector(campaign_id: &str, css: &str) -> Result<Selector, StatsError> {
    Selector::parse(css)
        .map_err(|e| StatsError::markup(campaign_id, format!("invalid selector `{css}`: {e}")))
}

fn cell_text(cell: ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn parse_cpm(text: &str) -> Option<Decimal> {
    let amount = text.replace(CURRENCY_SYMBOL, "");
    Decimal::from_str(amount.trim())
        .ok()
        .filter(|cpm| !cpm.is_sign_negative())
}
