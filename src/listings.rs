//! Live internship listings scraped from a job board.
//!
//! Extraction is best effort: the target markup is external and unversioned, so a
//! field whose element is missing degrades to `N/A` instead of failing the record.
//! No retries are made; one failed attempt is reported immediately.

use async_trait::async_trait;
use reqwest::{header, Client};
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::constants;
use crate::error::ScrapeError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingRecord {
    pub title: String,
    pub company: String,
    pub location: String,
}

/// Anything that can produce a fresh batch of listings.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch_listings(&self) -> Result<Vec<ListingRecord>, ScrapeError>;
}

/// CSS selectors locating a listing card and its fields within the card.
#[derive(Debug, Clone)]
pub struct ListingSelectors {
    container: Selector,
    title: Selector,
    company: Selector,
    location: Selector,
}

impl ListingSelectors {
    pub fn new(
        container: &str,
        title: &str,
        company: &str,
        location: &str,
    ) -> Result<Self, ScrapeError> {
        Ok(Self {
            container: parse_selector(container)?,
            title: parse_selector(title)?,
            company: parse_selector(company)?,
            location: parse_selector(location)?,
        })
    }

    /// The job board's card layout.
    pub fn job_board() -> Result<Self, ScrapeError> {
        Self::new(
            constants::LISTING_CONTAINER_SELECTOR,
            constants::LISTING_TITLE_SELECTOR,
            constants::LISTING_COMPANY_SELECTOR,
            constants::LISTING_LOCATION_SELECTOR,
        )
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|e| ScrapeError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

// Trimmed text of the first match, or the placeholder if absent or blank.
fn field_text(card: &ElementRef<'_>, selector: &Selector) -> String {
    card.select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| constants::NOT_AVAILABLE.to_string())
}

/// Extracts at most `limit` records from a listings page.
pub fn parse_listings(html: &str, selectors: &ListingSelectors, limit: usize) -> Vec<ListingRecord> {
    let document = Html::parse_document(html);
    document
        .select(&selectors.container)
        .take(limit)
        .map(|card| ListingRecord {
            title: field_text(&card, &selectors.title),
            company: field_text(&card, &selectors.company),
            location: field_text(&card, &selectors.location),
        })
        .collect()
}

/// Formats records as the numbered reply shown to the user.
pub fn format_listings(records: &[ListingRecord]) -> String {
    let mut reply = format!("{}\n", constants::LISTINGS_HEADER);
    for (index, job) in records.iter().enumerate() {
        reply.push_str(&format!(
            "{}. {} at {} (Location: {})\n",
            index + 1,
            job.title,
            job.company,
            job.location
        ));
    }
    reply
}

/// Fetches the listings page over HTTP and extracts the first few cards.
pub struct HtmlListingScraper {
    client: Client,
    url: String,
    selectors: ListingSelectors,
    limit: usize,
}

impl HtmlListingScraper {
    pub fn new(
        url: impl Into<String>,
        selectors: ListingSelectors,
        timeout: Option<Duration>,
    ) -> Result<Self, ScrapeError> {
        let mut builder = Client::builder().user_agent(constants::BROWSER_USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            url: url.into(),
            selectors,
            limit: constants::MAX_LISTINGS,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ListingSource for HtmlListingScraper {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch_listings(&self) -> Result<Vec<ListingRecord>, ScrapeError> {
        let response = self
            .client
            .get(&self.url)
            .header(header::ACCEPT, "text/html")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Listings page request failed");
            return Err(ScrapeError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Received listings page");

        let records = parse_listings(&body, &self.selectors, self.limit);
        info!(count = records.len(), "Extracted internship listings");
        Ok(records)
    }
}
