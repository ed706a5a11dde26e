//! Routes a user message to the strategy that answers it.
//!
//! Classification is a pure function of the message and the catalog. Priority,
//! first match wins: greeting, empty, catalog hit, internship request, open-ended.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::catalog::{normalize_query, ResponseCatalog};
use crate::constants;
use crate::error::ValidationError;
use crate::listings::{format_listings, ListingSource};
use crate::llm_interaction::{respond, Responder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent<'a> {
    Greeting,
    Empty,
    /// Carries the stored reply.
    CatalogHit(&'a str),
    InternshipRequest,
    OpenEnded,
}

impl Intent<'_> {
    pub fn kind(&self) -> IntentKind {
        match self {
            Intent::Greeting => IntentKind::Greeting,
            Intent::Empty => IntentKind::Empty,
            Intent::CatalogHit(_) => IntentKind::CatalogHit,
            Intent::InternshipRequest => IntentKind::InternshipRequest,
            Intent::OpenEnded => IntentKind::OpenEnded,
        }
    }
}

/// Intent without borrowed data, for reporting alongside a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentKind {
    Greeting,
    Empty,
    CatalogHit,
    InternshipRequest,
    OpenEnded,
}

pub fn classify<'a>(message: &str, catalog: &'a ResponseCatalog) -> Intent<'a> {
    let normalized = normalize_query(message);

    if constants::GREETINGS.contains(&normalized.as_str()) {
        return Intent::Greeting;
    }
    if normalized.is_empty() {
        return Intent::Empty;
    }
    if let Some(reply) = catalog.lookup(&normalized) {
        return Intent::CatalogHit(reply);
    }
    if normalized.contains(constants::INTERNSHIP_KEYWORD) {
        return Intent::InternshipRequest;
    }
    Intent::OpenEnded
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    pub intent: IntentKind,
    pub reply: String,
}

/// Answers messages using the catalog, the listing source and the responder,
/// all constructed once at startup and shared across requests.
#[derive(Clone)]
pub struct QueryDispatcher {
    catalog: Arc<ResponseCatalog>,
    listings: Arc<dyn ListingSource>,
    responder: Arc<dyn Responder>,
}

impl QueryDispatcher {
    pub fn new(
        catalog: Arc<ResponseCatalog>,
        listings: Arc<dyn ListingSource>,
        responder: Arc<dyn Responder>,
    ) -> Self {
        Self {
            catalog,
            listings,
            responder,
        }
    }

    pub fn catalog(&self) -> &ResponseCatalog {
        &self.catalog
    }

    /// Produces a reply for `message`. An absent message is treated as empty.
    /// Never fails: errors from outbound calls become the reply text.
    #[instrument(skip_all)]
    pub async fn dispatch(&self, message: Option<&str>) -> DispatchResult {
        let message = message.unwrap_or_default().trim();
        let intent = classify(message, &self.catalog);
        info!(intent = ?intent.kind(), "Classified query");

        let reply = match intent {
            Intent::Greeting => constants::GREETING_REPLY.to_string(),
            Intent::Empty => ValidationError::EmptyQuery.to_string(),
            Intent::CatalogHit(reply) => reply.to_string(),
            Intent::InternshipRequest => self.internship_reply().await,
            Intent::OpenEnded => respond(self.responder.as_ref(), message).await,
        };

        DispatchResult {
            intent: intent.kind(),
            reply,
        }
    }

    async fn internship_reply(&self) -> String {
        match self.listings.fetch_listings().await {
            Ok(records) => {
                if records.is_empty() {
                    warn!("Listings page contained no recognizable cards");
                }
                format_listings(&records)
            }
            Err(e) => {
                warn!(error = %e, "Scrape failed");
                e.to_string()
            }
        }
    }
}
