pub mod catalog;
pub mod chat;
pub mod constants;
pub mod dispatcher;
pub mod error;
pub mod listings;
pub mod llm_interaction;
pub mod web_server;

pub use catalog::ResponseCatalog;
pub use dispatcher::{classify, DispatchResult, Intent, IntentKind, QueryDispatcher};
pub use error::{GenerationError, ScrapeError, ValidationError};
pub use listings::{HtmlListingScraper, ListingRecord, ListingSelectors, ListingSource};
pub use llm_interaction::{GenerationParams, OllamaResponder, Responder};
