// Fixed replies, selectors and env-derived defaults for the placement assistant.

use std::env;

/// Messages answered with the welcome reply. Matched exactly after trimming and lower-casing.
pub const GREETINGS: [&str; 7] = [
    "hello",
    "hi",
    "hey",
    "namaste",
    "greetings",
    "good morning",
    "good evening",
];

pub const GREETING_REPLY: &str =
    "Hello! Welcome to the AI-Powered Placement Assistant. How can I assist you today?";

/// Substituted for a completion that merely echoes the user's prompt.
pub const CLARIFICATION_REPLY: &str =
    "Let me clarify that for you! I'm here to assist with a more specific response.";

pub const LISTINGS_HEADER: &str = "Here are some internship opportunities:";

/// Keyword that routes a query to the listing scraper.
pub const INTERNSHIP_KEYWORD: &str = "internships";

/// Placeholder for any listing field the markup did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// Only the first few listing containers on the page are reported.
pub const MAX_LISTINGS: usize = 5;

// The listings site rejects requests without a browser-like agent.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/100.0.4896.127 Safari/537.36";

pub const LISTING_CONTAINER_SELECTOR: &str = "div.base-card__info";
pub const LISTING_TITLE_SELECTOR: &str = "h3.base-card__title";
pub const LISTING_COMPANY_SELECTOR: &str = "h4.base-card__subtitle";
pub const LISTING_LOCATION_SELECTOR: &str = "span.job-search-card__location";

pub const DEFAULT_PORT: u16 = 5000;

lazy_static::lazy_static! {
    pub static ref OLLAMA_URL: String = env::var("OLLAMA_URL").unwrap_or_else(|_| "http://127.0.0.1:11434".to_string());
    pub static ref PLACEMENT_MODEL: String = env::var("PLACEMENT_MODEL").unwrap_or_else(|_| "gpt-j:6b".to_string());
    pub static ref LISTINGS_URL: String = env::var("LISTINGS_URL").unwrap_or_else(|_| "https://www.linkedin.com/jobs/internship-jobs?originalSubdomain=in".to_string());
    pub static ref CATALOG_PATH: String = env::var("CATALOG_PATH").unwrap_or_else(|_| "internship_chatbot_conversations_only.json".to_string());
}
