use serde::Serialize;

/// Outcome of the collection workflow: a chat deep link plus the composed
/// message. Nothing is delivered by this system; the caller follows
/// `redirect_url` in the browser.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionLink {
    pub redirect_url: String,
    pub message: String,
    pub total_minor: i64,
    pub months: Vec<String>,
    pub payment_url: Option<String>,
}
