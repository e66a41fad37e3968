/// Fatal error kinds of a review run.
///
/// Degraded model output is not represented here: the response parser
/// resolves missing sections with per-field defaults instead of failing.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    /// Missing credentials or otherwise unusable settings.
    #[error("{0}")]
    Configuration(String),

    /// Unreadable input file or schema violation.
    #[error("{0}")]
    Input(String),

    /// The completion provider failed or returned no content.
    #[error("Failed to get AI response: {0}")]
    Upstream(String),
}
