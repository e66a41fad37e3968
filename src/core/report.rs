use crate::core::response_parser::ParsedResponse;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentAnalysis {
    pub original_comment: String,
    pub positive_rephrasing: String,
    pub technical_why: String,
    pub suggested_improvement: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_example: Option<String>,
}

impl CommentAnalysis {
    pub fn new(original_comment: impl Into<String>, parsed: ParsedResponse) -> Self {
        Self {
            original_comment: original_comment.into(),
            positive_rephrasing: parsed.positive_rephrasing,
            technical_why: parsed.technical_why,
            suggested_improvement: parsed.suggested_improvement,
            code_example: parsed.code_example,
        }
    }
}

/// One analysis per input comment, in input order, plus the closing summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewReport {
    pub analyses: Vec<CommentAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holistic_summary: Option<String>,
}
