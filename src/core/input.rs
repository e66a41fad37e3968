use crate::core::error::ReviewError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// A code snippet plus the review comments left on it, in reviewer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewInput {
    pub code_snippet: String,
    pub review_comments: Vec<String>,
}

impl ReviewInput {
    pub async fn load(path: &Path) -> Result<Self, ReviewError> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(ReviewError::Input(format!(
                    "File not found: {}",
                    path.display()
                )));
            }
            Err(_) => {
                return Err(ReviewError::Input(format!(
                    "Invalid JSON file: {}",
                    path.display()
                )));
            }
        };

        let value: Value = serde_json::from_str(&content).map_err(|_| {
            ReviewError::Input(format!("Invalid JSON file: {}", path.display()))
        })?;

        Self::from_value(value)
    }

    /// Checks the document shape. Emptiness is left to [`ReviewInput::validate`].
    pub fn from_value(value: Value) -> Result<Self, ReviewError> {
        let object = value
            .as_object()
            .ok_or_else(|| ReviewError::Input("Input must be a JSON object".into()))?;

        let code_snippet = object
            .get("code_snippet")
            .and_then(Value::as_str)
            .ok_or_else(|| ReviewError::Input("Missing \"code_snippet\" field".into()))?;

        let comments = object
            .get("review_comments")
            .and_then(Value::as_array)
            .ok_or_else(|| ReviewError::Input("Missing \"review_comments\" array".into()))?;

        if comments.is_empty() {
            return Err(ReviewError::Input(
                "\"review_comments\" array must not be empty".into(),
            ));
        }

        let review_comments = comments
            .iter()
            .map(|c| c.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| ReviewError::Input("All review comments must be strings".into()))?;

        Ok(Self {
            code_snippet: code_snippet.to_string(),
            review_comments,
        })
    }

    pub fn validate(&self) -> Result<(), ReviewError> {
        if self.code_snippet.trim().is_empty() {
            return Err(ReviewError::Input("\"code_snippet\" must not be empty".into()));
        }
        if self.review_comments.is_empty() {
            return Err(ReviewError::Input(
                "\"review_comments\" array must not be empty".into(),
            ));
        }
        if let Some(index) = self
            .review_comments
            .iter()
            .position(|c| c.trim().is_empty())
        {
            return Err(ReviewError::Input(format!(
                "Review comment {} is empty",
                index + 1
            )));
        }
        Ok(())
    }
}
