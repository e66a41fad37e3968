use crate::core::report::CommentAnalysis;

const TRANSFORM_SYSTEM_PROMPT: &str = "You are an empathetic senior developer transforming harsh code review comments into constructive feedback.";

const SUMMARY_SYSTEM_PROMPT: &str =
    "You are an empathetic senior developer providing encouraging feedback.";

pub struct PromptBuilder;

impl PromptBuilder {
    pub fn build_transform_prompt(code_snippet: &str, comment: &str) -> (String, String) {
        let user_prompt = format!(
            r#"Given this code snippet:
```
{}
```

Transform this harsh comment: "{}"

Respond in this format:

POSITIVE_REPHRASING: [Encouraging version of the feedback]
TECHNICAL_WHY: [Explain the underlying principle/best practice]
SUGGESTED_IMPROVEMENT: [Specific actionable advice]
CODE_EXAMPLE: [Concrete code example if applicable]

Be empathetic, educational, and professional."#,
            code_snippet, comment
        );

        (TRANSFORM_SYSTEM_PROMPT.to_string(), user_prompt)
    }

    pub fn build_summary_prompt(
        analyses: &[CommentAnalysis],
        comments: &[String],
    ) -> (String, String) {
        let themes = analyses
            .iter()
            .map(|a| a.technical_why.as_str())
            .collect::<Vec<_>>()
            .join(" | ");

        let user_prompt = format!(
            r#"Provide a brief, encouraging summary (2-3 sentences) for this code review:

Improvement themes: {}
Comments: {}

Just the summary text:"#,
            themes,
            comments.join(", ")
        );

        (SUMMARY_SYSTEM_PROMPT.to_string(), user_prompt)
    }
}
