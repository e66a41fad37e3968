use crate::core::report::{CommentAnalysis, ReviewReport};
use anyhow::Result;

const TITLE: &str = "# Empathetic Code Review Analysis\n\n";
const SEPARATOR: &str = "\n---\n\n";
const SIGNATURE: &str = "*🤖 Generated with Empathetic Code Reviewer - Transforming Critical Feedback into Constructive Growth*";

pub struct ReportRenderer;

impl ReportRenderer {
    pub fn render(report: &ReviewReport) -> String {
        let mut output = String::from(TITLE);

        for (index, analysis) in report.analyses.iter().enumerate() {
            output.push_str(&Self::render_analysis(analysis, index + 1));
            output.push_str(SEPARATOR);
        }

        if let Some(summary) = &report.holistic_summary {
            output.push_str("## Overall Summary\n\n");
            output.push_str(summary);
            output.push_str("\n\n");
        }

        output.push_str(SIGNATURE);
        output
    }

    pub fn render_json(report: &ReviewReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    pub fn render_error(message: &str) -> String {
        format!(
            "# ❌ Error\n\n{}\n\nPlease check your input and try again.",
            message
        )
    }

    fn render_analysis(analysis: &CommentAnalysis, number: usize) -> String {
        let mut section = format!(
            "### Analysis {}: \"{}\"\n\n",
            number, analysis.original_comment
        );

        section.push_str(&format!(
            "**✨ Positive Rephrasing:** {}\n\n",
            analysis.positive_rephrasing
        ));
        section.push_str(&format!("**🔍 The 'Why':** {}\n\n", analysis.technical_why));
        section.push_str(&format!(
            "**💡 Suggested Improvement:** {}\n\n",
            analysis.suggested_improvement
        ));

        if let Some(code) = &analysis.code_example {
            section.push_str("**📝 Code Example:**\n```\n");
            section.push_str(code);
            section.push_str("\n```\n\n");
        }

        section
    }
}
