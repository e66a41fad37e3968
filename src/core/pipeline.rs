use crate::core::completion::{CompletionClient, SamplingParams};
use crate::core::error::ReviewError;
use crate::core::input::ReviewInput;
use crate::core::prompt::PromptBuilder;
use crate::core::report::{CommentAnalysis, ReviewReport};
use crate::core::response_parser::ResponseParser;
use tracing::{debug, info, warn};

pub const SUMMARY_FALLBACK: &str = "Overall, this shows solid programming fundamentals with great potential for optimization. Keep up the excellent work and continue applying these best practices!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Init,
    ValidatingInput,
    PerCommentLoop(usize),
    SummaryStep,
    Assembled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineOptions {
    pub transform: SamplingParams,
    pub summary: SamplingParams,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            transform: SamplingParams::TRANSFORM,
            summary: SamplingParams::SUMMARY,
        }
    }
}

pub struct ReviewPipeline {
    client: CompletionClient,
    options: PipelineOptions,
}

impl ReviewPipeline {
    pub fn new(client: CompletionClient, options: PipelineOptions) -> Self {
        Self { client, options }
    }

    /// Runs one review pass. Comments are transformed strictly in input
    /// order and any transform failure aborts the whole run; only the
    /// summary step degrades to a fallback.
    pub async fn run(&self, input: &ReviewInput) -> Result<ReviewReport, ReviewError> {
        Self::enter(PipelineStage::Init);

        Self::enter(PipelineStage::ValidatingInput);
        input.validate()?;

        let total = input.review_comments.len();
        info!("Processing {} comment(s) with model {}", total, self.client.model());

        let mut analyses = Vec::with_capacity(total);
        for (index, comment) in input.review_comments.iter().enumerate() {
            Self::enter(PipelineStage::PerCommentLoop(index));
            info!("Analyzing comment {}/{}", index + 1, total);
            analyses.push(self.analyze_comment(&input.code_snippet, comment, index).await?);
        }

        Self::enter(PipelineStage::SummaryStep);
        info!("Generating summary");
        let holistic_summary = self.summarize(&analyses, &input.review_comments).await;

        Self::enter(PipelineStage::Assembled);
        Ok(ReviewReport {
            analyses,
            holistic_summary: Some(holistic_summary),
        })
    }

    async fn analyze_comment(
        &self,
        code_snippet: &str,
        comment: &str,
        index: usize,
    ) -> Result<CommentAnalysis, ReviewError> {
        let (system, user) = PromptBuilder::build_transform_prompt(code_snippet, comment);
        let raw = self
            .client
            .complete(&system, &user, self.options.transform)
            .await
            .map_err(|err| match err {
                ReviewError::Upstream(msg) => {
                    ReviewError::Upstream(format!("comment {}: {}", index + 1, msg))
                }
                other => other,
            })?;

        Ok(CommentAnalysis::new(comment, ResponseParser::parse(&raw)))
    }

    async fn summarize(&self, analyses: &[CommentAnalysis], comments: &[String]) -> String {
        let (system, user) = PromptBuilder::build_summary_prompt(analyses, comments);
        match self.client.complete(&system, &user, self.options.summary).await {
            Ok(text) => text.trim().to_string(),
            Err(err) => {
                warn!("Summary generation failed, using fallback: {}", err);
                SUMMARY_FALLBACK.to_string()
            }
        }
    }

    fn enter(stage: PipelineStage) {
        debug!("Pipeline stage: {:?}", stage);
    }
}
