pub mod completion;
pub mod error;
pub mod input;
pub mod pipeline;
pub mod prompt;
pub mod renderer;
pub mod report;
pub mod response_parser;

pub use completion::{CompletionClient, SamplingParams};
pub use error::ReviewError;
pub use input::ReviewInput;
pub use pipeline::{PipelineOptions, ReviewPipeline};
pub use renderer::ReportRenderer;
