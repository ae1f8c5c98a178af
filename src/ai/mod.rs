mod backend;
mod registry;
mod summarizer;

pub use backend::{GenerationRequest, HuggingFaceBackend, InferenceBackend};
pub use registry::{BackendFactory, ModelRegistry};
pub use summarizer::{Summarizer, SummaryOutput, SummaryPolicy, SummaryRequest};
