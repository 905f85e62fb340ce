// Resume/job matching: bullet tailoring, job match analysis, application responses.
// All completion calls go through llm_client::CompletionProvider.

pub mod analyzer;
pub mod pipeline;
pub mod prompts;
pub mod tailoring;
