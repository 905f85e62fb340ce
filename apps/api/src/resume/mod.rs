// Resume parsing: extracted document text -> ResumeRecord via one completion call.

pub mod parser;
pub mod prompts;
