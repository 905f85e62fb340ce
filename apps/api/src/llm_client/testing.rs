use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{CompletionProvider, LlmError};

/// Replays canned completions in order and records every prompt it receives.
/// `None` entries fail the call the way an upstream 500 would.
#[derive(Default)]
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<Option<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(|r| Some(r.into())).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn then_fail(self) -> Self {
        self.responses.lock().unwrap().push_back(None);
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError> {
        let full = match system {
            Some(system) => format!("{system}\n\n{prompt}"),
            None => prompt.to_string(),
        };
        self.prompts.lock().unwrap().push(full);

        match self.responses.lock().unwrap().pop_front() {
            Some(Some(text)) => Ok(text),
            Some(None) => Err(LlmError::Api {
                status: 500,
                message: "scripted upstream failure".to_string(),
            }),
            None => panic!("ScriptedProvider ran out of responses"),
        }
    }
}
