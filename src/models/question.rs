use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: Vec<String>,
    #[serde(rename = "correct_index")]
    pub correct_option_index: usize,
}

impl Question {
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_option_index: usize,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            options,
            correct_option_index,
        }
    }

    /// True when `correct_option_index` points at one of `options`.
    pub fn is_well_formed(&self) -> bool {
        self.correct_option_index < self.options.len()
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.options
            .get(self.correct_option_index)
            .map(String::as_str)
    }
}
