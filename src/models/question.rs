use serde::{Deserialize, Serialize};

/// Every generated question carries exactly this many options.
pub const OPTIONS_PER_QUESTION: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<QuizOption>,
}

impl QuizQuestion {
    pub fn correct_option_index(&self) -> Option<usize> {
        self.options.iter().position(|o| o.is_correct)
    }

    pub fn option(&self, index: usize) -> Option<&QuizOption> {
        self.options.get(index)
    }

    /// Letter label used by the views: 0 -> 'A', 1 -> 'B', ...
    pub fn option_label(index: usize) -> char {
        (b'A' + (index % 26) as u8) as char
    }
}
