use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

pub const MIN_QUESTION_COUNT: u32 = 5;
pub const MAX_QUESTION_COUNT: u32 = 20;
pub const DEFAULT_QUESTION_COUNT: u32 = 10;
pub const MIN_TIMER_MINUTES: u32 = 1;
pub const MAX_TIMER_MINUTES: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "VLSI")]
    Vlsi,
    #[serde(rename = "Verilog")]
    Verilog,
    #[serde(rename = "Digital Electronics")]
    DigitalElectronics,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Vlsi,
        Category::Verilog,
        Category::DigitalElectronics,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Vlsi => "VLSI",
            Category::Verilog => "Verilog",
            Category::DigitalElectronics => "Digital Electronics",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Category::Vlsi => "vlsi",
            Category::Verilog => "verilog",
            Category::DigitalElectronics => "digital-electronics",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Category::Vlsi => "Very Large Scale Integration design and architecture",
            Category::Verilog => "Verilog hardware description language",
            Category::DigitalElectronics => "Logic gates, circuits, and fundamentals",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported category '{0}'; expected one of VLSI, Verilog, Digital Electronics")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted) || c.slug().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCategory(wanted.to_string()))
    }
}

/// Settings chosen on the setup screen. Frozen once a session starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuizConfig {
    pub category: Category,
    #[validate(range(min = 1, max = 30, message = "Timer must be between 1 and 30 minutes"))]
    pub timer: u32,
    #[validate(range(min = 5, max = 20, message = "Question count must be between 5 and 20"))]
    pub question_count: u32,
}

impl QuizConfig {
    pub fn total_seconds(&self) -> u32 {
        self.timer * 60
    }
}
