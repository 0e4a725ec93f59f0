use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How the day went, ordered from best to worst
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Great,
    #[default]
    Good,
    Okay,
    Difficult,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown mood '{0}' (expected one of: great, good, okay, difficult)")]
pub struct ParseMoodError(pub String);

impl Mood {
    /// Selector order, best first
    pub const ALL: [Mood; 4] = [Mood::Great, Mood::Good, Mood::Okay, Mood::Difficult];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Great => "great",
            Mood::Good => "good",
            Mood::Okay => "okay",
            Mood::Difficult => "difficult",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mood::Great => "Great",
            Mood::Good => "Good",
            Mood::Okay => "Okay",
            Mood::Difficult => "Difficult",
        }
    }

    /// Terminal-friendly face used in lists and the mood selector
    pub fn symbol(&self) -> &'static str {
        match self {
            Mood::Great | Mood::Good => ":)",
            Mood::Okay => ":|",
            Mood::Difficult => ":(",
        }
    }

    /// Color name understood by `tui::widgets::color::parse_color`
    pub fn color_name(&self) -> &'static str {
        match self {
            Mood::Great => "green",
            Mood::Good => "blue",
            Mood::Okay => "yellow",
            Mood::Difficult => "red",
        }
    }

    /// Great and good days count towards the "good days" statistic
    pub fn is_good(&self) -> bool {
        matches!(self, Mood::Great | Mood::Good)
    }

    /// Next mood in selector order, wrapping around
    pub fn next(&self) -> Mood {
        match self {
            Mood::Great => Mood::Good,
            Mood::Good => Mood::Okay,
            Mood::Okay => Mood::Difficult,
            Mood::Difficult => Mood::Great,
        }
    }

    /// Previous mood in selector order, wrapping around
    pub fn previous(&self) -> Mood {
        match self {
            Mood::Great => Mood::Difficult,
            Mood::Good => Mood::Great,
            Mood::Okay => Mood::Good,
            Mood::Difficult => Mood::Okay,
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = ParseMoodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "great" => Ok(Mood::Great),
            "good" => Ok(Mood::Good),
            "okay" => Ok(Mood::Okay),
            "difficult" => Ok(Mood::Difficult),
            _ => Err(ParseMoodError(s.to_string())),
        }
    }
}

/// One committed day in the journal. Entries are never edited after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub date: NaiveDate, // YYYY-MM-DD
    pub mood: Mood,
    pub notes: String,
    pub goals: Vec<String>,
    pub completed: bool,
}

impl Entry {
    /// Create a completed entry with a freshly generated id
    pub fn new(date: NaiveDate, mood: Mood, notes: String, goals: Vec<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            date,
            mood,
            notes,
            goals,
            completed: true,
        }
    }

    /// Headline shown above an entry, e.g. "Great Day"
    pub fn headline(&self) -> String {
        format!("{} Day", self.mood.label())
    }

    /// Long form date, e.g. "Monday, January 1, 2024"
    pub fn long_date(&self) -> String {
        self.date.format("%A, %B %-d, %Y").to_string()
    }
}
