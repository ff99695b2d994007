use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dealers::Dealer;
use crate::CoreError;

/// Display language for diagnosis results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Language {
    #[default]
    Eng,
    Hin,
    Mar,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::Eng => write!(f, "ENG"),
            Language::Hin => write!(f, "HIN"),
            Language::Mar => write!(f, "MAR"),
        }
    }
}

impl std::str::FromStr for Language {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "eng" => Ok(Language::Eng),
            "hin" => Ok(Language::Hin),
            "mar" => Ok(Language::Mar),
            _ => Err(CoreError::InvalidLanguage(s.to_string())),
        }
    }
}

/// One step of a treatment schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentStep {
    pub day: u32,
    pub title: String,
    pub detail: String,
    #[serde(default)]
    pub completed: bool,
}

impl TreatmentStep {
    /// Builds a step from the diagnosis API's free-form day label (`"1"`,
    /// `"Day 3"`). Labels without digits take `position` (1-based).
    #[must_use]
    pub fn from_labelled_day(
        day_label: &str,
        position: usize,
        title: String,
        detail: String,
    ) -> Self {
        let day =
            parse_day(day_label).unwrap_or_else(|| u32::try_from(position).unwrap_or(u32::MAX));
        Self {
            day,
            title,
            detail,
            completed: false,
        }
    }
}

fn parse_day(label: &str) -> Option<u32> {
    let digits: String = label
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// The outcome of one leaf scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub id: Uuid,
    pub image_path: String,
    pub disease_name: String,
    /// Model confidence in percent, `0.0..=100.0`.
    pub confidence: f64,
    pub treatment: Vec<TreatmentStep>,
    pub recommended_product: String,
    pub dealers: Vec<Dealer>,
    pub scanned_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_parses_case_insensitively() {
        assert_eq!("ENG".parse::<Language>().unwrap(), Language::Eng);
        assert_eq!("hin".parse::<Language>().unwrap(), Language::Hin);
        assert_eq!("Mar".parse::<Language>().unwrap(), Language::Mar);
    }

    #[test]
    fn language_rejects_unknown_code() {
        let err = "fra".parse::<Language>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidLanguage(ref s) if s == "fra"));
    }

    #[test]
    fn language_defaults_to_english() {
        assert_eq!(Language::default(), Language::Eng);
    }

    #[test]
    fn day_label_plain_number() {
        let step = TreatmentStep::from_labelled_day("3", 1, "t".into(), "d".into());
        assert_eq!(step.day, 3);
        assert!(!step.completed);
    }

    #[test]
    fn day_label_with_prefix() {
        let step = TreatmentStep::from_labelled_day("Day 7", 1, "t".into(), "d".into());
        assert_eq!(step.day, 7);
    }

    #[test]
    fn day_label_without_digits_uses_position() {
        let step = TreatmentStep::from_labelled_day("Immediately", 2, "t".into(), "d".into());
        assert_eq!(step.day, 2);
    }
}
