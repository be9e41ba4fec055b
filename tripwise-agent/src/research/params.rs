use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Session key prefix for confirmed trip parameters.
pub const TRIP_KEY_PREFIX: &str = "trip:";

/// The six slots the research stage must fill before searching, in the
/// order they are asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripParameter {
    Destination,
    Dates,
    Travelers,
    Budget,
    Interests,
    Style,
}

impl TripParameter {
    pub const ALL: [TripParameter; 6] = [
        TripParameter::Destination,
        TripParameter::Dates,
        TripParameter::Travelers,
        TripParameter::Budget,
        TripParameter::Interests,
        TripParameter::Style,
    ];

    pub fn key(self) -> &'static str {
        match self {
            TripParameter::Destination => "destination",
            TripParameter::Dates => "dates",
            TripParameter::Travelers => "travelers",
            TripParameter::Budget => "budget",
            TripParameter::Interests => "interests",
            TripParameter::Style => "style",
        }
    }

    pub fn state_key(self) -> String {
        format!("{TRIP_KEY_PREFIX}{}", self.key())
    }

    pub fn label(self) -> &'static str {
        match self {
            TripParameter::Destination => "Destination",
            TripParameter::Dates => "Dates",
            TripParameter::Travelers => "Travelers",
            TripParameter::Budget => "Budget",
            TripParameter::Interests => "Interests",
            TripParameter::Style => "Travel style",
        }
    }

    pub fn question(self) -> &'static str {
        match self {
            TripParameter::Destination => "Where would you like to travel?",
            TripParameter::Dates => {
                "What are your travel dates, or how many days will the trip last?"
            }
            TripParameter::Travelers => {
                "How many people are traveling, and who are they (solo, couple, family, group)?"
            }
            TripParameter::Budget => "What is your total budget for the trip?",
            TripParameter::Interests => {
                "What are your main interests (food, nature, nightlife, beaches, museums, etc.)?"
            }
            TripParameter::Style => {
                "What travel style do you prefer (relaxed, romantic, fast-paced, luxury, budget, adventure, etc.)?"
            }
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }

    /// Normalize a user answer for this slot. `None` means the answer
    /// cannot confirm the slot and the question should be asked again.
    pub fn accept(self, answer: &str) -> Option<String> {
        let answer = answer.trim();
        if answer.is_empty() {
            return None;
        }
        match self {
            TripParameter::Dates => trip_days(answer).map(|_| answer.to_string()),
            _ => Some(answer.to_string()),
        }
    }
}

/// Confirmed trip parameters, read from and written to session state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripParameters {
    values: HashMap<TripParameter, String>,
}

impl TripParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: &HashMap<String, Value>) -> Self {
        let values = TripParameter::ALL
            .into_iter()
            .filter_map(|p| {
                let value = state.get(&p.state_key())?.as_str()?.trim();
                (!value.is_empty()).then(|| (p, value.to_string()))
            })
            .collect();
        Self { values }
    }

    pub fn get(&self, param: TripParameter) -> Option<&str> {
        self.values.get(&param).map(String::as_str)
    }

    pub fn set(&mut self, param: TripParameter, value: impl Into<String>) {
        self.values.insert(param, value.into());
    }

    pub fn with(mut self, param: TripParameter, value: impl Into<String>) -> Self {
        self.set(param, value);
        self
    }

    /// Unconfirmed slots in asking order.
    pub fn missing(&self) -> Vec<TripParameter> {
        TripParameter::ALL.into_iter().filter(|p| !self.values.contains_key(p)).collect()
    }

    pub fn first_missing(&self) -> Option<TripParameter> {
        TripParameter::ALL.into_iter().find(|p| !self.values.contains_key(p))
    }

    pub fn is_complete(&self) -> bool {
        self.first_missing().is_none()
    }

    pub fn destination(&self) -> &str {
        self.get(TripParameter::Destination).unwrap_or_default()
    }

    pub fn trip_days(&self) -> Option<u32> {
        self.get(TripParameter::Dates).and_then(trip_days)
    }

    pub fn traveler_count(&self) -> Option<u32> {
        self.get(TripParameter::Travelers).and_then(traveler_count)
    }

    pub fn budget(&self) -> Option<Budget> {
        self.get(TripParameter::Budget).and_then(Budget::parse)
    }
}

const NUMBER_WORDS: [(&str, u32); 12] = [
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
];

fn parse_count(token: &str) -> Option<u32> {
    let token = token.to_ascii_lowercase();
    token
        .parse()
        .ok()
        .or_else(|| NUMBER_WORDS.iter().find(|(word, _)| *word == token).map(|(_, n)| *n))
}

static DURATION_REGEX: OnceLock<Regex> = OnceLock::new();
static DATE_REGEX: OnceLock<Regex> = OnceLock::new();
static COUNT_REGEX: OnceLock<Regex> = OnceLock::new();
static AMOUNT_REGEX: OnceLock<Regex> = OnceLock::new();

fn duration_regex() -> &'static Regex {
    DURATION_REGEX.get_or_init(|| {
        Regex::new(r"(?i)\b(\d+|a|an|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve)[\s-]*(days?|nights?|weeks?)\b")
            .expect("Invalid regex pattern")
    })
}

fn date_regex() -> &'static Regex {
    DATE_REGEX.get_or_init(|| Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b").expect("Invalid regex pattern"))
}

fn count_regex() -> &'static Regex {
    COUNT_REGEX.get_or_init(|| {
        Regex::new(r"(?i)\b(\d+|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve)\b")
            .expect("Invalid regex pattern")
    })
}

fn amount_regex() -> &'static Regex {
    AMOUNT_REGEX.get_or_init(|| {
        Regex::new(r"(?i)(\d[\d,]*(?:\.\d+)?)\s*(k\b)?").expect("Invalid regex pattern")
    })
}

/// Longest trip the planner will lay out day by day.
pub const MAX_TRIP_DAYS: u32 = 60;

/// Trip length in days derived from a dates answer.
///
/// Understands "3 days", "4 nights" (one more day than nights), "a week",
/// "2 weeks", "weekend", an ISO date range such as
/// "2025-06-01 to 2025-06-05" (inclusive), and a bare day count. Lengths
/// above [`MAX_TRIP_DAYS`] are rejected.
pub fn trip_days(text: &str) -> Option<u32> {
    stated_days(text).filter(|d| (1..=MAX_TRIP_DAYS).contains(d))
}

fn stated_days(text: &str) -> Option<u32> {
    let dates: Vec<NaiveDate> = date_regex()
        .captures_iter(text)
        .filter_map(|c| NaiveDate::parse_from_str(&c[1], "%Y-%m-%d").ok())
        .collect();
    if let [start, end, ..] = dates.as_slice() {
        let days = (*end - *start).num_days() + 1;
        return u32::try_from(days).ok();
    }

    if let Some(caps) = duration_regex().captures(text) {
        let count = match caps[1].to_ascii_lowercase().as_str() {
            "a" | "an" => 1,
            other => parse_count(other)?,
        };
        let unit = caps[2].to_ascii_lowercase();
        let days = if unit.starts_with("week") {
            count.saturating_mul(7)
        } else if unit.starts_with("night") {
            count.saturating_add(1)
        } else {
            count
        };
        return Some(days);
    }

    if text.to_ascii_lowercase().contains("weekend") {
        return Some(2);
    }

    parse_count(text.trim())
}

/// Number of travelers, when the answer states or implies one.
pub fn traveler_count(text: &str) -> Option<u32> {
    if let Some(caps) = count_regex().captures(text) {
        return parse_count(&caps[1]).filter(|n| *n > 0);
    }
    let lower = text.to_ascii_lowercase();
    if ["solo", "alone", "just me", "myself"].iter().any(|w| lower.contains(w)) {
        Some(1)
    } else if lower.contains("couple") {
        Some(2)
    } else {
        None
    }
}

/// Numeric reading of a budget answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    pub amount: f64,
    pub currency: String,
}

impl Budget {
    pub fn parse(text: &str) -> Option<Self> {
        let caps = amount_regex().captures(text)?;
        let mut amount: f64 = caps[1].replace(',', "").parse().ok()?;
        if caps.get(2).is_some() {
            amount *= 1000.0;
        }
        if amount <= 0.0 {
            return None;
        }
        let currency = ['$', '€', '£', '¥']
            .into_iter()
            .find(|c| text.contains(*c))
            .map(String::from)
            .unwrap_or_default();
        Some(Self { amount, currency })
    }

    /// Whole-unit amount with the currency symbol, e.g. `$667`.
    pub fn format(&self, amount: f64) -> String {
        format!("{}{:.0}", self.currency, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trip_days_forms() {
        assert_eq!(trip_days("3 days"), Some(3));
        assert_eq!(trip_days("three days"), Some(3));
        assert_eq!(trip_days("5-day trip"), Some(5));
        assert_eq!(trip_days("4 nights"), Some(5));
        assert_eq!(trip_days("a week"), Some(7));
        assert_eq!(trip_days("2 weeks in June"), Some(14));
        assert_eq!(trip_days("a long weekend"), Some(2));
        assert_eq!(trip_days("2025-06-01 to 2025-06-05"), Some(5));
        assert_eq!(trip_days("4"), Some(4));
    }

    #[test]
    fn test_trip_days_rejects_vague_answers() {
        assert_eq!(trip_days("sometime in June"), None);
        assert_eq!(trip_days("0 days"), None);
        assert_eq!(trip_days("2025-06-05 to 2025-06-01"), None);
    }

    #[test]
    fn test_trip_days_upper_bound() {
        assert_eq!(trip_days("60 days"), Some(MAX_TRIP_DAYS));
        assert_eq!(trip_days("61 days"), None);
        assert_eq!(trip_days("2000000 days"), None);
        assert_eq!(trip_days("4294967295 nights"), None);
        assert_eq!(trip_days("52 weeks"), None);
        assert_eq!(trip_days("2025-01-01 to 9999-12-31"), None);
        assert_eq!(trip_days("100000"), None);
        assert!(TripParameter::Dates.accept("2000000 days").is_none());
    }

    #[test]
    fn test_dates_slot_requires_length() {
        assert_eq!(TripParameter::Dates.accept("next summer"), None);
        assert_eq!(TripParameter::Dates.accept(" 3 days "), Some("3 days".to_string()));
        assert_eq!(TripParameter::Destination.accept("  "), None);
        assert_eq!(TripParameter::Destination.accept("Paris"), Some("Paris".to_string()));
    }

    #[test]
    fn test_traveler_count() {
        assert_eq!(traveler_count("2 travelers"), Some(2));
        assert_eq!(traveler_count("four friends"), Some(4));
        assert_eq!(traveler_count("solo"), Some(1));
        assert_eq!(traveler_count("a couple"), Some(2));
        assert_eq!(traveler_count("family"), None);
    }

    #[test]
    fn test_budget_parse() {
        let budget = Budget::parse("$2000").unwrap();
        assert_eq!(budget.amount, 2000.0);
        assert_eq!(budget.currency, "$");
        assert_eq!(budget.format(666.67), "$667");

        assert_eq!(Budget::parse("about 1,500 €").unwrap().amount, 1500.0);
        assert_eq!(Budget::parse("3k").unwrap().amount, 3000.0);
        assert!(Budget::parse("flexible").is_none());
    }

    #[test]
    fn test_parameters_from_state() {
        let mut state = HashMap::new();
        state.insert("trip:destination".to_string(), Value::String("Paris".into()));
        state.insert("trip:budget".to_string(), Value::String("  ".into()));
        let params = TripParameters::from_state(&state);
        assert_eq!(params.destination(), "Paris");
        assert_eq!(params.first_missing(), Some(TripParameter::Dates));
        assert_eq!(params.missing().len(), 5);
        assert!(!params.is_complete());
    }

    #[test]
    fn test_parameter_keys_round_trip() {
        for param in TripParameter::ALL {
            assert_eq!(TripParameter::from_key(param.key()), Some(param));
            assert!(param.question().ends_with('?'));
        }
    }
}
