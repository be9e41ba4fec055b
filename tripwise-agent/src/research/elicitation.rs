use super::params::{TripParameter, TripParameters};
use super::topics::SearchTopic;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The question the stage is waiting on between user turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum Pending {
    Parameter(TripParameter),
    Clarification(SearchTopic),
}

impl Pending {
    pub fn from_value(value: Option<&Value>) -> Option<Self> {
        value.and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn to_value(self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Outcome of the elicitation gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elicitation {
    /// Ask for this parameter and stop.
    Ask(TripParameter),
    /// Every parameter is confirmed.
    Complete,
}

impl Elicitation {
    pub fn next(params: &TripParameters) -> Self {
        match params.first_missing() {
            Some(param) => Elicitation::Ask(param),
            None => Elicitation::Complete,
        }
    }
}

/// Does an unprompted message read as a request rather than an answer?
///
/// The first message of a conversation arrives with no question pending.
/// A bare value such as "Paris" answers the first open slot, while
/// "Help me plan a trip" starts the questions instead.
pub fn looks_like_request(text: &str) -> bool {
    const REQUEST_WORDS: [&str; 9] =
        ["plan", "trip", "help", "itinerary", "travel", "vacation", "holiday", "want", "need"];
    let lower = text.to_lowercase();
    text.trim_end().ends_with('?')
        || lower
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| REQUEST_WORDS.contains(&word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_next_asks_first_missing() {
        let params = TripParameters::new().with(TripParameter::Destination, "Paris");
        assert_eq!(Elicitation::next(&params), Elicitation::Ask(TripParameter::Dates));
    }

    #[test]
    fn test_next_complete() {
        let params = TripParameter::ALL
            .into_iter()
            .fold(TripParameters::new(), |p, param| p.with(param, "3 days"));
        assert_eq!(Elicitation::next(&params), Elicitation::Complete);
    }

    #[test]
    fn test_pending_serde() {
        let pending = Pending::Parameter(TripParameter::Budget);
        assert_eq!(pending.to_value(), json!({"kind": "parameter", "target": "budget"}));
        let clarify = Pending::Clarification(SearchTopic::Food);
        assert_eq!(Pending::from_value(Some(&clarify.to_value())), Some(clarify));
        assert_eq!(Pending::from_value(Some(&Value::Null)), None);
    }

    #[test]
    fn test_looks_like_request() {
        assert!(looks_like_request("Help me plan a trip"));
        assert!(looks_like_request("Can you suggest something?"));
        assert!(!looks_like_request("Paris"));
        assert!(!looks_like_request("New York City"));
    }
}
