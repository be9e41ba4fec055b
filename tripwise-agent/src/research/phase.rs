use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the research stage is in its state machine.
///
/// `Eliciting` until all trip parameters are confirmed, then a
/// `Searching` / `Validating` loop per topic, then `Emitting`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchPhase {
    #[default]
    Eliciting,
    Searching,
    Validating,
    Emitting,
}

impl ResearchPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            ResearchPhase::Eliciting => "eliciting",
            ResearchPhase::Searching => "searching",
            ResearchPhase::Validating => "validating",
            ResearchPhase::Emitting => "emitting",
        }
    }

    pub fn from_value(value: Option<&serde_json::Value>) -> Self {
        value.and_then(|v| serde_json::from_value(v.clone()).ok()).unwrap_or_default()
    }
}

impl fmt::Display for ResearchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_phase_from_state_value() {
        assert_eq!(ResearchPhase::from_value(None), ResearchPhase::Eliciting);
        assert_eq!(ResearchPhase::from_value(Some(&json!("validating"))), ResearchPhase::Validating);
        assert_eq!(ResearchPhase::from_value(Some(&json!(42))), ResearchPhase::Eliciting);
        assert_eq!(serde_json::to_value(ResearchPhase::Emitting).unwrap(), json!("emitting"));
    }
}
