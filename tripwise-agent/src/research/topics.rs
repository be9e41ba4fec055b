use super::params::{TripParameter, TripParameters};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tripwise_tool::{SearchHit, SearchValidation};

/// Session key prefix for the user's answer to a clarification question.
pub const HINT_KEY_PREFIX: &str = "trip:hint:";

/// One research subject. Topics are searched in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchTopic {
    Attractions,
    Food,
    Areas,
    Safety,
    Weather,
    Transport,
    Lodging,
}

impl SearchTopic {
    pub const ALL: [SearchTopic; 7] = [
        SearchTopic::Attractions,
        SearchTopic::Food,
        SearchTopic::Areas,
        SearchTopic::Safety,
        SearchTopic::Weather,
        SearchTopic::Transport,
        SearchTopic::Lodging,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SearchTopic::Attractions => "attractions",
            SearchTopic::Food => "food",
            SearchTopic::Areas => "areas",
            SearchTopic::Safety => "safety",
            SearchTopic::Weather => "weather",
            SearchTopic::Transport => "transport",
            SearchTopic::Lodging => "lodging",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            SearchTopic::Attractions => "attractions",
            SearchTopic::Food => "restaurants",
            SearchTopic::Areas => "neighborhoods",
            SearchTopic::Safety => "safety tips",
            SearchTopic::Weather => "weather",
            SearchTopic::Transport => "transport options",
            SearchTopic::Lodging => "hotels",
        }
    }

    pub fn hint_key(self) -> String {
        format!("{HINT_KEY_PREFIX}{}", self.key())
    }

    /// Query variants, most specific first. A clarification hint from the
    /// user becomes the first variant.
    pub fn queries(self, params: &TripParameters, hint: Option<&str>) -> Vec<String> {
        let d = params.destination();
        let param = |p: TripParameter| params.get(p).unwrap_or_default();

        let mut queries: Vec<String> = hint
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(|h| format!("{h} {} in {d}", self.noun()))
            .into_iter()
            .collect();

        let base = match self {
            SearchTopic::Attractions => vec![
                format!("top {} attractions in {d}", param(TripParameter::Interests)),
                format!("best things to do in {d}"),
                format!("must-see sights in {d}"),
            ],
            SearchTopic::Food => vec![
                format!("best local restaurants in {d} for {} travelers", param(TripParameter::Style)),
                format!("traditional food to try in {d}"),
                format!("popular places to eat in {d}"),
            ],
            SearchTopic::Areas => vec![
                format!("most popular neighborhoods to explore in {d}"),
                format!("best areas to visit in {d}"),
            ],
            SearchTopic::Safety => vec![
                format!("travel safety tips for visitors to {d}"),
                format!("common tourist scams and areas to avoid in {d}"),
            ],
            SearchTopic::Weather => vec![
                format!("weather in {d} during {}", param(TripParameter::Dates)),
                format!("best time of year to visit {d} climate"),
            ],
            SearchTopic::Transport => vec![
                format!("public transport options for getting around {d}"),
                format!("how to get around {d} as a tourist"),
            ],
            SearchTopic::Lodging => vec![
                format!(
                    "best {} hotels in {d} for {} with a budget of {}",
                    param(TripParameter::Style),
                    param(TripParameter::Travelers),
                    param(TripParameter::Budget)
                ),
                format!("where to stay in {d}"),
                format!("recommended accommodation in {d}"),
            ],
        };
        queries.extend(base);
        queries
    }

    pub fn clarification_question(self, destination: &str) -> String {
        let subject = match self {
            SearchTopic::Attractions => "attractions",
            SearchTopic::Food => "places to eat",
            SearchTopic::Areas => "areas to explore",
            SearchTopic::Safety => "safety information",
            SearchTopic::Weather => "weather information",
            SearchTopic::Transport => "local transport",
            SearchTopic::Lodging => "places to stay",
        };
        format!(
            "I couldn't find reliable {subject} for {destination}. \
             Is there a specific area, preference or keyword I should search for?"
        )
    }
}

/// Cached result of researching one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "hits", rename_all = "snake_case")]
pub enum TopicOutcome {
    Found(Vec<SearchHit>),
    Unavailable,
}

pub type TopicResults = BTreeMap<SearchTopic, TopicOutcome>;

/// What to do with one validated search response.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchVerdict {
    Accept(Vec<SearchHit>),
    /// Try the next query variant.
    Reformulate,
    /// Stop and ask the user about the topic.
    AskUser,
    /// Record the topic as having no verified results.
    Unavailable,
}

impl SearchVerdict {
    pub fn decide(validation: SearchValidation, variants_left: bool, clarified: bool) -> Self {
        match validation {
            SearchValidation::Valid(hits) => SearchVerdict::Accept(hits),
            _ if variants_left => SearchVerdict::Reformulate,
            _ if !clarified => SearchVerdict::AskUser,
            _ => SearchVerdict::Unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris() -> TripParameters {
        TripParameters::new()
            .with(TripParameter::Destination, "Paris")
            .with(TripParameter::Dates, "3 days")
            .with(TripParameter::Travelers, "2 travelers")
            .with(TripParameter::Budget, "$2000")
            .with(TripParameter::Interests, "museums")
            .with(TripParameter::Style, "relaxed")
    }

    #[test]
    fn test_queries_use_parameters() {
        let queries = SearchTopic::Attractions.queries(&paris(), None);
        assert_eq!(queries[0], "top museums attractions in Paris");
        assert!(queries.len() > 1);
        assert!(queries.iter().all(|q| q.contains("Paris")));
    }

    #[test]
    fn test_hint_comes_first() {
        let queries = SearchTopic::Food.queries(&paris(), Some(" vegetarian "));
        assert_eq!(queries[0], "vegetarian restaurants in Paris");
        assert_eq!(queries.len(), SearchTopic::Food.queries(&paris(), None).len() + 1);
        assert_eq!(SearchTopic::Food.queries(&paris(), Some("  ")).len(), 3);
    }

    #[test]
    fn test_every_topic_has_a_fallback_variant() {
        for topic in SearchTopic::ALL {
            assert!(topic.queries(&paris(), None).len() >= 2, "{topic:?}");
        }
    }

    #[test]
    fn test_verdicts() {
        let hits = vec![SearchHit::new("Louvre", "Art museum")];
        assert_eq!(
            SearchVerdict::decide(SearchValidation::Valid(hits.clone()), false, false),
            SearchVerdict::Accept(hits)
        );
        assert_eq!(SearchVerdict::decide(SearchValidation::Empty, true, false), SearchVerdict::Reformulate);
        assert_eq!(
            SearchVerdict::decide(SearchValidation::ToolError("quota".into()), false, false),
            SearchVerdict::AskUser
        );
        assert_eq!(SearchVerdict::decide(SearchValidation::MissingData, false, true), SearchVerdict::Unavailable);
    }

    #[test]
    fn test_topic_results_serialize_by_key() {
        let mut results = TopicResults::new();
        results.insert(SearchTopic::Weather, TopicOutcome::Unavailable);
        let value = serde_json::to_value(&results).unwrap();
        assert_eq!(value, serde_json::json!({"weather": {"status": "unavailable"}}));
        let back: TopicResults = serde_json::from_value(value).unwrap();
        assert_eq!(back, results);
    }
}
