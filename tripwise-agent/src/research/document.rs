use super::params::{MAX_TRIP_DAYS, TripParameter, TripParameters};
use super::topics::{SearchTopic, TopicOutcome, TopicResults};
use std::fmt::Write;
use tripwise_tool::SearchHit;

pub const DOCUMENT_TITLE: &str = "# Research Findings: ";

pub const DESTINATION_OVERVIEW: &str = "Destination Overview";
pub const TRAVELER_PREFERENCES: &str = "Traveler Preferences";
pub const ATTRACTIONS: &str = "Attractions";
pub const FOOD_SUGGESTIONS: &str = "Food Suggestions";
pub const LOCAL_TRANSPORT: &str = "Local Transport";
pub const TRAVEL_TIPS: &str = "Travel Tips";
pub const ACCOMMODATION_SUGGESTIONS: &str = "Accommodation Suggestions";
pub const ESTIMATED_COSTS: &str = "Estimated Costs";

/// The eight document sections in output order.
pub const SECTIONS: [&str; 8] = [
    DESTINATION_OVERVIEW,
    TRAVELER_PREFERENCES,
    ATTRACTIONS,
    FOOD_SUGGESTIONS,
    LOCAL_TRANSPORT,
    TRAVEL_TIPS,
    ACCOMMODATION_SUGGESTIONS,
    ESTIMATED_COSTS,
];

pub const NO_RESULTS_ITEM: &str = "No verified results found";
pub const SAFETY_PREFIX: &str = "Safety: ";
pub const TRIP_LENGTH_LABEL: &str = "Trip length (days): ";

/// Parsed research document: a title plus named bullet sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResearchDocument {
    pub destination: String,
    sections: Vec<(String, Vec<String>)>,
}

impl ResearchDocument {
    /// Build the document from confirmed parameters and per-topic results.
    pub fn build(params: &TripParameters, results: &TopicResults) -> Self {
        let items = |topic: SearchTopic| -> Vec<String> {
            match results.get(&topic) {
                Some(TopicOutcome::Found(hits)) => hits.iter().map(hit_line).collect(),
                _ => vec![NO_RESULTS_ITEM.to_string()],
            }
        };

        let mut preferences: Vec<String> = TripParameter::ALL
            .into_iter()
            .filter_map(|p| params.get(p).map(|v| format!("{}: {v}", p.label())))
            .collect();
        if let Some(days) = params.trip_days() {
            preferences.push(format!("{TRIP_LENGTH_LABEL}{days}"));
        }

        let mut tips = items(SearchTopic::Weather);
        tips.extend(
            items(SearchTopic::Safety)
                .into_iter()
                .filter(|item| item != NO_RESULTS_ITEM)
                .map(|item| format!("{SAFETY_PREFIX}{item}")),
        );

        let sections = vec![
            (DESTINATION_OVERVIEW.to_string(), items(SearchTopic::Areas)),
            (TRAVELER_PREFERENCES.to_string(), preferences),
            (ATTRACTIONS.to_string(), items(SearchTopic::Attractions)),
            (FOOD_SUGGESTIONS.to_string(), items(SearchTopic::Food)),
            (LOCAL_TRANSPORT.to_string(), items(SearchTopic::Transport)),
            (TRAVEL_TIPS.to_string(), tips),
            (ACCOMMODATION_SUGGESTIONS.to_string(), items(SearchTopic::Lodging)),
            (ESTIMATED_COSTS.to_string(), estimated_costs(params)),
        ];

        Self { destination: params.destination().to_string(), sections }
    }

    /// Parse a rendered document. Lines outside `- ` bullets under a `## `
    /// heading are ignored.
    pub fn parse(text: &str) -> Self {
        let mut doc = Self::default();
        for line in text.lines().map(str::trim) {
            if let Some(title) = line.strip_prefix(DOCUMENT_TITLE) {
                doc.destination = title.trim().to_string();
            } else if let Some(heading) = line.strip_prefix("## ") {
                doc.sections.push((heading.trim().to_string(), Vec::new()));
            } else if let Some(item) = line.strip_prefix("- ") {
                if let Some((_, items)) = doc.sections.last_mut() {
                    items.push(item.trim().to_string());
                }
            }
        }
        doc
    }

    /// Items of a section, empty if the section is absent.
    pub fn section(&self, name: &str) -> &[String] {
        self.sections
            .iter()
            .find(|(heading, _)| heading == name)
            .map(|(_, items)| items.as_slice())
            .unwrap_or_default()
    }

    /// Items of a section without the "no results" marker.
    pub fn findings(&self, name: &str) -> Vec<String> {
        self.section(name).iter().filter(|i| *i != NO_RESULTS_ITEM).cloned().collect()
    }

    /// Stated trip length, capped at [`MAX_TRIP_DAYS`].
    pub fn trip_days(&self) -> Option<u32> {
        self.section(TRAVELER_PREFERENCES)
            .iter()
            .find_map(|item| item.strip_prefix(TRIP_LENGTH_LABEL)?.trim().parse::<u32>().ok())
            .map(|days| days.min(MAX_TRIP_DAYS))
    }

    pub fn render(&self) -> String {
        let mut out = format!("{DOCUMENT_TITLE}{}\n", self.destination);
        for (heading, items) in &self.sections {
            let _ = write!(out, "\n## {heading}\n");
            for item in items {
                let _ = writeln!(out, "- {item}");
            }
        }
        out
    }
}

/// Collapse all whitespace runs, newlines included, to single spaces.
fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn hit_line(hit: &SearchHit) -> String {
    let title = one_line(&hit.title);
    let snippet = one_line(&hit.snippet);
    match (title.is_empty(), snippet.is_empty()) {
        (false, false) => format!("{title}: {snippet}"),
        (false, true) => title,
        _ => snippet,
    }
}

fn estimated_costs(params: &TripParameters) -> Vec<String> {
    let mut lines = vec![format!("Total budget: {}", params.get(TripParameter::Budget).unwrap_or_default())];
    let (Some(budget), Some(days)) = (params.budget(), params.trip_days()) else {
        return lines;
    };
    let per_day = budget.amount / f64::from(days);
    lines.push(format!("Per day over {days} days: about {}", budget.format(per_day)));
    if let Some(travelers) = params.traveler_count() {
        let per_person = per_day / f64::from(travelers);
        lines.push(format!("Per traveler per day: about {}", budget.format(per_person)));
    }
    lines
}
