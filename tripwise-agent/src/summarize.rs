use crate::research::RESEARCH_FINDINGS_KEY;
use crate::research::document::{
    ACCOMMODATION_SUGGESTIONS, ATTRACTIONS, ESTIMATED_COSTS, FOOD_SUGGESTIONS, LOCAL_TRANSPORT,
    ResearchDocument, SAFETY_PREFIX, TRAVEL_TIPS,
};
use async_stream::stream;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Write;
use std::sync::Arc;
use tripwise_core::{
    Agent, Content, Event, EventStream, InvocationContext, Result, TripwiseError,
};

pub const FINAL_SUMMARY_KEY: &str = "final_summary";

pub const TIME_BLOCKS: [&str; 3] = ["Morning", "Afternoon", "Evening"];

const NO_ATTRACTION: &str = "No attraction listed in research";
const NO_FOOD: &str = "No food suggestion listed in research";
const NO_TRANSPORT: &str = "No transport option listed in research";
const NO_LODGING: &str = "No lodging listed in research";

/// Second pipeline stage: rewrites `research_findings` into a day-by-day
/// itinerary under `final_summary`.
///
/// The rewrite is a pure function of the research document. Items are
/// dealt round-robin across the trip's time blocks, so every block gets
/// an attraction, a meal, a way to get around and a place to stay, and
/// nothing appears that the research did not contain.
pub struct SummarizationStage {
    name: String,
    description: String,
}

impl SummarizationStage {
    pub fn new() -> Self {
        Self {
            name: "summary_agent".to_string(),
            description: "Turns research findings into a day-by-day itinerary".to_string(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }
}

impl Default for SummarizationStage {
    fn default() -> Self {
        Self::new()
    }
}

fn pick<'a>(items: &'a [String], index: usize, placeholder: &'a str) -> &'a str {
    if items.is_empty() { placeholder } else { &items[index % items.len()] }
}

fn bullets(out: &mut String, items: &[String], placeholder: &str) {
    if items.is_empty() {
        let _ = writeln!(out, "- {placeholder}");
    }
    for item in items {
        let _ = writeln!(out, "- {item}");
    }
}

/// Render the itinerary for a research document.
pub fn render_itinerary(findings: &str) -> String {
    let doc = ResearchDocument::parse(findings);
    let days = doc.trip_days().unwrap_or(1).max(1);

    let attractions = doc.findings(ATTRACTIONS);
    let food = doc.findings(FOOD_SUGGESTIONS);
    let transport = doc.findings(LOCAL_TRANSPORT);
    let lodging = doc.findings(ACCOMMODATION_SUGGESTIONS);

    let (safety, tips): (Vec<String>, Vec<String>) =
        doc.findings(TRAVEL_TIPS).into_iter().partition(|t| t.starts_with(SAFETY_PREFIX));
    let safety: Vec<String> =
        safety.iter().map(|t| t.trim_start_matches(SAFETY_PREFIX).to_string()).collect();

    let destination = if doc.destination.is_empty() { "Your Trip" } else { doc.destination.as_str() };
    let mut out = format!("# Itinerary: {destination}\n");

    for day in 1..=days as usize {
        let _ = write!(out, "\n## Day {day}\n");
        for (block, name) in TIME_BLOCKS.iter().enumerate() {
            let i = (day - 1) * TIME_BLOCKS.len() + block;
            let _ = writeln!(out, "### {name}");
            let _ = writeln!(out, "- Attraction: {}", pick(&attractions, i, NO_ATTRACTION));
            let _ = writeln!(out, "- Food: {}", pick(&food, i, NO_FOOD));
            let _ = writeln!(out, "- Transport: {}", pick(&transport, i, NO_TRANSPORT));
            let _ = writeln!(out, "- Lodging: {}", pick(&lodging, day - 1, NO_LODGING));
        }
    }

    out.push_str("\n## Budget\n");
    bullets(&mut out, doc.section(ESTIMATED_COSTS), "No budget details in research");
    out.push_str("\n## Travel Tips\n");
    bullets(&mut out, &tips, "No travel tips in research");
    out.push_str("\n## Safety Notes\n");
    bullets(&mut out, &safety, "No safety notes in research");
    out
}

#[async_trait]
impl Agent for SummarizationStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn output_key(&self) -> Option<&str> {
        Some(FINAL_SUMMARY_KEY)
    }

    #[tripwise_telemetry::instrument(
        skip(self, ctx),
        fields(agent.name = %self.name, invocation.id = %ctx.invocation_id())
    )]
    async fn run(&self, ctx: Arc<dyn InvocationContext>) -> Result<EventStream> {
        let findings = match ctx.session().get_state(RESEARCH_FINDINGS_KEY) {
            Some(Value::String(text)) if !text.trim().is_empty() => text,
            _ => {
                return Err(TripwiseError::Agent(format!(
                    "{} requires '{RESEARCH_FINDINGS_KEY}' in session state",
                    self.name
                )));
            }
        };

        let itinerary = render_itinerary(&findings);
        tracing::info!(chars = itinerary.len(), "itinerary rendered");
        let event = Event::reply(ctx.invocation_id(), &self.name, Content::model(itinerary.clone()))
            .with_state(FINAL_SUMMARY_KEY, Value::String(itinerary));

        let s = stream! {
            yield Ok(event);
        };
        Ok(Box::pin(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FINDINGS: &str = "# Research Findings: Paris

## Destination Overview
- Le Marais: Historic district

## Traveler Preferences
- Destination: Paris
- Trip length (days): 2

## Attractions
- Louvre: Art museum
- Orsay: Impressionists

## Food Suggestions
- No verified results found

## Local Transport
- Metro: Fast and cheap

## Travel Tips
- Spring is mild
- Safety: Watch for pickpockets

## Accommodation Suggestions
- Hotel A: Central
- Hotel B: Quiet

## Estimated Costs
- Total budget: $1000
";

    #[test]
    fn test_days_and_blocks() {
        let out = render_itinerary(FINDINGS);
        assert!(out.starts_with("# Itinerary: Paris\n"));
        assert!(out.contains("## Day 1\n"));
        assert!(out.contains("## Day 2\n"));
        assert!(!out.contains("## Day 3\n"));
        assert_eq!(out.matches("### Morning").count(), 2);
        assert_eq!(out.matches("### Evening").count(), 2);
        assert_eq!(out.matches("- Attraction: ").count(), 6);
        assert_eq!(out.matches("- Lodging: ").count(), 6);
    }

    #[test]
    fn test_round_robin_and_placeholders() {
        let out = render_itinerary(FINDINGS);
        let day1 = &out[out.find("## Day 1").unwrap()..out.find("## Day 2").unwrap()];
        assert!(day1.contains("### Morning\n- Attraction: Louvre: Art museum\n"));
        assert!(day1.contains("### Afternoon\n- Attraction: Orsay: Impressionists\n"));
        assert!(day1.contains("- Food: No food suggestion listed in research"));
        assert!(day1.contains("- Lodging: Hotel A: Central"));

        let day2 = &out[out.find("## Day 2").unwrap()..];
        assert!(day2.contains("- Lodging: Hotel B: Quiet"));
    }

    #[test]
    fn test_trip_level_sections() {
        let out = render_itinerary(FINDINGS);
        assert!(out.contains("## Budget\n- Total budget: $1000\n"));
        assert!(out.contains("## Travel Tips\n- Spring is mild\n"));
        assert!(out.contains("## Safety Notes\n- Watch for pickpockets\n"));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(render_itinerary(FINDINGS), render_itinerary(FINDINGS));
    }

    #[test]
    fn test_missing_length_defaults_to_one_day() {
        let out = render_itinerary("# Research Findings: Rome\n");
        assert!(out.contains("## Day 1\n"));
        assert!(!out.contains("## Day 2\n"));
        assert!(out.contains("- Attraction: No attraction listed in research"));
        assert!(out.contains("## Safety Notes\n- No safety notes in research\n"));
    }

    #[test]
    fn test_oversized_length_is_capped() {
        let findings = FINDINGS.replace("Trip length (days): 2", "Trip length (days): 200000");
        let out = render_itinerary(&findings);
        assert_eq!(out.matches("### Morning").count(), crate::research::MAX_TRIP_DAYS as usize);
        assert!(!out.contains("## Day 61\n"));
    }
}
