mod common;

use common::*;
use std::sync::Arc;
use tripwise_agent::{
    COMPLETION_MESSAGE, FINAL_SUMMARY_KEY, RESEARCH_FINDINGS_KEY, ResearchStage,
    SequentialPipeline, SummarizationStage, TripParameter,
};
use tripwise_core::Agent;

fn planner(tool: Arc<dyn tripwise_core::Tool>) -> Arc<dyn Agent> {
    Arc::new(SequentialPipeline::new(
        "trip_planner",
        vec![
            Arc::new(ResearchStage::new(tool)) as Arc<dyn Agent>,
            Arc::new(SummarizationStage::new()) as Arc<dyn Agent>,
        ],
    ))
}

#[tokio::test]
async fn test_paris_conversation() {
    let (tool, _) = paris_search();
    let agent = planner(tool);
    let session = TestSession::new();

    let answers = ["Paris", "3 days", "2 travelers", "$2000", "museums"];
    let follow_ups = [
        TripParameter::Dates,
        TripParameter::Travelers,
        TripParameter::Budget,
        TripParameter::Interests,
        TripParameter::Style,
    ];
    for (answer, next) in answers.iter().zip(follow_ups) {
        let events = run_turn(&agent, &session, answer).await.unwrap();
        assert_eq!(final_texts(&events), vec![next.question().to_string()], "after {answer}");
    }

    let events = run_turn(&agent, &session, "relaxed").await.unwrap();
    let texts = final_texts(&events);
    assert_eq!(texts.first().map(String::as_str), Some(COMPLETION_MESSAGE));

    let findings = session.str(RESEARCH_FINDINGS_KEY).unwrap();
    assert!(findings.starts_with("# Research Findings: Paris"));
    for section in tripwise_agent::research::document::SECTIONS {
        assert!(findings.contains(&format!("## {section}\n")), "missing {section}");
    }
    assert!(findings.contains("- Trip length (days): 3"));
    assert!(findings.contains("- Per traveler per day: about $333"));

    let itinerary = texts.last().unwrap();
    assert_eq!(Some(itinerary.clone()), session.str(FINAL_SUMMARY_KEY));
    assert!(itinerary.starts_with("# Itinerary: Paris"));
    for day in 1..=3 {
        assert!(itinerary.contains(&format!("## Day {day}\n")));
    }
    assert!(!itinerary.contains("## Day 4"));
    assert_eq!(itinerary.matches("### Morning").count(), 3);
    assert_eq!(itinerary.matches("### Afternoon").count(), 3);
    assert_eq!(itinerary.matches("### Evening").count(), 3);
    assert!(itinerary.contains("- Attraction: Louvre: World's largest art museum"));
    assert!(itinerary.contains("## Safety Notes\n- Pickpockets: Keep bags closed on metro line 1"));
}

#[tokio::test]
async fn test_same_findings_give_same_itinerary() {
    let (tool, _) = paris_search();
    let first = TestSession::with_state(complete_paris_state());
    let second = TestSession::with_state(complete_paris_state());

    run_turn(&planner(tool.clone()), &first, "").await.unwrap();
    run_turn(&planner(tool), &second, "").await.unwrap();

    assert_eq!(first.str(RESEARCH_FINDINGS_KEY), second.str(RESEARCH_FINDINGS_KEY));
    assert_eq!(first.str(FINAL_SUMMARY_KEY), second.str(FINAL_SUMMARY_KEY));
}
