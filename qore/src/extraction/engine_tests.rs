//! Tests for the tiered extraction engine.

use super::*;
use pretty_assertions::assert_eq;

fn lines(items: &[&str]) -> String {
    items.join("\n")
}

#[test]
fn test_empty_input() {
    assert_eq!(extract(""), "");
    assert_eq!(
        ExtractionEngine::new().extract_detailed("").tier,
        ExtractionTier::Empty
    );
}

#[test]
fn test_whitespace_only_input() {
    assert_eq!(extract("   \n\t\n  \r\n"), "");
}

#[test]
fn test_garbage_input_is_total() {
    let garbage = "\u{0}\u{1}\x1b[\x1b]\u{fffd}\u{7f}\x1b";
    let answer = extract(garbage);
    assert!(answer.len() <= garbage.len());
}

#[test]
fn test_ansi_bullet() {
    assert_eq!(extract("\x1b[31m- red item\x1b[0m"), "- red item");
}

#[test]
fn test_single_bullet_is_idempotent() {
    let input = "  - Cut dining out by 15%  ";
    let once = extract(input);
    assert_eq!(once, input.trim());
    assert_eq!(extract(&once), once);
}

#[test]
fn test_collects_all_bullet_styles() {
    let raw = lines(&[
        "# Agent: Budget planner",
        "- Rent: 30%",
        "noise between",
        "* Food: 20%",
        "• Savings: 20%",
        "-not a bullet",
        "*also not",
    ]);

    let extraction = ExtractionEngine::new().extract_detailed(&raw);
    assert_eq!(extraction.tier, ExtractionTier::Bullets);
    assert_eq!(extraction.answer, "- Rent: 30%\n* Food: 20%\n• Savings: 20%");
    assert!(extraction.is_structured());
}

#[test]
fn test_bullets_win_over_marker() {
    let raw = lines(&[
        "Crew Execution Started",
        "Final Answer:",
        "Your budget looks healthy",
        "- Keep an emergency fund",
    ]);

    assert_eq!(extract(&raw), "- Keep an emergency fund");
}

#[test]
fn test_marker_tier() {
    let raw = lines(&["Crew Started", "Final Answer:", "The budget is $500"]);
    let extraction = ExtractionEngine::new().extract_detailed(&raw);

    assert_eq!(extraction.answer, "The budget is $500");
    assert_eq!(extraction.tier, ExtractionTier::Marker);
}

#[test]
fn test_marker_returns_everything_after_first_marker() {
    let raw = lines(&[
        "\x1b[1;35m## Agent Output:\x1b[0m",
        "Spending rose 12% in March.",
        "",
        "Task Completed",
        "Final Answer:",
        "tail",
    ]);

    assert_eq!(
        extract(&raw),
        "Spending rose 12% in March.\nTask Completed\nFinal Answer:\ntail"
    );
}

#[test]
fn test_marker_on_last_line_yields_empty_answer() {
    let raw = lines(&["Crew Started", "Agent Output:"]);
    let extraction = ExtractionEngine::new().extract_detailed(&raw);

    assert_eq!(extraction.answer, "");
    assert_eq!(extraction.tier, ExtractionTier::Marker);
}

#[test]
fn test_keyword_filter_tier() {
    let raw = lines(&["Crew ID: 123", "Execution Started", "Net savings: $200"]);
    let extraction = ExtractionEngine::new().extract_detailed(&raw);

    assert_eq!(extraction.answer, "Net savings: $200");
    assert_eq!(extraction.tier, ExtractionTier::FirstContent);
    assert!(!extraction.is_structured());
}

#[test]
fn test_keyword_filter_returns_first_content_line_only() {
    let raw = lines(&["Name: savings_agent", "First real line", "Second real line"]);
    assert_eq!(extract(&raw), "First real line");
}

#[test]
fn test_all_noise_returns_last_line() {
    let raw = lines(&["Crew ID: 123", "Execution Started", "  Task Completed  "]);
    let extraction = ExtractionEngine::new().extract_detailed(&raw);

    assert_eq!(extraction.answer, "Task Completed");
    assert_eq!(extraction.tier, ExtractionTier::LastLine);
}

#[test]
fn test_noise_keywords_are_case_sensitive() {
    assert_eq!(extract("crew of one\nCrew Started"), "crew of one");
}

#[test]
fn test_output_never_longer_than_stripped_input() {
    let samples = [
        "\x1b[32m• a\x1b[0m\n\x1b[32m• b\x1b[0m",
        "Agent Output:\nx\ny",
        "Crew\nStarted",
        "plain",
        "",
    ];

    for raw in samples {
        let answer = extract(raw);
        assert!(answer.len() <= strip_ansi(raw).len(), "{raw:?} -> {answer:?}");
    }
}

#[test]
fn test_tier_display() {
    assert_eq!(ExtractionTier::Bullets.to_string(), "bullets");
    assert_eq!(ExtractionTier::LastLine.to_string(), "last_line");
}
