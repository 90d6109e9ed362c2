use mastery_core::model::{Flashcard, LevelData, LevelId, LevelStatus};

use super::test_harness::{ViewKind, setup_view_harness};

fn advanced_level() -> LevelData {
    LevelData::new(
        LevelStatus::AdvancedUnderstanding,
        "# Vectors\n\nForces add head to tail.",
        vec![Flashcard::new("Resultant", "Sum of all forces")],
        vec![],
    )
    .with_feedback("Good grasp of **free body diagrams**.")
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_entry_points() {
    let mut harness = setup_view_harness(ViewKind::Home, None);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Start the assignment helper"), "missing link in {html}");
    assert!(html.contains("Continue to Master It"), "missing link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn process_view_smoke_starts_at_course_selection() {
    let mut harness = setup_view_harness(ViewKind::Process, None);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Assignment Helper"), "missing header in {html}");
    assert!(html.contains("Select Course"), "missing step title in {html}");
    assert!(html.contains("wizard-step--current"), "missing current step in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn master_it_view_smoke_renders_loaded_level() {
    let mut harness = setup_view_harness(ViewKind::MasterIt(2), Some(advanced_level()));
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Advanced Understanding"), "missing title in {html}");
    assert!(html.contains("<h1>Vectors</h1>"), "missing reading content in {html}");
    assert!(html.contains("Level 1 Feedback"), "missing feedback badge in {html}");
    assert!(html.contains("Continue to Flashcards"), "missing continue button in {html}");
    assert_eq!(harness.content.fetched(), vec![LevelId::new(2).unwrap()]);
}

#[tokio::test(flavor = "current_thread")]
async fn master_it_view_smoke_keeps_placeholder_when_fetch_fails() {
    let mut harness = setup_view_harness(ViewKind::MasterIt(1), None);
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("No content available for this level."), "missing placeholder in {html}");
    assert!(html.contains("Return to Level 0"), "missing recovery link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn master_it_view_smoke_rejects_unknown_level() {
    let mut harness = setup_view_harness(ViewKind::MasterIt(9), None);
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("That level does not exist."), "missing error in {html}");
    assert!(harness.content.fetched().is_empty());
}
