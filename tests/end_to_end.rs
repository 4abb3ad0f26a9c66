//! End-to-end checks through the public API

use bloom_core::chat::{ChatContext, ChatMemory, ChatSession, ReplyEngine};
use bloom_core::cycle::{self, parse_date, CyclePhase, CyclePredictor, PredictorConfig};
use bloom_core::{CycleError, CycleHistory};
use pretty_assertions::assert_eq;

fn regular_history_json() -> &'static str {
    r#"[
        {"start_date": "2024-01-01", "period_length": 5},
        {"start_date": "2024-01-29", "period_length": 5},
        {"start_date": "2024-02-26", "period_length": 5}
    ]"#
}

#[test]
fn test_predict_from_json_history() {
    let history = CycleHistory::parse_array(regular_history_json()).unwrap();
    let prediction = cycle::predict(&history, parse_date("2024-03-10").unwrap()).unwrap();

    assert_eq!(prediction.state.cycle_length_days, 28);
    assert_eq!(prediction.day_of_cycle, 14);
    assert_eq!(prediction.state.phase, CyclePhase::Ovulation);
    assert_eq!(prediction.next_period_date, parse_date("2024-03-25").unwrap());
    assert_eq!(prediction.next_period_end, parse_date("2024-03-29").unwrap());
    assert_eq!(prediction.ovulation_date, parse_date("2024-03-10").unwrap());

    let window = prediction.fertile_window.unwrap();
    assert_eq!(window.start, parse_date("2024-03-05").unwrap());
    assert_eq!(window.end, parse_date("2024-03-09").unwrap());

    assert_eq!(prediction.days_until_next_period, 15);
    assert_eq!(prediction.days_late, 0);
    assert!((prediction.confidence - 0.95).abs() < 1e-6);
}

#[test]
fn test_ndjson_and_array_agree() {
    let ndjson = r#"{"start_date": "2024-01-01", "period_length": 5}
{"start_date": "2024-01-29", "period_length": 5}

{"start_date": "2024-02-26", "period_length": 5}
"#;
    let from_ndjson = CycleHistory::parse_ndjson(ndjson).unwrap();
    let from_array = CycleHistory::parse_array(regular_history_json()).unwrap();
    assert_eq!(from_ndjson, from_array);
}

#[test]
fn test_rejects_zero_length_period() {
    let result = CycleHistory::parse_array(r#"[{"start_date": "2024-01-01", "period_length": 0}]"#);
    assert!(result.is_err());
}

#[test]
fn test_empty_history_has_no_prediction() {
    let history = CycleHistory::parse_array("[]").unwrap();
    let result = cycle::predict(&history, parse_date("2024-03-10").unwrap());
    assert!(matches!(result, Err(CycleError::NoHistory)));
}

#[test]
fn test_calendar_projects_past_predicted_length() {
    let history = CycleHistory::parse_array(regular_history_json()).unwrap();
    let days = cycle::calendar(
        &history,
        parse_date("2024-03-24").unwrap(),
        parse_date("2024-03-27").unwrap(),
    )
    .unwrap();

    let summary: Vec<(u32, CyclePhase, bool)> = days
        .iter()
        .map(|d| (d.day_of_cycle, d.phase, d.projected))
        .collect();
    assert_eq!(
        summary,
        vec![
            (28, CyclePhase::Normal, false),
            (1, CyclePhase::Period, true),
            (2, CyclePhase::Period, true),
            (3, CyclePhase::Period, true),
        ]
    );
}

#[test]
fn test_custom_config_changes_default_length() {
    let config = PredictorConfig::from_json(r#"{"default_cycle_length": 30}"#).unwrap();
    let predictor = CyclePredictor::new(config);
    let history =
        CycleHistory::parse_array(r#"[{"start_date": "2024-02-01", "period_length": 4}]"#).unwrap();

    let prediction = predictor
        .predict(&history, parse_date("2024-02-02").unwrap())
        .unwrap();
    assert_eq!(prediction.state.cycle_length_days, 30);
    assert_eq!(prediction.next_period_date, parse_date("2024-03-02").unwrap());
    assert_eq!(prediction.state.phase, CyclePhase::Period);
}

#[test]
fn test_conversation_over_a_session() {
    let ctx = ChatContext::from_json(
        r#"{
            "user_name": "Riley",
            "mind_score": 82,
            "sleep": "8h 10m",
            "mood": "happy"
        }"#,
    )
    .unwrap();

    let mut engine = ReplyEngine::with_seed(7);
    let mut session = ChatSession::new();

    let first = engine.reply_in_session("Good morning!", &ctx, &mut session);
    assert!(first.contains("Riley"));
    assert!(first.contains("water"));

    // The water nudge is not repeated on the next turn
    let second = engine.reply_in_session("How did I sleep?", &ctx, &mut session);
    assert!(second.starts_with("Sleep last night: 8h 10m."));
    assert_eq!(session.turns, 2);

    let third = engine.reply_in_session("", &ctx, &mut session);
    assert_eq!(third, bloom_core::chat::DIDNT_CATCH_THAT);
}

#[test]
fn test_memory_survives_across_engines() {
    let ctx = ChatContext::new("Riley");
    let mut memory = ChatMemory::new();

    let first = ReplyEngine::with_seed(1).reply("water", &ctx, &mut memory);
    let second = ReplyEngine::with_seed(2).reply("water", &ctx, &mut memory);

    assert!(first.contains("You haven't logged any water today."));
    assert!(!second.contains("You haven't logged any water today."));
}
