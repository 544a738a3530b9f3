use ff_engine::{EngineError, Log, LogKind, Rules};
use serde_json::json;

fn rules() -> Rules {
    Rules::builtin().expect("builtin rules")
}

#[test]
fn standard_log_fills_template() {
    let rules = rules();
    let log = Log::standard(&rules.templates, LogKind::TakeDmg, &[&"Orc", &2]);
    assert_eq!(log.as_str(), "Orc was hit for 2 damage.");
}

#[test]
fn extra_values_are_ignored() {
    let rules = rules();
    let log = Log::standard(&rules.templates, LogKind::Success, &[&1, &2, &3]);
    assert_eq!(log.as_str(), "Success!");
}

#[test]
fn unknown_key_is_kept_verbatim() {
    let rules = rules();
    let log = Log::from_key("The door creaks open.", &[&"ignored"], &rules.templates);
    assert_eq!(log.to_string(), "The door creaks open.");
}

#[test]
fn key_lookup_is_exact() {
    let rules = rules();
    assert_eq!(
        Log::from_key("success", &[], &rules.templates).as_str(),
        "Success!"
    );
    assert_eq!(
        Log::from_key("SUCCESS", &[], &rules.templates).as_str(),
        "SUCCESS"
    );
}

#[test]
fn payload_must_be_a_string() {
    let rules = rules();
    let ok = Log::from_payload(&json!("roll_luck"), &[&"Hero", &7], &rules.templates).unwrap();
    assert_eq!(ok.as_str(), "Hero rolled for luck, got 7.");

    let err = Log::from_payload(&json!(42), &[], &rules.templates).unwrap_err();
    assert!(matches!(err, EngineError::MalformedLog { found: "number" }));
    let err = Log::from_payload(&json!({"log": "x"}), &[], &rules.templates).unwrap_err();
    assert!(matches!(err, EngineError::MalformedLog { found: "object" }));
}

#[test]
fn append_log_builds_attack_line() {
    let rules = rules();
    let t = &rules.templates;
    let line = Log::standard(t, LogKind::RollDie, &[&"Hero", &4])
        .append_log(&Log::standard(t, LogKind::RollDieExt, &[&5]))
        .append_log(&Log::standard(t, LogKind::TotalRoll, &[&9]))
        .append_log(&Log::standard(t, LogKind::AttackVal, &[&15]));
    assert_eq!(
        line.as_str(),
        "Hero rolled a 4 and a 5, totalling 9, for an attack value of 15."
    );
}

#[test]
fn add_newline_log_joins_lines() {
    let a = Log::literal("first");
    let b = Log::literal("second");
    assert_eq!(a.add_newline_log(&b).as_str(), "first\nsecond");
}

#[test]
fn every_kind_round_trips_through_its_key() {
    for kind in LogKind::ALL {
        assert_eq!(kind.as_str().parse::<LogKind>(), Ok(kind));
    }
}

#[test]
fn log_serializes_as_plain_string() {
    let log = Log::literal("Draw!");
    assert_eq!(serde_json::to_string(&log).unwrap(), "\"Draw!\"");
}
