use ff_engine::{EngineError, LogKind, Rules};

const BUILTIN: &str = include_str!("../content/rules.yaml");

#[test]
fn builtin_rules_carry_house_constants() {
    let rules = Rules::builtin().unwrap();
    assert_eq!(rules.num_logs, 8);
    assert_eq!(rules.std_dmg, 2);
    assert_eq!(rules.change_on_luck, 1);
    assert_eq!(rules.ration_restores, 4);
    assert_eq!(rules.retention, None);
    assert_eq!(rules.templates.iter().count(), LogKind::ALL.len());
}

#[test]
fn overrides_are_picked_up() {
    let text = BUILTIN.replace("std_dmg: 2", "std_dmg: 3");
    let rules = Rules::from_yaml_str(&text).unwrap();
    assert_eq!(rules.std_dmg, 3);
}

#[test]
fn missing_template_is_rejected() {
    let text = BUILTIN.replace("  err_draw: \"Can't test luck after a draw!\"\n", "");
    let err = Rules::from_yaml_str(&text).unwrap_err();
    assert!(
        matches!(err, EngineError::MissingTemplate(LogKind::ErrDraw)),
        "{:?}",
        err
    );
    assert!(err.to_string().contains("err_draw"), "{}", err);
}

#[test]
fn fourth_slot_is_rejected() {
    let text = BUILTIN.replace("{0} was hit for {1} damage.", "{0} was hit for {3} damage.");
    let err = Rules::from_yaml_str(&text).unwrap_err();
    assert!(
        matches!(
            err,
            EngineError::TemplateArity {
                kind: LogKind::TakeDmg,
                index: 3
            }
        ),
        "{:?}",
        err
    );
}

#[test]
fn escaped_braces_do_not_count_as_slots() {
    let text = BUILTIN.replace("{0} was hit for {1} damage.", "{0} was hit for {{3}} damage.");
    let rules = Rules::from_yaml_str(&text).unwrap();
    assert_eq!(rules.templates.get(LogKind::TakeDmg), "{0} was hit for {{3}} damage.");
}

#[test]
fn broken_yaml_is_a_yaml_error() {
    let err = Rules::from_yaml_str("num_logs: [").unwrap_err();
    assert!(matches!(err, EngineError::Yaml(_)), "{:?}", err);
}

#[test]
fn zero_window_is_rejected() {
    let text = BUILTIN.replace("num_logs: 8", "num_logs: 0");
    let err = Rules::from_yaml_str(&text).unwrap_err();
    assert!(matches!(err, EngineError::InvalidRules(_)));
}

#[test]
fn retention_below_window_is_rejected() {
    let text = BUILTIN.replace("retention: null", "retention: 4");
    assert!(matches!(
        Rules::from_yaml_str(&text),
        Err(EngineError::InvalidRules(_))
    ));
}

#[test]
fn load_reports_missing_file() {
    let err = Rules::load("does/not/exist.yaml").unwrap_err();
    assert!(format!("{:#}", err).contains("failed to read rules YAML"));
}

#[test]
fn load_reads_utf16_with_bom() {
    let dir = std::env::temp_dir().join("ff-engine-utf16-rules");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("rules.yaml");
    let text = BUILTIN.replace("std_dmg: 2", "std_dmg: 5");
    let mut bytes = vec![0xFF, 0xFE];
    bytes.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
    std::fs::write(&path, bytes).unwrap();

    let rules = Rules::load(&path).unwrap();
    assert_eq!(rules.std_dmg, 5);
    assert_eq!(rules.templates.get(LogKind::Draw), "Draw! Neither side was hit.");
}

#[test]
fn load_skips_utf8_bom() {
    let dir = std::env::temp_dir().join("ff-engine-utf8-bom-rules");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("rules.yaml");
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(BUILTIN.as_bytes());
    std::fs::write(&path, bytes).unwrap();

    assert_eq!(Rules::load(&path).unwrap(), Rules::builtin().unwrap());
}
