use assert_cmd::Command;
use predicates::prelude::*;

fn ff() -> Command {
    Command::cargo_bin("ff").expect("ff binary")
}

#[test]
fn roll_stays_in_uniform_range() {
    let out = ff()
        .args(["roll", "--seed", "1", "--dice", "2", "--sides", "6", "--rolls", "20"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(out).unwrap();
    let values: Vec<i32> = text.lines().map(|l| l.parse().unwrap()).collect();
    assert_eq!(values.len(), 20);
    assert!(values.iter().all(|v| (2..=12).contains(v)));
}

#[test]
fn stats_json_is_a_character() {
    let out = ff()
        .args(["stats", "--seed", "3", "--name", "Aldric", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["name"], "Aldric");
    let skill = v["stats"]["skill"].as_i64().unwrap();
    assert!((7..=12).contains(&skill));
}

#[test]
fn lopsided_fight_ends_in_one_round() {
    ff().args([
        "fight",
        "--seed",
        "5",
        "--skill",
        "12",
        "--stamina",
        "30",
        "--enemy-name",
        "Goblin",
        "--enemy-skill",
        "1",
        "--enemy-stamina",
        "2",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Goblin was hit for 2 damage."))
    .stdout(predicate::str::contains("rounds=1 winner=player"));
}

#[test]
fn play_session_runs_a_battle() {
    ff().args(["play", "--seed", "9"])
        .write_stdin("fight\nstat skill 11\nbattle 1 2 Goblin\nfight\nluck\nend\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "error: 'fight' only works during a battle",
        ))
        .stdout(predicate::str::contains("Goblin was hit for 2 damage."))
        .stdout(predicate::str::contains("rolled for luck, got"))
        .stdout(predicate::str::contains("Champion returned from battle."));
}

#[test]
fn unknown_stat_is_reported_not_fatal() {
    ff().args(["play", "--seed", "1"])
        .write_stdin("stat charisma 2\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("unknown stat 'charisma'"));
}

#[test]
fn broken_rules_file_fails() {
    let dir = std::env::temp_dir().join("ff-cli-broken-rules");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("rules.yaml");
    std::fs::write(&path, "num_logs: 8\n").unwrap();
    ff().args(["--rules", path.to_str().unwrap(), "stats"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse rules YAML"));
}

#[test]
fn simulator_reads_utf16_rules() {
    let dir = std::env::temp_dir().join("ff-cli-utf16-rules");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("rules.yaml");
    let text = include_str!("../../engine/content/rules.yaml");
    let mut bytes = vec![0xFF, 0xFE];
    bytes.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
    std::fs::write(&path, bytes).unwrap();

    Command::cargo_bin("simulate-fights")
        .expect("simulate-fights binary")
        .args(["--trials", "3", "--rules", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("trials=3"));
}

#[test]
fn huge_dice_count_does_not_go_negative() {
    ff().args(["roll", "--dice", "3000000000", "--rolls", "2"])
        .assert()
        .success()
        .stdout(format!("{}\n{}\n", i32::MAX, i32::MAX));
}
