use std::process::Command;

fn shoal(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_shoal"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run the shoal binary")
}

#[test]
fn prints_one_json_frame_per_tick_and_a_summary() {
    let output = shoal(&[
        "--profile",
        "orca",
        "--ticks",
        "25",
        "--seed",
        "7",
        "--script",
        "0:right,10:-",
        "--json",
    ]);
    assert!(output.status.success(), "shoal exited with {:?}", output.status);

    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 26);

    let first: serde_json::Value = serde_json::from_str(lines[0]).expect("frame is json");
    assert_eq!(first["tick"], 1);
    assert_eq!(first["state"], "running");
    assert_eq!(first["profile"], "orca");
    assert_eq!(first["live_count_by_kind"]["krill"], 0);

    let summary = lines[25];
    assert!(summary.starts_with("profile=orca ticks=25"), "{summary}");
    assert!(summary.contains("spawned=20"), "{summary}");
}

#[test]
fn ambient_scene_runs_without_a_character() {
    let output = shoal(&["--mode", "ambient", "--ticks", "5", "--seed", "3", "--json"]);
    assert!(output.status.success(), "shoal exited with {:?}", output.status);

    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 6);

    let first: serde_json::Value = serde_json::from_str(lines[0]).expect("frame is json");
    assert_eq!(first["mode"], "ambient");
    assert!(first["profile"].is_null());
    assert!(first["player"].is_null());
    assert_eq!(first["live_count_by_kind"]["fish"], 25);
    assert_eq!(first["live_count_by_kind"]["krill"], 0);
    assert_eq!(first["bubbles"].as_array().map(Vec::len), Some(2));

    assert!(lines[5].starts_with("profile=none ticks=5"), "{}", lines[5]);
}

#[test]
fn seeded_runs_are_reproducible() {
    let args = ["--ticks", "120", "--seed", "99", "--json"];
    let first = shoal(&args);
    let second = shoal(&args);
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn unknown_profile_is_rejected() {
    let output = shoal(&["--profile", "dolphin"]);
    assert!(!output.status.success());
}

#[test]
fn malformed_script_is_rejected() {
    let output = shoal(&["--script", "soon:right"]);
    assert!(!output.status.success());
}
