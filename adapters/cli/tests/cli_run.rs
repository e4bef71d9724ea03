use std::process::Command;

fn dino_park(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_dino-park"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to launch dino-park")
}

#[test]
fn demo_park_runs_and_stops_at_the_round_limit() {
    let output = dino_park(&["--rounds", "5", "--seed", "1"]);
    assert!(output.status.success(), "dino-park exited with {:?}", output.status);

    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    assert!(stdout.starts_with("Welcome to Dino Park.\n"));
    assert!(stdout.contains("Simulation stopped after 5 rounds"));
}

#[test]
fn same_seed_narrates_the_same_story() {
    let first = dino_park(&["--rounds", "20", "--seed", "11"]);
    let second = dino_park(&["--rounds", "20", "--seed", "11"]);
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn missing_scenario_file_is_reported() {
    let output = dino_park(&["--scenario", "does-not-exist.toml"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).expect("utf-8 output");
    assert!(stderr.contains("failed to load scenario does-not-exist.toml"));
}

#[test]
fn bundled_scenario_file_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/scenarios/demo.toml");
    let output = dino_park(&["--scenario", path, "--rounds", "2"]);
    assert!(output.status.success());
}
