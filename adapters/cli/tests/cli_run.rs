use std::process::Command;

#[test]
fn scripted_session_reports_final_state() {
    let output = Command::new(env!("CARGO_BIN_EXE_lane-defence"))
        .env("RUST_LOG", "warn")
        .args(["--ticks", "120", "--click", "1:350,300"])
        .output()
        .expect("failed to run lane-defence");

    assert!(output.status.success(), "lane-defence exited with {}", output.status);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Welcome to Lane Defence."));
    assert!(stdout.contains("wave 1 | lives 20 | currency 220 | towers 1"), "{stdout}");
}

#[test]
fn unreadable_configuration_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_lane-defence"))
        .args(["--config", "no/such/config.toml"])
        .output()
        .expect("failed to run lane-defence");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no/such/config.toml"));
}
