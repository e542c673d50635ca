use assert_cmd::Command;
use tempfile::tempdir;

// Drives the compiled binary with piped stdin; NOTEDRILL_CONFIG keeps the
// user's saved settings out of the way.
fn notedrill(config_dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("notedrill").unwrap();
    cmd.env("NOTEDRILL_CONFIG", config_dir.path().join("config.json"));
    cmd
}

#[test]
fn quits_on_q() {
    let dir = tempdir().unwrap();
    let output = notedrill(&dir)
        .args(["--seed", "7"])
        .write_stdin("q\n")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("lives 3"));
}

#[test]
fn wrong_note_on_last_life_ends_session() {
    let dir = tempdir().unwrap();
    // note 0 is below every difficulty range
    let output = notedrill(&dir)
        .args(["--lives", "1", "--seed", "3"])
        .write_stdin("0\n")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("final score 0"));
    assert!(stdout.contains("game over"));
}

#[test]
fn unrecognized_input_gets_a_hint() {
    let dir = tempdir().unwrap();
    let output = notedrill(&dir)
        .write_stdin("banana\nq\n")
        .output()
        .unwrap();

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("? banana"));
}

#[test]
fn invalid_lives_are_rejected() {
    let dir = tempdir().unwrap();
    let output = notedrill(&dir)
        .args(["--lives", "9"])
        .write_stdin("q\n")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("lives must be between 1 and 5"));
}

#[test]
fn save_persists_settings() {
    let dir = tempdir().unwrap();
    notedrill(&dir)
        .args(["-d", "advanced", "-l", "2", "--save"])
        .write_stdin("q\n")
        .assert()
        .success();

    let saved = std::fs::read_to_string(dir.path().join("config.json")).unwrap();
    let config: notedrill::Configuration = serde_json::from_str(&saved).unwrap();
    assert_eq!(config.difficulty, notedrill::Difficulty::Advanced);
    assert_eq!(config.lives, 2);

    // later runs pick the saved lives up without flags
    let output = notedrill(&dir).write_stdin("q\n").output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("lives 2"));
}
