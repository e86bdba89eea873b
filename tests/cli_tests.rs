mod common;

use assert_cmd::Command;
use common::{SCENARIO, TraceDir};
use predicates::prelude::*;
use std::path::PathBuf;

const NO_TRACES: &[PathBuf] = &[];

fn nvbloom() -> Command {
    let mut cmd = Command::cargo_bin("nvbloom").expect("Binary not built");
    cmd.env_remove("NOVELTY_INITIAL_CAPACITY")
        .env_remove("NOVELTY_ERROR_RATE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_scenario_output() {
    let dir = TraceDir::new();
    let train = dir.trace("train", SCENARIO);
    let test = dir.trace("test", SCENARIO);
    let set = dir.set_file(&[("b_train", &[train][..]), ("b_test", &[test][..])]);

    nvbloom()
        .args(["-r", "-s", "4"])
        .arg(&set)
        .assert()
        .success()
        .stdout("-- b_train --\n2,2,1.0\n-- b_test --\n0,2,0.0\n");
}

#[test]
fn test_missing_group_prints_empty_section() {
    let dir = TraceDir::new();
    let train = dir.trace("train", SCENARIO);
    let set = dir.set_file(&[("b_train", &[train][..])]);

    nvbloom()
        .args(["-r", "-s", "4"])
        .arg(&set)
        .assert()
        .success()
        .stdout("-- b_train --\n2,2,1.0\n-- b_test --\n");
}

#[test]
fn test_selected_groups() {
    let dir = TraceDir::new();
    let trace = dir.trace("t", SCENARIO);
    let set = dir.set_file(&[("extra", &[trace][..])]);

    nvbloom()
        .args(["-r", "-s", "4", "--group", "extra"])
        .arg(&set)
        .assert()
        .success()
        .stdout("-- extra --\n2,2,1.0\n");
}

#[test]
fn test_json_output() {
    let dir = TraceDir::new();
    let trace = dir.trace("t", SCENARIO);
    let set = dir.set_file(&[("b_train", &[trace][..])]);

    nvbloom()
        .args(["-r", "-s", "4", "--format", "json", "-g", "b_train"])
        .arg(&set)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"novel_to_model\":2"))
        .stdout(predicate::str::contains("\"ratio\":1.0"))
        .stdout(predicate::str::contains("\"reported\":1"));
}

#[test]
fn test_no_terminators_is_config_error() {
    let dir = TraceDir::new();
    let set = dir.set_file(&[("b_train", NO_TRACES)]);

    nvbloom()
        .arg(&set)
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("terminator"));
}

#[test]
fn test_zero_sequence_length_is_config_error() {
    let dir = TraceDir::new();
    let set = dir.set_file(&[("b_train", NO_TRACES)]);

    nvbloom()
        .args(["-j", "-s", "0"])
        .arg(&set)
        .assert()
        .code(1)
        .stdout("");
}

#[test]
fn test_missing_set_file() {
    let dir = TraceDir::new();

    nvbloom()
        .arg("-c")
        .arg(dir.path().join("nothing.set"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_invalid_error_rate_from_env() {
    let dir = TraceDir::new();
    let set = dir.set_file(&[("b_train", NO_TRACES)]);

    nvbloom()
        .env("NOVELTY_ERROR_RATE", "lots")
        .arg("-r")
        .arg(&set)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("NOVELTY_ERROR_RATE"));
}

#[cfg(unix)]
#[test]
fn test_interrupt_exits_with_status_2() {
    use nix::sys::signal::{Signal, kill};
    use nix::sys::stat::Mode;
    use nix::unistd::{Pid, mkfifo};
    use std::fs::OpenOptions;
    use std::io::Write;
    use std::process::{Command as StdCommand, Stdio};
    use std::time::Duration;

    let dir = TraceDir::new();
    let pipe = dir.path().join("live-trace");
    mkfifo(&pipe, Mode::S_IRUSR | Mode::S_IWUSR).expect("Failed to create fifo");
    let set = dir.set_file(&[("b_train", &[pipe.clone()][..])]);

    let child = StdCommand::new(assert_cmd::cargo::cargo_bin("nvbloom"))
        .env_remove("NOVELTY_INITIAL_CAPACITY")
        .env_remove("NOVELTY_ERROR_RATE")
        .env_remove("RUST_LOG")
        .args(["-r", "-s", "4"])
        .arg(&set)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start nvbloom");

    // Blocks until nvbloom opens the trace, after its ctrl-c handler is set
    let mut trace = OpenOptions::new()
        .write(true)
        .open(&pipe)
        .expect("Failed to open fifo");
    for (source, kind) in SCENARIO {
        writeln!(trace, "{source:#x},0,{kind}").expect("Failed to write record");
    }
    trace.flush().expect("Failed to flush fifo");

    kill(Pid::from_raw(child.id() as i32), Signal::SIGINT)
        .expect("Failed to send SIGINT");
    std::thread::sleep(Duration::from_millis(500));

    // Wake the reader so it polls the cancel flag, then close the stream
    let _ = writeln!(trace, "0x7,0,ret");
    drop(trace);

    let output = child.wait_with_output().expect("nvbloom did not exit");
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "-- b_train --\n");
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("Keyboard Interrupt")
    );
}

#[test]
fn test_missing_trace_leaves_marker_line() {
    let dir = TraceDir::new();
    let missing = dir.path().join("missing");
    let good = dir.trace("good", SCENARIO);
    let set = dir.set_file(&[("b_train", &[missing.clone(), good][..])]);

    nvbloom()
        .args(["-r", "-s", "4", "-g", "b_train"])
        .arg(&set)
        .assert()
        .success()
        .stdout(format!(
            "-- b_train --\n# Could not find trace {}\n2,2,1.0\n",
            missing.display()
        ));
}
