#[path = "common/mod.rs"]
mod common;

use assert_cmd::Command;
use common::{control_bytes, supervised_service};
use predicates::boolean::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

fn svcctl() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("svcctl"))
}

#[test]
fn status_json_reports_running_service() {
    let temp = tempdir().expect("create tempdir");
    supervised_service(temp.path(), "httpd", 300, 27450, &[0, 0, 0, 1]);

    let output = svcctl()
        .arg("status")
        .arg("httpd")
        .arg("--service-dir")
        .arg(temp.path())
        .arg("--json")
        .arg("--no-color")
        .output()
        .expect("run svcctl status");
    assert!(output.status.success());

    let payload: Value = serde_json::from_slice(&output.stdout).expect("parse json");
    assert_eq!(payload["name"], "httpd");
    assert_eq!(payload["status"]["state"], "up");
    assert_eq!(payload["status"]["pid"], 27450);
    let uptime = payload["status"]["uptime_secs"].as_u64().expect("uptime");
    assert!((300..=305).contains(&uptime));
}

#[test]
fn status_human_output_for_down_service() {
    let temp = tempdir().expect("create tempdir");
    supervised_service(temp.path(), "db", 3, 0, &[0, 0, 0, 0]);

    svcctl()
        .arg("status")
        .arg("db")
        .arg("--service-dir")
        .arg(temp.path())
        .arg("--no-color")
        .assert()
        .success()
        .stdout(contains("● db Down").and(contains("secs")));
}

#[test]
fn status_without_service_lists_everything() {
    let temp = tempdir().expect("create tempdir");
    supervised_service(temp.path(), "web", 10, 100, &[0, 0, 0, 1]);
    supervised_service(temp.path(), "db", 20, 0, &[0, 0, 0, 0]);

    let output = svcctl()
        .arg("status")
        .arg("--service-dir")
        .arg(temp.path())
        .arg("--json")
        .output()
        .expect("run svcctl status");
    assert!(output.status.success());

    let payload: Value = serde_json::from_slice(&output.stdout).expect("parse json");
    assert_eq!(payload["schema_version"], "svc-status.v1");
    let services = payload["services"].as_array().expect("services array");
    let names: Vec<&str> = services
        .iter()
        .map(|entry| entry["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, ["db", "web"]);
}

#[test]
fn status_of_unsupervised_service_explains_itself() {
    let temp = tempdir().expect("create tempdir");
    fs::create_dir_all(temp.path().join("fresh")).expect("create service dir");

    svcctl()
        .arg("status")
        .arg("fresh")
        .arg("--service-dir")
        .arg(temp.path())
        .arg("--no-color")
        .assert()
        .success()
        .stdout(contains("not under supervision"));
}

#[test]
fn down_and_restart_write_control_bytes() {
    let temp = tempdir().expect("create tempdir");
    let service = supervised_service(temp.path(), "svc", 1, 42, &[0, 0, 0, 1]);

    svcctl()
        .arg("down")
        .arg("svc")
        .arg("--service-dir")
        .arg(temp.path())
        .assert()
        .success();
    assert_eq!(control_bytes(&service), b"d");

    svcctl()
        .arg("restart")
        .arg("svc")
        .arg("--service-dir")
        .arg(temp.path())
        .assert()
        .success();
    assert_eq!(control_bytes(&service), b"dtu");
}

#[test]
fn signal_sends_named_command() {
    let temp = tempdir().expect("create tempdir");
    let service = supervised_service(temp.path(), "svc", 1, 42, &[0, 0, 0, 1]);

    svcctl()
        .arg("signal")
        .arg("hup")
        .arg("svc")
        .arg("--service-dir")
        .arg(temp.path())
        .assert()
        .success();
    assert_eq!(control_bytes(&service), b"h");
}

#[test]
fn signal_rejects_unknown_action() {
    let temp = tempdir().expect("create tempdir");
    let service = supervised_service(temp.path(), "svc", 1, 42, &[0, 0, 0, 1]);

    svcctl()
        .arg("signal")
        .arg("reload")
        .arg("svc")
        .arg("--service-dir")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(contains("unknown control action 'reload'"));

    // Rejected before any I/O: the control file stays empty.
    assert_eq!(control_bytes(&service), b"");
}

#[test]
fn up_against_unsupervised_service_fails() {
    let temp = tempdir().expect("create tempdir");
    fs::create_dir_all(temp.path().join("fresh")).expect("create service dir");

    svcctl()
        .arg("up")
        .arg("fresh")
        .arg("--service-dir")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(contains("not under supervision"));
}

#[test]
fn service_dir_env_var_selects_directory() {
    let temp = tempdir().expect("create tempdir");
    supervised_service(temp.path(), "envsvc", 10, 77, &[0, 0, 0, 1]);
    // A decoy directory behind the legacy variable proves precedence.
    let decoy = tempdir().expect("create decoy tempdir");

    let output = svcctl()
        .arg("status")
        .arg("envsvc")
        .arg("--json")
        .env("SVCCTL_SERVICE_DIR", temp.path())
        .env("SERVICE_DIR", decoy.path())
        .output()
        .expect("run svcctl status");
    assert!(output.status.success());

    let payload: Value = serde_json::from_slice(&output.stdout).expect("parse json");
    assert_eq!(payload["status"]["state"], "up");
    assert_eq!(payload["status"]["pid"], 77);
}

#[test]
fn legacy_service_dir_env_var_is_honored() {
    let temp = tempdir().expect("create tempdir");
    supervised_service(temp.path(), "oldsvc", 5, 31, &[0, 0, 0, 1]);

    let output = svcctl()
        .arg("status")
        .arg("oldsvc")
        .arg("--json")
        .env_remove("SVCCTL_SERVICE_DIR")
        .env("SERVICE_DIR", temp.path())
        .output()
        .expect("run svcctl status");
    assert!(output.status.success());

    let payload: Value = serde_json::from_slice(&output.stdout).expect("parse json");
    assert_eq!(payload["name"], "oldsvc");
    assert_eq!(payload["status"]["pid"], 31);
}

#[test]
fn daemontools_flavor_flag_switches_record_length() {
    let temp = tempdir().expect("create tempdir");
    supervised_service(temp.path(), "qmail", 45, 812, &[0, 0]);

    let output = svcctl()
        .arg("status")
        .arg("qmail")
        .arg("--service-dir")
        .arg(temp.path())
        .arg("--flavor")
        .arg("daemontools")
        .arg("--json")
        .output()
        .expect("run svcctl status");
    assert!(output.status.success());

    let payload: Value = serde_json::from_slice(&output.stdout).expect("parse json");
    assert_eq!(payload["status"]["state"], "up");
    assert_eq!(payload["status"]["pid"], 812);
}
