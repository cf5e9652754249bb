#[path = "common/mod.rs"]
mod common;

use common::{status_record, supervised_service};
use std::fs;
use svcctl::{
    codec::{StatusCodec, SupervisorFlavor},
    config::ClientConfig,
    service::ServiceHandle,
    status::{ServiceState, StatusReporter, STATUS_SCHEMA_VERSION},
};
use tempfile::tempdir;

fn test_config(service_dir: &std::path::Path, flavor: SupervisorFlavor) -> ClientConfig {
    ClientConfig {
        service_dir: service_dir.to_path_buf(),
        flavor,
    }
}

#[test]
fn status_of_running_runit_service() {
    let temp = tempdir().expect("create tempdir");
    supervised_service(temp.path(), "httpd", 300, 27450, &[0, 0, 0, 1]);

    let config = test_config(temp.path(), SupervisorFlavor::Runit);
    let status = config.handle("httpd").status().expect("query status");

    assert_eq!(status.state, ServiceState::Up);
    assert_eq!(status.pid, Some(27450));
    assert!((300..=302).contains(&status.uptime_secs));
}

#[test]
fn status_of_daemontools_service() {
    let temp = tempdir().expect("create tempdir");
    supervised_service(temp.path(), "qmail", 45, 812, &[0, 0]);

    let config = test_config(temp.path(), SupervisorFlavor::Daemontools);
    let status = config.handle("qmail").status().expect("query status");

    assert_eq!(status.state, ServiceState::Up);
    assert_eq!(status.pid, Some(812));
    assert!((45..=47).contains(&status.uptime_secs));
}

#[test]
fn runit_codec_rejects_daemontools_record() {
    let temp = tempdir().expect("create tempdir");
    supervised_service(temp.path(), "short", 5, 99, &[0, 0]);

    let config = test_config(temp.path(), SupervisorFlavor::Runit);
    let err = config.handle("short").status().expect_err("length mismatch");
    assert!(err.to_string().contains("18 bytes, expected 20"));
}

#[test]
fn snapshot_covers_all_supervised_services() {
    let temp = tempdir().expect("create tempdir");
    supervised_service(temp.path(), "web", 10, 100, &[0, 0, 0, 1]);
    supervised_service(temp.path(), "db", 20, 0, &[0, 0, 0, 0]);
    fs::create_dir_all(temp.path().join("defined-but-never-run"))
        .expect("create bare service dir");

    let config = test_config(temp.path(), SupervisorFlavor::Runit);
    let reporter = StatusReporter::new(false);
    let snapshot = reporter.snapshot(&config).expect("build snapshot");

    assert_eq!(snapshot.schema_version, STATUS_SCHEMA_VERSION);
    let names: Vec<&str> = snapshot
        .services
        .iter()
        .map(|report| report.name.as_str())
        .collect();
    assert_eq!(names, ["db", "web"]);

    let db = &snapshot.services[0];
    let status = db.status.as_ref().expect("db status");
    assert_eq!(status.state, ServiceState::Down);
    assert_eq!(status.pid, None);

    let web = &snapshot.services[1];
    let status = web.status.as_ref().expect("web status");
    assert_eq!(status.pid, Some(100));
}

#[test]
fn report_for_unsupervised_service_carries_the_error() {
    let temp = tempdir().expect("create tempdir");
    fs::create_dir_all(temp.path().join("fresh")).expect("create service dir");

    let config = test_config(temp.path(), SupervisorFlavor::Runit);
    let reporter = StatusReporter::new(false);
    let report = reporter.report(&config.handle("fresh"));

    assert!(report.status.is_none());
    assert!(
        report
            .error
            .as_deref()
            .expect("error recorded")
            .contains("not under supervision")
    );
}

#[test]
fn stale_record_is_flagged_when_pid_is_dead() {
    let temp = tempdir().expect("create tempdir");
    // Pids just below the kernel default maximum are effectively never live
    // in a test environment.
    let dead_pid = 4_194_000;
    let service = supervised_service(temp.path(), "ghost", 5, dead_pid, &[0, 0, 0, 1]);

    let handle = ServiceHandle::new(service, StatusCodec::new(SupervisorFlavor::Runit));
    let reporter = StatusReporter::new(false);
    let report = reporter.report(&handle);

    assert!(report.stale, "dead pid should mark the report stale");
    assert_eq!(
        report.status.expect("status decoded").pid,
        Some(dead_pid)
    );
}

#[test]
fn decode_matches_across_repeated_reads() {
    let temp = tempdir().expect("create tempdir");
    let raw = status_record(120, 555, &[0, 0, 0, 1]);
    let service = temp.path().join("steady");
    fs::create_dir_all(service.join("supervise")).expect("create supervise dir");
    fs::write(service.join("supervise/status"), &raw).expect("write record");

    let handle = ServiceHandle::new(&service, StatusCodec::new(SupervisorFlavor::Runit));
    let first = handle.status().expect("first read");
    let second = handle.status().expect("second read");
    assert_eq!(first.state, second.state);
    assert_eq!(first.pid, second.pid);
    assert_eq!(first.action, second.action);
}
