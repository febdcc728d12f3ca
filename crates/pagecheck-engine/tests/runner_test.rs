mod common;

use common::MockBackend;
use pagecheck_engine::executor::CommandExecutor;
use pagecheck_engine::runner::{run_files, run_script, RunOptions};
use std::fs;
use std::path::PathBuf;

const SELECTOR: &str = ".top-doc .docblock p";

fn write_script(dir: &tempfile::TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).expect("write script");
    path
}

#[tokio::test]
async fn script_stops_at_the_first_failing_command() {
    let mut backend = MockBackend::default().with_count(SELECTOR, 1);
    let mut executor = CommandExecutor::new();

    let text = r#"
        goto: http://localhost:8000/
        assert-count: (".top-doc .docblock p", 3)
        assert-property: (".top-doc .docblock p", {"clientWidth": "502"})
    "#;

    let report = run_script(&mut backend, &mut executor, "overflow", text).await;

    assert!(!report.passed);
    let error = report.error.expect("failed report has an error");
    assert!(error.contains("expected 3, actual 1"), "error: {error}");
    // The assert-property command after the failure never ran.
    assert!(!backend.calls.iter().any(|c| c.starts_with("get_property")));
    assert_eq!(report.steps.len(), 1); // only the goto completed
}

#[tokio::test]
async fn parse_errors_fail_the_script_without_touching_the_session() {
    let mut backend = MockBackend::default();
    let mut executor = CommandExecutor::new();

    let report = run_script(&mut backend, &mut executor, "bad", "warp: nine").await;

    assert!(!report.passed);
    assert!(report.error.expect("error set").contains("Parse error"));
    assert!(backend.calls.is_empty());
}

#[tokio::test]
async fn batch_continues_after_a_failing_script() {
    let dir = tempfile::tempdir().expect("tempdir");
    let failing = write_script(
        &dir,
        "failing.pgc",
        "goto: http://localhost:8000/\nassert-count: (\".top-doc .docblock p\", 3)\n",
    );
    let passing = write_script(
        &dir,
        "passing.pgc",
        "goto: http://localhost:8000/\nassert-count: (\".present\", 1)\n",
    );

    let mut backend = MockBackend::default().with_count(".present", 1);
    let batch = run_files(
        &mut backend,
        &[failing, passing],
        &RunOptions::default(),
    )
    .await;

    assert_eq!(batch.total(), 2);
    assert_eq!(batch.failed(), 1);
    assert_eq!(batch.passed(), 1);
    assert!(!batch.all_passed());
    assert!(!batch.scripts[0].passed);
    assert!(batch.scripts[1].passed);
}

#[tokio::test]
async fn stop_on_error_aborts_the_batch() {
    let dir = tempfile::tempdir().expect("tempdir");
    let failing = write_script(&dir, "failing.pgc", "assert-count: (\".missing\", 3)\n");
    let passing = write_script(&dir, "passing.pgc", "assert-count: (\".present\", 1)\n");

    let mut backend = MockBackend::default().with_count(".present", 1);
    let options = RunOptions {
        stop_on_error: true,
        ..RunOptions::default()
    };
    let batch = run_files(&mut backend, &[failing, passing], &options).await;

    assert_eq!(batch.total(), 1);
    assert_eq!(batch.failed(), 1);
}

#[tokio::test]
async fn unreadable_script_is_a_failed_report_not_a_crash() {
    let mut backend = MockBackend::default();
    let batch = run_files(
        &mut backend,
        &[PathBuf::from("/nonexistent/overflow.pgc")],
        &RunOptions::default(),
    )
    .await;

    assert_eq!(batch.total(), 1);
    assert!(!batch.scripts[0].passed);
    assert!(batch.scripts[0]
        .error
        .as_deref()
        .expect("error set")
        .contains("IO error"));
}

#[tokio::test]
async fn passing_script_reports_every_step() {
    let mut backend = MockBackend::default()
        .with_count(SELECTOR, 3)
        .with_property(SELECTOR, "scrollHeight", "48")
        .with_property(SELECTOR, "clientHeight", "48");
    let mut executor = CommandExecutor::new();

    let text = r#"
        // layout-only run
        goto: http://localhost:8000/
        show-text: false
        size: (1035, 600)
        assert-count: (".top-doc .docblock p", 3)
        assert-property: (".top-doc .docblock p", {"scrollHeight": "48", "clientHeight": "48"})
    "#;

    let report = run_script(&mut backend, &mut executor, "docblock", text).await;

    assert!(report.passed, "error: {:?}", report.error);
    assert!(report.error.is_none());
    assert_eq!(report.steps.len(), 5);
    assert_eq!(report.steps[0], "Navigated to http://localhost:8000/");
}
