use pagecheck_engine::backend::{Backend, BackendError};
use pagecheck_engine::executor::CommandExecutor;
use pagecheck_engine::runner::run_script;
use pagecheck_h::HeadlessBackend;
use serial_test::serial;

const PAGE: &str = "<html><head><title>Doc Page</title></head><body>\
    <div class=\"docblock\"><p>one</p><p>two</p><p>three</p></div>\
    </body></html>";

async fn launch_or_skip(backend: &mut HeadlessBackend) -> bool {
    tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::INFO)
        .try_init()
        .ok();

    match backend.launch().await {
        Ok(()) => true,
        Err(e) => {
            eprintln!("Failed to launch browser (is Chromium installed?): {}", e);
            false
        }
    }
}

#[tokio::test]
#[serial]
async fn headless_lifecycle_and_dom_queries() {
    let mut backend = HeadlessBackend::new();
    if !launch_or_skip(&mut backend).await {
        return;
    }

    let url = format!("data:text/html,{}", PAGE);
    let nav = backend.navigate(&url).await.expect("navigation");
    assert_eq!(nav.title, "Doc Page");

    backend.set_viewport(1035, 600).await.expect("viewport");

    let count = backend.query_count(".docblock p").await.expect("count");
    assert_eq!(count, 3);

    let tag = backend
        .get_property(".docblock p:nth-of-type(1)", "tagName")
        .await
        .expect("property");
    assert_eq!(tag, "P");

    let missing = backend.get_property(".missing", "tagName").await;
    assert!(matches!(
        missing,
        Err(BackendError::ElementNotFound { .. })
    ));

    backend.close().await.expect("close");
}

#[tokio::test]
#[serial]
async fn script_runs_end_to_end_against_chromium() {
    let mut backend = HeadlessBackend::new();
    if !launch_or_skip(&mut backend).await {
        return;
    }

    // Bare URLs in the script language cannot contain whitespace.
    let url = format!("data:text/html,{}", PAGE.replace(' ', "%20"));
    let text = format!(
        "// end-to-end smoke script\n\
         goto: {url}\n\
         show-text: true\n\
         size: (1035, 600)\n\
         assert-count: (\".docblock p\", 3)\n\
         assert-property: (\".docblock p:nth-of-type(2)\", {{\"tagName\": \"P\", \"childElementCount\": \"0\"}})\n"
    );

    let mut executor = CommandExecutor::new();
    let report = run_script(&mut backend, &mut executor, "smoke", &text).await;

    backend.close().await.expect("close");

    assert!(report.passed, "error: {:?}", report.error);
    assert_eq!(report.steps.len(), 5);
}
