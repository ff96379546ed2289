//! End-to-end behaviour when shellwright is not running

use demoplay::{classify, DemoConfig, DemoError, FailureClass, Orchestrator};

fn config_for(url: &str, dir: &tempfile::TempDir) -> DemoConfig {
    DemoConfig {
        shellwright_url: url.to_string(),
        output_dir: dir.path().join("output"),
        ..DemoConfig::default()
    }
}

#[tokio::test]
async fn unreachable_service_is_a_connectivity_failure() {
    let dir = tempfile::tempdir().unwrap();
    // Nothing listens on the discard port
    let orchestrator = Orchestrator::new(config_for("http://127.0.0.1:9", &dir));

    let error = orchestrator.run(&["scan"]).await.unwrap_err();

    assert!(matches!(error, DemoError::Connect { .. }), "got {error:?}");
    assert_eq!(classify(&error), FailureClass::Connectivity);
    assert!(error.to_string().contains("http://127.0.0.1:9/mcp"));
    // The output directory is prepared before connecting
    assert!(dir.path().join("output").is_dir());
}

#[tokio::test]
async fn unknown_demo_wins_over_connectivity() {
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = Orchestrator::new(config_for("http://127.0.0.1:9", &dir));

    let error = orchestrator.run(&["scan", "teaser"]).await.unwrap_err();

    assert_eq!(classify(&error), FailureClass::UnknownScenario);
    assert_eq!(
        error.to_string(),
        "unknown demo: teaser. Available: scan, supervisor"
    );
    assert!(!dir.path().join("output").exists());
}
