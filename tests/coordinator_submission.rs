// tests/coordinator_submission.rs

mod common;
use crate::common::{TestResult, init_tracing};

use std::time::Duration;

use gasw::coordinator::GaswClient;
use gasw::errors::{GaswError, SubmissionStage};
use gasw::job::{Category, EnvVariable, GaswInput};
use gasw::proxy::{Delegation, GridUserCredentials, VomsServer};
use gasw::types::ExecutionTarget;
use gasw_test_utils::builders::FixtureBuilder;
use gasw_test_utils::fake_executor::FakeSelector;

fn job_with_target(target: &str) -> GaswInput {
    GaswInput::new("echo").with_configuration(EnvVariable::new(
        Category::System,
        "gridTarget",
        target,
    ))
}

#[tokio::test]
async fn grid_target_entry_overrides_default_target() -> TestResult {
    init_tracing();
    let fx = FixtureBuilder::new()
        .target(ExecutionTarget::new("GRID", "DIRAC"))
        .build();
    let client = GaswClient::new();

    fx.coordinator.submit(&client, job_with_target("X")).await?;
    fx.coordinator.submit(&client, GaswInput::new("echo")).await?;

    let log = fx.executor_log();
    assert_eq!(
        log.targets,
        vec![
            ExecutionTarget::new("GRID", "X"),
            ExecutionTarget::new("GRID", "DIRAC"),
        ]
    );
    // The override is per submission; the default is unchanged.
    assert_eq!(fx.coordinator.default_target(), &ExecutionTarget::new("GRID", "DIRAC"));

    fx.coordinator.terminate().await?;
    Ok(())
}

#[tokio::test]
async fn submit_returns_executor_handle_after_pre_processing() -> TestResult {
    init_tracing();
    let fx = FixtureBuilder::new()
        .selector(FakeSelector::new().with_handles(["job1--h1"]))
        .build();

    let handle = fx
        .coordinator
        .submit(&GaswClient::new(), GaswInput::new("echo"))
        .await?;

    assert_eq!(handle, "job1--h1");
    let log = fx.executor_log();
    assert_eq!(log.pre_processed, 1);
    assert_eq!(log.submitted, vec!["job1--h1".to_string()]);
    assert!(log.proxies.is_empty(), "no credentials means no proxy");

    fx.coordinator.terminate().await?;
    Ok(())
}

#[tokio::test]
async fn login_and_password_select_programmatic_delegation() -> TestResult {
    init_tracing();
    let fx = FixtureBuilder::new().build();
    let client = GaswClient::new();

    fx.coordinator
        .submit_with_credentials(
            &client,
            GaswInput::new("echo"),
            GridUserCredentials::with_login_password("alice", "secret"),
            None,
            None,
        )
        .await?;
    fx.coordinator
        .submit_with_credentials(
            &client,
            GaswInput::new("echo"),
            GridUserCredentials::with_dn("/O=GRID/CN=alice"),
            None,
            Some(VomsServer {
                name: "vo.example".to_string(),
                host: "voms.example".to_string(),
                port: 15001,
            }),
        )
        .await?;

    let log = fx.executor_log();
    assert_eq!(log.proxies.len(), 2);
    assert_eq!(log.proxies[0].delegation, Delegation::Programmatic);
    assert_eq!(log.proxies[0].voms.name, "biomed");
    assert_eq!(log.proxies[1].delegation, Delegation::CommandLine);
    assert_eq!(log.proxies[1].voms.name, "vo.example");
    assert_eq!(log.proxies[1].myproxy.host, "myproxy.cern.ch");

    fx.coordinator.terminate().await?;
    Ok(())
}

#[tokio::test]
async fn failures_report_the_stage_and_are_not_retried() -> TestResult {
    init_tracing();

    for stage in [
        SubmissionStage::ExecutorSelection,
        SubmissionStage::PreProcess,
        SubmissionStage::Submit,
    ] {
        let fx = FixtureBuilder::new()
            .selector(FakeSelector::new().fail_at(stage))
            .build();

        let err = fx
            .coordinator
            .submit(&GaswClient::new(), GaswInput::new("echo"))
            .await
            .expect_err("submission should fail");

        assert_eq!(err.submission_stage(), Some(stage), "error: {err}");
        let log = fx.executor_log();
        assert_eq!(log.targets.len(), 1, "selector must be called exactly once");
        assert!(log.submitted.is_empty());

        fx.coordinator.terminate().await?;
    }
    Ok(())
}

#[tokio::test]
async fn selection_failure_wraps_unknown_executor() -> TestResult {
    init_tracing();
    let fx = FixtureBuilder::new()
        .selector(FakeSelector::new().fail_at(SubmissionStage::ExecutorSelection))
        .build();

    let err = fx
        .coordinator
        .submit(&GaswClient::new(), job_with_target("NOWHERE"))
        .await
        .expect_err("submission should fail");

    match err {
        GaswError::Submission { source, .. } => match *source {
            GaswError::UnknownExecutor { version, target } => {
                assert_eq!(version, "GRID");
                assert_eq!(target, "NOWHERE");
            }
            other => panic!("expected UnknownExecutor, got {other:?}"),
        },
        other => panic!("expected Submission, got {other:?}"),
    }

    fx.coordinator.terminate().await?;
    Ok(())
}

#[tokio::test]
async fn first_client_stays_registered() -> TestResult {
    init_tracing();
    let fx = FixtureBuilder::new()
        .selector(FakeSelector::new().complete_on_submit(true))
        .build();
    let first = GaswClient::new();
    let second = GaswClient::new();

    fx.coordinator.submit(&first, GaswInput::new("echo")).await?;
    fx.coordinator.submit(&second, GaswInput::new("echo")).await?;

    assert!(common::woken_within(&first, Duration::from_secs(2)).await);
    assert!(!common::woken_within(&second, Duration::from_millis(200)).await);

    fx.coordinator.terminate().await?;
    Ok(())
}
