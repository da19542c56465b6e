//! End-to-end scenario flows over the mock driver: login, leave
//! application, leave search and the lifecycle guarantees around them.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use ensayo::driver::mock::{ClickEffect, MockDriver};
use ensayo::{
    EnsayoError, EnsayoResult, MockFactory, RunConfig, ScenarioRunner, TestData,
};

const BASE_URL: &str = "http://app.local/";

fn test_config(screenshot_dir: &std::path::Path) -> RunConfig {
    RunConfig::default()
        .with_base_url(BASE_URL)
        .with_default_timeout_ms(200)
        .with_screenshot_path(screenshot_dir)
}

/// Arrange the login view with a submit button that either succeeds
/// (navigates to the dashboard) or rejects (shows the error banner).
fn arrange_login(driver: &MockDriver, accepts: bool) {
    driver.show(".orangehrm-login-slot", "");
    driver.show("input[name='username']", "");
    driver.show("input[name='password']", "");
    driver.show("button[type='submit']", "Login");
    if accepts {
        driver.when_clicked(
            "button[type='submit']",
            vec![
                ClickEffect::Navigate(format!("{BASE_URL}web/index.php/dashboard/index")),
                ClickEffect::Hide(".orangehrm-login-slot".to_string()),
                ClickEffect::Show(
                    ".oxd-topbar-header-breadcrumb > h6".to_string(),
                    "Dashboard".to_string(),
                ),
                ClickEffect::Show(".oxd-main-menu".to_string(), String::new()),
            ],
        );
    } else {
        driver.when_clicked(
            "button[type='submit']",
            vec![ClickEffect::Show(
                ".oxd-alert-content-text".to_string(),
                "Invalid credentials".to_string(),
            )],
        );
    }
}

/// Arrange the apply-leave form. The submit button raises the success
/// toast; the leave-type options resolve after one searching tick.
fn arrange_apply_leave(driver: &MockDriver) {
    driver.show(".oxd-select-text", "-- Select --");
    driver.queue_option_sets(
        "div[role='option'] > span",
        vec![
            vec!["Searching...."],
            vec!["CAN - Cancel", "CAN - Personal"],
        ],
    );
    driver.show(".oxd-date-input input", "");
    driver.show(".oxd-date-wrapper:nth-of-type(2) input", "");
    driver.show("textarea.oxd-textarea", "");
    driver.show("button[type='submit']", "Apply");
    driver.when_clicked(
        "button[type='submit']",
        vec![ClickEffect::Show(
            ".oxd-toast-content--success".to_string(),
            "Success\nSuccessfully Saved".to_string(),
        )],
    );
}

/// Arrange the my-leave table with a single matching record.
fn arrange_leave_records(driver: &MockDriver) {
    driver.show(".oxd-table", "");
    driver.set_list(
        ".oxd-table-body .oxd-table-card .oxd-table-cell:nth-child(2)",
        &["2025-01-10 to 2025-01-12"],
    );
    driver.set_list(
        ".oxd-table-body .oxd-table-card .oxd-table-cell:nth-child(3)",
        &["CAN - Cancel"],
    );
    driver.set_list(
        ".oxd-table-body .oxd-table-card .oxd-table-cell:nth-child(6)",
        &["Pending Approval"],
    );
}

fn fail_step(expectation: &str) -> EnsayoError {
    EnsayoError::StepFailed {
        expectation: expectation.to_string(),
    }
}

#[tokio::test]
async fn test_valid_login_reaches_dashboard() {
    let dir = tempfile::tempdir().unwrap();
    let driver = MockDriver::new();
    arrange_login(&driver, true);
    let factory = Arc::new(MockFactory::new().with_driver(driver));
    let mut runner = ScenarioRunner::new(test_config(dir.path()), factory);

    let passed = runner
        .run_scenario("valid login reaches dashboard", |ctx| {
            Box::pin(async move {
                let login = ctx.login_page();
                login.open().await?;
                login.login(ctx.data().valid_credentials()).await?;
                let header = ctx
                    .dashboard_page()
                    .header_text()
                    .await
                    .map_err(|e| e.into_step_failure("dashboard header should render"))?;
                if !header.contains("Dashboard") {
                    return Err(fail_step("dashboard header should say Dashboard"));
                }
                Ok(())
            })
        })
        .await;

    assert!(passed, "{}", runner.report().summary());
    assert!(runner.is_balanced());
}

#[tokio::test]
async fn test_invalid_login_stays_on_login_view() {
    let dir = tempfile::tempdir().unwrap();
    let driver = MockDriver::new();
    arrange_login(&driver, false);
    let factory = Arc::new(MockFactory::new().with_driver(driver));
    let mut runner = ScenarioRunner::new(test_config(dir.path()), factory);

    let passed = runner
        .run_scenario("invalid login shows error", |ctx| {
            Box::pin(async move {
                let login = ctx.login_page();
                login.open().await?;
                login.login(ctx.data().invalid_credentials()).await?;
                let expected = ctx.data().expected_message("login.invalidCredentials")?.to_string();
                let banner = login
                    .error_message()
                    .await
                    .map_err(|e| e.into_step_failure("error banner should appear"))?;
                if banner != expected {
                    return Err(fail_step("error banner should name invalid credentials"));
                }
                if !login.is_displayed().await {
                    return Err(fail_step("session should stay on the login view"));
                }
                Ok(())
            })
        })
        .await;

    assert!(passed, "{}", runner.report().summary());
    assert!(runner.is_balanced());
}

#[tokio::test]
async fn test_apply_leave_then_find_it_in_my_leave() {
    let dir = tempfile::tempdir().unwrap();
    let driver = MockDriver::new();
    arrange_apply_leave(&driver);
    arrange_leave_records(&driver);
    let factory = Arc::new(MockFactory::new().with_driver(driver));
    let mut runner = ScenarioRunner::new(test_config(dir.path()), factory);

    let passed = runner
        .run_scenario("apply leave and search it back", |ctx| {
            Box::pin(async move {
                let leave = ctx.data().leave_application("casualLeave")?.clone();
                ctx.apply_leave_page().apply(&leave).await?;
                let toast = ctx
                    .apply_leave_page()
                    .success_message()
                    .await
                    .map_err(|e| e.into_step_failure("success toast should appear"))?;
                if !toast.contains("Success") {
                    return Err(fail_step("confirmation should report success"));
                }
                ctx.remember_leave(leave);

                let applied = ctx
                    .applied_leave()
                    .ok_or_else(|| fail_step("applied leave should be captured"))?;
                let range = ctx.data().leave_search("casualLeave")?.clone();
                let my_leave = ctx.my_leave_page();
                my_leave.search(&range).await?;
                let matching = my_leave.records_of_type(&applied.leave_type).await?;
                if matching.is_empty() {
                    return Err(fail_step("search should return the applied leave"));
                }
                if matching[0].status != "Pending Approval" {
                    return Err(fail_step("fresh application should be pending"));
                }
                Ok(())
            })
        })
        .await;

    assert!(passed, "{}", runner.report().summary());
    assert!(runner.is_balanced());
}

#[tokio::test]
async fn test_empty_result_set_reads_as_no_records() {
    let dir = tempfile::tempdir().unwrap();
    // No table container arranged at all
    let factory = Arc::new(MockFactory::new().with_driver(MockDriver::new()));
    let mut runner = ScenarioRunner::new(test_config(dir.path()), factory);

    let passed = runner
        .run_scenario("empty leave list", |ctx| {
            Box::pin(async move {
                let records = ctx.my_leave_page().leave_records().await?;
                if !records.is_empty() {
                    return Err(fail_step("an absent table should read as no records"));
                }
                Ok(())
            })
        })
        .await;

    assert!(passed, "{}", runner.report().summary());
}

#[tokio::test]
async fn test_stuck_dropdown_fails_instead_of_hanging() {
    let driver = MockDriver::new();
    arrange_apply_leave(&driver);
    // The option list never gets past the searching placeholder
    driver.set_list("div[role='option'] > span", &["Searching...."]);
    driver.queue_option_sets("div[role='option'] > span", vec![vec!["Searching...."]]);

    let data = TestData::orangehrm_defaults();
    let leave = data.leave_application("casualLeave").unwrap().clone();
    let actions = ensayo::PageActions::from_driver(
        Arc::new(driver),
        ensayo::Timeouts {
            default_ms: 200,
            navigation_ms: 200,
        },
    );
    let page = ensayo::ApplyLeavePage::new(
        actions,
        Arc::new(ensayo::LocatorStore::orangehrm_defaults()),
    );

    let outcome: EnsayoResult<()> =
        tokio::time::timeout(std::time::Duration::from_secs(10), page.apply(&leave))
            .await
            .expect("dropdown selection must be bounded, not hang");
    match outcome.unwrap_err() {
        EnsayoError::OptionNotFound { expected, observed } => {
            assert_eq!(expected, "CAN - Cancel");
            assert_eq!(observed, vec!["Searching....".to_string()]);
        }
        other => panic!("expected OptionNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_sessions_balance_across_mixed_outcomes() {
    let dir = tempfile::tempdir().unwrap();
    let factory = Arc::new(MockFactory::new());
    let mut runner = ScenarioRunner::new(test_config(dir.path()), Arc::clone(&factory) as _);

    runner
        .run_scenario("passes", |_ctx| Box::pin(async { Ok(()) }))
        .await;
    runner
        .run_scenario("fails", |_ctx| {
            Box::pin(async { Err(fail_step("deliberate failure")) })
        })
        .await;
    runner
        .run_scenario("passes again", |_ctx| Box::pin(async { Ok(()) }))
        .await;

    assert!(runner.is_balanced());
    assert_eq!(runner.report().passed(), 2);
    assert_eq!(runner.report().failed(), 1);
    assert_eq!(runner.report().exit_code(), 1);
    // Every session went through the full page/context/browser teardown
    for driver in factory.created() {
        assert_eq!(driver.closes(), vec!["page", "context", "browser"]);
    }
}

#[tokio::test]
async fn test_repeated_failures_keep_both_screenshots() {
    let dir = tempfile::tempdir().unwrap();
    let factory = Arc::new(MockFactory::new());
    let mut runner = ScenarioRunner::new(test_config(dir.path()), factory);

    for _ in 0..2 {
        runner
            .run_scenario("Apply Leave: happy path", |_ctx| {
                Box::pin(async { Err(fail_step("toast should appear")) })
            })
            .await;
    }

    let shots: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "png"))
        .collect();
    assert_eq!(shots.len(), 2, "both failures must keep their capture");
    assert_ne!(shots[0], shots[1]);

    let entries = runner.report().entries();
    assert_ne!(entries[0].screenshot, entries[1].screenshot);
}

#[tokio::test]
async fn test_finished_run_writes_report_with_screenshot_reference() {
    let dir = tempfile::tempdir().unwrap();
    let config = RunConfig {
        reports_path: dir.path().join("reports"),
        ..test_config(&dir.path().join("shots"))
    };
    let mut runner = ScenarioRunner::new(config, Arc::new(MockFactory::new()));
    runner
        .run_scenario("broken", |_ctx| {
            Box::pin(async { Err(fail_step("nope")) })
        })
        .await;
    let report = runner.finish().unwrap();
    assert_eq!(report.exit_code(), 1);

    let json: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("reports").join("run-report.json")).unwrap(),
    )
    .unwrap();
    let entry = &json["entries"][0];
    assert_eq!(entry["status"], "failed");
    assert!(entry["screenshot"]
        .as_str()
        .unwrap()
        .contains("FAILED_broken"));
}
