//! Scenario lifecycle hooks and the runner that drives them.
//!
//! Each scenario moves through `Idle → SessionAcquired → StepsExecuting
//! → Teardown → Idle`. The before hook acquires a session and hands out
//! a [`ScenarioContext`] before any step runs; the after hook captures a
//! failure screenshot when configured and always releases the session,
//! whatever the step body did.

use futures::future::BoxFuture;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::artifact;
use crate::config::RunConfig;
use crate::context::ScenarioContext;
use crate::locator::LocatorStore;
use crate::logging;
use crate::report::{RunReport, ScenarioEntry};
use crate::result::{EnsayoError, EnsayoResult};
use crate::session::{DriverFactory, Session, SessionManager};
use crate::testdata::TestData;

/// Lifecycle phase of the scenario currently owned by a hook set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScenarioPhase {
    /// No scenario in flight
    #[default]
    Idle,
    /// Before hook done, session attached, steps not started
    SessionAcquired,
    /// Step body running
    StepsExecuting,
    /// After hook running
    Teardown,
}

/// Before/after hooks around one scenario at a time.
pub struct ScenarioHooks {
    manager: SessionManager,
    config: Arc<RunConfig>,
    phase: ScenarioPhase,
}

impl std::fmt::Debug for ScenarioHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioHooks")
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl ScenarioHooks {
    /// Create hooks over a driver factory
    #[must_use]
    pub fn new(config: Arc<RunConfig>, factory: Arc<dyn DriverFactory>) -> Self {
        let manager = SessionManager::new(config.browser.clone(), factory);
        Self {
            manager,
            config,
            phase: ScenarioPhase::Idle,
        }
    }

    /// Current lifecycle phase
    #[must_use]
    pub const fn phase(&self) -> ScenarioPhase {
        self.phase
    }

    /// One-time run setup: output directories and log sinks.
    pub fn global_setup(config: &RunConfig) -> EnsayoResult<()> {
        std::fs::create_dir_all(&config.screenshots.path)?;
        std::fs::create_dir_all(&config.reports_path)?;
        logging::init(&config.logging)?;
        tracing::info!(base_url = %config.base_url, "run setup complete");
        Ok(())
    }

    /// One-time run teardown: log completion only.
    pub fn global_teardown(&self) {
        let (acquired, released) = self.manager.balance();
        tracing::info!(acquired, released, "run complete");
    }

    /// Acquire a session for a scenario about to start.
    ///
    /// `InvalidState` if a scenario is already in flight; on acquire
    /// failure the hooks stay `Idle`.
    pub async fn before(&mut self, scenario: &str) -> EnsayoResult<Session> {
        if self.phase != ScenarioPhase::Idle {
            return Err(EnsayoError::InvalidState {
                message: format!("before hook called in phase {:?}", self.phase),
            });
        }
        tracing::info!(scenario, "starting scenario");
        let session = self.manager.acquire().await?;
        self.phase = ScenarioPhase::SessionAcquired;
        Ok(session)
    }

    /// Mark the step body as running
    pub fn steps_started(&mut self) -> EnsayoResult<()> {
        if self.phase != ScenarioPhase::SessionAcquired {
            return Err(EnsayoError::InvalidState {
                message: format!("steps started in phase {:?}", self.phase),
            });
        }
        self.phase = ScenarioPhase::StepsExecuting;
        Ok(())
    }

    /// Finish a scenario: screenshot on failure (when configured), then
    /// release the session unconditionally. Returns the screenshot path
    /// when one was captured; capture errors are logged, never raised.
    pub async fn after(
        &mut self,
        scenario: &str,
        session: Session,
        failure: Option<&EnsayoError>,
    ) -> Option<PathBuf> {
        self.phase = ScenarioPhase::Teardown;
        let mut screenshot = None;
        if let Some(error) = failure {
            tracing::error!(scenario, error = %error, "scenario failed");
            if self.config.screenshots.on_failure {
                screenshot = self.capture_failure(scenario, &session).await;
            }
        }
        self.manager.release(session).await;
        self.phase = ScenarioPhase::Idle;
        screenshot
    }

    async fn capture_failure(&self, scenario: &str, session: &Session) -> Option<PathBuf> {
        let bytes = match session.driver().screenshot().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(scenario, error = %e, "failure screenshot capture failed");
                return None;
            }
        };
        let label = format!("FAILED_{scenario}");
        match artifact::write_screenshot(&self.config.screenshots.path, &label, &bytes) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(scenario, error = %e, "failure screenshot write failed");
                None
            }
        }
    }

    /// Whether every acquired session has been released
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.manager.is_balanced()
    }
}

/// Step body of a scenario: an async closure over the scenario context
pub type ScenarioBody =
    Box<dyn FnOnce(Arc<ScenarioContext>) -> BoxFuture<'static, EnsayoResult<()>> + Send>;

/// Drives the hook state machine around caller-supplied step bodies and
/// records outcomes into the run report.
pub struct ScenarioRunner {
    hooks: ScenarioHooks,
    config: Arc<RunConfig>,
    locators: Arc<LocatorStore>,
    data: Arc<TestData>,
    report: RunReport,
    fail_fast: bool,
    stopped: bool,
}

impl std::fmt::Debug for ScenarioRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioRunner")
            .field("fail_fast", &self.fail_fast)
            .field("stopped", &self.stopped)
            .finish_non_exhaustive()
    }
}

impl ScenarioRunner {
    /// Create a runner with the bundled default locators and fixtures
    #[must_use]
    pub fn new(config: RunConfig, factory: Arc<dyn DriverFactory>) -> Self {
        Self::with_fixtures(
            config,
            factory,
            LocatorStore::orangehrm_defaults(),
            TestData::orangehrm_defaults(),
        )
    }

    /// Create a runner with explicit locators and fixtures
    #[must_use]
    pub fn with_fixtures(
        config: RunConfig,
        factory: Arc<dyn DriverFactory>,
        locators: LocatorStore,
        data: TestData,
    ) -> Self {
        let config = Arc::new(config);
        Self {
            hooks: ScenarioHooks::new(Arc::clone(&config), factory),
            config,
            locators: Arc::new(locators),
            data: Arc::new(data),
            report: RunReport::new(),
            fail_fast: false,
            stopped: false,
        }
    }

    /// Stop running further scenarios after the first failure
    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Run one scenario end to end. Returns whether it passed.
    ///
    /// Setup failures, step failures and fail-fast skips are all
    /// recorded in the report; the session is released in every path
    /// that acquired one.
    pub async fn run_scenario<F>(&mut self, name: &str, body: F) -> bool
    where
        F: FnOnce(Arc<ScenarioContext>) -> BoxFuture<'static, EnsayoResult<()>>,
    {
        if self.stopped {
            self.report.record(ScenarioEntry::skipped(name));
            return false;
        }

        let start = Instant::now();
        let session = match self.hooks.before(name).await {
            Ok(session) => session,
            Err(e) => {
                self.report
                    .record(ScenarioEntry::failed(name, start.elapsed(), e.to_string(), None));
                if self.fail_fast {
                    self.stopped = true;
                }
                return false;
            }
        };

        let context = Arc::new(ScenarioContext::new(
            &session,
            Arc::clone(&self.config),
            Arc::clone(&self.locators),
            Arc::clone(&self.data),
        ));
        if let Err(e) = self.hooks.steps_started() {
            tracing::warn!(scenario = name, error = %e, "lifecycle phase out of step");
        }

        let outcome = body(context).await;
        let screenshot = self.hooks.after(name, session, outcome.as_ref().err()).await;
        let duration = start.elapsed();

        match outcome {
            Ok(()) => {
                self.report.record(ScenarioEntry::passed(name, duration));
                true
            }
            Err(e) => {
                self.report
                    .record(ScenarioEntry::failed(name, duration, e.to_string(), screenshot));
                if self.fail_fast {
                    self.stopped = true;
                }
                false
            }
        }
    }

    /// The report accumulated so far
    #[must_use]
    pub const fn report(&self) -> &RunReport {
        &self.report
    }

    /// Whether every acquired session has been released
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.hooks.is_balanced()
    }

    /// Finish the run: write the JSON report, log the summary, hand the
    /// report back for exit-status derivation.
    pub fn finish(self) -> EnsayoResult<RunReport> {
        self.hooks.global_teardown();
        let path = self.report.write_json(&self.config.reports_path)?;
        tracing::info!(report = %path.display(), "\n{}", self.report.summary());
        Ok(self.report)
    }
}
