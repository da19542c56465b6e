//! Session lifecycle: one browser process, one isolated context, one page,
//! owned by exactly one scenario at a time.
//!
//! Sessions are created fresh per scenario and destroyed at scenario end
//! regardless of outcome. Parallel runners hold one `SessionManager` per
//! worker; nothing here is shared mutable state across scenarios.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use uuid::Uuid;

use crate::config::BrowserSettings;
use crate::driver::mock::MockDriver;
use crate::driver::PageDriver;
use crate::result::EnsayoResult;

/// Produces drivers for new sessions.
///
/// The seam between the session lifecycle and the browser library: tests
/// plug in [`MockFactory`], the `browser` feature plugs in [`CdpFactory`].
#[async_trait]
pub trait DriverFactory: Send + Sync {
    /// Launch a browser and open one page, per the settings
    async fn launch(&self, settings: &BrowserSettings) -> EnsayoResult<Arc<dyn PageDriver>>;
}

/// An isolated browser session: process + context + page.
pub struct Session {
    /// Unique session identity (artifact names, log correlation)
    pub id: Uuid,
    driver: Arc<dyn PageDriver>,
    created_at: Instant,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("age", &self.created_at.elapsed())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// The page driver bound to this session
    #[must_use]
    pub fn driver(&self) -> Arc<dyn PageDriver> {
        Arc::clone(&self.driver)
    }

    /// How long this session has been alive
    #[must_use]
    pub fn age(&self) -> std::time::Duration {
        self.created_at.elapsed()
    }
}

/// Owns the acquire/release lifecycle of browser sessions.
pub struct SessionManager {
    settings: BrowserSettings,
    factory: Arc<dyn DriverFactory>,
    acquired: AtomicUsize,
    released: AtomicUsize,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("engine", &self.settings.name)
            .field("acquired", &self.acquired.load(Ordering::SeqCst))
            .field("released", &self.released.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Create a manager with an explicit driver factory
    #[must_use]
    pub fn new(settings: BrowserSettings, factory: Arc<dyn DriverFactory>) -> Self {
        Self {
            settings,
            factory,
            acquired: AtomicUsize::new(0),
            released: AtomicUsize::new(0),
        }
    }

    /// Acquire a fresh session: launch, isolate, open one page.
    ///
    /// Fails with `Launch` if the process cannot start and `Context` if
    /// context/page setup fails after a started process; in the latter
    /// case the factory has already torn the process down.
    pub async fn acquire(&self) -> EnsayoResult<Session> {
        let driver = self.factory.launch(&self.settings).await.inspect_err(|e| {
            tracing::error!(error = %e, "failed to acquire session");
        })?;
        let session = Session {
            id: Uuid::new_v4(),
            driver,
            created_at: Instant::now(),
        };
        self.acquired.fetch_add(1, Ordering::SeqCst);
        tracing::info!(
            session = %session.id,
            engine = self.settings.name.as_str(),
            headless = self.settings.headless,
            "session acquired"
        );
        Ok(session)
    }

    /// Release a session: close page, then context, then process, in that
    /// order. Each step is independently guarded; teardown failures are
    /// logged and never re-raised, so they cannot mask the scenario's
    /// actual outcome.
    pub async fn release(&self, session: Session) {
        let driver = session.driver;
        if let Err(e) = driver.close_page().await {
            tracing::warn!(session = %session.id, error = %e, "failed to close page");
        }
        if let Err(e) = driver.close_context().await {
            tracing::warn!(session = %session.id, error = %e, "failed to close context");
        }
        if let Err(e) = driver.close_browser().await {
            tracing::warn!(session = %session.id, error = %e, "failed to close browser");
        }
        self.released.fetch_add(1, Ordering::SeqCst);
        tracing::info!(session = %session.id, "session released");
    }

    /// (acquired, released) counters for the 1:1 balance property
    #[must_use]
    pub fn balance(&self) -> (usize, usize) {
        (
            self.acquired.load(Ordering::SeqCst),
            self.released.load(Ordering::SeqCst),
        )
    }

    /// Whether every acquired session has been released
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        let (acquired, released) = self.balance();
        acquired == released
    }

    /// Browser settings this manager launches with
    #[must_use]
    pub const fn settings(&self) -> &BrowserSettings {
        &self.settings
    }
}

/// Factory producing [`MockDriver`] sessions for tests.
///
/// Pre-arranged drivers are handed out in order; once the queue is empty,
/// fresh empty drivers are created. Every driver handed out stays
/// inspectable through [`MockFactory::created`].
#[derive(Debug, Default)]
pub struct MockFactory {
    prepared: Mutex<VecDeque<MockDriver>>,
    created: Mutex<Vec<MockDriver>>,
    fail_launch: Mutex<bool>,
    fail_context: Mutex<bool>,
}

impl MockFactory {
    /// Create an empty factory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a pre-arranged driver for the next launch
    #[must_use]
    pub fn with_driver(self, driver: MockDriver) -> Self {
        self.prepared
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push_back(driver);
        self
    }

    /// Make the next launch fail as if the process never started
    pub fn fail_launch(&self) {
        *self
            .fail_launch
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = true;
    }

    /// Make the next launch fail as if context setup failed after start
    pub fn fail_context(&self) {
        *self
            .fail_context
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = true;
    }

    /// Drivers handed out so far, in order
    #[must_use]
    pub fn created(&self) -> Vec<MockDriver> {
        self.created
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl DriverFactory for MockFactory {
    async fn launch(&self, _settings: &BrowserSettings) -> EnsayoResult<Arc<dyn PageDriver>> {
        if std::mem::take(
            &mut *self
                .fail_launch
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner),
        ) {
            return Err(crate::result::EnsayoError::Launch {
                message: "mock launch failure".to_string(),
            });
        }
        if std::mem::take(
            &mut *self
                .fail_context
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner),
        ) {
            return Err(crate::result::EnsayoError::Context {
                message: "mock context failure".to_string(),
            });
        }
        let driver = self
            .prepared
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(MockDriver::new);
        self.created
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(driver.clone());
        Ok(Arc::new(driver))
    }
}

/// Factory launching real CDP sessions (requires the `browser` feature).
#[cfg(feature = "browser")]
#[derive(Debug, Default)]
pub struct CdpFactory;

#[cfg(feature = "browser")]
#[async_trait]
impl DriverFactory for CdpFactory {
    async fn launch(&self, settings: &BrowserSettings) -> EnsayoResult<Arc<dyn PageDriver>> {
        let driver = crate::driver::cdp::CdpDriver::launch(settings).await?;
        Ok(Arc::new(driver))
    }
}
