//! Session-bound primitive operations.
//!
//! The capability injected into every page object: wait-for-element,
//! click, fill, read-text, visibility checks, dropdown selection and
//! table read-back. Every primitive waits for its element to reach the
//! required state before acting; a wait that runs out of budget fails
//! with `ElementNotFound` and the action is never attempted.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::Timeouts;
use crate::driver::PageDriver;
use crate::locator::{Locator, TableRegion, WaitState};
use crate::result::{EnsayoError, EnsayoResult};
use crate::session::Session;
use crate::wait::{poll_until, WaitOptions};

/// Placeholder shown by autocomplete widgets while results load
pub const SEARCHING_PLACEHOLDER: &str = "Searching....";

/// How many times a dropdown option set is re-polled before giving up
pub const DROPDOWN_RETRY_BUDGET: u32 = 10;

/// Delay between dropdown option polls (ms)
pub const DROPDOWN_POLL_INTERVAL_MS: u64 = 250;

/// Grace timeout for table containers: an invisible container within
/// this window means "no rows", not an error (ms)
pub const TABLE_GRACE_TIMEOUT_MS: u64 = 2_000;

/// One row read back from a table-like region, cells in column order
pub type TableRow = Vec<String>;

/// Primitive UI operations bound to one session.
#[derive(Clone)]
pub struct PageActions {
    driver: Arc<dyn PageDriver>,
    timeouts: Timeouts,
}

impl std::fmt::Debug for PageActions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageActions")
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}

impl PageActions {
    /// Bind primitives to a session
    #[must_use]
    pub fn new(session: &Session, timeouts: Timeouts) -> Self {
        Self {
            driver: session.driver(),
            timeouts,
        }
    }

    /// Bind primitives directly to a driver (tests, custom wiring)
    #[must_use]
    pub fn from_driver(driver: Arc<dyn PageDriver>, timeouts: Timeouts) -> Self {
        Self { driver, timeouts }
    }

    /// The underlying driver
    #[must_use]
    pub fn driver(&self) -> Arc<dyn PageDriver> {
        Arc::clone(&self.driver)
    }

    /// Navigate to a URL
    pub async fn navigate(&self, url: &str) -> EnsayoResult<()> {
        tracing::info!(url, "navigating");
        self.driver.goto(url).await
    }

    /// Current page URL
    pub async fn current_url(&self) -> EnsayoResult<String> {
        self.driver.current_url().await
    }

    /// Wait for an element to reach the locator's wait state, within the
    /// default timeout
    pub async fn wait_for(&self, locator: &Locator) -> EnsayoResult<()> {
        self.wait_for_state(locator, locator.wait_state, None).await
    }

    /// Wait for an element to reach an explicit state within an explicit
    /// timeout (`None` = configured default)
    pub async fn wait_for_state(
        &self,
        locator: &Locator,
        state: WaitState,
        timeout: Option<Duration>,
    ) -> EnsayoResult<()> {
        let timeout = timeout.unwrap_or(Duration::from_millis(self.timeouts.default_ms));
        let selector = locator.selector.clone();
        let driver = Arc::clone(&self.driver);
        poll_until(
            WaitOptions {
                timeout,
                poll_interval: Duration::from_millis(crate::wait::DEFAULT_POLL_INTERVAL_MS),
            },
            move || {
                let driver = Arc::clone(&driver);
                let selector = selector.clone();
                async move {
                    let observed = driver.element_state(&selector).await?;
                    Ok(observed.satisfies(state).then_some(()))
                }
            },
            || EnsayoError::ElementNotFound {
                selector: locator.selector.clone(),
                timeout_ms: timeout.as_millis() as u64,
            },
        )
        .await
    }

    /// Wait, then click
    pub async fn click(&self, locator: &Locator) -> EnsayoResult<()> {
        self.wait_for(locator).await?;
        self.driver.click(&locator.selector).await?;
        tracing::debug!(selector = %locator.selector, "clicked");
        Ok(())
    }

    /// Wait, then clear and type
    pub async fn fill(&self, locator: &Locator, text: &str) -> EnsayoResult<()> {
        self.wait_for(locator).await?;
        self.driver.fill(&locator.selector, text).await?;
        tracing::debug!(selector = %locator.selector, "filled");
        Ok(())
    }

    /// Fill a date input and confirm with Enter (date pickers re-render
    /// on keyboard confirm)
    pub async fn fill_date(&self, locator: &Locator, date: &str) -> EnsayoResult<()> {
        self.fill(locator, date).await?;
        self.driver.press_key("Enter").await
    }

    /// Wait, then read trimmed text content
    pub async fn read_text(&self, locator: &Locator) -> EnsayoResult<String> {
        self.wait_for(locator).await?;
        self.driver.text(&locator.selector).await
    }

    /// Immediate visibility check; driver trouble reads as "not visible"
    pub async fn is_visible(&self, locator: &Locator) -> bool {
        match self.driver.element_state(&locator.selector).await {
            Ok(state) => state.satisfies(WaitState::Visible),
            Err(e) => {
                tracing::warn!(selector = %locator.selector, error = %e, "visibility check failed");
                false
            }
        }
    }

    /// Select a dropdown/autocomplete option by visible text.
    ///
    /// Opens the dropdown, optionally types a filter string, then polls
    /// the option set until the searching placeholder disappears, up to a
    /// fixed retry budget. Fails with `OptionNotFound` carrying the last
    /// observed option set; never hangs.
    pub async fn select_option(
        &self,
        dropdown: &Locator,
        options: &Locator,
        expected: &str,
        filter: Option<&str>,
    ) -> EnsayoResult<()> {
        self.click(dropdown).await?;
        if let Some(text) = filter {
            self.driver.fill(&dropdown.selector, text).await?;
        }

        let budget = Duration::from_millis(u64::from(DROPDOWN_RETRY_BUDGET) * DROPDOWN_POLL_INTERVAL_MS);
        let last_observed: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let observed_in = Arc::clone(&last_observed);
        let driver = Arc::clone(&self.driver);
        let option_selector = options.selector.clone();
        let wanted = expected.to_string();

        let resolved = poll_until(
            WaitOptions {
                timeout: budget,
                poll_interval: Duration::from_millis(DROPDOWN_POLL_INTERVAL_MS),
            },
            move || {
                let driver = Arc::clone(&driver);
                let selector = option_selector.clone();
                let observed = Arc::clone(&observed_in);
                let wanted = wanted.clone();
                async move {
                    let texts = driver.text_all(&selector).await?;
                    *observed.lock().unwrap_or_else(std::sync::PoisonError::into_inner) =
                        texts.clone();
                    let still_searching =
                        texts.is_empty() || texts.iter().any(|t| t.contains(SEARCHING_PLACEHOLDER));
                    if still_searching {
                        return Ok(None);
                    }
                    // Options settled; report whether the target is present
                    Ok(Some(texts.iter().any(|t| t.contains(&wanted))))
                }
            },
            || EnsayoError::OptionNotFound {
                expected: expected.to_string(),
                observed: last_observed
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner)
                    .clone(),
            },
        )
        .await;

        match resolved {
            Ok(true) => {
                self.driver.click_text(&options.selector, expected).await?;
                tracing::info!(option = expected, "selected dropdown option");
                Ok(())
            }
            Ok(false) => Err(EnsayoError::OptionNotFound {
                expected: expected.to_string(),
                observed: self.driver.text_all(&options.selector).await.unwrap_or_default(),
            }),
            Err(e) => Err(e),
        }
    }

    /// Read back a table-like region: one `TableRow` per data row, cells
    /// in the order of `columns`.
    ///
    /// An invisible container within the grace timeout yields an empty
    /// sequence — "no rows" is a valid state, never an error.
    pub async fn read_table(
        &self,
        table: &TableRegion,
        columns: &[&str],
    ) -> EnsayoResult<Vec<TableRow>> {
        let container = Locator::new("container", table.container.clone());
        let grace = Duration::from_millis(TABLE_GRACE_TIMEOUT_MS);
        if self
            .wait_for_state(&container, WaitState::Visible, Some(grace))
            .await
            .is_err()
        {
            tracing::info!(container = %table.container, "table not visible, no rows");
            return Ok(Vec::new());
        }

        let mut column_texts: Vec<Vec<String>> = Vec::with_capacity(columns.len());
        for column in columns {
            let cell = table.cell_selector(column)?;
            let selector = format!("{} {}", table.rows, cell);
            column_texts.push(self.driver.text_all(&selector).await?);
        }

        let row_count = column_texts.iter().map(Vec::len).max().unwrap_or(0);
        let mut rows = Vec::with_capacity(row_count);
        for i in 0..row_count {
            rows.push(
                column_texts
                    .iter()
                    .map(|col| col.get(i).cloned().unwrap_or_default())
                    .collect(),
            );
        }
        Ok(rows)
    }

    /// Capture a full-page screenshot
    pub async fn screenshot(&self) -> EnsayoResult<Vec<u8>> {
        self.driver.screenshot().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::driver::mock::{ClickEffect, MockDriver};

    fn actions(driver: &MockDriver) -> PageActions {
        PageActions::from_driver(
            Arc::new(driver.clone()),
            Timeouts {
                default_ms: 200,
                navigation_ms: 500,
            },
        )
    }

    mod primitive_tests {
        use super::*;

        #[tokio::test]
        async fn test_click_waits_first() {
            let driver = MockDriver::new();
            driver.show_after("button", "Go", Duration::from_millis(30));
            let actions = actions(&driver);
            actions
                .click(&Locator::new("go", "button"))
                .await
                .unwrap();
            assert_eq!(driver.clicks(), vec!["button".to_string()]);
        }

        #[tokio::test]
        async fn test_wait_timeout_prevents_action() {
            let driver = MockDriver::new();
            let actions = actions(&driver);
            let err = actions
                .click(&Locator::new("missing", ".nope"))
                .await
                .unwrap_err();
            match err {
                EnsayoError::ElementNotFound { selector, timeout_ms } => {
                    assert_eq!(selector, ".nope");
                    assert_eq!(timeout_ms, 200);
                }
                other => panic!("expected ElementNotFound, got {other:?}"),
            }
            // The click never reached the driver
            assert!(driver.clicks().is_empty());
        }

        #[tokio::test]
        async fn test_fill_and_read_text() {
            let driver = MockDriver::new();
            driver.show("input", "");
            driver.show("h6", "  Dashboard  ");
            let actions = actions(&driver);
            actions
                .fill(&Locator::new("user", "input"), "Admin")
                .await
                .unwrap();
            assert_eq!(driver.value_of("input").unwrap(), "Admin");
            let text = actions.read_text(&Locator::new("header", "h6")).await.unwrap();
            assert_eq!(text, "Dashboard");
        }

        #[tokio::test]
        async fn test_fill_date_presses_enter() {
            let driver = MockDriver::new();
            driver.show("input.date", "");
            let actions = actions(&driver);
            actions
                .fill_date(&Locator::new("from", "input.date"), "2025-01-10")
                .await
                .unwrap();
            assert_eq!(driver.keys(), vec!["Enter".to_string()]);
        }

        #[tokio::test]
        async fn test_is_visible_never_errors() {
            let driver = MockDriver::new();
            driver.show("a", "x");
            driver.hide("b");
            let actions = actions(&driver);
            assert!(actions.is_visible(&Locator::new("a", "a")).await);
            assert!(!actions.is_visible(&Locator::new("b", "b")).await);
            assert!(!actions.is_visible(&Locator::new("c", "c")).await);
        }

        #[tokio::test]
        async fn test_hidden_wait_satisfied_by_absence() {
            let driver = MockDriver::new();
            let actions = actions(&driver);
            // A spinner that never rendered still satisfies a hidden wait
            let spinner = Locator::new("spinner", ".spinner").with_state(WaitState::Hidden);
            actions.wait_for(&spinner).await.unwrap();
        }
    }

    mod dropdown_tests {
        use super::*;

        fn dropdown() -> (Locator, Locator) {
            (
                Locator::new("dropdown", ".oxd-select-text"),
                Locator::new("options", "div[role='option'] > span"),
            )
        }

        #[tokio::test]
        async fn test_selects_after_searching_resolves() {
            let driver = MockDriver::new();
            driver.show(".oxd-select-text", "-- Select --");
            driver.queue_option_sets(
                "div[role='option'] > span",
                vec![
                    vec!["Searching...."],
                    vec!["CAN - Cancel", "CAN - Personal"],
                ],
            );
            let actions = actions(&driver);
            let (dd, opts) = dropdown();
            actions
                .select_option(&dd, &opts, "CAN - Cancel", None)
                .await
                .unwrap();
            let clicks = driver.clicks();
            assert!(clicks.contains(&"div[role='option'] > span >> text=CAN - Cancel".to_string()));
        }

        #[tokio::test]
        async fn test_option_never_appears_fails_with_observed() {
            let driver = MockDriver::new();
            driver.show(".oxd-select-text", "-- Select --");
            driver.set_list("div[role='option'] > span", &["Alpha", "Beta"]);
            let actions = actions(&driver);
            let (dd, opts) = dropdown();
            let err = actions
                .select_option(&dd, &opts, "Gamma", None)
                .await
                .unwrap_err();
            match err {
                EnsayoError::OptionNotFound { expected, observed } => {
                    assert_eq!(expected, "Gamma");
                    assert_eq!(observed, vec!["Alpha".to_string(), "Beta".to_string()]);
                }
                other => panic!("expected OptionNotFound, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn test_sentinel_never_resolves_exhausts_budget() {
            let driver = MockDriver::new();
            driver.show(".oxd-select-text", "-- Select --");
            driver.set_list("div[role='option'] > span", &["Searching...."]);
            let actions = actions(&driver);
            let (dd, opts) = dropdown();
            let err = actions
                .select_option(&dd, &opts, "Anything", None)
                .await
                .unwrap_err();
            match err {
                EnsayoError::OptionNotFound { observed, .. } => {
                    assert_eq!(observed, vec!["Searching....".to_string()]);
                }
                other => panic!("expected OptionNotFound, got {other:?}"),
            }
        }
    }

    mod table_tests {
        use super::*;
        use std::collections::HashMap;

        fn leave_table() -> TableRegion {
            TableRegion {
                container: ".oxd-table".to_string(),
                rows: ".oxd-table-card".to_string(),
                cells: HashMap::from([
                    ("date".to_string(), 2),
                    ("type".to_string(), 3),
                    ("status".to_string(), 6),
                ]),
            }
        }

        #[tokio::test]
        async fn test_read_rows_in_order() {
            let driver = MockDriver::new();
            driver.show(".oxd-table", "");
            driver.set_list(
                ".oxd-table-card .oxd-table-cell:nth-child(2)",
                &["2025-01-10", "2025-02-03"],
            );
            driver.set_list(
                ".oxd-table-card .oxd-table-cell:nth-child(3)",
                &["CAN - Cancel", "CAN - Personal"],
            );
            driver.set_list(
                ".oxd-table-card .oxd-table-cell:nth-child(6)",
                &["Pending Approval", "Scheduled"],
            );
            let actions = actions(&driver);
            let rows = actions
                .read_table(&leave_table(), &["date", "type", "status"])
                .await
                .unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0], vec!["2025-01-10", "CAN - Cancel", "Pending Approval"]);
            assert_eq!(rows[1], vec!["2025-02-03", "CAN - Personal", "Scheduled"]);
        }

        #[tokio::test]
        async fn test_invisible_container_reads_empty() {
            let driver = MockDriver::new();
            let actions = PageActions::from_driver(
                Arc::new(driver),
                Timeouts {
                    default_ms: 100,
                    navigation_ms: 100,
                },
            );
            let rows = actions
                .read_table(&leave_table(), &["date", "type"])
                .await
                .unwrap();
            assert!(rows.is_empty());
        }

        #[tokio::test]
        async fn test_unknown_column_is_locator_error() {
            let driver = MockDriver::new();
            driver.show(".oxd-table", "");
            let actions = actions(&driver);
            let err = actions
                .read_table(&leave_table(), &["salary"])
                .await
                .unwrap_err();
            assert!(matches!(err, EnsayoError::LocatorMissing { .. }));
        }
    }

    mod navigation_tests {
        use super::*;

        #[tokio::test]
        async fn test_navigate_and_read_url() {
            let driver = MockDriver::new();
            let actions = actions(&driver);
            actions.navigate("http://app.local/login").await.unwrap();
            assert_eq!(actions.current_url().await.unwrap(), "http://app.local/login");
        }

        #[tokio::test]
        async fn test_click_effect_drives_navigation() {
            let driver = MockDriver::new();
            driver.show("button", "Login");
            driver.when_clicked(
                "button",
                vec![ClickEffect::Navigate("/dashboard".to_string())],
            );
            let actions = actions(&driver);
            actions.click(&Locator::new("login", "button")).await.unwrap();
            assert_eq!(actions.current_url().await.unwrap(), "/dashboard");
        }
    }
}
