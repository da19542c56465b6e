//! Scriptable in-memory driver for tests.
//!
//! Models the page as a flat selector map. Tests arrange elements, option
//! lists and click effects up front, run the scenario, then inspect the
//! recorded interactions. Clones share state, so a test can keep a handle
//! while the session owns the driver.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::{ElementState, PageDriver};
use crate::result::{EnsayoError, EnsayoResult};

/// Effect applied to the mock page when a selector is clicked
#[derive(Debug, Clone)]
pub enum ClickEffect {
    /// Make an element visible with the given text
    Show(String, String),
    /// Hide an element
    Hide(String),
    /// Remove an element from the page entirely
    Remove(String),
    /// Change the current URL (simulated navigation)
    Navigate(String),
    /// Replace the text list behind a selector (e.g. table cells)
    SetList(String, Vec<String>),
}

#[derive(Debug, Clone)]
struct MockElement {
    state: ElementState,
    text: String,
    value: String,
    /// Becomes visible once this instant passes (simulated slow render)
    visible_at: Option<Instant>,
}

#[derive(Debug, Default)]
struct MockState {
    url: String,
    elements: HashMap<String, MockElement>,
    /// Multi-element text lists, keyed by selector
    lists: HashMap<String, Vec<String>>,
    /// Queued option sets: each `text_all` call advances the queue until
    /// one entry remains (simulates "Searching...." resolving to options)
    option_queues: HashMap<String, VecDeque<Vec<String>>>,
    click_effects: HashMap<String, Vec<ClickEffect>>,
    clicks: Vec<String>,
    fills: Vec<(String, String)>,
    keys: Vec<String>,
    screenshot_bytes: Vec<u8>,
    closes: Vec<&'static str>,
    fail_close_page: bool,
    fail_screenshot: bool,
}

/// In-memory [`PageDriver`] implementation
#[derive(Debug, Clone, Default)]
pub struct MockDriver {
    state: Arc<Mutex<MockState>>,
}

impl MockDriver {
    /// Create an empty mock page
    #[must_use]
    pub fn new() -> Self {
        let driver = Self::default();
        driver.lock().screenshot_bytes = vec![0x89, b'P', b'N', b'G'];
        driver
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Arrange a visible element with text content
    pub fn show(&self, selector: &str, text: &str) {
        self.lock().elements.insert(
            selector.to_string(),
            MockElement {
                state: ElementState::Visible,
                text: text.to_string(),
                value: String::new(),
                visible_at: None,
            },
        );
    }

    /// Arrange a hidden element
    pub fn hide(&self, selector: &str) {
        self.lock().elements.insert(
            selector.to_string(),
            MockElement {
                state: ElementState::Hidden,
                text: String::new(),
                value: String::new(),
                visible_at: None,
            },
        );
    }

    /// Arrange an element that becomes visible after a delay
    pub fn show_after(&self, selector: &str, text: &str, delay: Duration) {
        self.lock().elements.insert(
            selector.to_string(),
            MockElement {
                state: ElementState::Hidden,
                text: text.to_string(),
                value: String::new(),
                visible_at: Some(Instant::now() + delay),
            },
        );
    }

    /// Remove an element
    pub fn remove(&self, selector: &str) {
        self.lock().elements.remove(selector);
    }

    /// Arrange the text list returned by `text_all`/`count` for a selector
    pub fn set_list(&self, selector: &str, texts: &[&str]) {
        self.lock()
            .lists
            .insert(selector.to_string(), texts.iter().map(ToString::to_string).collect());
    }

    /// Queue successive option sets for a selector: each `text_all` call
    /// advances to the next set, sticking on the last one.
    pub fn queue_option_sets(&self, selector: &str, sets: Vec<Vec<&str>>) {
        let queue = sets
            .into_iter()
            .map(|set| set.into_iter().map(ToString::to_string).collect())
            .collect();
        self.lock().option_queues.insert(selector.to_string(), queue);
    }

    /// Register effects applied whenever a selector is clicked
    pub fn when_clicked(&self, selector: &str, effects: Vec<ClickEffect>) {
        self.lock().click_effects.insert(selector.to_string(), effects);
    }

    /// Make `close_page` fail, for guarded-teardown tests
    pub fn fail_close_page(&self) {
        self.lock().fail_close_page = true;
    }

    /// Make `screenshot` fail
    pub fn fail_screenshot(&self) {
        self.lock().fail_screenshot = true;
    }

    /// Selectors clicked, in order
    #[must_use]
    pub fn clicks(&self) -> Vec<String> {
        self.lock().clicks.clone()
    }

    /// (selector, value) pairs filled, in order
    #[must_use]
    pub fn fills(&self) -> Vec<(String, String)> {
        self.lock().fills.clone()
    }

    /// Keys pressed, in order
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.lock().keys.clone()
    }

    /// Teardown calls observed, in order ("page", "context", "browser")
    #[must_use]
    pub fn closes(&self) -> Vec<&'static str> {
        self.lock().closes.clone()
    }

    /// Last value filled into a selector, if any
    #[must_use]
    pub fn value_of(&self, selector: &str) -> Option<String> {
        self.lock().elements.get(selector).map(|e| e.value.clone())
    }

    fn apply_effects(state: &mut MockState, selector: &str) {
        let Some(effects) = state.click_effects.get(selector).cloned() else {
            return;
        };
        for effect in effects {
            match effect {
                ClickEffect::Show(sel, text) => {
                    state.elements.insert(
                        sel,
                        MockElement {
                            state: ElementState::Visible,
                            text,
                            value: String::new(),
                            visible_at: None,
                        },
                    );
                }
                ClickEffect::Hide(sel) => {
                    if let Some(element) = state.elements.get_mut(&sel) {
                        element.state = ElementState::Hidden;
                        element.visible_at = None;
                    }
                }
                ClickEffect::Remove(sel) => {
                    state.elements.remove(&sel);
                }
                ClickEffect::Navigate(url) => {
                    state.url = url;
                }
                ClickEffect::SetList(sel, texts) => {
                    state.lists.insert(sel, texts);
                }
            }
        }
    }

    fn observe(element: &MockElement) -> ElementState {
        match element.visible_at {
            Some(at) if Instant::now() >= at => ElementState::Visible,
            Some(_) => ElementState::Hidden,
            None => element.state,
        }
    }
}

#[async_trait]
impl PageDriver for MockDriver {
    async fn goto(&self, url: &str) -> EnsayoResult<()> {
        self.lock().url = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> EnsayoResult<String> {
        Ok(self.lock().url.clone())
    }

    async fn element_state(&self, selector: &str) -> EnsayoResult<ElementState> {
        let state = self.lock();
        if let Some(element) = state.elements.get(selector) {
            return Ok(Self::observe(element));
        }
        // A non-empty list behind the selector counts as visible content
        let has_list = state.lists.get(selector).is_some_and(|l| !l.is_empty())
            || state.option_queues.contains_key(selector);
        Ok(if has_list {
            ElementState::Visible
        } else {
            ElementState::Missing
        })
    }

    async fn click(&self, selector: &str) -> EnsayoResult<()> {
        let mut state = self.lock();
        if !state.elements.contains_key(selector)
            && !state.lists.contains_key(selector)
            && !state.click_effects.contains_key(selector)
        {
            return Err(EnsayoError::Driver {
                message: format!("click target not on page: {selector}"),
            });
        }
        state.clicks.push(selector.to_string());
        Self::apply_effects(&mut state, selector);
        Ok(())
    }

    async fn click_text(&self, selector: &str, text: &str) -> EnsayoResult<()> {
        let mut state = self.lock();
        let current: Vec<String> = if let Some(queue) = state.option_queues.get(selector) {
            queue.front().cloned().unwrap_or_default()
        } else {
            state.lists.get(selector).cloned().unwrap_or_default()
        };
        if !current.iter().any(|t| t.contains(text)) {
            return Err(EnsayoError::Driver {
                message: format!("no option containing {text:?} under {selector}"),
            });
        }
        let key = format!("{selector} >> text={text}");
        state.clicks.push(key.clone());
        Self::apply_effects(&mut state, &key);
        Ok(())
    }

    async fn fill(&self, selector: &str, text: &str) -> EnsayoResult<()> {
        let mut state = self.lock();
        let Some(element) = state.elements.get_mut(selector) else {
            return Err(EnsayoError::Driver {
                message: format!("fill target not on page: {selector}"),
            });
        };
        element.value = text.to_string();
        state.fills.push((selector.to_string(), text.to_string()));
        Ok(())
    }

    async fn press_key(&self, key: &str) -> EnsayoResult<()> {
        self.lock().keys.push(key.to_string());
        Ok(())
    }

    async fn text(&self, selector: &str) -> EnsayoResult<String> {
        let state = self.lock();
        state
            .elements
            .get(selector)
            .map(|e| e.text.trim().to_string())
            .ok_or_else(|| EnsayoError::Driver {
                message: format!("no element for text: {selector}"),
            })
    }

    async fn text_all(&self, selector: &str) -> EnsayoResult<Vec<String>> {
        let mut state = self.lock();
        if let Some(queue) = state.option_queues.get_mut(selector) {
            let set = if queue.len() > 1 {
                queue.pop_front().unwrap_or_default()
            } else {
                queue.front().cloned().unwrap_or_default()
            };
            return Ok(set);
        }
        if let Some(list) = state.lists.get(selector) {
            return Ok(list.clone());
        }
        Ok(state
            .elements
            .get(selector)
            .filter(|e| Self::observe(e) == ElementState::Visible)
            .map(|e| vec![e.text.trim().to_string()])
            .unwrap_or_default())
    }

    async fn count(&self, selector: &str) -> EnsayoResult<usize> {
        Ok(self.text_all(selector).await?.len())
    }

    async fn screenshot(&self) -> EnsayoResult<Vec<u8>> {
        let state = self.lock();
        if state.fail_screenshot {
            return Err(EnsayoError::Screenshot {
                message: "mock screenshot failure".to_string(),
            });
        }
        Ok(state.screenshot_bytes.clone())
    }

    async fn close_page(&self) -> EnsayoResult<()> {
        let mut state = self.lock();
        if state.fail_close_page {
            return Err(EnsayoError::Driver {
                message: "mock page close failure".to_string(),
            });
        }
        state.closes.push("page");
        Ok(())
    }

    async fn close_context(&self) -> EnsayoResult<()> {
        self.lock().closes.push("context");
        Ok(())
    }

    async fn close_browser(&self) -> EnsayoResult<()> {
        self.lock().closes.push("browser");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_show_then_observe() {
        let driver = MockDriver::new();
        driver.show("h6", "Dashboard");
        assert_eq!(driver.element_state("h6").await.unwrap(), ElementState::Visible);
        assert_eq!(driver.text("h6").await.unwrap(), "Dashboard");
        assert_eq!(driver.element_state(".gone").await.unwrap(), ElementState::Missing);
    }

    #[tokio::test]
    async fn test_show_after_delay() {
        let driver = MockDriver::new();
        driver.show_after(".toast", "Saved", Duration::from_millis(30));
        assert_eq!(driver.element_state(".toast").await.unwrap(), ElementState::Hidden);
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(driver.element_state(".toast").await.unwrap(), ElementState::Visible);
    }

    #[tokio::test]
    async fn test_click_effects_mutate_page() {
        let driver = MockDriver::new();
        driver.show("button", "Login");
        driver.when_clicked(
            "button",
            vec![
                ClickEffect::Show(".header".to_string(), "Dashboard".to_string()),
                ClickEffect::Navigate("/dashboard".to_string()),
            ],
        );
        driver.click("button").await.unwrap();
        assert_eq!(driver.text(".header").await.unwrap(), "Dashboard");
        assert_eq!(driver.current_url().await.unwrap(), "/dashboard");
        assert_eq!(driver.clicks(), vec!["button".to_string()]);
    }

    #[tokio::test]
    async fn test_option_queue_advances_and_sticks() {
        let driver = MockDriver::new();
        driver.queue_option_sets(
            ".option",
            vec![vec!["Searching...."], vec!["Alpha", "Beta"]],
        );
        assert_eq!(driver.text_all(".option").await.unwrap(), vec!["Searching...."]);
        assert_eq!(driver.text_all(".option").await.unwrap(), vec!["Alpha", "Beta"]);
        assert_eq!(driver.text_all(".option").await.unwrap(), vec!["Alpha", "Beta"]);
    }

    #[tokio::test]
    async fn test_fill_requires_element() {
        let driver = MockDriver::new();
        assert!(driver.fill("input", "x").await.is_err());
        driver.show("input", "");
        driver.fill("input", "Admin").await.unwrap();
        assert_eq!(driver.value_of("input").unwrap(), "Admin");
    }

    #[tokio::test]
    async fn test_close_ordering_recorded() {
        let driver = MockDriver::new();
        driver.close_page().await.unwrap();
        driver.close_context().await.unwrap();
        driver.close_browser().await.unwrap();
        assert_eq!(driver.closes(), vec!["page", "context", "browser"]);
    }
}
