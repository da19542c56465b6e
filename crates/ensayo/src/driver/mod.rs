//! Browser driver seam.
//!
//! Page objects never talk to a browser library directly; they go through
//! the [`PageDriver`] trait. The `browser` feature provides a CDP-backed
//! implementation (chromiumoxide); the always-available [`mock`] driver
//! backs unit and integration tests without a browser process.

use async_trait::async_trait;

use crate::locator::WaitState;
use crate::result::EnsayoResult;

pub mod mock;

#[cfg(feature = "browser")]
pub mod cdp;

/// Observable state of an element on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementState {
    /// Not present in the DOM
    Missing,
    /// Present but not visible
    Hidden,
    /// Present and visible
    Visible,
}

impl ElementState {
    /// Whether this state satisfies a requested wait state.
    ///
    /// `Hidden` waits are satisfied by an absent element as well; waiting
    /// for a spinner to go away must not fail when it never appeared.
    #[must_use]
    pub const fn satisfies(&self, wanted: WaitState) -> bool {
        match wanted {
            WaitState::Visible => matches!(self, Self::Visible),
            WaitState::Hidden => matches!(self, Self::Hidden | Self::Missing),
            WaitState::Attached => matches!(self, Self::Hidden | Self::Visible),
        }
    }
}

/// Low-level page operations over one browser page.
///
/// Implementations are sequential per scenario; no overlapping in-flight
/// actions cross this trait.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate to a URL and wait for the document to load
    async fn goto(&self, url: &str) -> EnsayoResult<()>;

    /// Current page URL
    async fn current_url(&self) -> EnsayoResult<String>;

    /// Observe the state of the first element matching `selector`
    async fn element_state(&self, selector: &str) -> EnsayoResult<ElementState>;

    /// Click the first element matching `selector`
    async fn click(&self, selector: &str) -> EnsayoResult<()>;

    /// Click the first element matching `selector` whose text content
    /// contains `text` (dropdown/autocomplete option selection)
    async fn click_text(&self, selector: &str, text: &str) -> EnsayoResult<()>;

    /// Clear and type into the first element matching `selector`
    async fn fill(&self, selector: &str, text: &str) -> EnsayoResult<()>;

    /// Press a keyboard key (e.g. "Enter") on the focused element
    async fn press_key(&self, key: &str) -> EnsayoResult<()>;

    /// Trimmed text content of the first element matching `selector`
    async fn text(&self, selector: &str) -> EnsayoResult<String>;

    /// Trimmed text content of every element matching `selector`, in
    /// document order
    async fn text_all(&self, selector: &str) -> EnsayoResult<Vec<String>>;

    /// Number of elements matching `selector`
    async fn count(&self, selector: &str) -> EnsayoResult<usize>;

    /// Capture a full-page PNG screenshot
    async fn screenshot(&self) -> EnsayoResult<Vec<u8>>;

    /// Close the page. Guarded teardown step one.
    async fn close_page(&self) -> EnsayoResult<()>;

    /// Close the isolated context. Guarded teardown step two.
    async fn close_context(&self) -> EnsayoResult<()>;

    /// Close the browser process. Guarded teardown step three.
    async fn close_browser(&self) -> EnsayoResult<()>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_satisfies_only_visible_and_attached() {
        assert!(ElementState::Visible.satisfies(WaitState::Visible));
        assert!(ElementState::Visible.satisfies(WaitState::Attached));
        assert!(!ElementState::Visible.satisfies(WaitState::Hidden));
    }

    #[test]
    fn test_missing_satisfies_hidden() {
        assert!(ElementState::Missing.satisfies(WaitState::Hidden));
        assert!(!ElementState::Missing.satisfies(WaitState::Attached));
        assert!(!ElementState::Missing.satisfies(WaitState::Visible));
    }

    #[test]
    fn test_hidden_satisfies_hidden_and_attached() {
        assert!(ElementState::Hidden.satisfies(WaitState::Hidden));
        assert!(ElementState::Hidden.satisfies(WaitState::Attached));
        assert!(!ElementState::Hidden.satisfies(WaitState::Visible));
    }
}
