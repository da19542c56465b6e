//! Login page.

use std::sync::Arc;

use crate::actions::PageActions;
use crate::locator::LocatorStore;
use crate::result::EnsayoResult;
use crate::testdata::Credentials;

use super::PageObject;

/// The application's login view
#[derive(Debug)]
pub struct LoginPage {
    actions: PageActions,
    locators: Arc<LocatorStore>,
    base_url: String,
}

impl PageObject for LoginPage {
    const SECTION: &'static str = "loginPage";

    fn actions(&self) -> &PageActions {
        &self.actions
    }

    fn locators(&self) -> &LocatorStore {
        &self.locators
    }
}

impl LoginPage {
    /// Bind the page to a session
    #[must_use]
    pub fn new(actions: PageActions, locators: Arc<LocatorStore>, base_url: String) -> Self {
        Self {
            actions,
            locators,
            base_url,
        }
    }

    /// Navigate to the login view and wait for it to render
    pub async fn open(&self) -> EnsayoResult<()> {
        self.actions.navigate(&self.base_url).await?;
        self.actions.wait_for(&self.locator("loginPanel")?).await
    }

    /// Fill both credential fields and submit
    pub async fn login(&self, credentials: &Credentials) -> EnsayoResult<()> {
        self.actions
            .fill(&self.locator("usernameInput")?, &credentials.username)
            .await?;
        self.actions
            .fill(&self.locator("passwordInput")?, &credentials.password)
            .await?;
        self.actions.click(&self.locator("loginButton")?).await
    }

    /// Error banner text after a rejected login
    pub async fn error_message(&self) -> EnsayoResult<String> {
        self.actions.read_text(&self.locator("errorMessage")?).await
    }

    /// Whether the login view is currently shown
    pub async fn is_displayed(&self) -> bool {
        match self.locator("loginPanel") {
            Ok(panel) => self.actions.is_visible(&panel).await,
            Err(_) => false,
        }
    }
}
