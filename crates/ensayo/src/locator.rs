//! Locator store: symbolic names to UI selectors.
//!
//! One configuration document maps logical names to selector strings per
//! page / feature area. Loaded once, read-only thereafter, shared across
//! all page objects. Missing names are hard errors so a typo in the store
//! fails loudly instead of waiting on an empty selector.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::result::{EnsayoError, EnsayoResult};

/// Element state to wait for before acting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitState {
    /// Present in the DOM and visible (default)
    #[default]
    Visible,
    /// Present in the DOM but not visible
    Hidden,
    /// Present in the DOM, visibility irrelevant
    Attached,
}

/// A named reference to a UI element's selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    /// Logical name within its page section
    pub name: String,
    /// Selector string (CSS or XPath, as the driver accepts it)
    pub selector: String,
    /// State the element must reach before an action runs
    pub wait_state: WaitState,
}

impl Locator {
    /// Create a locator with the default (visible) wait state
    #[must_use]
    pub fn new(name: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selector: selector.into(),
            wait_state: WaitState::default(),
        }
    }

    /// Set the wait state
    #[must_use]
    pub fn with_state(mut self, state: WaitState) -> Self {
        self.wait_state = state;
        self
    }
}

/// Serialized form of a locator: either a bare selector string or an
/// object carrying an explicit wait state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum LocatorDef {
    Selector(String),
    Detailed {
        selector: String,
        #[serde(default)]
        state: WaitState,
    },
}

/// A table-like UI region: container, row selector, and the fixed cell
/// position (1-based) of each named column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRegion {
    /// Selector for the table container
    pub container: String,
    /// Selector matching each data row
    pub rows: String,
    /// Column name to 1-based cell position
    pub cells: HashMap<String, usize>,
}

impl TableRegion {
    /// Selector for one named cell within a row
    pub fn cell_selector(&self, column: &str) -> EnsayoResult<String> {
        let position = self.cells.get(column).ok_or_else(|| EnsayoError::LocatorMissing {
            page: self.container.clone(),
            name: column.to_string(),
        })?;
        Ok(format!(".oxd-table-cell:nth-child({position})"))
    }
}

/// Locators for one page / feature area
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageLocators {
    #[serde(flatten)]
    entries: HashMap<String, LocatorDef>,
    /// Table regions, keyed by logical name
    #[serde(default, rename = "$tables")]
    tables: HashMap<String, TableRegion>,
}

impl PageLocators {
    fn get(&self, page: &str, name: &str) -> EnsayoResult<Locator> {
        let def = self.entries.get(name).ok_or_else(|| EnsayoError::LocatorMissing {
            page: page.to_string(),
            name: name.to_string(),
        })?;
        Ok(match def {
            LocatorDef::Selector(selector) => Locator::new(name, selector.clone()),
            LocatorDef::Detailed { selector, state } => {
                Locator::new(name, selector.clone()).with_state(*state)
            }
        })
    }
}

/// The full store: one section per page / feature area.
///
/// Immutable after load; scenarios share it behind an `Arc` without
/// locking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocatorStore {
    #[serde(flatten)]
    sections: HashMap<String, PageLocators>,
}

impl LocatorStore {
    /// Load the store from a JSON document
    pub fn from_json_file(path: impl AsRef<Path>) -> EnsayoResult<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Parse the store from a JSON string
    pub fn from_json(data: &str) -> EnsayoResult<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// Look up a locator by page section and logical name
    pub fn get(&self, page: &str, name: &str) -> EnsayoResult<Locator> {
        let section = self.sections.get(page).ok_or_else(|| EnsayoError::LocatorMissing {
            page: page.to_string(),
            name: name.to_string(),
        })?;
        section.get(page, name)
    }

    /// Look up a table region by page section and logical name
    pub fn table(&self, page: &str, name: &str) -> EnsayoResult<&TableRegion> {
        self.sections
            .get(page)
            .and_then(|s| s.tables.get(name))
            .ok_or_else(|| EnsayoError::LocatorMissing {
                page: page.to_string(),
                name: name.to_string(),
            })
    }

    /// Page sections present in the store
    #[must_use]
    pub fn sections(&self) -> Vec<&str> {
        self.sections.keys().map(String::as_str).collect()
    }

    /// Built-in locator document for the OrangeHRM demo application.
    /// Suites normally load their own store; this one backs the bundled
    /// page objects and the integration tests.
    #[must_use]
    pub fn orangehrm_defaults() -> Self {
        serde_json::from_str(DEFAULT_LOCATORS_JSON).unwrap_or_default()
    }
}

const DEFAULT_LOCATORS_JSON: &str = r##"{
  "loginPage": {
    "loginPanel": ".orangehrm-login-slot",
    "usernameInput": "input[name='username']",
    "passwordInput": "input[name='password']",
    "loginButton": "button[type='submit']",
    "errorMessage": ".oxd-alert-content-text"
  },
  "dashboardPage": {
    "dashboardHeader": ".oxd-topbar-header-breadcrumb > h6",
    "mainMenuItems": ".oxd-main-menu",
    "leaveMenu": "a[href*='leave/viewLeaveModule']",
    "adminMenu": "a[href*='admin/viewAdminModule']",
    "timeMenu": "a[href*='time/viewTimeModule']",
    "recruitmentMenu": "a[href*='recruitment/viewRecruitmentModule']",
    "userDropdown": ".oxd-userdropdown-tab",
    "logoutOption": "a[href*='logout']"
  },
  "leaveMenu": {
    "applyLink": "a[href*='applyLeave']",
    "myLeaveLink": "a[href*='viewMyLeaveList']"
  },
  "adminPage": {
    "pageHeader": ".oxd-topbar-header-breadcrumb > h6",
    "usernameInput": ".oxd-input-group input.oxd-input",
    "searchButton": "button[type='submit']",
    "$tables": {
      "userRecords": {
        "container": ".oxd-table",
        "rows": ".oxd-table-body .oxd-table-card",
        "cells": { "username": 2, "role": 3, "status": 5 }
      }
    }
  },
  "applyLeavePage": {
    "pageHeader": ".oxd-text--h6",
    "leaveTypeDropdown": ".oxd-select-text",
    "leaveTypeOptions": "div[role='option'] > span",
    "fromDateInput": ".oxd-date-input input",
    "toDateInput": ".oxd-date-wrapper:nth-of-type(2) input",
    "commentsTextarea": "textarea.oxd-textarea",
    "applyButton": "button[type='submit']",
    "successToast": { "selector": ".oxd-toast-content--success", "state": "visible" }
  },
  "myLeavePage": {
    "pageHeader": ".oxd-table-filter-title",
    "fromDateInput": ".oxd-date-input input",
    "toDateInput": ".oxd-date-wrapper:nth-of-type(2) input",
    "searchButton": "button[type='submit']",
    "$tables": {
      "leaveRecords": {
        "container": ".oxd-table",
        "rows": ".oxd-table-body .oxd-table-card",
        "cells": { "date": 2, "type": 3, "status": 6 }
      }
    }
  },
  "recruitmentPage": {
    "addButton": "button.oxd-button--secondary",
    "jobTitleDropdown": ".oxd-select-text",
    "dropdownOptions": "div[role='option'] > span",
    "vacancyNameInput": ".oxd-grid-item input.oxd-input",
    "hiringManagerInput": ".oxd-autocomplete-text-input input",
    "autocompleteOptions": ".oxd-autocomplete-option > span",
    "searchButton": "button[type='submit']",
    "saveButton": "button[type='submit']",
    "$tables": {
      "vacancyRecords": {
        "container": ".oxd-table",
        "rows": ".oxd-table-body .oxd-table-card",
        "cells": { "vacancy": 2, "jobTitle": 3, "status": 6 }
      }
    }
  },
  "timesheetPage": {
    "timesheetHeader": ".orangehrm-timesheet-header",
    "timesheetsSubmenu": "li.oxd-topbar-body-nav-tab:nth-child(1)",
    "myTimesheetsLink": "a[href*='viewMyTimesheet']",
    "editButton": "button.oxd-button--ghost",
    "addRowButton": ".orangehrm-timesheet-footer button",
    "projectInput": ".oxd-autocomplete-text-input input",
    "projectOptions": ".oxd-autocomplete-option > span",
    "activityDropdown": ".oxd-select-text",
    "activityOptions": "div[role='option'] > span",
    "hoursInputs": ".orangehrm-timesheet-table input.oxd-input",
    "saveButton": "button[type='submit']",
    "loadingSpinner": { "selector": ".oxd-loading-spinner", "state": "hidden" }
  },
  "common": {
    "toast": ".oxd-toast-content",
    "toastClose": ".oxd-toast-close",
    "loadingSpinner": { "selector": ".oxd-loading-spinner", "state": "hidden" }
  }
}"##;
