//! Test data provider: read-only lookup of named fixtures.
//!
//! Credentials, leave applications, search date ranges and expected
//! message strings. Loaded once, immutable, shared across scenarios.
//! Nested lookups that resolve to a missing segment fail hard — a
//! misconfigured fixture must never degrade into an empty expectation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::result::{EnsayoError, EnsayoResult};

/// A credential pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Login username
    pub username: String,
    /// Login password
    pub password: String,
}

/// Valid and invalid credential sets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialSets {
    /// Credentials accepted by the application
    pub valid: Credentials,
    /// Credentials the application must reject
    pub invalid: Credentials,
}

/// One leave application fixture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveApplication {
    /// Leave type as shown in the dropdown (e.g. "CAN - Cancel")
    #[serde(rename = "leaveType")]
    pub leave_type: String,
    /// First day of leave (yyyy-mm-dd)
    #[serde(rename = "fromDate")]
    pub from_date: String,
    /// Last day of leave (yyyy-mm-dd)
    #[serde(rename = "toDate")]
    pub to_date: String,
    /// Optional free-text comment
    #[serde(default)]
    pub comment: Option<String>,
}

/// A from/to date range used by leave search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Range start (yyyy-mm-dd)
    #[serde(rename = "fromDate")]
    pub from_date: String,
    /// Range end (yyyy-mm-dd)
    #[serde(rename = "toDate")]
    pub to_date: String,
}

/// The fixtures document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestData {
    /// Credential sets
    pub credentials: CredentialSets,
    /// Leave application fixtures, keyed by scenario intent
    #[serde(rename = "leaveApplications", default)]
    leave_applications: HashMap<String, LeaveApplication>,
    /// Leave search ranges, keyed by scenario intent
    #[serde(rename = "leaveSearch", default)]
    leave_search: HashMap<String, DateRange>,
    /// Expected message strings, addressed by nested dot path
    #[serde(rename = "expectedMessages", default)]
    expected_messages: serde_json::Value,
}

impl TestData {
    /// Load fixtures from a JSON document
    pub fn from_json_file(path: impl AsRef<Path>) -> EnsayoResult<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Parse fixtures from a JSON string
    pub fn from_json(data: &str) -> EnsayoResult<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// Credentials accepted by the application
    #[must_use]
    pub const fn valid_credentials(&self) -> &Credentials {
        &self.credentials.valid
    }

    /// Credentials the application must reject
    #[must_use]
    pub const fn invalid_credentials(&self) -> &Credentials {
        &self.credentials.invalid
    }

    /// Leave application fixture by key
    pub fn leave_application(&self, key: &str) -> EnsayoResult<&LeaveApplication> {
        self.leave_applications
            .get(key)
            .ok_or_else(|| EnsayoError::FixtureNotFound {
                key: format!("leaveApplications.{key}"),
            })
    }

    /// Leave search date range by key
    pub fn leave_search(&self, key: &str) -> EnsayoResult<&DateRange> {
        self.leave_search
            .get(key)
            .ok_or_else(|| EnsayoError::FixtureNotFound {
                key: format!("leaveSearch.{key}"),
            })
    }

    /// Expected message by nested dot path, e.g. `"login.invalidCredentials"`.
    ///
    /// Any segment that resolves to a missing or non-string value is a
    /// hard `FixtureNotFound`.
    pub fn expected_message(&self, key: &str) -> EnsayoResult<&str> {
        let mut value = &self.expected_messages;
        for segment in key.split('.') {
            value = value.get(segment).ok_or_else(|| EnsayoError::FixtureNotFound {
                key: format!("expectedMessages.{key}"),
            })?;
        }
        value.as_str().ok_or_else(|| EnsayoError::FixtureNotFound {
            key: format!("expectedMessages.{key}"),
        })
    }

    /// Built-in fixtures for the OrangeHRM demo application, backing the
    /// bundled page objects and the integration tests.
    #[must_use]
    pub fn orangehrm_defaults() -> Self {
        serde_json::from_str(DEFAULT_TEST_DATA_JSON)
            .unwrap_or_else(|_| Self {
                credentials: CredentialSets {
                    valid: Credentials {
                        username: "Admin".to_string(),
                        password: "admin123".to_string(),
                    },
                    invalid: Credentials {
                        username: "Admin".to_string(),
                        password: "wrong".to_string(),
                    },
                },
                leave_applications: HashMap::new(),
                leave_search: HashMap::new(),
                expected_messages: serde_json::Value::Null,
            })
    }
}

const DEFAULT_TEST_DATA_JSON: &str = r#"{
  "credentials": {
    "valid": { "username": "Admin", "password": "admin123" },
    "invalid": { "username": "Admin", "password": "wrong" }
  },
  "leaveApplications": {
    "casualLeave": {
      "leaveType": "CAN - Cancel",
      "fromDate": "2025-01-10",
      "toDate": "2025-01-12",
      "comment": "Family function"
    },
    "personalLeave": {
      "leaveType": "CAN - Personal",
      "fromDate": "2025-02-03",
      "toDate": "2025-02-04"
    }
  },
  "leaveSearch": {
    "january": { "fromDate": "2025-01-01", "toDate": "2025-01-31" },
    "casualLeave": { "fromDate": "2025-01-10", "toDate": "2025-01-12" }
  },
  "expectedMessages": {
    "login": {
      "invalidCredentials": "Invalid credentials",
      "emptyUsername": "Required"
    },
    "leave": {
      "applySuccess": "Successfully Saved",
      "noRecords": "No Records Found"
    },
    "leaveStatus": {
      "pending": "Pending Approval",
      "scheduled": "Scheduled",
      "cancelled": "Cancelled"
    }
  }
}"#;
