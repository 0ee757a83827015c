//! Final submission boundary.
//!
//! The controller hands over a fully-validated record; what happens to it
//! is outside the wizard's scope. The draft is only cleared after the
//! collaborator reports success.

use tracing::info;

use crate::domain::ApplicationRecord;

pub trait SubmissionClient {
    fn submit(&self, record: &ApplicationRecord) -> Result<(), String>;
}

/// Posts the record as JSON to an HTTP endpoint.
pub struct HttpSubmissionClient {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpSubmissionClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl SubmissionClient for HttpSubmissionClient {
    fn submit(&self, record: &ApplicationRecord) -> Result<(), String> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(record)
            .send()
            .map_err(|e| e.to_string())?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(format!("server answered {}", response.status()))
        }
    }
}

/// Accepts every submission and logs it. Used when no endpoint is
/// configured so the wizard can be exercised end to end.
pub struct LoggingSubmissionClient;

impl SubmissionClient for LoggingSubmissionClient {
    fn submit(&self, record: &ApplicationRecord) -> Result<(), String> {
        info!(
            applicant = %format!(
                "{} {}",
                record.personal_info.first_name, record.personal_info.last_name
            ),
            email = %record.personal_info.email,
            "application submitted"
        );
        Ok(())
    }
}
