//! Username-availability boundary.
//!
//! The wizard invokes the check on demand, never on every keystroke.
//! Results are applied through the controller's request-id guard, so only
//! the latest check's outcome is honored.

use tracing::warn;

pub trait UsernameDirectory {
    /// Returns whether the username is free to register.
    fn check(&self, username: &str) -> Result<bool, String>;
}

/// Directory backed by an HTTP endpoint that answers
/// `GET {endpoint}?username=...` with a JSON boolean.
pub struct HttpUsernameDirectory {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpUsernameDirectory {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl UsernameDirectory for HttpUsernameDirectory {
    fn check(&self, username: &str) -> Result<bool, String> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("username", username)])
            .send()
            .map_err(|e| {
                warn!(error = %e, "username check request failed");
                e.to_string()
            })?;
        if !response.status().is_success() {
            return Err(format!("directory answered {}", response.status()));
        }
        response.json::<bool>().map_err(|e| e.to_string())
    }
}

/// Offline directory used when no endpoint is configured: usernames
/// containing "taken" are reported unavailable.
pub struct StubUsernameDirectory;

impl UsernameDirectory for StubUsernameDirectory {
    fn check(&self, username: &str) -> Result<bool, String> {
        Ok(!username.to_lowercase().contains("taken"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stub_flags_taken_usernames() {
        let directory = StubUsernameDirectory;
        assert_eq!(directory.check("ada_l"), Ok(true));
        assert_eq!(directory.check("already_TAKEN_42"), Ok(false));
    }
}
