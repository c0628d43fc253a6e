use reqwest::StatusCode;
use std::fmt::{Display, Formatter};

/// Failure of a complete fetch cycle against the panel.
///
/// Every failure path of the login flow and the two data fetches maps onto
/// one of these variants so the caller can tell "nothing to report" apart
/// from "fetch failed".
#[derive(Debug)]
pub enum FetchError {
    /// Login rejected, CSRF token missing, or the panel did not redirect to
    /// the dashboard after submitting credentials.
    LoginFailed(String),
    /// A data endpoint answered with a non-success status code.
    Http(StatusCode),
    /// A data endpoint answered with a body that is not the expected JSON.
    Decode(String),
    /// The request never completed (connect failure, timeout, TLS, ...).
    Transport(reqwest::Error),
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoginFailed(reason) => write!(f, "login failed: {reason}"),
            Self::Http(status) => write!(f, "unexpected status code {status}"),
            Self::Decode(reason) => write!(f, "failed to decode response: {reason}"),
            Self::Transport(err) => write!(f, "request failed: {err}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}
