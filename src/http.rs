use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    pub(crate) connect_timeout: Duration,
    pub(crate) read_timeout: Duration,
    pub(crate) attempts: usize,
    pub(crate) retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(3),
            read_timeout: Duration::from_secs(6),
            attempts: 3,
            retry_delay: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum HttpError {
    #[error("HTTP status {status}{}", body_suffix(.body))]
    Status { status: u16, body: String },
    #[error("request failed after {attempts} attempt(s): {last}")]
    Exhausted { attempts: usize, last: String },
    #[error("response decode failed: {0}")]
    Decode(#[source] std::io::Error),
}

fn body_suffix(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(" ({body})")
    }
}

fn should_retry_http_status(status: u16) -> bool {
    status == 408 || status == 429 || (500..=599).contains(&status)
}

fn read_body(response: ureq::Response) -> String {
    let body = response.into_string().ok().unwrap_or_default();
    body.trim().chars().take(240).collect()
}

/// GETs `url`, retrying timeouts, throttling and server errors.
pub(crate) fn get_text_with_retries(url: &str, policy: &RetryPolicy) -> Result<String, HttpError> {
    let attempts = policy.attempts.max(1);
    let agent = ureq::AgentBuilder::new()
        .timeout_connect(policy.connect_timeout)
        .timeout_read(policy.read_timeout)
        .timeout_write(policy.read_timeout)
        .build();

    let mut last = String::from("no attempt made");
    for attempt in 1..=attempts {
        debug!(url, attempt, "requesting guide");
        match agent.get(url).set("Accept", "application/json").call() {
            Ok(response) => return response.into_string().map_err(HttpError::Decode),
            Err(ureq::Error::Status(status, response)) => {
                let err = HttpError::Status {
                    status,
                    body: read_body(response),
                };
                if !should_retry_http_status(status) {
                    return Err(err);
                }
                last = err.to_string();
            }
            Err(ureq::Error::Transport(err)) => {
                last = format!("transport error: {err}");
            }
        }

        if attempt < attempts {
            warn!(url, attempt, error = %last, "guide request failed, retrying");
            thread::sleep(policy.retry_delay);
        }
    }

    Err(HttpError::Exhausted { attempts, last })
}
