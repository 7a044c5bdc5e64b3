//! Blocking HTTP client for the remote fragment fallback.

use thiserror::Error;

/// Transport-level HTTP failure. Status-code failures are not errors: the
/// resolver needs the status to decide on the HTTPS retry.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct HttpError(pub String);

/// Response to a GET request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

pub trait HttpClient: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpResponse, HttpError>;
}

/// [`HttpClient`] backed by `ureq`, using its default timeouts.
pub struct UreqClient;

impl HttpClient for UreqClient {
    fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        match ureq::get(url).call() {
            Ok(response) => {
                let status = response.status();
                let body = response
                    .into_string()
                    .map_err(|err| HttpError(format!("reading body of {url}: {err}")))?;
                Ok(HttpResponse { status, body })
            }
            // Non-2xx responses come back as Status errors; surface them as
            // plain responses so the caller sees the code.
            Err(ureq::Error::Status(status, response)) => Ok(HttpResponse {
                status,
                body: response.into_string().unwrap_or_default(),
            }),
            Err(ureq::Error::Transport(transport)) => {
                Err(HttpError(format!("transport error for {url}: {transport}")))
            }
        }
    }
}
