//! Face verification client.
//!
//! `GET {base}/recognize`, one request per doorbell press, no retries.
//! The server answers 200 with a JSON verdict:
//!
//! ```json
//! { "recognized": true, "name": "Alice", "confidence": 82 }
//! { "recognized": false, "name": "Unknown", "confidence": 0, "error": "No face detected" }
//! ```
//!
//! Missing fields take neutral defaults (`false`, `""`, `0`).

use serde::Deserialize;

use crate::app::access::Verdict;
use crate::app::ports::{BiometricPort, HttpClient};
use crate::error::CommsError;

/// Tunnelling proxies in front of the server interpose a browser warning
/// page unless this header is present.
const TUNNEL_HEADER: (&str, &str) = ("ngrok-skip-browser-warning", "true");

#[derive(Debug, Deserialize)]
struct VerdictWire {
    #[serde(default)]
    recognized: bool,
    #[serde(default)]
    name: String,
    #[serde(default)]
    confidence: f64,
    #[serde(default)]
    error: Option<String>,
}

impl From<VerdictWire> for Verdict {
    fn from(w: VerdictWire) -> Self {
        Self {
            recognized: w.recognized,
            name: w.name,
            confidence: w.confidence as i32,
            error: w.error,
        }
    }
}

/// Parse a 200 response body.
pub fn parse_verdict(body: &[u8]) -> Result<Verdict, CommsError> {
    serde_json::from_slice::<VerdictWire>(body)
        .map(Verdict::from)
        .map_err(|_| CommsError::MalformedPayload)
}

pub struct VerdictClient<H> {
    http: H,
    endpoint: String,
}

impl<H: HttpClient> VerdictClient<H> {
    pub fn new(http: H, base_url: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}/recognize", base_url.trim_end_matches('/')),
        }
    }
}

impl<H: HttpClient> BiometricPort for VerdictClient<H> {
    fn request_verdict(&mut self) -> Result<Verdict, CommsError> {
        let response = self.http.get(&self.endpoint, &[TUNNEL_HEADER])?;
        if response.status != 200 {
            return Err(CommsError::HttpStatus(response.status));
        }
        parse_verdict(&response.body)
    }
}
