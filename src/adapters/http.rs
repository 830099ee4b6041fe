//! ESP-IDF HTTP client adapter.
//!
//! Implements [`HttpClient`] over `esp_idf_svc::http::client::EspHttpConnection`.
//! One connection per request; TLS servers are verified against the
//! ESP-IDF certificate bundle. No timeout unless one is configured.

use core::time::Duration;

use esp_idf_svc::http::Method;
use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
use esp_idf_svc::sys::{ESP_ERR_HTTP_EAGAIN, ESP_ERR_TIMEOUT, EspError};
use log::{debug, warn};

use crate::app::ports::{HttpClient, HttpResponse};
use crate::error::CommsError;

/// Largest body kept; chat polls are the biggest responses.
const MAX_BODY: usize = 16 * 1024;

pub struct EspHttpClient {
    timeout: Option<Duration>,
}

impl EspHttpClient {
    pub fn new(timeout_ms: Option<u32>) -> Self {
        Self {
            timeout: timeout_ms.map(|ms| Duration::from_millis(u64::from(ms))),
        }
    }

    fn connection(&self) -> Result<EspHttpConnection, CommsError> {
        EspHttpConnection::new(&Configuration {
            timeout: self.timeout,
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            ..Default::default()
        })
        .map_err(|e| {
            warn!("HTTP: connection setup failed: {:?}", e);
            CommsError::RequestFailed
        })
    }
}

fn classify(e: EspError) -> CommsError {
    let code = e.code();
    if code == ESP_ERR_TIMEOUT as i32 || code == ESP_ERR_HTTP_EAGAIN as i32 {
        CommsError::Timeout
    } else {
        CommsError::RequestFailed
    }
}

impl HttpClient for EspHttpClient {
    fn get(&mut self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, CommsError> {
        let mut conn = self.connection()?;
        conn.initiate_request(Method::Get, url, headers).map_err(classify)?;
        conn.initiate_response().map_err(classify)?;
        let status = conn.status();

        let mut body = Vec::new();
        let mut chunk = [0u8; 512];
        loop {
            let n = conn.read(&mut chunk).map_err(classify)?;
            if n == 0 {
                break;
            }
            if body.len() + n > MAX_BODY {
                warn!("HTTP: body over {} bytes, discarding", MAX_BODY);
                return Err(CommsError::MalformedPayload);
            }
            body.extend_from_slice(&chunk[..n]);
        }
        debug!("HTTP: status {} ({} bytes)", status, body.len());
        Ok(HttpResponse { status, body })
    }
}
