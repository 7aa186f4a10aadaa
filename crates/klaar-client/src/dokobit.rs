//! Dokobit WS API client.
//!
//! Implements [`SigningProvider`] over the Dokobit Smart-ID and Mobile-ID
//! signing endpoints. The contract is sent as a one-file ASiC-E container.
//!
//! Initiation is never retried: a second POST would open a second session
//! on the signer's device. Status checks make exactly one request each; the
//! signing workflow owns the polling cadence and the attempt cap.

use std::future::Future;

use serde::{Deserialize, Serialize};
use url::Url;
use zeroize::Zeroizing;

use klaar_signing::{
    SignRequest, SignSession, SignStatus, SignedFile, SigningFailure, SigningMethod,
    SigningProvider,
};

/// Client for the Dokobit signing endpoints.
#[derive(Clone)]
pub struct DokobitClient {
    http: reqwest::Client,
    base_url: Url,
    access_token: Zeroizing<String>,
}

impl std::fmt::Debug for DokobitClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DokobitClient")
            .field("base_url", &self.base_url)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct SignBody<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
    code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    country: Option<&'static str>,
    timestamp: bool,
    language: &'static str,
    message: String,
    asice: AsiceBody<'a>,
}

#[derive(Debug, Serialize)]
struct AsiceBody<'a> {
    files: Vec<AsiceFile<'a>>,
}

#[derive(Debug, Serialize)]
struct AsiceFile<'a> {
    name: &'a str,
    content: &'a str,
    digest: String,
}

#[derive(Debug, Deserialize)]
struct SignResponse {
    status: String,
    token: Option<String>,
    control_code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
    message: Option<String>,
    file: Option<SignedFile>,
}

impl<'a> SignBody<'a> {
    fn from_request(request: &'a SignRequest) -> Self {
        let (phone, country, message) = match request.method {
            SigningMethod::SmartId => (
                None,
                Some("EE"),
                format!("KLAARIKS teenuse leping - {}", request.company_name),
            ),
            SigningMethod::MobileId => (
                request.phone_number.as_ref().map(|p| p.as_str()),
                None,
                "KLAARIKS leping".to_string(),
            ),
        };
        Self {
            kind: "asice",
            phone,
            code: request.personal_code.as_str(),
            country,
            timestamp: true,
            language: "ET",
            message,
            asice: AsiceBody {
                files: vec![AsiceFile {
                    name: &request.document.file_name,
                    content: &request.document.content_base64,
                    digest: request.document.digest.to_hex(),
                }],
            },
        }
    }
}

/// URL path prefix for a signing method.
fn method_path(method: SigningMethod) -> &'static str {
    match method {
        SigningMethod::SmartId => "smartid",
        SigningMethod::MobileId => "mobile",
    }
}

impl DokobitClient {
    pub(crate) fn new(
        http: reqwest::Client,
        base_url: Url,
        access_token: Zeroizing<String>,
    ) -> Self {
        Self {
            http,
            base_url,
            access_token,
        }
    }

    /// Build `{base}/{segments...}?access_token=...`.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SigningFailure> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| {
                    SigningFailure::Network(format!("unusable Dokobit base URL: {}", self.base_url))
                })?;
            path.pop_if_empty().extend(segments);
        }
        url.query_pairs_mut()
            .append_pair("access_token", &self.access_token);
        Ok(url)
    }

    async fn start_session(&self, request: &SignRequest) -> Result<SignSession, SigningFailure> {
        let prefix = method_path(request.method);
        let url = self.endpoint(&[prefix, "sign.json"])?;
        let body = SignBody::from_request(request);

        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SigningFailure::Network(format!("POST /{prefix}/sign.json: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<SignResponse>(&text)
                .ok()
                .and_then(|r| r.message)
                .unwrap_or_else(|| format!("Dokobit API viga: {}", status.as_u16()));
            tracing::warn!(status = status.as_u16(), "Dokobit rejected signing request");
            return Err(SigningFailure::ProviderRejected(message));
        }

        let parsed: SignResponse = resp
            .json()
            .await
            .map_err(|e| {
                SigningFailure::Network(format!("invalid response from /{prefix}/sign.json: {e}"))
            })?;

        match parsed {
            SignResponse {
                status,
                token: Some(token),
                control_code: Some(control_code),
                ..
            } if status == "ok" => Ok(SignSession {
                token,
                control_code,
            }),
            SignResponse {
                status, message, ..
            } => {
                tracing::warn!(%status, "Dokobit did not open a session");
                Err(SigningFailure::ProviderRejected(message.unwrap_or_default()))
            }
        }
    }

    async fn fetch_status(
        &self,
        method: SigningMethod,
        token: &str,
    ) -> Result<SignStatus, SigningFailure> {
        let prefix = method_path(method);
        let file = format!("{token}.json");
        let url = self.endpoint(&[prefix, "sign", "status", &file])?;

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| SigningFailure::Network(format!("GET /{prefix}/sign/status: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SigningFailure::Network(format!(
                "Dokobit API viga: {}",
                status.as_u16()
            )));
        }

        let parsed: StatusResponse = resp
            .json()
            .await
            .map_err(|e| SigningFailure::Network(format!("invalid status response: {e}")))?;

        Ok(match parsed.status.as_str() {
            "ok" => match parsed.file {
                Some(file) => SignStatus::Ok(file),
                None => SignStatus::Unrecognized("ok without file".to_string()),
            },
            "waiting" => SignStatus::Waiting,
            "canceled" => SignStatus::Canceled,
            "error" => SignStatus::Error(parsed.message.unwrap_or_default()),
            other => SignStatus::Unrecognized(other.to_string()),
        })
    }
}

impl SigningProvider for DokobitClient {
    fn initiate(
        &self,
        request: &SignRequest,
    ) -> impl Future<Output = Result<SignSession, SigningFailure>> + Send {
        self.start_session(request)
    }

    fn check_status(
        &self,
        method: SigningMethod,
        token: &str,
    ) -> impl Future<Output = Result<SignStatus, SigningFailure>> + Send {
        self.fetch_status(method, token)
    }

    fn provider_name(&self) -> &str {
        "dokobit"
    }
}
