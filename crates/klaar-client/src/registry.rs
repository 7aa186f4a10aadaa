//! Estonian business registry client.
//!
//! ## Endpoints
//!
//! | Operation         | Method | Path                                   |
//! |-------------------|--------|----------------------------------------|
//! | `autocomplete`    | GET    | `{autocomplete_url}?q={query}`         |
//! | `company_details` | POST   | `{registry_url}` (SOAP `detailandmed_v2`) |
//!
//! Autocomplete is public. Detail lookups need registry credentials.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use url::Url;
use zeroize::Zeroizing;

use klaar_core::RegistryCode;

use crate::error::ClientError;
use crate::normalize::{normalize_company, registry_fault, CompanyDetails, XmlElement};
use crate::retry::RetryPolicy;

/// Queries shorter than this (after trimming) return no suggestions.
pub const MIN_QUERY_CHARS: usize = 2;

/// One autocomplete hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySuggestion {
    #[serde(deserialize_with = "string_or_number")]
    pub company_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub reg_code: String,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub legal_address: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    StringOrNumber::deserialize(d).map(String::from)
}

fn opt_string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<StringOrNumber>::deserialize(d)?.map(String::from))
}

/// Data blocks requested from `detailandmed_v2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailOptions {
    pub general: bool,
    pub persons: bool,
    pub contacts: bool,
    pub documents: bool,
    pub regulations: bool,
}

impl Default for DetailOptions {
    fn default() -> Self {
        Self {
            general: true,
            persons: true,
            contacts: false,
            documents: false,
            regulations: false,
        }
    }
}

/// Client for the registry autocomplete and detail services.
#[derive(Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    autocomplete_url: Url,
    registry_url: Url,
    username: Zeroizing<String>,
    password: Zeroizing<String>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for RegistryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryClient")
            .field("autocomplete_url", &self.autocomplete_url)
            .field("registry_url", &self.registry_url)
            .field("username", &"[REDACTED]")
            .field("retry", &self.retry)
            .finish()
    }
}

impl RegistryClient {
    pub(crate) fn new(
        http: reqwest::Client,
        autocomplete_url: Url,
        registry_url: Url,
        username: Zeroizing<String>,
        password: Zeroizing<String>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            http,
            autocomplete_url,
            registry_url,
            username,
            password,
            retry,
        }
    }

    /// Search companies by name or registry code.
    ///
    /// Queries shorter than [`MIN_QUERY_CHARS`] return an empty list
    /// without a request. An envelope other than `{"status": "OK", "data":
    /// [...]}` also yields an empty list.
    pub async fn autocomplete(&self, query: &str) -> Result<Vec<CompanySuggestion>, ClientError> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }

        let endpoint = "GET autocomplete";
        let mut url = self.autocomplete_url.clone();
        url.query_pairs_mut().append_pair("q", query);

        let resp = self
            .retry
            .send(endpoint, || self.http.get(url.clone()).send())
            .await
            .map_err(|e| ClientError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::ApiError {
                endpoint: endpoint.into(),
                status,
                body,
            });
        }

        let envelope: serde_json::Value =
            resp.json().await.map_err(|e| ClientError::Deserialization {
                endpoint: endpoint.into(),
                source: e,
            })?;

        match (envelope.get("status").and_then(|s| s.as_str()), envelope.get("data")) {
            (Some("OK"), Some(data)) if data.is_array() => {
                let suggestions: Vec<CompanySuggestion> = serde_json::from_value(data.clone())
                    .map_err(|e| ClientError::Decode {
                        endpoint: endpoint.into(),
                        reason: e.to_string(),
                    })?;
                tracing::debug!(query, hits = suggestions.len(), "registry autocomplete");
                Ok(suggestions)
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Look up a company's full record with the default data blocks.
    pub async fn company_details(&self, reg_code: &str) -> Result<CompanyDetails, ClientError> {
        let today = chrono::Utc::now().date_naive();
        self.company_details_with(reg_code, DetailOptions::default(), today)
            .await
    }

    /// Look up a company's full record.
    ///
    /// `today` decides which contact channels are still valid.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Validation`] if `reg_code` is malformed; no request
    ///   is made.
    /// - [`ClientError::Registry`] for SOAP faults and registry error
    ///   messages, including ones sent with a non-2xx status.
    pub async fn company_details_with(
        &self,
        reg_code: &str,
        options: DetailOptions,
        today: NaiveDate,
    ) -> Result<CompanyDetails, ClientError> {
        let reg_code = RegistryCode::new(reg_code)?;
        let endpoint = "POST detailandmed_v2";
        let envelope = detail_request(&self.username, &self.password, &reg_code, options);

        let resp = self
            .retry
            .send(endpoint, || {
                self.http
                    .post(self.registry_url.clone())
                    .header(reqwest::header::CONTENT_TYPE, "text/xml; charset=utf-8")
                    .header("SOAPAction", "detailandmed_v2")
                    .body(envelope.clone())
                    .send()
            })
            .await
            .map_err(|e| ClientError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| ClientError::Http {
            endpoint: endpoint.into(),
            source: e,
        })?;

        if !status.is_success() {
            // SOAP faults usually arrive as 500 with a readable body.
            if let Some(fault) = XmlElement::parse(&body).ok().as_ref().and_then(registry_fault) {
                return Err(ClientError::Registry(fault));
            }
            return Err(ClientError::ApiError {
                endpoint: endpoint.into(),
                status: status.as_u16(),
                body,
            });
        }

        let details = normalize_company(&body, today)?;
        tracing::info!(
            reg_code = %reg_code,
            persons = details.persons.len(),
            "registry details fetched"
        );
        Ok(details)
    }
}

/// Render the `detailandmed_v2` SOAP envelope.
pub fn detail_request(
    username: &str,
    password: &str,
    reg_code: &RegistryCode,
    options: DetailOptions,
) -> String {
    let flag = |on: bool| if on { 1 } else { 0 };
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:prod="http://arireg.x-road.eu/producer/">"#,
            "<soapenv:Body><prod:detailandmed_v2><prod:keha>",
            "<prod:ariregister_kasutajanimi>{user}</prod:ariregister_kasutajanimi>",
            "<prod:ariregister_parool>{pass}</prod:ariregister_parool>",
            "<prod:ariregistri_kood>{code}</prod:ariregistri_kood>",
            "<prod:yandmed>{y}</prod:yandmed>",
            "<prod:iandmed>{i}</prod:iandmed>",
            "<prod:kandmed>{k}</prod:kandmed>",
            "<prod:dandmed>{d}</prod:dandmed>",
            "<prod:maarused>{m}</prod:maarused>",
            "<prod:keel>est</prod:keel>",
            "</prod:keha></prod:detailandmed_v2></soapenv:Body></soapenv:Envelope>",
        ),
        user = quick_xml::escape::escape(username),
        pass = quick_xml::escape::escape(password),
        code = reg_code,
        y = flag(options.general),
        i = flag(options.persons),
        k = flag(options.contacts),
        d = flag(options.documents),
        m = flag(options.regulations),
    )
}
