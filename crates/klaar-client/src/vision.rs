//! Receipt recognition and financial advice via the Gemini API.
//!
//! Both operations make a single `generateContent` call. Without an API
//! key they return canned demo output tagged [`OutputSource::Placeholder`]
//! so that the rest of the product stays usable offline.

use serde::{Deserialize, Deserializer, Serialize};
use url::Url;
use zeroize::Zeroizing;

use crate::error::ClientError;
use crate::retry::RetryPolicy;

/// Shown when advice generation fails.
pub const ADVICE_UNAVAILABLE: &str = "Hetkel ei saa nõuandeid genereerida.";

/// Dividend share of payouts above which placeholder advice warns.
pub const DIVIDEND_WARNING_RATIO: f64 = 0.8;

const RECEIPT_PROMPT: &str = "Analüüsi seda tšekki või arvet.
Väljasta tulemus JSON formaadis järgmiste väljadega:
- vendor (string): müüja nimi
- amount (number): kogusumma (total)
- date (string): kuupäev formaadis YYYY-MM-DD
- category (string): pakutud raamatupidamise kulukonto (nt. Transport, Büroo, Teenused)
- summary (string): lühike 1-lauseline kokkuvõte eesti keeles.

Ära lisa markdowni märgendust (nagu ```json), väljasta ainult toores JSON string.";

/// Whether a result came from the model or from the offline fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputSource {
    Model,
    Placeholder,
}

/// A model result and where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelOutput<T> {
    pub value: T,
    pub source: OutputSource,
}

impl<T> ModelOutput<T> {
    fn model(value: T) -> Self {
        Self {
            value,
            source: OutputSource::Model,
        }
    }

    fn placeholder(value: T) -> Self {
        Self {
            value,
            source: OutputSource::Placeholder,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.source == OutputSource::Placeholder
    }
}

/// Fields read off a receipt or invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptAnalysis {
    pub vendor: String,
    /// Total in euros. Also read from strings such as `"12,40 €"`.
    #[serde(deserialize_with = "lenient_amount")]
    pub amount: f64,
    /// `YYYY-MM-DD` as printed by the model; not validated.
    pub date: String,
    /// Suggested expense account.
    pub category: String,
    pub summary: String,
}

impl ReceiptAnalysis {
    /// Demo result returned without an API key.
    pub fn placeholder() -> Self {
        Self {
            vendor: "Mock Vendor OÜ (Demo)".to_string(),
            amount: 125.50,
            date: "2023-11-01".to_string(),
            category: "Bürookulud".to_string(),
            summary: "Osteti kontoritarbeid ja printeripaberit.".to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
    Number(f64),
    Text(String),
}

fn lenient_amount<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    match AmountRepr::deserialize(d)? {
        AmountRepr::Number(n) => Ok(n),
        AmountRepr::Text(raw) => parse_amount(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unreadable amount {raw:?}"))),
    }
}

/// Parse a money amount written as text: decimal comma or point, optional
/// currency marker, spaces as thousands separators.
fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_end_matches("EUR")
        .trim_end_matches('€')
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Demo advice returned without an API key.
pub fn placeholder_advice(dividend_ratio: f64) -> String {
    if dividend_ratio > DIVIDEND_WARNING_RATIO {
        "Demo: Hoiatus! Dividendide osakaal on liiga suur võrreldes palgaga. \
         Maksuamet võib seda tõlgendada varjatud töötasuna."
            .to_string()
    } else {
        "Demo: Sinu finantsseis on stabiilne. Soovitame hoida vähemalt 2 kuu puhvrit \
         ja vaadata üle käibemaksutagastused."
            .to_string()
    }
}

fn advice_prompt(cash: f64, monthly_expenses: f64) -> String {
    format!(
        "Oled Eesti raamatupidaja ja finantsnõustaja.
Ettevõtte seis:
Raha kontol: {cash}€
Igakuised kulud: {monthly_expenses}€

Kontekst: Kasutaja tahab optimeerida makse, aga vältida maksuameti auditit (OÜtamine).
Anna 1-lauseline väga konkreetne, inimlik ja julgustav soovitus.
Kui raha on palju, soovita investeerida või optimeeritult dividende võtta.
Kui raha on vähe, soovita kulusid jälgida."
    )
}

/// Remove markdown code fences the model may add despite instructions.
pub fn strip_markdown_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

// ─── Wire types ──────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    InlineData { inline_data: InlineData<'a> },
    Text { text: &'a str },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

// ─── Client ──────────────────────────────────────────────────────────

/// Client for the receipt and advice models.
#[derive(Clone)]
pub struct VisionClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<Zeroizing<String>>,
    vision_model: String,
    text_model: String,
    retry: RetryPolicy,
}

impl std::fmt::Debug for VisionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisionClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("vision_model", &self.vision_model)
            .field("text_model", &self.text_model)
            .field("retry", &self.retry)
            .finish()
    }
}

impl VisionClient {
    pub(crate) fn new(
        http: reqwest::Client,
        base_url: Url,
        api_key: Option<Zeroizing<String>>,
        vision_model: String,
        text_model: String,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            http,
            base_url,
            api_key,
            vision_model,
            text_model,
            retry,
        }
    }

    /// True when no API key is configured.
    pub fn is_placeholder_mode(&self) -> bool {
        self.api_key.is_none()
    }

    /// Read vendor, amount, date and category off a receipt image.
    ///
    /// # Errors
    ///
    /// [`ClientError::Model`] if the model's answer is not the expected
    /// JSON object, plus the usual transport and status errors.
    pub async fn analyze_receipt(
        &self,
        image_base64: &str,
        mime_type: &str,
    ) -> Result<ModelOutput<ReceiptAnalysis>, ClientError> {
        let Some(api_key) = &self.api_key else {
            tracing::warn!("model API key missing, returning placeholder receipt analysis");
            return Ok(ModelOutput::placeholder(ReceiptAnalysis::placeholder()));
        };

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type,
                            data: image_base64,
                        },
                    },
                    Part::Text {
                        text: RECEIPT_PROMPT,
                    },
                ],
            }],
        };

        let text = self.generate(api_key, &self.vision_model, &request).await?;
        let cleaned = strip_markdown_fences(&text);
        let analysis: ReceiptAnalysis = serde_json::from_str(&cleaned)
            .map_err(|e| ClientError::Model(format!("unreadable receipt analysis: {e}")))?;
        tracing::info!(vendor = %analysis.vendor, amount = analysis.amount, "receipt analyzed");
        Ok(ModelOutput::model(analysis))
    }

    /// One sentence of advice for the given cash position.
    pub async fn financial_advice(
        &self,
        cash: f64,
        monthly_expenses: f64,
        dividend_ratio: f64,
    ) -> Result<ModelOutput<String>, ClientError> {
        let Some(api_key) = &self.api_key else {
            tracing::warn!("model API key missing, returning placeholder advice");
            return Ok(ModelOutput::placeholder(placeholder_advice(dividend_ratio)));
        };

        let prompt = advice_prompt(cash, monthly_expenses);
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part::Text { text: &prompt }],
            }],
        };
        let text = self.generate(api_key, &self.text_model, &request).await?;
        Ok(ModelOutput::model(text.trim().to_string()))
    }

    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerateRequest<'_>,
    ) -> Result<String, ClientError> {
        let endpoint = format!("POST models/{model}:generateContent");
        let raw = format!(
            "{}/v1beta/models/{model}:generateContent",
            self.base_url.as_str().trim_end_matches('/')
        );
        let url = Url::parse(&raw).map_err(|e| {
            ClientError::Config(crate::config::ConfigError::InvalidUrl(raw.clone(), e.to_string()))
        })?;

        let resp = self
            .retry
            .send(&endpoint, || {
                self.http
                    .post(url.clone())
                    .header("x-goog-api-key", api_key)
                    .json(request)
                    .send()
            })
            .await
            .map_err(|e| ClientError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::ApiError {
                endpoint,
                status,
                body,
            });
        }

        let parsed: GenerateResponse = resp.json().await.map_err(|e| ClientError::Deserialization {
            endpoint: endpoint.clone(),
            source: e,
        })?;
        parsed
            .text()
            .ok_or_else(|| ClientError::Model(format!("{model} returned no text")))
    }
}
