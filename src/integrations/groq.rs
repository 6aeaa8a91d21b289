// src/integrations/groq.rs

// Receipt OCR through the Groq vision chat-completions API. The model output
// is an untrusted oracle: everything it claims is re-validated here before
// the caller persists anything.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Value, json};

use crate::{common::error::AppError, models::expense::{ExpenseCategory, ReceiptScan}};

const GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const GROQ_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";

const OCR_PROMPT: &str = r#"You are an OCR assistant for an Indonesian boarding house (kost) expense tracker.
Analyze this receipt image and extract the following information as JSON:
{
  "merchant_name": "string or null",
  "transaction_date": "YYYY-MM-DD or null",
  "total_amount": number_in_rupiah_integer or null,
  "suggested_category": "one of: listrik, air, wifi, kebersihan, perbaikan, lainnya",
  "confidence": 0.0_to_1.0,
  "notes": "any additional relevant info or null"
}
Return ONLY the JSON object, no markdown formatting."#;

/// Seam for the vision provider, so the extractor can be swapped (the
/// deployment has run on both Gemini and Groq) and faked in tests.
#[async_trait]
pub trait ReceiptExtractor: Send + Sync {
    async fn extract(
        &self,
        api_key: &str,
        image_base64: &str,
        mime_type: &str,
    ) -> Result<ReceiptScan, AppError>;
}

#[derive(Clone)]
pub struct GroqVision {
    http: reqwest::Client,
}

impl GroqVision {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ReceiptExtractor for GroqVision {
    async fn extract(
        &self,
        api_key: &str,
        image_base64: &str,
        mime_type: &str,
    ) -> Result<ReceiptScan, AppError> {
        let body = json!({
            "model": GROQ_MODEL,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": OCR_PROMPT },
                    { "type": "image_url", "image_url": {
                        "url": format!("data:{mime_type};base64,{image_base64}")
                    }},
                ],
            }],
            "max_tokens": 1024,
            "temperature": 0.1,
        });

        let res = self
            .http
            .post(GROQ_URL)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Integration(format!("Groq request failed: {e}")))?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(AppError::Integration(format!(
                "Groq API error {status}: {text}"
            )));
        }

        let data: Value = res
            .json()
            .await
            .map_err(|e| AppError::Integration(format!("Groq response unreadable: {e}")))?;
        let content = data["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("{}");

        Ok(parse_receipt_json(content))
    }
}

/// Parses and sanitizes the oracle output. Markdown fences are stripped;
/// a non-positive or non-integer amount becomes `None`; unknown categories
/// collapse to `lainnya`; an unparseable date becomes `None`.
pub fn parse_receipt_json(content: &str) -> ReceiptScan {
    let cleaned = content
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string();
    let parsed: Value = serde_json::from_str(&cleaned).unwrap_or(Value::Null);

    let total_amount = parsed["total_amount"].as_i64().filter(|n| *n > 0);
    let transaction_date = parsed["transaction_date"]
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());
    let suggested_category = parsed["suggested_category"]
        .as_str()
        .map(ExpenseCategory::from_oracle)
        .unwrap_or(ExpenseCategory::Lainnya);
    let confidence = parsed["confidence"].as_f64().unwrap_or(0.0).clamp(0.0, 1.0);

    ReceiptScan {
        merchant_name: parsed["merchant_name"].as_str().map(str::to_string),
        transaction_date,
        total_amount,
        suggested_category,
        confidence,
        notes: parsed["notes"].as_str().map(str::to_string),
        raw_json: cleaned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markdown_fences() {
        let content = "```json\n{\"total_amount\": 200000, \"suggested_category\": \"listrik\", \"confidence\": 0.9}\n```";
        let scan = parse_receipt_json(content);
        assert_eq!(scan.total_amount, Some(200_000));
        assert_eq!(scan.suggested_category, ExpenseCategory::Listrik);
        assert!((scan.confidence - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_non_positive_or_non_integer_amounts() {
        let scan = parse_receipt_json("{\"total_amount\": -5000}");
        assert_eq!(scan.total_amount, None);
        let scan = parse_receipt_json("{\"total_amount\": \"200000\"}");
        assert_eq!(scan.total_amount, None);
        let scan = parse_receipt_json("{\"total_amount\": 0}");
        assert_eq!(scan.total_amount, None);
    }

    #[test]
    fn unknown_category_collapses_to_lainnya() {
        let scan = parse_receipt_json("{\"suggested_category\": \"makanan\"}");
        assert_eq!(scan.suggested_category, ExpenseCategory::Lainnya);
        let scan = parse_receipt_json("{\"suggested_category\": \"Listrik\"}");
        assert_eq!(scan.suggested_category, ExpenseCategory::Listrik);
    }

    #[test]
    fn bad_date_and_garbage_are_tolerated() {
        let scan = parse_receipt_json("{\"transaction_date\": \"15/01/2025\"}");
        assert_eq!(scan.transaction_date, None);
        let scan = parse_receipt_json("not json at all");
        assert_eq!(scan.total_amount, None);
        assert_eq!(scan.suggested_category, ExpenseCategory::Lainnya);
        assert_eq!(scan.confidence, 0.0);
    }

    #[test]
    fn valid_date_is_parsed() {
        let scan = parse_receipt_json("{\"transaction_date\": \"2025-01-15\"}");
        assert_eq!(
            scan.transaction_date,
            NaiveDate::from_ymd_opt(2025, 1, 15)
        );
    }
}
