// src/providers/gemini.rs

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Instant;

use crate::assets::{Challenge, Difficulty, Dimensions, ImageData};
use crate::config::GeminiConfig;
use crate::errors::{GymError, Result};
use crate::evaluation::{parse_evaluation, EvaluationResult};
use crate::providers::{schema, StudioProvider};

pub const NO_USER_IMAGE_MESSAGE: &str =
    "The model could not generate an image from your prompt. Try being more descriptive.";
pub const NO_CHALLENGE_IMAGE_MESSAGE: &str = "Failed to generate challenge image.";

/// Gemini for text and analysis, Imagen for pictures.
pub struct GeminiStudio {
    client: Client,
    config: GeminiConfig,
}

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
    mime_type: Option<String>,
}

fn inline_image(image: &ImageData) -> Value {
    json!({ "inline_data": { "mime_type": image.mime_type, "data": image.to_base64() } })
}

/// Pulls the first candidate's text out of a `generateContent` reply.
pub fn extract_text(response_json: &Value) -> Result<String> {
    if let Some(error) = response_json.get("error") {
        return Err(GymError::ApiResponse(error.to_string()));
    }

    let output = response_json
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str())
        .ok_or_else(|| GymError::UnexpectedResponse(response_json.to_string()))?;

    if output.trim().is_empty() {
        return Err(GymError::EmptyResponse);
    }

    Ok(output.to_string())
}

/// First usable image of an Imagen `predict` reply.
fn extract_image(response: PredictResponse, default_mime: &str, missing: &str) -> Result<ImageData> {
    let prediction = response
        .predictions
        .into_iter()
        .find(|p| p.bytes_base64_encoded.is_some())
        .ok_or_else(|| GymError::NoImageGenerated(missing.to_string()))?;

    let data = prediction.bytes_base64_encoded.unwrap_or_default();
    let mime_type = prediction.mime_type.unwrap_or_else(|| default_mime.to_string());
    ImageData::from_base64(&data, mime_type)
}

impl GeminiStudio {
    /// Creates a new `GeminiStudio`.
    pub fn new(client: Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }

    fn url(&self, model: &str, method: &str) -> String {
        format!(
            "{}/v1beta/models/{}:{}",
            self.config.api_base.trim_end_matches('/'),
            model,
            method
        )
    }

    async fn post(&self, url: &str, body: &Value) -> Result<reqwest::Response> {
        log::info!("📡 Calling Gemini: {}", url);
        let start = Instant::now();

        let resp = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        log::info!("📥 Gemini response status: {} ({}ms)", status, start.elapsed().as_millis());

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GymError::RateLimited);
        }
        if !status.is_success() {
            let error_body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error body".to_string());
            return Err(GymError::ApiError {
                status: status.as_u16(),
                body: error_body,
            });
        }

        Ok(resp)
    }

    async fn generate_content(&self, body: Value) -> Result<String> {
        let url = self.url(&self.config.text_model, "generateContent");
        let response_json: Value = self.post(&url, &body).await?.json().await?;
        extract_text(&response_json)
    }

    async fn predict_image(&self, prompt: &str, missing: &str) -> Result<ImageData> {
        let url = self.url(&self.config.image_model, "predict");
        let body = json!({
            "instances": [{ "prompt": prompt }],
            "parameters": {
                "sampleCount": 1,
                "aspectRatio": self.config.aspect_ratio,
                "outputMimeType": self.config.output_mime_type,
            }
        });
        let response: PredictResponse = self.post(&url, &body).await?.json().await?;
        extract_image(response, &self.config.output_mime_type, missing)
    }
}

impl StudioProvider for GeminiStudio {
    async fn describe_image(&self, image: &ImageData, dimensions: Dimensions) -> Result<String> {
        let body = json!({
            "contents": [{
                "parts": [
                    { "text": schema::describe_image_prompt(dimensions) },
                    inline_image(image),
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema::description_schema(),
                "temperature": self.config.describe_temperature,
            }
        });
        self.generate_content(body).await
    }

    async fn generate_challenge(&self, difficulty: Difficulty) -> Result<Challenge> {
        let body = json!({
            "contents": [{ "parts": [{ "text": schema::challenge_prompt(difficulty) }] }],
            "generationConfig": { "temperature": self.config.challenge_temperature }
        });
        let description = self.generate_content(body).await?.trim().to_string();
        log::info!("🎯 Challenge ({}): {}", difficulty, description);

        let image = self.predict_image(&description, NO_CHALLENGE_IMAGE_MESSAGE).await?;
        Ok(Challenge { description, image })
    }

    async fn generate_image(&self, text: &str) -> Result<ImageData> {
        self.predict_image(text, NO_USER_IMAGE_MESSAGE).await
    }

    async fn score_and_analyze(
        &self,
        reference_image: &ImageData,
        user_image: &ImageData,
        reference_text: &str,
        user_text: &str,
    ) -> Result<EvaluationResult> {
        let body = json!({
            "contents": [{
                "parts": [
                    { "text": schema::score_prompt(reference_text, user_text) },
                    inline_image(reference_image),
                    inline_image(user_image),
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema::evaluation_schema(),
            }
        });
        let text = self.generate_content(body).await?;
        parse_evaluation(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text() {
        let reply = json!({"candidates": [{"content": {"parts": [{"text": "{\"description\": \"x\"}"}]}}]});
        assert_eq!(extract_text(&reply).unwrap(), "{\"description\": \"x\"}");
    }

    #[test]
    fn test_extract_text_errors() {
        let error = json!({"error": {"code": 400, "message": "bad"}});
        assert!(matches!(extract_text(&error), Err(GymError::ApiResponse(_))));
        assert!(matches!(extract_text(&json!({"candidates": []})), Err(GymError::UnexpectedResponse(_))));

        let blank = json!({"candidates": [{"content": {"parts": [{"text": " "}]}}]});
        assert!(matches!(extract_text(&blank), Err(GymError::EmptyResponse)));
    }

    #[test]
    fn test_extract_image() {
        let response: PredictResponse = serde_json::from_value(json!({
            "predictions": [{"bytesBase64Encoded": "AQID", "mimeType": "image/png"}]
        }))
        .unwrap();
        let image = extract_image(response, "image/jpeg", NO_USER_IMAGE_MESSAGE).unwrap();
        assert_eq!(image, ImageData::new(vec![1, 2, 3], "image/png"));
    }

    #[test]
    fn test_missing_image_message() {
        let response: PredictResponse = serde_json::from_value(json!({})).unwrap();
        let err = extract_image(response, "image/jpeg", NO_USER_IMAGE_MESSAGE).unwrap_err();
        assert_eq!(err.to_string(), NO_USER_IMAGE_MESSAGE);
    }
}
