// src/evaluation.rs
use serde::{Deserialize, Serialize};

use crate::errors::{GymError, Result};

pub const INVALID_ANALYSIS_MESSAGE: &str = "The model provided an invalid response for the analysis.";

/// One semantic comparison unit between the reference text and the user's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationItem {
    #[serde(default)]
    pub parameter: String,
    #[serde(default)]
    pub target_phrase: String,
    #[serde(default)]
    pub user_phrase: String,
    #[serde(default)]
    pub feedback: String,
}

impl AnnotationItem {
    pub fn new(parameter: &str, target_phrase: &str, user_phrase: &str, feedback: &str) -> Self {
        Self {
            parameter: parameter.to_string(),
            target_phrase: target_phrase.to_string(),
            user_phrase: user_phrase.to_string(),
            feedback: feedback.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationResult {
    pub score: u8,
    pub analysis: Vec<AnnotationItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl EvaluationResult {
    pub fn band(&self) -> ScoreBand {
        match self.score {
            80.. => ScoreBand::High,
            50..=79 => ScoreBand::Medium,
            _ => ScoreBand::Low,
        }
    }
}

#[derive(Deserialize)]
struct RawEvaluation {
    score: f64,
    #[serde(default)]
    analysis: Vec<AnnotationItem>,
}

/// Parses the scoring model's JSON reply. Scores outside 0..=100 are clamped.
pub fn parse_evaluation(text: &str) -> Result<EvaluationResult> {
    let raw: RawEvaluation = serde_json::from_str(text.trim()).map_err(|e| {
        log::error!("Failed to parse score and feedback JSON ({}): {}", e, text);
        GymError::MalformedResponse(INVALID_ANALYSIS_MESSAGE.to_string())
    })?;

    if !raw.score.is_finite() {
        return Err(GymError::MalformedResponse(INVALID_ANALYSIS_MESSAGE.to_string()));
    }

    Ok(EvaluationResult {
        score: raw.score.round().clamp(0.0, 100.0) as u8,
        analysis: raw.analysis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_evaluation() {
        let text = r#"{
            "score": 72,
            "analysis": [
                {"parameter": "Subject", "target_phrase": "a red fox", "user_phrase": "a fox", "feedback": "Mention the colour."}
            ]
        }"#;
        let result = parse_evaluation(text).unwrap();
        assert_eq!(result.score, 72);
        assert_eq!(result.band(), ScoreBand::Medium);
        assert_eq!(result.analysis[0], AnnotationItem::new("Subject", "a red fox", "a fox", "Mention the colour."));
    }

    #[test]
    fn test_missing_user_phrase_defaults_to_empty() {
        let text = r#"{"score": 10, "analysis": [{"parameter": "Style", "target_phrase": "oil painting", "feedback": "Missed the medium."}]}"#;
        let result = parse_evaluation(text).unwrap();
        assert_eq!(result.analysis[0].user_phrase, "");
        assert_eq!(result.band(), ScoreBand::Low);
    }

    #[test]
    fn test_missing_parameter_falls_back_to_default_category() {
        let text = r#"{"score": 55, "analysis": [
            {"target_phrase": "at dusk", "user_phrase": "at night", "feedback": "Close."},
            {"parameter": "Color", "target_phrase": "amber", "user_phrase": "", "feedback": "Name the hue."}
        ]}"#;
        let result = parse_evaluation(text).unwrap();
        assert_eq!(result.analysis.len(), 2);
        assert_eq!(result.analysis[0].parameter, "");
        assert_eq!(crate::category::resolve_category(&result.analysis[0].parameter), crate::category::Category::Default);
        assert_eq!(result.analysis[1].parameter, "Color");
    }

    #[test]
    fn test_score_is_clamped() {
        assert_eq!(parse_evaluation(r#"{"score": 140, "analysis": []}"#).unwrap().score, 100);
        assert_eq!(parse_evaluation(r#"{"score": -3, "analysis": []}"#).unwrap().score, 0);
        assert_eq!(parse_evaluation(r#"{"score": 80, "analysis": []}"#).unwrap().band(), ScoreBand::High);
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = parse_evaluation("Sure! Here is the score: 80").unwrap_err();
        assert!(matches!(err, GymError::MalformedResponse(_)));
        assert_eq!(err.to_string(), INVALID_ANALYSIS_MESSAGE);
    }
}
