// src/models.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::alignment::{align, Side, TextSegment};
use crate::assets::{Difficulty, Dimensions, ReferenceOrigin};
use crate::evaluation::{AnnotationItem, ScoreBand};
use crate::highlight::render_block;
use crate::runner::MirrorResult;
use crate::workflow::{Stage, Workflow};

#[derive(Serialize, Clone, Debug)]
pub struct ApiError {
    pub message: String,
}

#[derive(Deserialize)]
pub struct ChallengeRequest {
    pub difficulty: Difficulty,
}

#[derive(Deserialize)]
pub struct ImageUpload {
    pub image_base64: String,
    pub mime_type: String,
}

#[derive(Deserialize)]
pub struct SubmitRequest {
    pub description: String,
}

#[derive(Deserialize)]
pub struct HighlightRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct HighlightResponse {
    pub markup: Option<String>,
}

#[derive(Serialize, Clone, Debug)]
pub struct DifficultyView {
    pub level: u8,
    pub name: &'static str,
    pub description: &'static str,
}

impl From<Difficulty> for DifficultyView {
    fn from(d: Difficulty) -> Self {
        Self {
            level: d.level(),
            name: d.label(),
            description: d.description(),
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct ReferenceView {
    pub description: String,
    pub image_url: String,
    pub origin: ReferenceOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured: Option<serde_json::Value>,
}

#[derive(Serialize, Clone, Debug)]
pub struct EvaluationView {
    pub score: u8,
    pub band: ScoreBand,
    pub analysis: Vec<AnnotationItem>,
    pub reference_segments: Vec<TextSegment>,
    pub user_segments: Vec<TextSegment>,
}

/// Everything a client needs to render the current run.
#[derive(Serialize, Clone, Debug)]
pub struct GymSnapshot {
    pub run_id: Uuid,
    pub stage: Stage,
    pub busy: bool,
    pub busy_message: Option<String>,
    pub error: Option<String>,
    pub reference: Option<ReferenceView>,
    pub user_text: Option<String>,
    pub user_image_url: Option<String>,
    pub evaluation: Option<EvaluationView>,
}

impl GymSnapshot {
    pub fn from_workflow(workflow: &Workflow) -> Self {
        let run = workflow.run();

        let evaluation = match (&run.evaluation, &run.reference, &run.user_text) {
            (Some(result), Some(reference), Some(user_text)) => Some(EvaluationView {
                score: result.score,
                band: result.band(),
                analysis: result.analysis.clone(),
                reference_segments: align(&reference.description, &result.analysis, Side::Reference),
                user_segments: align(user_text, &result.analysis, Side::User),
            }),
            _ => None,
        };

        Self {
            run_id: run.id,
            stage: workflow.stage(),
            busy: workflow.is_busy(),
            busy_message: workflow.activity().map(|a| a.message().to_string()),
            error: workflow.last_error().map(str::to_string),
            reference: run.reference.as_ref().map(|r| ReferenceView {
                description: r.description.clone(),
                image_url: r.image.data_url(),
                origin: r.origin.clone(),
                structured: r.structured.clone(),
            }),
            user_text: run.user_text.clone(),
            user_image_url: run.user_image.as_ref().map(|i| i.data_url()),
            evaluation,
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct MirrorReport {
    pub dimensions: Dimensions,
    pub description: serde_json::Value,
    pub pretty: String,
    pub markup: Option<String>,
}

impl From<MirrorResult> for MirrorReport {
    fn from(result: MirrorResult) -> Self {
        let pretty = serde_json::to_string_pretty(&result.description).unwrap_or_default();
        let markup = render_block(&pretty);
        Self {
            dimensions: result.dimensions,
            description: result.description,
            pretty,
            markup,
        }
    }
}
