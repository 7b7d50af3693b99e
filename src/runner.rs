// src/runner.rs
//
// Drives the workflow against a provider. The workflow lock is only held for
// the synchronous halves of a transition, never across a provider call. Each
// provider leg runs on a spawned task that owns the shared state, so the
// completing half still runs when the caller is dropped mid-request.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{broadcast, Mutex};
use uuid::Uuid;

use crate::assets::{probe_dimensions, Difficulty, Dimensions, ImageData, ReferenceAsset, ReferenceOrigin};
use crate::errors::{GymError, Result};
use crate::models::GymSnapshot;
use crate::providers::StudioProvider;
use crate::workflow::{Stage, Submission, Ticket, Workflow};

pub const FALLBACK_DESCRIPTION: &str = "A detailed image.";

/// Published on every transition so clients can show progress.
#[derive(Debug, Clone, Serialize)]
pub struct StageUpdate {
    pub run_id: Uuid,
    pub stage: Stage,
    pub busy: bool,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl StageUpdate {
    fn of(workflow: &Workflow) -> Self {
        Self {
            run_id: workflow.run().id,
            stage: workflow.stage(),
            busy: workflow.is_busy(),
            message: workflow.activity().map(|a| a.message().to_string()),
            error: workflow.last_error().map(str::to_string),
        }
    }
}

/// Structured description of an image outside of any run.
#[derive(Debug, Clone)]
pub struct MirrorResult {
    pub dimensions: Dimensions,
    pub description: serde_json::Value,
}

pub struct GymRunner<P> {
    shared: Arc<Shared<P>>,
}

/// Everything a detached provider leg needs to finish the transition on its
/// own after the caller has gone away.
struct Shared<P> {
    provider: P,
    workflow: Mutex<Workflow>,
    updates: broadcast::Sender<StageUpdate>,
}

impl<P: StudioProvider + 'static> GymRunner<P> {
    pub fn new(provider: P) -> Self {
        let (updates, _) = broadcast::channel(64);
        Self {
            shared: Arc::new(Shared {
                provider,
                workflow: Mutex::new(Workflow::new()),
                updates,
            }),
        }
    }

    pub fn provider(&self) -> &P {
        &self.shared.provider
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StageUpdate> {
        self.shared.updates.subscribe()
    }

    pub async fn snapshot(&self) -> GymSnapshot {
        GymSnapshot::from_workflow(&*self.shared.workflow.lock().await)
    }

    /// Generates a challenge at `difficulty` and waits for it to land.
    ///
    /// Returns `Err` only when the request is rejected by the workflow; a
    /// provider failure is recorded on the returned snapshot instead. The
    /// provider call runs on its own task, so dropping this future does not
    /// leave the workflow busy.
    pub async fn start_challenge(&self, difficulty: Difficulty) -> Result<GymSnapshot> {
        let ticket = {
            let mut workflow = self.shared.workflow.lock().await;
            let ticket = workflow.begin_challenge()?;
            log::info!("🎯 Run {} generating a '{}' challenge", ticket.run_id, difficulty);
            self.shared.publish(&workflow);
            ticket
        };

        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            let outcome = shared
                .provider
                .generate_challenge(difficulty)
                .await
                .map(|challenge| ReferenceAsset::from_challenge(challenge, difficulty));
            shared.complete_reference(&ticket, outcome).await
        })
        .await?
    }

    /// Uses an uploaded image as the reference.
    pub async fn start_from_upload(&self, image: ImageData) -> Result<GymSnapshot> {
        let ticket = {
            let mut workflow = self.shared.workflow.lock().await;
            let ticket = workflow.begin_upload()?;
            log::info!("🖼️  Run {} analyzing an uploaded {}", ticket.run_id, image.mime_type);
            self.shared.publish(&workflow);
            ticket
        };

        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            let outcome = shared.analyze_upload(image).await;
            shared.complete_reference(&ticket, outcome).await
        })
        .await?
    }

    /// Describes an image as structured JSON without touching the workflow.
    pub async fn mirror(&self, image: &ImageData) -> Result<MirrorResult> {
        self.shared.mirror(image).await
    }

    /// Renders the user's description, then scores it. The two provider
    /// calls run strictly in sequence on one detached task.
    pub async fn submit_description(&self, text: &str) -> Result<GymSnapshot> {
        let submission = {
            let mut workflow = self.shared.workflow.lock().await;
            let submission = workflow.begin_submission(text)?;
            log::info!("✍️  Run {} submitted a description", submission.ticket.run_id);
            self.shared.publish(&workflow);
            submission
        };

        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move { shared.evaluate(submission).await }).await?
    }

    pub async fn reset(&self) -> GymSnapshot {
        let mut workflow = self.shared.workflow.lock().await;
        workflow.reset();
        log::info!("🔄 Workflow reset, new run {}", workflow.run().id);
        self.shared.publish(&workflow);
        GymSnapshot::from_workflow(&workflow)
    }
}

impl<P: StudioProvider> Shared<P> {
    fn publish(&self, workflow: &Workflow) {
        // no subscribers is fine
        let _ = self.updates.send(StageUpdate::of(workflow));
    }

    async fn complete_reference(&self, ticket: &Ticket, outcome: Result<ReferenceAsset>) -> Result<GymSnapshot> {
        let mut workflow = self.workflow.lock().await;
        workflow.complete_reference(ticket, outcome)?;
        self.publish(&workflow);
        Ok(GymSnapshot::from_workflow(&workflow))
    }

    async fn analyze_upload(&self, image: ImageData) -> Result<ReferenceAsset> {
        let mirror = self.mirror(&image).await?;
        let description = mirror
            .description
            .get("description")
            .and_then(|d| d.as_str())
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(FALLBACK_DESCRIPTION)
            .to_string();

        Ok(ReferenceAsset {
            description,
            image,
            origin: ReferenceOrigin::Upload {
                width: mirror.dimensions.width,
                height: mirror.dimensions.height,
            },
            structured: Some(mirror.description),
        })
    }

    async fn mirror(&self, image: &ImageData) -> Result<MirrorResult> {
        if !image.mime_type.starts_with("image/") {
            return Err(GymError::UnsupportedMediaType(image.mime_type.clone()));
        }
        let dimensions = probe_dimensions(&image.bytes)?;
        let text = self.provider.describe_image(image, dimensions).await?;
        let description: serde_json::Value = serde_json::from_str(text.trim()).map_err(|e| {
            log::error!("Image description was not JSON: {}", e);
            GymError::MalformedResponse(
                "Failed to generate prompt from image. The model may have been unable to process the request."
                    .to_string(),
            )
        })?;
        Ok(MirrorResult { dimensions, description })
    }

    async fn evaluate(&self, submission: Submission) -> Result<GymSnapshot> {
        let image_outcome = self.provider.generate_image(&submission.user_text).await;

        let (scoring, user_image) = {
            let mut workflow = self.workflow.lock().await;
            let next = workflow.record_user_image(&submission.ticket, image_outcome)?;
            self.publish(&workflow);
            match (next, workflow.run().user_image.clone()) {
                (Some(ticket), Some(image)) => (ticket, image),
                _ => return Ok(GymSnapshot::from_workflow(&workflow)),
            }
        };

        let reference = &submission.reference;
        let outcome = self
            .provider
            .score_and_analyze(&reference.image, &user_image, &reference.description, &submission.user_text)
            .await;

        let mut workflow = self.workflow.lock().await;
        workflow.complete_evaluation(&scoring, outcome)?;
        self.publish(&workflow);
        Ok(GymSnapshot::from_workflow(&workflow))
    }
}
