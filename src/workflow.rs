// src/workflow.rs
//
// The evaluation state machine. It owns the single live run and never talks
// to a provider itself: every remote step is split into a `begin_*` half that
// hands out a `Ticket`, and a `complete_*`/`record_*` half that applies the
// outcome only if the ticket still matches the live run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::assets::{ImageData, ReferenceAsset};
use crate::errors::{GymError, WorkflowError};
use crate::evaluation::EvaluationResult;

pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Selecting,
    Prompting,
    Evaluating,
    Result,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Selecting => write!(f, "selecting"),
            Stage::Prompting => write!(f, "prompting"),
            Stage::Evaluating => write!(f, "evaluating"),
            Stage::Result => write!(f, "result"),
        }
    }
}

/// The remote step currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    GeneratingChallenge,
    AnalyzingUpload,
    GeneratingImage,
    Scoring,
}

impl Activity {
    pub fn message(&self) -> &'static str {
        match self {
            Activity::GeneratingChallenge => "Generating your challenge...",
            Activity::AnalyzingUpload => "Analyzing your image...",
            Activity::GeneratingImage => "Generating your image...",
            Activity::Scoring => "Comparing images and analyzing prompts...",
        }
    }

    fn failure_context(&self) -> &'static str {
        match self {
            Activity::GeneratingChallenge => "Failed to generate challenge",
            Activity::AnalyzingUpload => "Failed to process uploaded image",
            Activity::GeneratingImage | Activity::Scoring => "Failed to complete evaluation",
        }
    }
}

/// Proof that a remote call was started for a particular run and step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub run_id: Uuid,
    pub activity: Activity,
}

/// Everything needed to carry a submitted description through image
/// generation and scoring without holding on to the workflow.
#[derive(Debug, Clone)]
pub struct Submission {
    pub ticket: Ticket,
    pub reference: ReferenceAsset,
    pub user_text: String,
}

#[derive(Debug, Clone)]
pub struct WorkflowRun {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub reference: Option<ReferenceAsset>,
    pub user_text: Option<String>,
    pub user_image: Option<ImageData>,
    pub evaluation: Option<EvaluationResult>,
}

impl WorkflowRun {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            reference: None,
            user_text: None,
            user_image: None,
            evaluation: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Workflow {
    stage: Stage,
    activity: Option<Activity>,
    run: WorkflowRun,
    last_error: Option<String>,
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new()
    }
}

impl Workflow {
    pub fn new() -> Self {
        Self {
            stage: Stage::Selecting,
            activity: None,
            run: WorkflowRun::new(),
            last_error: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn activity(&self) -> Option<Activity> {
        self.activity
    }

    pub fn is_busy(&self) -> bool {
        self.activity.is_some()
    }

    pub fn run(&self) -> &WorkflowRun {
        &self.run
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn begin_challenge(&mut self) -> Result<Ticket, WorkflowError> {
        self.begin_reference(Activity::GeneratingChallenge)
    }

    pub fn begin_upload(&mut self) -> Result<Ticket, WorkflowError> {
        self.begin_reference(Activity::AnalyzingUpload)
    }

    /// Starts a fresh run; whatever the previous run held is dropped.
    fn begin_reference(&mut self, activity: Activity) -> Result<Ticket, WorkflowError> {
        if self.is_busy() {
            return Err(WorkflowError::Busy);
        }
        self.run = WorkflowRun::new();
        self.last_error = None;
        Ok(self.enter(activity))
    }

    pub fn complete_reference(
        &mut self,
        ticket: &Ticket,
        outcome: Result<ReferenceAsset, GymError>,
    ) -> Result<Stage, WorkflowError> {
        self.check(ticket)?;
        match outcome {
            Ok(reference) => {
                log::info!("Run {} ready for a description", self.run.id);
                self.run.reference = Some(reference);
                self.activity = None;
                self.stage = Stage::Prompting;
            }
            Err(e) => self.fail(ticket.activity, &e),
        }
        Ok(self.stage)
    }

    pub fn begin_submission(&mut self, text: &str) -> Result<Submission, WorkflowError> {
        if self.is_busy() {
            return Err(WorkflowError::Busy);
        }
        if self.stage != Stage::Prompting {
            return Err(WorkflowError::InvalidStage {
                expected: Stage::Prompting,
                actual: self.stage,
            });
        }
        if text.trim().is_empty() {
            return Err(WorkflowError::EmptyDescription);
        }
        let reference = self.run.reference.clone().ok_or(WorkflowError::InvalidStage {
            expected: Stage::Prompting,
            actual: Stage::Selecting,
        })?;

        self.run.user_text = Some(text.to_string());
        self.last_error = None;
        let ticket = self.enter(Activity::GeneratingImage);
        Ok(Submission {
            ticket,
            reference,
            user_text: text.to_string(),
        })
    }

    /// Stores the generated image and hands out the ticket for scoring.
    /// On failure the returned ticket is `None` and the run is gone.
    pub fn record_user_image(
        &mut self,
        ticket: &Ticket,
        outcome: Result<ImageData, GymError>,
    ) -> Result<Option<Ticket>, WorkflowError> {
        self.check(ticket)?;
        match outcome {
            Ok(image) => {
                self.run.user_image = Some(image);
                Ok(Some(self.enter(Activity::Scoring)))
            }
            Err(e) => {
                self.fail(ticket.activity, &e);
                Ok(None)
            }
        }
    }

    pub fn complete_evaluation(
        &mut self,
        ticket: &Ticket,
        outcome: Result<EvaluationResult, GymError>,
    ) -> Result<Stage, WorkflowError> {
        self.check(ticket)?;
        match outcome {
            Ok(result) => {
                log::info!("Run {} scored {}", self.run.id, result.score);
                self.run.evaluation = Some(result);
                self.activity = None;
                self.stage = Stage::Result;
            }
            Err(e) => self.fail(ticket.activity, &e),
        }
        Ok(self.stage)
    }

    /// Back to `Selecting` with an empty run. Allowed at any time; a call
    /// still in flight will come back with a stale ticket.
    pub fn reset(&mut self) {
        self.stage = Stage::Selecting;
        self.activity = None;
        self.run = WorkflowRun::new();
        self.last_error = None;
    }

    fn enter(&mut self, activity: Activity) -> Ticket {
        self.stage = Stage::Evaluating;
        self.activity = Some(activity);
        Ticket {
            run_id: self.run.id,
            activity,
        }
    }

    fn check(&self, ticket: &Ticket) -> Result<(), WorkflowError> {
        if ticket.run_id != self.run.id || self.activity != Some(ticket.activity) {
            log::warn!("Dropping late {:?} response for run {}", ticket.activity, ticket.run_id);
            return Err(WorkflowError::StaleTicket);
        }
        Ok(())
    }

    fn fail(&mut self, activity: Activity, error: &GymError) {
        let detail = if error.has_detail() {
            error.to_string()
        } else {
            UNKNOWN_ERROR_MESSAGE.to_string()
        };
        let message = format!("{}: {}", activity.failure_context(), detail);
        log::error!("Run {} failed: {}", self.run.id, message);

        self.stage = Stage::Selecting;
        self.activity = None;
        self.run = WorkflowRun::new();
        self.last_error = Some(message);
    }
}
