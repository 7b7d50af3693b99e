// src/providers/mod.rs

use crate::assets::{Challenge, Difficulty, Dimensions, ImageData};
use crate::errors::Result;
use crate::evaluation::EvaluationResult;

pub mod gemini;
pub mod schema;

/// The generation and analysis backend the gym depends on.
///
/// Every operation may fail with a single opaque error carrying a readable
/// message. Like the rest of the crate this uses return-position `impl Future`
/// rather than `async_trait`, so implementers can simply write `async fn`.
pub trait StudioProvider: Send + Sync {
    /// Produces a structured JSON description of an image.
    ///
    /// # Arguments
    /// * `image` - The image to analyze.
    /// * `dimensions` - Its pixel size, echoed into the description.
    fn describe_image(
        &self,
        image: &ImageData,
        dimensions: Dimensions,
    ) -> impl std::future::Future<Output = Result<String>> + Send;

    /// Invents a description at the given difficulty and renders it.
    fn generate_challenge(
        &self,
        difficulty: Difficulty,
    ) -> impl std::future::Future<Output = Result<Challenge>> + Send;

    /// Renders a user's description into an image.
    fn generate_image(&self, text: &str) -> impl std::future::Future<Output = Result<ImageData>> + Send;

    /// Scores the user's image against the reference and breaks both texts
    /// down into matching phrases with feedback.
    fn score_and_analyze(
        &self,
        reference_image: &ImageData,
        user_image: &ImageData,
        reference_text: &str,
        user_text: &str,
    ) -> impl std::future::Future<Output = Result<EvaluationResult>> + Send;
}
