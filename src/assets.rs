// src/assets.rs
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::str::FromStr;

use crate::errors::{GymError, Result};

/// Raw image bytes plus their MIME type.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageData {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImageData {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self { bytes, mime_type: mime_type.into() }
    }

    pub fn from_base64(data: &str, mime_type: impl Into<String>) -> Result<Self> {
        Ok(Self::new(BASE64.decode(data.trim())?, mime_type))
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

impl std::fmt::Debug for ImageData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageData")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Reads the pixel size from the image header without decoding the pixels.
pub fn probe_dimensions(bytes: &[u8]) -> Result<Dimensions> {
    let reader = image::ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let (width, height) = reader.into_dimensions()?;
    Ok(Dimensions { width, height })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Difficulty {
    VeryEasy,
    Easy,
    Medium,
    Hard,
    VeryHard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::VeryEasy,
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::VeryHard,
    ];

    pub fn level(&self) -> u8 {
        match self {
            Difficulty::VeryEasy => 1,
            Difficulty::Easy => 2,
            Difficulty::Medium => 3,
            Difficulty::Hard => 4,
            Difficulty::VeryHard => 5,
        }
    }

    /// Name sent to the challenge generator.
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::VeryEasy => "Very Easy",
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::VeryHard => "Very Hard",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Difficulty::VeryEasy => "Simple subjects, clear style.",
            Difficulty::Easy => "One or two elements, basic composition.",
            Difficulty::Medium => "More complex scenes and styles.",
            Difficulty::Hard => "Subtle details, lighting, and mood.",
            Difficulty::VeryHard => "Intricate concepts and artistic flair.",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = GymError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        Difficulty::ALL
            .into_iter()
            .find(|d| d.label().to_lowercase() == normalized || d.level().to_string() == normalized)
            .ok_or_else(|| GymError::Config(format!("Unknown difficulty '{}'", s)))
    }
}

impl TryFrom<String> for Difficulty {
    type Error = GymError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Difficulty> for String {
    fn from(value: Difficulty) -> Self {
        value.label().to_string()
    }
}

/// Output of the challenge generator: the hidden description and its image.
#[derive(Debug, Clone)]
pub struct Challenge {
    pub description: String,
    pub image: ImageData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReferenceOrigin {
    Challenge { difficulty: Difficulty },
    Upload { width: u32, height: u32 },
}

/// What the user is asked to describe. Captured once per run.
#[derive(Debug, Clone)]
pub struct ReferenceAsset {
    pub description: String,
    pub image: ImageData,
    pub origin: ReferenceOrigin,
    /// Full structured description, kept for uploaded images.
    pub structured: Option<serde_json::Value>,
}

impl ReferenceAsset {
    pub fn from_challenge(challenge: Challenge, difficulty: Difficulty) -> Self {
        Self {
            description: challenge.description,
            image: challenge.image,
            origin: ReferenceOrigin::Challenge { difficulty },
            structured: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        image::RgbImage::new(width, height)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_probe_dimensions() {
        let dims = probe_dimensions(&png(7, 3)).unwrap();
        assert_eq!(dims, Dimensions { width: 7, height: 3 });
    }

    #[test]
    fn test_probe_rejects_non_image() {
        assert!(probe_dimensions(b"definitely not an image").is_err());
    }

    #[test]
    fn test_difficulty_parsing() {
        assert_eq!("very hard".parse::<Difficulty>().unwrap(), Difficulty::VeryHard);
        assert_eq!("Very_Easy".parse::<Difficulty>().unwrap(), Difficulty::VeryEasy);
        assert_eq!("3".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert!("impossible".parse::<Difficulty>().is_err());

        let parsed: Difficulty = serde_json::from_str("\"Hard\"").unwrap();
        assert_eq!(parsed, Difficulty::Hard);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"Hard\"");
    }

    #[test]
    fn test_data_url() {
        let image = ImageData::new(vec![1, 2, 3], "image/png");
        assert_eq!(image.data_url(), "data:image/png;base64,AQID");
        assert_eq!(ImageData::from_base64("AQID", "image/png").unwrap(), image);
    }
}
