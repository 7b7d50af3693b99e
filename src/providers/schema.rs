// src/providers/schema.rs
//
// Prompts and response schemas sent to Gemini.

use serde_json::{json, Value};

use crate::assets::{Difficulty, Dimensions};

pub fn describe_image_prompt(dimensions: Dimensions) -> String {
    format!(
        "You are an expert prompt engineer for generative AI image models. Analyze this image meticulously. \
         The original image dimensions are {}x{} pixels. Your task is to generate a structured JSON object that \
         describes the image in extreme detail, including these dimensions. This JSON will be used as a prompt to \
         recreate the image with high fidelity. Follow the provided schema precisely.",
        dimensions.width, dimensions.height
    )
}

pub fn challenge_prompt(difficulty: Difficulty) -> String {
    format!(
        "Create a single, detailed, and creative image generation prompt for a generative AI. The image should have \
         a difficulty level of '{}'. The difficulty relates to the complexity of the scene, the number of subjects, \
         the specificity of the style, and the subtlety of the lighting and composition. Do not respond with anything \
         other than the prompt itself. Be concise and clear.",
        difficulty.label()
    )
}

pub fn score_prompt(reference_text: &str, user_text: &str) -> String {
    format!(
        r#"You are an AI image analysis expert and a prompt engineering coach. Your task is to provide a structured analysis comparing a user's attempt to recreate a reference image.

1.  **Image Score**: First, visually compare the two images provided (reference vs. user-generated). Provide a 'score' from 0-100 based on how closely the user's image matches the reference in terms of subject, style, color, and composition. This score is purely about the visual result.

2.  **Prompt Analysis**: Second, analyze the prompts that created these images.
    - Target Prompt: "{}"
    - User's Prompt: "{}"

    Break down both prompts into their core semantic components. For each component (e.g., Subject, Style, Composition, Color, etc.), identify the relevant phrases from both prompts. Then, provide concise, actionable feedback on the user's phrasing for that specific component.

    - Copy phrases verbatim from the prompts.
    - If the user missed a component, their phrase can be empty.
    - The feedback should be helpful and educational, focusing on vocabulary and specificity.

Return your complete analysis as a single JSON object that strictly follows the provided schema."#,
        reference_text, user_text
    )
}

fn string(description: &str) -> Value {
    json!({ "type": "STRING", "description": description })
}

/// Schema for the structured image description.
pub fn description_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "description": string("A one-sentence, vivid overall description of the image, capturing the main essence."),
            "image_properties": {
                "type": "OBJECT",
                "properties": {
                    "width": { "type": "INTEGER", "description": "The width of the image in pixels." },
                    "height": { "type": "INTEGER", "description": "The height of the image in pixels." }
                },
                "required": ["width", "height"]
            },
            "subject": {
                "type": "OBJECT",
                "properties": {
                    "description": string("Detailed description of the main subject(s), including appearance and clothing."),
                    "expression": string("The facial expression or perceived emotion of the subject."),
                    "pose": string("The posture, stance, or action of the subject.")
                },
                "required": ["description"]
            },
            "style": {
                "type": "OBJECT",
                "properties": {
                    "artistic_style": string("The primary artistic style (e.g., photorealistic, anime, surreal)."),
                    "medium": string("The perceived medium (e.g., digital photography, oil on canvas, watercolor)."),
                    "mood": string("The overall mood or atmosphere.")
                },
                "required": ["artistic_style", "medium", "mood"]
            },
            "composition": {
                "type": "OBJECT",
                "properties": {
                    "camera_angle": string("The camera's perspective (e.g., low-angle shot, eye-level)."),
                    "framing": string("The shot type (e.g., close-up, medium shot, wide shot)."),
                    "lighting": string("The lighting style (e.g., soft natural light, golden hour)."),
                    "focus": string("The focus of the shot (e.g., shallow depth of field).")
                },
                "required": ["camera_angle", "framing", "lighting"]
            },
            "setting": {
                "type": "OBJECT",
                "properties": {
                    "location": string("The physical location or environment."),
                    "time_of_day": string("The time of day depicted.")
                },
                "required": ["location"]
            },
            "color_palette": {
                "type": "OBJECT",
                "properties": {
                    "dominant_colors": {
                        "type": "ARRAY",
                        "items": { "type": "STRING" },
                        "description": "The 3-5 most dominant colors in hex or descriptive format."
                    },
                    "overall_tone": string("The color temperature and saturation.")
                },
                "required": ["dominant_colors", "overall_tone"]
            },
            "additional_details": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Other notable details, textures, or secondary objects."
            }
        },
        "required": ["description", "image_properties", "subject", "style", "composition", "setting", "color_palette"]
    })
}

/// Schema for the score and per-parameter phrase analysis.
pub fn evaluation_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "score": {
                "type": "INTEGER",
                "description": "An integer score from 0 to 100 for how closely the user's image matches the reference image."
            },
            "analysis": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "parameter": string("The semantic parameter being analyzed (e.g., 'Subject', 'Style', 'Composition', 'Setting', 'Color', 'Action', 'Detail')."),
                        "target_phrase": string("The phrase from the target prompt for this parameter."),
                        "user_phrase": string("The phrase from the user's prompt for this parameter, or an empty string."),
                        "feedback": string("Concise, constructive feedback comparing the user's phrase to the target phrase.")
                    },
                    "required": ["parameter", "target_phrase", "user_phrase", "feedback"]
                }
            }
        },
        "required": ["score", "analysis"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_embed_inputs() {
        assert!(describe_image_prompt(Dimensions { width: 640, height: 480 }).contains("640x480 pixels"));
        assert!(challenge_prompt(Difficulty::VeryHard).contains("'Very Hard'"));
        let prompt = score_prompt("a red fox", "a fox");
        assert!(prompt.contains(r#"Target Prompt: "a red fox""#));
        assert!(prompt.contains(r#"User's Prompt: "a fox""#));
    }

    #[test]
    fn test_evaluation_schema_requires_phrases() {
        let schema = evaluation_schema();
        let required = &schema["properties"]["analysis"]["items"]["required"];
        assert_eq!(required.as_array().map(Vec::len), Some(4));
        assert_eq!(description_schema()["required"][0], "description");
    }
}
