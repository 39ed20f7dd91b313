/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the analysis service, the analyzer state machine and the UI layer.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

use super::error::ValidationError;

/// Check whether a declared media type is in the image category
pub fn is_image_media_type(media_type: &str) -> bool {
    media_type.starts_with("image/")
}

/// A file as it came out of the picker or a drop, before validation
#[derive(Debug, Clone)]
pub struct PickedFile {
    /// File name only (e.g., "label.jpg")
    pub name: String,
    /// Declared media type (e.g., "image/jpeg")
    pub media_type: String,
    /// Raw file contents
    pub bytes: Arc<[u8]>,
}

/// The image currently chosen for analysis
///
/// Only constructible through `TryFrom<PickedFile>`, which enforces
/// the image media type invariant.
#[derive(Clone, PartialEq)]
pub struct SelectedImage {
    name: String,
    media_type: String,
    bytes: Arc<[u8]>,
}

impl SelectedImage {
    /// File name shown next to the preview and sent with the upload
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Shared handle to the payload, cheap to move into background tasks
    pub fn payload(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }
}

impl TryFrom<PickedFile> for SelectedImage {
    type Error = ValidationError;

    fn try_from(file: PickedFile) -> Result<Self, Self::Error> {
        if !is_image_media_type(&file.media_type) {
            return Err(ValidationError::NotAnImage);
        }

        Ok(Self {
            name: file.name,
            media_type: file.media_type,
            bytes: file.bytes,
        })
    }
}

// Payloads can be megabytes; keep them out of logs
impl fmt::Debug for SelectedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedImage")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Health classification tier returned by the analysis service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Safe,
    Harmful,
    VeryHarmful,
    /// Any label outside the known tiers, including an empty one
    Other(String),
}

/// How a classification should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Treatment {
    /// Positive, affirming
    Positive,
    /// Cautionary
    Cautionary,
    /// Negative, alarming
    Alarming,
    Neutral,
}

impl Classification {
    pub fn as_str(&self) -> &str {
        match self {
            Classification::Safe => "Safe",
            Classification::Harmful => "Harmful",
            Classification::VeryHarmful => "Very Harmful",
            Classification::Other(label) => label.as_str(),
        }
    }

    /// Map the tier to its display treatment
    pub fn treatment(&self) -> Treatment {
        match self {
            Classification::Safe => Treatment::Positive,
            Classification::Harmful => Treatment::Cautionary,
            Classification::VeryHarmful => Treatment::Alarming,
            Classification::Other(_) => Treatment::Neutral,
        }
    }
}

impl Default for Classification {
    fn default() -> Self {
        Classification::Other(String::new())
    }
}

impl From<String> for Classification {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Safe" => Classification::Safe,
            "Harmful" => Classification::Harmful,
            "Very Harmful" => Classification::VeryHarmful,
            _ => Classification::Other(label),
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Classification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Classification {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // A null label is treated like an unset one
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label.map(Classification::from).unwrap_or_default())
    }
}

/// Nutrition facts extracted from the label
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct NutritionData {
    /// Energy in kcal
    pub calories: f64,
    /// Sugar in grams
    pub sugar: f64,
    /// Saturated fat in grams
    pub sat_fat: f64,
    /// Sodium in milligrams
    pub sodium: f64,
    /// Dietary fiber in grams
    pub fiber: f64,
    /// Protein in grams
    pub protein: f64,
}

/// Parsed success body of `POST /analyze`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    #[serde(rename = "class", default)]
    pub classification: Classification,
    /// Health score on a 0-100 scale
    pub score: f64,
    /// Human-readable assessment
    pub message: String,
    /// Suggested healthier alternative
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub better_product: Option<String>,
    pub nutrition_data: NutritionData,
    /// Raw OCR text, for diagnostics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
}

impl AnalysisResult {
    /// Parse from the JSON body returned by the service
    pub fn from_json(json: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(json)
    }

    /// The suggestion, if the service sent a non-empty one
    pub fn suggestion(&self) -> Option<&str> {
        self.better_product.as_deref().filter(|s| !s.is_empty())
    }

    /// The extracted text, if the service sent a non-empty one
    pub fn diagnostic_text(&self) -> Option<&str> {
        self.extracted_text.as_deref().filter(|s| !s.is_empty())
    }
}
