use serde::{Deserialize, Serialize};

/// The classifier's structured judgment of what the user wants.
///
/// Produced fresh per message; never persisted standalone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,
    pub description: String,
    /// Registry name of the capability that should handle the message.
    pub capability: String,
    /// Entity names the capability needs extracted.
    pub entities: Vec<String>,
    /// Probability-like score in `[0, 1]`.
    pub confidence: f32,
}
