use serde::{Deserialize, Serialize};

/// Provenance tag for records created without the generation workflow.
pub const MANUAL_MODEL_TAG: &str = "Manual";

/// One generated or manually authored app concept.
///
/// Serialized with camelCase keys so the blob matches the original
/// dashboard export format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub full_prd: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: i64,
    pub model_used: String,
}
