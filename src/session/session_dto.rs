use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetViewerRequest {
    #[validate(length(min = 1, max = 128))]
    pub viewer_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub viewer_id: Option<String>,
    /// False when the viewer was already active and nothing was reloaded.
    pub changed: bool,
}
