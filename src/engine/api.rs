use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ModelDefinition {
    pub(crate) model: String,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ListModelsResponse {
    pub(crate) models: Vec<ModelDefinition>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerateRequest<'a> {
    pub(crate) model: &'a str,
    pub(crate) prompt: &'a str,
    pub(crate) stream: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateResponse {
    pub(crate) response: String,

    #[serde(flatten)]
    pub(crate) extra: serde_json::Value,
}

/// Error body shape the engine uses for failed calls
#[derive(Debug, Deserialize)]
pub(crate) struct EngineErrorBody {
    pub(crate) error: String,
}
