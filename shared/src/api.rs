//! Request and response bodies of the backend HTTP API.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::annotation::Annotation;
use crate::error::{ApiError, ApiResult};

pub const UPLOAD_FIELD: &str = "file";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AiTask {
    Summarize,
    Extract,
    Grammar,
    Chat,
}

impl AiTask {
    fn segment(self) -> &'static str {
        match self {
            AiTask::Summarize => "summarize",
            AiTask::Extract => "extract",
            AiTask::Grammar => "grammar",
            AiTask::Chat => "chat",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint<'a> {
    Upload,
    Pages { file_id: &'a str, page: u32 },
    Edit { file_id: &'a str },
    Ai { file_id: &'a str, task: AiTask },
    Compress { file_id: &'a str },
    Convert { file_id: &'a str },
}

impl Endpoint<'_> {
    pub fn path(&self) -> String {
        match self {
            Endpoint::Upload => "/api/upload".to_string(),
            Endpoint::Pages { file_id, page } => format!("/api/pdf/{file_id}/pages?page={page}"),
            Endpoint::Edit { file_id } => format!("/api/pdf/{file_id}/edit"),
            Endpoint::Ai { file_id, task } => format!("/api/pdf/{file_id}/ai/{}", task.segment()),
            Endpoint::Compress { file_id } => format!("/api/pdf/{file_id}/compress"),
            Endpoint::Convert { file_id } => format!("/api/pdf/{file_id}/convert"),
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    pub file_id: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EditOperation {
    Save,
    Download,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EditRequest<'a> {
    pub operation: EditOperation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<&'a [Annotation]>,
    pub file_id: &'a str,
}

impl<'a> EditRequest<'a> {
    pub fn save(file_id: &'a str, annotations: &'a [Annotation]) -> Self {
        Self {
            operation: EditOperation::Save,
            annotations: Some(annotations),
            file_id,
        }
    }

    pub fn download(file_id: &'a str) -> Self {
        Self {
            operation: EditOperation::Download,
            annotations: None,
            file_id,
        }
    }
}

/// Body of a call that only reports success.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Ack {}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    pub summary: String,
}

/// Key points arrive either as one block of text or as a list.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
enum KeyPointsBody {
    List(Vec<String>),
    Text(String),
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeyPoints {
    #[serde(deserialize_with = "key_points_list")]
    pub key_points: Vec<String>,
}

fn key_points_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match KeyPointsBody::deserialize(deserializer)? {
        KeyPointsBody::List(points) => points,
        KeyPointsBody::Text(text) => text
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

#[derive(Serialize, Debug)]
pub struct GrammarRequest<'a> {
    pub text: &'a str,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GrammarCorrection {
    pub corrected_text: String,
}

/// JSON answer to a download request that points at the edited file
/// instead of carrying it.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DownloadLink {
    pub download_url: String,
}

#[derive(Serialize, Debug)]
pub struct ChatRequest<'a> {
    pub question: &'a str,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChatAnswer {
    pub answer: String,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompressReport {
    pub reduction_percent: f64,
    pub download_url: String,
    #[serde(default)]
    pub original_size: Option<u64>,
    #[serde(default)]
    pub compressed_size: Option<u64>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConvertFormat {
    Docx,
    Excel,
    Images,
}

impl ConvertFormat {
    /// Parses the `data-format` value of a conversion button.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "docx" | "word" => Some(ConvertFormat::Docx),
            "excel" | "xlsx" => Some(ConvertFormat::Excel),
            "images" | "image" => Some(ConvertFormat::Images),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConvertFormat::Docx => "Word",
            ConvertFormat::Excel => "Excel",
            ConvertFormat::Images => "images",
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ConvertRequest {
    pub format: ConvertFormat,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct ConvertBody {
    #[serde(default)]
    download_url: Option<String>,
    #[serde(default)]
    files: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConvertResult {
    Download(String),
    Files(Vec<String>),
}

impl<'de> Deserialize<'de> for ConvertResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let body = ConvertBody::deserialize(deserializer)?;
        match (body.download_url, body.files) {
            (Some(url), _) => Ok(ConvertResult::Download(url)),
            (None, Some(files)) => Ok(ConvertResult::Files(files)),
            (None, None) => Err(serde::de::Error::custom(
                "expected downloadUrl or files in convert response",
            )),
        }
    }
}

const DEFAULT_FAILURE: &str = "Request failed";

/// Decodes a 2xx body of the `{success, error?, ...}` envelope.
pub fn decode_success<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    let value: Value =
        serde_json::from_slice(body).map_err(|error| ApiError::Decode(error.to_string()))?;
    let success = value.get("success").and_then(Value::as_bool).unwrap_or(false);
    if !success {
        return Err(ApiError::Application(error_message(&value)));
    }
    serde_json::from_value(value).map_err(|error| ApiError::Decode(error.to_string()))
}

/// Maps a non-2xx response to an error, preferring the backend's message.
pub fn decode_failure(status: u16, body: &[u8]) -> ApiError {
    match serde_json::from_slice::<Value>(body) {
        Ok(value) if value.get("error").and_then(Value::as_str).is_some() => {
            ApiError::Application(error_message(&value))
        }
        _ => ApiError::Status(status),
    }
}

fn error_message(value: &Value) -> String {
    value
        .get("error")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .unwrap_or(DEFAULT_FAILURE)
        .to_string()
}
