use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use pdfedit_shared::api::{
    decode_failure, decode_success, Ack, AiTask, ChatAnswer, ChatRequest, CompressReport,
    ConvertFormat, ConvertRequest, ConvertResult, DownloadLink, EditRequest, Endpoint,
    GrammarCorrection, GrammarRequest, KeyPoints, Summary, UploadReceipt, UPLOAD_FIELD,
};
use pdfedit_shared::{Annotation, ApiError, ApiResult};

fn transport(error: reqwest::Error) -> ApiError {
    ApiError::Transport(error.to_string())
}

/// Typed client of the backend API. Uses `fetch` in the browser.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base: String,
}

impl ApiClient {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base,
        }
    }

    pub fn url(&self, endpoint: Endpoint<'_>) -> String {
        format!("{}{}", self.base, endpoint.path())
    }

    /// Document URL handed to the page rendering library.
    pub fn page_source_url(&self, file_id: &str, page: u32) -> String {
        self.url(Endpoint::Pages { file_id, page })
    }

    async fn fetch(&self, request: RequestBuilder) -> ApiResult<(Option<String>, Vec<u8>)> {
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(transport)?.to_vec();
        if !status.is_success() {
            return Err(decode_failure(status.as_u16(), &body));
        }
        Ok((content_type, body))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let (_, body) = self.fetch(request).await?;
        decode_success(&body)
    }

    pub async fn upload(&self, file_name: &str, mime: &str, bytes: Vec<u8>) -> ApiResult<UploadReceipt> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .map_err(transport)?;
        let form = Form::new().part(UPLOAD_FIELD, part);
        self.send(self.http.post(self.url(Endpoint::Upload)).multipart(form))
            .await
    }

    /// Sends the full annotation list; the backend persists it.
    pub async fn save(&self, file_id: &str, annotations: &[Annotation]) -> ApiResult<()> {
        let request = self
            .http
            .post(self.url(Endpoint::Edit { file_id }))
            .json(&EditRequest::save(file_id, annotations));
        self.send::<Ack>(request).await.map(|_| ())
    }

    pub async fn download(&self, file_id: &str) -> ApiResult<Vec<u8>> {
        let request = self
            .http
            .post(self.url(Endpoint::Edit { file_id }))
            .json(&EditRequest::download(file_id));
        let (content_type, body) = self.fetch(request).await?;
        let is_json = content_type
            .as_deref()
            .is_some_and(|value| value.starts_with("application/json"));
        if !is_json {
            return Ok(body);
        }
        // Either an error envelope or a link to the edited file.
        let link: DownloadLink = decode_success(&body)?;
        let (_, bytes) = self.fetch(self.http.get(self.resolve(&link.download_url))).await?;
        Ok(bytes)
    }

    /// Absolute URL for a link the backend returned, which may be relative.
    pub fn resolve(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            link.to_string()
        } else if link.starts_with('/') {
            format!("{}{link}", self.base)
        } else {
            format!("{}/{link}", self.base)
        }
    }

    fn ai(&self, file_id: &str, task: AiTask) -> RequestBuilder {
        self.http.post(self.url(Endpoint::Ai { file_id, task }))
    }

    pub async fn summarize(&self, file_id: &str) -> ApiResult<String> {
        let summary: Summary = self.send(self.ai(file_id, AiTask::Summarize)).await?;
        Ok(summary.summary)
    }

    pub async fn extract_key_points(&self, file_id: &str) -> ApiResult<Vec<String>> {
        let points: KeyPoints = self.send(self.ai(file_id, AiTask::Extract)).await?;
        Ok(points.key_points)
    }

    pub async fn check_grammar(&self, file_id: &str, text: &str) -> ApiResult<String> {
        let request = self.ai(file_id, AiTask::Grammar).json(&GrammarRequest { text });
        let corrected: GrammarCorrection = self.send(request).await?;
        Ok(corrected.corrected_text)
    }

    pub async fn chat(&self, file_id: &str, question: &str) -> ApiResult<String> {
        let request = self.ai(file_id, AiTask::Chat).json(&ChatRequest { question });
        let answer: ChatAnswer = self.send(request).await?;
        Ok(answer.answer)
    }

    pub async fn compress(&self, file_id: &str) -> ApiResult<CompressReport> {
        self.send(self.http.post(self.url(Endpoint::Compress { file_id })))
            .await
    }

    pub async fn convert(&self, file_id: &str, format: ConvertFormat) -> ApiResult<ConvertResult> {
        let request = self
            .http
            .post(self.url(Endpoint::Convert { file_id }))
            .json(&ConvertRequest { format });
        self.send(request).await
    }
}
