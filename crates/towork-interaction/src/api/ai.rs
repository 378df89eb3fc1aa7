use crate::client::ApiClient;
use crate::http::{FilePart, MultipartForm};
use towork_core::Result;
use towork_core::ai::{DraftRequest, DraftResponse, ResumeExtraction, RewriteRequest, RewriteResponse};

/// `/ai/*` endpoints. Generation happens server-side.
#[derive(Clone)]
pub struct AiApi {
    client: ApiClient,
}

impl AiApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn draft_mission(&self, request: &DraftRequest) -> Result<DraftResponse> {
        let call = self.client.post("/ai/draft/mission").json(request)?;
        self.client
            .fetch(call, "Génération indisponible")
            .await
    }

    pub async fn rewrite(&self, request: &RewriteRequest) -> Result<RewriteResponse> {
        let call = self.client.post("/ai/rewrite").json(request)?;
        self.client
            .fetch(call, "Reformulation indisponible")
            .await
    }

    /// Uploads a resume and lets the backend extract skills from it.
    ///
    /// # Arguments
    ///
    /// * `file_name` - Name of the resume, sent as the `file` field
    /// * `bytes` - Resume content
    /// * `freelancer_id` - Profile receiving the extracted skills, if any
    /// * `language` - Language of the generated summary
    pub async fn extract_resume(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        freelancer_id: Option<i64>,
        language: Option<&str>,
    ) -> Result<ResumeExtraction> {
        let mut form = MultipartForm::new().with_file(FilePart::new("file", file_name, bytes));
        if let Some(id) = freelancer_id {
            form = form.with_text("freelancerId", id.to_string());
        }
        if let Some(language) = language.filter(|l| !l.is_empty()) {
            form = form.with_text("language", language);
        }
        let call = self.client.post("/ai/resume/extract").multipart(form);
        self.client
            .fetch(call, "Analyse du CV impossible")
            .await
    }
}
