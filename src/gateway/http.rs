use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::gateway::{
    Backend, ChoiceRequest, FileId, GatewayError, GatewayResult, Notice, Reply, StatusUpdate,
    WordDraft, WordUpdate, decode_reply,
};
use crate::session::params::SchedulingParams;

/// `Backend` over the trainer's JSON-over-HTTP endpoints.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        self.send(path, self.client.get(self.url(path)))
    }

    fn post<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        self.send(path, self.client.post(self.url(path)))
    }

    fn post_json<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> GatewayResult<T> {
        self.send(path, self.client.post(self.url(path)).json(body))
    }

    fn send<T: DeserializeOwned>(&self, path: &str, request: RequestBuilder) -> GatewayResult<T> {
        tracing::debug!(path, "trainer request");
        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;

        if status.is_success() {
            return decode_reply(&body);
        }

        // Some failures still come back as a JSON envelope with a message.
        match decode_reply::<T>(&body) {
            Ok(fail @ Reply::Fail { .. }) => Ok(fail),
            _ => {
                tracing::warn!(path, status = status.as_u16(), "trainer returned error status");
                Err(GatewayError::Status(status.as_u16()))
            }
        }
    }
}

impl Backend for HttpBackend {
    fn next_word(&self) -> GatewayResult<WordUpdate> {
        self.get("next_word")
    }

    fn prev_word(&self) -> GatewayResult<WordUpdate> {
        self.get("prev_word")
    }

    fn submit_choice(&self, choice: &str) -> GatewayResult<WordUpdate> {
        self.post_json("process_choice", &ChoiceRequest { choice })
    }

    fn mark_mastered(&self) -> GatewayResult<WordUpdate> {
        self.post("mark_learned")
    }

    fn reset_progress(&self) -> GatewayResult<WordUpdate> {
        self.post("reset_progress")
    }

    fn add_word(&self, draft: &WordDraft) -> GatewayResult<WordUpdate> {
        self.post_json("add_word", draft)
    }

    fn edit_word(&self, draft: &WordDraft) -> GatewayResult<WordUpdate> {
        self.post_json("edit_word", draft)
    }

    fn delete_file(&self, file: FileId) -> GatewayResult<Notice> {
        self.post(&format!("delete_file/{file}"))
    }

    fn update_params(&self, params: SchedulingParams) -> GatewayResult<StatusUpdate> {
        self.post_json("update_params", &params)
    }

    fn exit_session(&self) -> GatewayResult<Notice> {
        self.post("exit_trainer")
    }
}
