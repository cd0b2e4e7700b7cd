use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::error::CoreError;
use crate::models::{Task, TaskPriority};

/// Task fields extracted from a transcript by the server-side parser. The
/// NLP provider behind the endpoint is a black box to this client.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub priority: Option<TaskPriority>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Transcription {
    text: String,
}

#[derive(Debug, Serialize)]
struct ParseRequest<'a> {
    text: &'a str,
}

fn audio_form(audio: &[u8], file_name: &str) -> Form {
    Form::new().part(
        "audio",
        Part::bytes(audio.to_vec()).file_name(file_name.to_string()),
    )
}

impl ApiClient {
    /// Ships audio bytes to `POST /voice/transcribe` and returns the raw
    /// transcript.
    pub async fn transcribe(&self, audio: &[u8], file_name: &str) -> Result<String, CoreError> {
        let transcription: Transcription = self
            .execute(Method::POST, "voice/transcribe", false, |request| {
                request.multipart(audio_form(audio, file_name))
            })
            .await?;
        Ok(transcription.text)
    }

    /// Parses a transcript into task fields via `POST /voice/parse`.
    pub async fn parse_transcript(&self, text: &str) -> Result<TaskDraft, CoreError> {
        self.execute(Method::POST, "voice/parse", false, |request| {
            request.json(&ParseRequest { text })
        })
        .await
    }

    /// One-shot voice capture: audio in, created task out.
    pub async fn create_task_from_audio(
        &self,
        audio: &[u8],
        file_name: &str,
    ) -> Result<Task, CoreError> {
        self.execute(Method::POST, "voice/task", false, |request| {
            request.multipart(audio_form(audio, file_name))
        })
        .await
    }
}
