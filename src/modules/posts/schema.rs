use serde::{Deserialize, Serialize};

use super::model::Post;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub post: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub audio: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VoiceTweetRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub post: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatbotRequest {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatbotResponse {
    pub tweets: Vec<Post>,
    pub message: &'static str,
}
