use serde::{Deserialize, Serialize};

/// Blog article as listed by the article API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub reading_time_minutes: Option<u32>,
    #[serde(default)]
    pub tag_list: Vec<String>,
}
