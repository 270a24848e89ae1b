use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct LessonCreateBody {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub preview_url: Option<String>,
    pub video_url: String,
    pub course_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct LessonUpdateBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub preview_url: Option<String>,
    pub video_url: Option<String>,
}
