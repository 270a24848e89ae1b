use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct LessonCreateRequest {
    pub title: String,
    pub description: String,
    pub preview_url: Option<String>,
    pub video_url: String,
    pub course_id: Uuid,
    pub owner_id: Uuid,
}

/// Partial lesson update. `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct LessonUpdateRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub preview_url: Option<String>,
    pub video_url: Option<String>,
}
