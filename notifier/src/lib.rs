use common::error::Res;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

pub mod mailer;
pub mod worker;

pub const JOB_COURSE_UPDATED: &str = "course_updated";

/// Queues a subscriber notification for an edited course. Only the course
/// id is stored; titles and recipient lists are resolved when the job runs.
pub async fn enqueue_course_updated(pool: &PgPool, course_id: Uuid) -> Res<()> {
    db::job::insert_job(pool, JOB_COURSE_UPDATED, json!({ "course_id": course_id })).await?;
    Ok(())
}

pub fn compose_course_updated(course_title: &str) -> (String, String) {
    (
        format!("Course {} was updated!", course_title),
        format!(
            "The course \"{}\" you are subscribed to has new material. \
             Log in to take a look.",
            course_title
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_and_body_mention_the_course() {
        let (subject, body) = compose_course_updated("Intro to Gardening");
        assert_eq!(subject, "Course Intro to Gardening was updated!");
        assert!(body.contains("\"Intro to Gardening\""));
    }
}
