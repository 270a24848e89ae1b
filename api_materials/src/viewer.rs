use common::error::{AppError, Res};
use sqlx::PgPool;
use uuid::Uuid;

use crate::access::Role;

/// The acting user as the authorization rules see them. Moderator status is
/// read live from the user row, never from the token.
#[derive(Debug, Clone, Copy)]
pub struct Viewer {
    pub id: Uuid,
    pub is_moderator: bool,
}

impl Viewer {
    pub fn role(&self) -> Role {
        if self.is_moderator {
            Role::Moderator
        } else {
            Role::Regular
        }
    }

    pub fn owns(&self, owner_id: Uuid) -> bool {
        self.id == owner_id
    }
}

pub async fn load_viewer(pool: &PgPool, user_id: Uuid) -> Res<Viewer> {
    let user = db::user::get_user_by_id(pool, user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Unknown user".to_string()))?;
    if !user.is_active {
        return Err(AppError::Unauthorized("Account is deactivated".to_string()));
    }
    Ok(Viewer {
        id: user.id,
        is_moderator: user.is_moderator,
    })
}
