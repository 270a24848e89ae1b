#[derive(Debug, Clone)]
pub struct UserCreateRequest {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub city: String,
    pub avatar_url: Option<String>,
}

/// Partial profile update. `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct UserUpdateRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub avatar_url: Option<String>,
    pub password_hash: Option<String>,
}
