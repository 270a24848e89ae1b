use actix_web::web;

pub mod routes {
    pub mod auth;
    pub mod user;
}

mod services {
    pub(crate) mod auth;
    pub(crate) mod user;
}

pub mod dtos {
    pub mod auth;
    pub mod user;
}

/// Registration and token endpoints are public; profile endpoints sit behind
/// the auth guard inside the same `/users` prefix.
pub fn mount_users() -> actix_web::Scope {
    web::scope("/users")
        .service(routes::auth::post_register)
        .service(routes::auth::post_token)
        .service(routes::auth::post_token_refresh)
        .service(
            web::scope("")
                .wrap(extractor::auth_guard())
                .service(routes::user::get_profile)
                .service(routes::user::patch_profile)
                .service(routes::user::delete_profile),
        )
}
