use actix_web::web;

pub mod access;
pub mod validators;
pub mod viewer;

#[cfg(test)]
mod test_support;

pub mod routes {
    pub mod course;
    pub mod lesson;
}

mod services {
    pub(crate) mod course;
    pub(crate) mod lesson;
    pub(crate) mod subscription;
}

pub mod dtos {
    pub mod course;
    pub mod lesson;
}

pub fn mount_courses() -> actix_web::Scope {
    web::scope("/courses")
        .service(routes::course::get_courses)
        .service(routes::course::post_course)
        .service(routes::course::get_course)
        .service(routes::course::patch_course)
        .service(routes::course::delete_course)
        .service(routes::course::post_subscription)
}

pub fn mount_lessons() -> actix_web::Scope {
    web::scope("/lessons")
        .service(routes::lesson::get_lessons)
        .service(routes::lesson::post_lesson)
        .service(routes::lesson::get_lesson)
        .service(routes::lesson::patch_lesson)
        .service(routes::lesson::delete_lesson)
}
