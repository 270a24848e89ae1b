use actix_web::web;

pub mod gateway;

pub mod routes {
    pub mod pay;
}

pub mod services {
    pub mod pay;
}

pub mod dtos {
    pub mod pay;
}

pub fn mount_payments() -> actix_web::Scope {
    web::scope("/payments")
        .service(routes::pay::post_create)
        .service(routes::pay::get_payments)
        .service(routes::pay::get_status)
}
