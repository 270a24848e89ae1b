use std::{future::Future, pin::Pin, sync::Arc};

use actix_web::{
    Error, HttpMessage, HttpResponse,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures::future::{Ready, ok};

use common::jwt::{JwtClaims, TokenKind, get_jwt_claims_or_error};

pub struct AuthGuardMiddleware {}

impl AuthGuardMiddleware {
    pub fn new() -> Self {
        Self {}
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthGuardMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = AuthGuardMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthGuardMiddlewareService {
            service: Arc::new(service),
        })
    }
}

pub struct AuthGuardMiddlewareService<S> {
    service: Arc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthGuardMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let claims = match get_jwt_claims_or_error(&req) {
            Ok(claims) => claims,
            Err(response) => {
                return Box::pin(async move {
                    Ok(req.into_response(response.map_into_boxed_body()))
                });
            }
        };

        // refresh tokens only open the refresh endpoint, never the API
        if claims.kind != TokenKind::Access {
            let response = HttpResponse::Unauthorized()
                .json(serde_json::json!({ "error": "Access token required" }))
                .map_into_boxed_body();
            return Box::pin(async move { Ok(req.into_response(response)) });
        }

        // expose plain claims to handlers via web::ReqData<JwtClaims>
        req.extensions_mut().insert::<JwtClaims>(claims);

        let srv = Arc::clone(&self.service);
        Box::pin(async move { srv.call(req).await.map(|res| res.map_into_boxed_body()) })
    }
}
