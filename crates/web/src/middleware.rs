use std::future::{ready, Ready};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, HttpMessage,
};
use auth_core::VerificationGate;
use futures::future::LocalBoxFuture;

use crate::error::ApiError;

/// Wraps a protected route: only requests carrying a live bearer credential
/// reach the handler, which finds an `Authenticated` in the request extensions.
#[derive(Clone)]
pub struct RequireCredential {
    gate: VerificationGate,
}

impl RequireCredential {
    pub fn new(gate: VerificationGate) -> Self {
        Self { gate }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireCredential
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RequireCredentialMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireCredentialMiddleware {
            service,
            gate: self.gate.clone(),
        }))
    }
}

pub struct RequireCredentialMiddleware<S> {
    service: S,
    gate: VerificationGate,
}

impl<S, B> Service<ServiceRequest> for RequireCredentialMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let authorization = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        match self.gate.check(authorization) {
            Ok(authenticated) => {
                tracing::debug!(subject_id = %authenticated.claims.subject_id, "request authenticated");
                req.extensions_mut().insert(authenticated);
                let response = self.service.call(req);
                Box::pin(async move { response.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(rejection) => {
                let response = req
                    .error_response(ApiError::from(rejection))
                    .map_into_right_body();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}
