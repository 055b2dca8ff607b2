//! Authentication middleware
//!
//! Runs the authentication chain before the handler, publishes the outcome
//! as request extensions, answers challenges, writes remember-me cookies
//! after a successful request and turns an [`Unauthenticated`] error into a
//! redirect when one is configured.

use super::extractors::{AuthenticationContext, Identity};
use super::helpers::{build_auth_request, has_parsable_body, redirect_location};
use crate::auth::AuthenticationServiceProvider;
use crate::config::MiddlewareConfig;
use crate::utils::error::Unauthenticated;
use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::error::InternalError;
use actix_web::http::header;
use actix_web::{Error, HttpMessage, HttpResponse, web};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, warn};

/// Authentication middleware for Actix-web
#[derive(Clone)]
pub struct AuthenticationMiddleware {
    provider: Arc<dyn AuthenticationServiceProvider>,
    config: Arc<MiddlewareConfig>,
}

impl AuthenticationMiddleware {
    pub fn new<P>(provider: P) -> Self
    where
        P: AuthenticationServiceProvider + 'static,
    {
        Self::from_provider(Arc::new(provider))
    }

    pub fn from_provider(provider: Arc<dyn AuthenticationServiceProvider>) -> Self {
        Self {
            provider,
            config: Arc::new(MiddlewareConfig::default()),
        }
    }

    pub fn with_config(mut self, config: MiddlewareConfig) -> Self {
        self.config = Arc::new(config);
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthenticationMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticationMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticationMiddlewareService {
            service: Rc::new(service),
            provider: self.provider.clone(),
            config: self.config.clone(),
        }))
    }
}

/// Service implementation for the authentication middleware
pub struct AuthenticationMiddlewareService<S> {
    service: Rc<S>,
    provider: Arc<dyn AuthenticationServiceProvider>,
    config: Arc<MiddlewareConfig>,
}

impl<S, B> Service<ServiceRequest> for AuthenticationMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let provider = self.provider.clone();
        let config = self.config.clone();

        Box::pin(async move {
            // Only bodies a strategy can parse are buffered; the rest stream
            // through to the handler untouched
            let body = if has_parsable_body(req.headers()) {
                let body = req.extract::<web::Bytes>().await?;
                req.set_payload(Payload::from(body.clone()));
                body
            } else {
                web::Bytes::new()
            };

            let auth_request = build_auth_request(&req, &body)?;
            let auth_service = Arc::new(provider.authentication_service(&auth_request)?);

            let result = auth_service.authenticate(&auth_request).await.map_err(|e| {
                warn!("Authentication aborted: {}", e);
                e
            })?;

            if !result.is_valid() {
                if let Some(challenge) = auth_service.challenge(&auth_request) {
                    debug!("Answering {} with a challenge", auth_request.path());
                    return Ok(req
                        .into_response(challenge.into_response())
                        .map_into_right_body());
                }
            }

            let identity = result.identity().cloned();
            req.extensions_mut().insert(AuthenticationContext::new(
                auth_service.clone(),
                &config.identity_attribute,
            ));
            if let Some(identity) = &identity {
                req.extensions_mut().insert(Identity::new(identity.clone()));
            }

            let original_url = auth_request.url().to_string();

            // The request must not be cloned before the inner call; routing
            // needs exclusive access to it
            let mut res = match service.call(req).await {
                Ok(res) => res,
                Err(err) if err.as_error::<Unauthenticated>().is_some() => {
                    return match unauthenticated_redirect(&config, &original_url) {
                        Some(redirect) => Err(InternalError::from_response(err, redirect).into()),
                        None => Err(err),
                    };
                }
                Err(err) => return Err(err),
            };

            let signalled = res
                .response()
                .error()
                .is_some_and(|err| err.as_error::<Unauthenticated>().is_some());
            if signalled {
                if let Some(redirect) = unauthenticated_redirect(&config, &original_url) {
                    return Ok(res.into_response(redirect).map_into_right_body());
                }
                return Ok(res.map_into_left_body());
            }

            if let Some(identity) = &identity {
                let modification = auth_service
                    .persist_identity(&auth_request, identity)
                    .await?;
                modification.apply_to(res.headers_mut())?;
            }

            Ok(res.map_into_left_body())
        })
    }
}

/// `302` to the configured login page, if any
fn unauthenticated_redirect(config: &MiddlewareConfig, original_url: &str) -> Option<HttpResponse> {
    let base = config.unauthenticated_redirect.as_deref()?;
    let location = redirect_location(base, config.query_param.as_deref(), original_url);
    debug!("Redirecting unauthenticated request to {}", location);

    Some(
        HttpResponse::Found()
            .insert_header((header::LOCATION, location))
            .finish(),
    )
}
