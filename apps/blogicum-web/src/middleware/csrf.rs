//! Cross-site request guard for form submissions.
//!
//! Unsafe methods are accepted only when the browser-supplied `Origin` (or,
//! failing that, `Referer`) names this host. Requests carrying neither header
//! are not from a browser form and pass through.

use actix_web::{
    Error, ResponseError,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::{Method, header},
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use url::Url;

use crate::middleware::error::AppError;

/// CSRF guard middleware factory.
pub struct CsrfGuard;

impl<S, B> Transform<S, ServiceRequest> for CsrfGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = CsrfGuardService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CsrfGuardService { service }))
    }
}

pub struct CsrfGuardService<S> {
    service: S,
}

fn is_safe(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}

/// `host[:port]` of an absolute URL.
fn authority(value: &str) -> Option<String> {
    let url = Url::parse(value).ok()?;
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// The origin the request claims to come from, if the browser said.
fn claimed_origin(req: &ServiceRequest) -> Option<Option<String>> {
    let headers = req.headers();
    headers
        .get(header::ORIGIN)
        .or_else(|| headers.get(header::REFERER))
        .map(|value| value.to_str().ok().and_then(authority))
}

impl<S, B> Service<ServiceRequest> for CsrfGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if !is_safe(req.method()) {
            if let Some(origin) = claimed_origin(&req) {
                let host = req.connection_info().host().to_string();
                if origin.as_deref() != Some(host.as_str()) {
                    tracing::warn!(
                        path = %req.path(),
                        ?origin,
                        %host,
                        "Rejected cross-site form submission"
                    );

                    let response = AppError::Forbidden(format!(
                        "cross-site {} to {}",
                        req.method(),
                        req.path()
                    ))
                    .error_response();
                    let (http_req, _payload) = req.into_parts();
                    let srv_response = ServiceResponse::new(http_req, response);

                    return Box::pin(async move { Ok(srv_response.map_into_right_body()) });
                }
            }
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res.map_into_left_body())
        })
    }
}
