use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::{ok, ready, LocalBoxFuture, Ready};
use log::warn;
use mongodb::bson::oid::ObjectId;
use std::rc::Rc;

use crate::models::{ApiError, Role};
use crate::services::TokenService;

/// The request-scoped session context: who is acting, resolved from a
/// verified bearer token. Handlers take this as an extractor argument
/// rather than reading ambient state.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: ObjectId,
    pub email: String,
    pub role: Role,
}

impl Identity {
    /// Role gate for vendor-only operations. Ownership is checked
    /// separately at the store layer via vendor-scoped filters.
    pub fn require_vendor(&self) -> Result<(), ApiError> {
        match self.role {
            Role::Vendor => Ok(()),
            Role::Customer => Err(ApiError::Forbidden("vendor role required".to_string())),
        }
    }
}

impl FromRequest for Identity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Identity>()
                .cloned()
                .ok_or_else(|| ApiError::TokenInvalid.into()),
        )
    }
}

/// Authorization middleware: verifies the `Authorization: Bearer <token>`
/// header and attaches the resolved Identity to the request, rejecting the
/// request with 401 before it reaches a handler otherwise.
pub struct RequireAuth;

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequireAuthService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RequireAuthService {
            service: Rc::new(service),
        })
    }
}

pub struct RequireAuthService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let tokens = req
                .app_data::<web::Data<TokenService>>()
                .cloned()
                .ok_or_else(|| {
                    Error::from(ApiError::InternalError(
                        "TokenService not configured".to_string(),
                    ))
                })?;

            let token = extract_bearer_token(&req).ok_or(ApiError::TokenInvalid)?;
            let claims = tokens.verify(token)?;
            let user_id = ObjectId::parse_str(&claims.sub).map_err(|e| {
                warn!("Token carried a malformed subject id: {}", e);
                ApiError::TokenInvalid
            })?;

            req.extensions_mut().insert(Identity {
                user_id,
                email: claims.email,
                role: claims.role,
            });

            service.call(req).await
        })
    }
}

fn extract_bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn bearer_token_is_extracted() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def.ghi"))
            .to_srv_request();
        assert_eq!(extract_bearer_token(&req), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_or_malformed_header_yields_none() {
        let req = TestRequest::default().to_srv_request();
        assert_eq!(extract_bearer_token(&req), None);

        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
            .to_srv_request();
        assert_eq!(extract_bearer_token(&req), None);

        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer "))
            .to_srv_request();
        assert_eq!(extract_bearer_token(&req), None);
    }

    #[test]
    fn customer_role_is_rejected_for_vendor_operations() {
        let identity = Identity {
            user_id: ObjectId::new(),
            email: "ada@x.com".to_string(),
            role: Role::Customer,
        };
        assert!(matches!(identity.require_vendor(), Err(ApiError::Forbidden(_))));

        let identity = Identity {
            role: Role::Vendor,
            ..identity
        };
        assert!(identity.require_vendor().is_ok());
    }
}
