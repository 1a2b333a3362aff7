use actix_web::{web, HttpResponse};
use log::info;

use crate::models::{ApiError, LoginRequest, RegisterRequest, RegisterVendorRequest};
use crate::services::AuthService;

pub async fn register(
    auth: web::Data<AuthService>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    info!("Registering new {:?} account: {}", payload.role, payload.email);
    let response = auth.register(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

pub async fn register_vendor(
    auth: web::Data<AuthService>,
    payload: web::Json<RegisterVendorRequest>,
) -> Result<HttpResponse, ApiError> {
    info!("Registering new vendor account: {}", payload.email);
    let response = auth.register_vendor(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

pub async fn login(
    auth: web::Data<AuthService>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    info!("Login attempt for {}", payload.email);
    let response = auth.login(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
