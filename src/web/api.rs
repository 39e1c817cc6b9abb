//! API handlers for the `/api/*` HTTP endpoints. Each handler invokes one
//! core operation and returns its result shape as JSON.

use actix_web::web::Query;
use actix_web::{HttpResponse, Responder, get};
use serde::{Deserialize, Serialize};

use crate::db::SqliteStore;
use crate::identity::device_uuid::get_or_create;
use crate::identity::fingerprint::{fingerprint, host_attributes};
use crate::identity::interfaces::{
    DatalinkSource, enumerate, enumerate_by_pattern, primary,
};

#[derive(Deserialize)]
pub struct PatternQuery {
    pattern: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct PrimaryMacBody {
    mac: Option<String>,
}

#[derive(Serialize)]
struct DeviceUuidBody {
    uuid: String,
}

fn error_response(message: String) -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorBody { error: message })
}

#[get("/api/interfaces")]
pub async fn api_interfaces(query: Query<PatternQuery>) -> impl Responder {
    let result = match query.pattern.as_deref() {
        Some(pattern) if !pattern.is_empty() => enumerate_by_pattern(&DatalinkSource, pattern),
        _ => enumerate(&DatalinkSource),
    };

    match result {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(e) => error_response(e.to_string()),
    }
}

#[get("/api/primary-mac")]
pub async fn api_primary_mac() -> impl Responder {
    match primary(&DatalinkSource) {
        Ok(mac) => HttpResponse::Ok().json(PrimaryMacBody { mac }),
        Err(e) => error_response(e.to_string()),
    }
}

#[get("/api/fingerprint")]
pub async fn api_fingerprint() -> impl Responder {
    HttpResponse::Ok().json(fingerprint(host_attributes()))
}

#[get("/api/device-uuid")]
pub async fn api_device_uuid() -> impl Responder {
    let store = match SqliteStore::open() {
        Ok(store) => store,
        Err(e) => return error_response(e.to_string()),
    };

    match get_or_create(&store) {
        Ok(uuid) => HttpResponse::Ok().json(DeviceUuidBody { uuid }),
        Err(e) => error_response(e.to_string()),
    }
}
