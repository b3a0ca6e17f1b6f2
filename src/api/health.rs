use actix_web::{HttpResponse, Responder, web};

use crate::api::Machine;
use crate::models::HealthResponse;
use crate::utils::time::{Clock, to_stored};

/// Liveness probe; also the keep-alive target
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health(machine: web::Data<Machine>, clock: web::Data<Clock>) -> impl Responder {
    let now = clock.now();
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        gate_open: machine.gate().is_open(&now),
        now: to_stored(&now),
    })
}
