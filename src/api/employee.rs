use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use tracing::{debug, error};

use crate::api::Machine;
use crate::models::{EmployeeListResponse, EmployeeView};
use crate::registry::ClockRegistry;

/// List employees
#[utoipa::path(
    get,
    path = "/employees",
    responses(
        (status = 200, description = "Every attendance record, sorted by name", body = EmployeeListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn list_employees(machine: web::Data<Machine>) -> actix_web::Result<impl Responder> {
    // read-only, served whether or not the clock is open
    let records = machine.registry().list_all().await.map_err(|e| {
        error!(error = %e, "Failed to fetch employees");
        ErrorInternalServerError("Internal Server Error")
    })?;
    debug!(total = records.len(), "Fetched employees");

    let offset = machine.gate().offset();
    let data: Vec<EmployeeView> = records
        .iter()
        .map(|rec| EmployeeView::from_record(rec, offset))
        .collect();

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        total: data.len(),
        data,
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{TestState, at};
    use actix_web::{App, test};
    use serde_json::Value;

    #[actix_web::test]
    async fn lists_records_even_when_gate_is_closed() {
        let state = TestState::new(at(2, 0)).await;
        state.seed("Bob", at(10, 5), Some(at(18, 35))).await;
        let app = test::init_service(App::new().configure(|cfg| state.register(cfg))).await;

        let req = test::TestRequest::get().uri("/employees").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["total"], 1);
        let bob = &body["data"][0];
        assert_eq!(bob["name"], "Bob");
        assert_eq!(bob["status"], "clocked_out");
        assert_eq!(bob["in_time"], "2024-07-01 10:05:00");
        assert_eq!(bob["out_time"], "2024-07-01 18:35:00");
        assert_eq!(bob["last_clock_out_time"], "2024-07-01 18:35:00");
    }
}
