use actix_web::{
    HttpResponse, Responder,
    error::ErrorInternalServerError,
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web,
};
use tracing::error;

use crate::api::Machine;
use crate::export::timesheet_xlsx;
use crate::registry::ClockRegistry;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Download time sheet
#[utoipa::path(
    get,
    path = "/downloadTimeSheet",
    responses(
        (status = 200, description = "XLSX workbook with name, status, in_time, out_time and duration columns",
         content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn download_timesheet(machine: web::Data<Machine>) -> actix_web::Result<impl Responder> {
    let records = machine.registry().list_all().await.map_err(|e| {
        error!(error = %e, "Failed to fetch employees for export");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let bytes = timesheet_xlsx(&records, machine.gate().offset()).map_err(|e| {
        error!(error = %e, rows = records.len(), "Failed to build timesheet");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok()
        .content_type(XLSX_MIME)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename("timesheet.xlsx".to_string())],
        })
        .body(bytes))
}
