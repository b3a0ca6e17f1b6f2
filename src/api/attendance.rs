use actix_web::{HttpRequest, HttpResponse, Responder, http::header, web};
use tracing::{Instrument, error, info_span, warn};
use uuid::Uuid;

use crate::api::Machine;
use crate::config::Config;
use crate::models::ClockForm;
use crate::registry::ClockRegistry;
use crate::utils::{flash, html, time::Clock};

const SOMETHING_WENT_WRONG: &str = "Something went wrong, please try again.";
const OUTCOME_UNKNOWN: &str =
    "The request took too long and may not have been recorded. Check the list before trying again.";

/// Clock page: form plus attendance table, or the inactive page outside
/// opening hours.
pub async fn index(
    req: HttpRequest,
    machine: web::Data<Machine>,
    clock: web::Data<Clock>,
) -> impl Responder {
    let gate = machine.gate();
    if !gate.is_open(&clock.now()) {
        return HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html::render_inactive(&gate.describe()));
    }

    let records = match machine.registry().list_all().await {
        Ok(records) => records,
        Err(e) => {
            error!(error = %e, "Failed to list employees");
            return HttpResponse::InternalServerError()
                .content_type("text/plain; charset=utf-8")
                .body(SOMETHING_WENT_WRONG);
        }
    };

    let pending = flash::take(&req);
    let mut response = HttpResponse::Ok();
    response.content_type("text/html; charset=utf-8");
    if pending.is_some() {
        response.cookie(flash::clear());
    }
    response.body(html::render_index(&records, pending.as_deref(), gate.offset()))
}

/// Clock in / clock out
#[utoipa::path(
    post,
    path = "/clock",
    request_body(
        content = ClockForm,
        description = "Employee name and `Clock In` or `Clock Out`",
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 303, description = "Always redirects to the clock page; the outcome is carried as a flash message"),
        (status = 429, description = "Too many requests")
    ),
    tag = "Attendance"
)]
pub async fn clock(
    machine: web::Data<Machine>,
    config: web::Data<Config>,
    clock: web::Data<Clock>,
    form: web::Form<ClockForm>,
) -> impl Responder {
    let now = clock.now();
    let request_id = Uuid::new_v4();
    let span = info_span!(
        "clock",
        %request_id,
        name = %form.name,
        action = %form.action
    );

    let attempt = tokio::time::timeout(
        config.clock_timeout,
        machine.apply_clock(&form.name, &form.action, now),
    )
    .instrument(span)
    .await;

    let message = match attempt {
        Ok(Ok(outcome)) => outcome.message(form.name.trim(), &machine.gate().describe()),
        Ok(Err(e)) => {
            error!(
                error = %e,
                %request_id,
                name = %form.name,
                action = %form.action,
                %now,
                "Clock request failed"
            );
            SOMETHING_WENT_WRONG.to_string()
        }
        Err(_) => {
            warn!(
                %request_id,
                name = %form.name,
                action = %form.action,
                %now,
                "Clock request timed out, outcome unknown"
            );
            OUTCOME_UNKNOWN.to_string()
        }
    };

    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .cookie(flash::set(&message))
        .finish()
}
