use crate::clock::outcome::OutcomeKind;
use crate::model::attendance::RecordStatus;
use crate::models::{ClockForm, EmployeeListResponse, EmployeeView, HealthResponse};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Clock API",
        version = "0.1.0",
        description = r#"
## Attendance clock

Employees clock in and out by name from a shared terminal.

### Rules
- Clocking is only possible inside the daily window (default **10:00 to 23:59 IST**).
- A second clock-in (or clock-out) by the same person within the debounce
  interval (default **5 minutes**) is rejected as a duplicate.
- Clocking in while clocked in, or out while clocked out, is rejected.

### Responses
`POST /clock` always redirects back to `/`; the outcome is shown as a one-shot
message on the next page load. Listing and export endpoints are read-only and
available at any hour.
"#,
    ),
    paths(
        crate::api::attendance::clock,
        crate::api::employee::list_employees,
        crate::api::timesheet::download_timesheet,
        crate::api::health::health,
    ),
    components(
        schemas(
            ClockForm,
            EmployeeView,
            EmployeeListResponse,
            HealthResponse,
            RecordStatus,
            OutcomeKind
        )
    ),
    tags(
        (name = "Attendance", description = "Clock in / clock out"),
        (name = "Employee", description = "Attendance listing and export"),
        (name = "Health", description = "Liveness"),
    )
)]
pub struct ApiDoc;
