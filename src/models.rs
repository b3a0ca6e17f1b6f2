use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::attendance::{AttendanceRecord, RecordStatus};
use crate::utils::time::to_display;

/// Fields missing from the form arrive empty and are rejected by the
/// state machine rather than by the extractor.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ClockForm {
    #[serde(default)]
    #[schema(example = "Bob")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "Clock In")]
    pub action: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeView {
    #[schema(example = "Bob")]
    pub name: String,
    pub status: RecordStatus,
    #[schema(example = "2024-07-01 10:05:00")]
    pub in_time: String,
    #[schema(example = "2024-07-01 18:30:00", nullable = true)]
    pub out_time: Option<String>,
    #[schema(example = "2024-07-01 10:05:00")]
    pub last_clock_in_time: String,
    #[schema(example = "2024-07-01 18:30:00", nullable = true)]
    pub last_clock_out_time: Option<String>,
}

impl EmployeeView {
    pub fn from_record(rec: &AttendanceRecord, offset: FixedOffset) -> Self {
        Self {
            name: rec.name().to_string(),
            status: rec.status(),
            in_time: to_display(&rec.in_time(), offset),
            out_time: rec.out_time().map(|t| to_display(&t, offset)),
            last_clock_in_time: to_display(&rec.last_clock_in_time(), offset),
            last_clock_out_time: rec.last_clock_out_time().map(|t| to_display(&t, offset)),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<EmployeeView>,
    #[schema(example = 1)]
    pub total: usize,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    pub gate_open: bool,
    #[schema(example = "2024-07-01T10:05:00+05:30")]
    pub now: String,
}
