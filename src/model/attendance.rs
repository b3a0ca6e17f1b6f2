use chrono::{DateTime, Duration, FixedOffset};
use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Every stored and compared instant carries its offset; naive times never
/// cross the registry boundary.
pub type Timestamp = DateTime<FixedOffset>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr, Serialize, ToSchema)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    ClockedIn,
    ClockedOut,
}

/// Form values posted by the clock page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum ClockAction {
    #[strum(serialize = "Clock In")]
    ClockIn,
    #[strum(serialize = "Clock Out")]
    ClockOut,
}

/// Per-status shape of a record. A clocked-in employee has no pending
/// clock-out debounce timestamp, and a clocked-out employee has every field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttendanceState {
    ClockedIn {
        in_time: Timestamp,
        /// Carried over from the previous shift, if any.
        out_time: Option<Timestamp>,
        last_clock_in_time: Timestamp,
    },
    ClockedOut {
        in_time: Timestamp,
        out_time: Timestamp,
        last_clock_in_time: Timestamp,
        last_clock_out_time: Timestamp,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    name: String,
    state: AttendanceState,
}

impl AttendanceRecord {
    /// Record created by an employee's first accepted clock-in.
    pub fn first_clock_in(name: impl Into<String>, now: Timestamp) -> Self {
        Self {
            name: name.into(),
            state: AttendanceState::ClockedIn {
                in_time: now,
                out_time: None,
                last_clock_in_time: now,
            },
        }
    }

    /// Rebuilds a record from its flat stored columns, rejecting combinations
    /// that no sequence of accepted transitions can produce.
    pub fn from_parts(
        name: String,
        status: RecordStatus,
        in_time: Option<Timestamp>,
        out_time: Option<Timestamp>,
        last_clock_in_time: Option<Timestamp>,
        last_clock_out_time: Option<Timestamp>,
    ) -> Result<Self, &'static str> {
        let in_time = in_time.ok_or("in_time missing")?;
        // Rows written before last_clock_in_time existed fall back to in_time.
        let last_clock_in_time = last_clock_in_time.unwrap_or(in_time);

        let state = match status {
            RecordStatus::ClockedIn => {
                if last_clock_out_time.is_some() {
                    return Err("clocked-in record carries a clock-out debounce timestamp");
                }
                AttendanceState::ClockedIn {
                    in_time,
                    out_time,
                    last_clock_in_time,
                }
            }
            RecordStatus::ClockedOut => {
                let out_time = out_time.ok_or("clocked-out record without out_time")?;
                AttendanceState::ClockedOut {
                    in_time,
                    out_time,
                    last_clock_in_time,
                    last_clock_out_time: last_clock_out_time.unwrap_or(out_time),
                }
            }
        };

        Ok(Self { name, state })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &AttendanceState {
        &self.state
    }

    pub fn status(&self) -> RecordStatus {
        match self.state {
            AttendanceState::ClockedIn { .. } => RecordStatus::ClockedIn,
            AttendanceState::ClockedOut { .. } => RecordStatus::ClockedOut,
        }
    }

    pub fn is_clocked_in(&self) -> bool {
        matches!(self.state, AttendanceState::ClockedIn { .. })
    }

    pub fn in_time(&self) -> Timestamp {
        match self.state {
            AttendanceState::ClockedIn { in_time, .. }
            | AttendanceState::ClockedOut { in_time, .. } => in_time,
        }
    }

    pub fn out_time(&self) -> Option<Timestamp> {
        match self.state {
            AttendanceState::ClockedIn { out_time, .. } => out_time,
            AttendanceState::ClockedOut { out_time, .. } => Some(out_time),
        }
    }

    pub fn last_clock_in_time(&self) -> Timestamp {
        match self.state {
            AttendanceState::ClockedIn {
                last_clock_in_time, ..
            }
            | AttendanceState::ClockedOut {
                last_clock_in_time, ..
            } => last_clock_in_time,
        }
    }

    pub fn last_clock_out_time(&self) -> Option<Timestamp> {
        match self.state {
            AttendanceState::ClockedIn { .. } => None,
            AttendanceState::ClockedOut {
                last_clock_out_time,
                ..
            } => Some(last_clock_out_time),
        }
    }

    /// Length of the last completed shift.
    pub fn shift_duration(&self) -> Option<Duration> {
        match self.state {
            AttendanceState::ClockedOut {
                in_time, out_time, ..
            } if out_time >= in_time => Some(out_time - in_time),
            _ => None,
        }
    }

    /// Clock-in applied at `now`. The previous `out_time` survives; the
    /// clock-out debounce timestamp does not.
    pub fn clocked_in(&self, now: Timestamp) -> Self {
        Self {
            name: self.name.clone(),
            state: AttendanceState::ClockedIn {
                in_time: now,
                out_time: self.out_time(),
                last_clock_in_time: now,
            },
        }
    }

    /// Clock-out applied at `now`, or `None` when the employee is not clocked in.
    pub fn clocked_out(&self, now: Timestamp) -> Option<Self> {
        match self.state {
            AttendanceState::ClockedIn {
                in_time,
                last_clock_in_time,
                ..
            } => Some(Self {
                name: self.name.clone(),
                state: AttendanceState::ClockedOut {
                    in_time,
                    out_time: now,
                    last_clock_in_time,
                    last_clock_out_time: now,
                },
            }),
            AttendanceState::ClockedOut { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn ist(h: u32, m: u32) -> Timestamp {
        FixedOffset::east_opt(5 * 3600 + 1800)
            .unwrap()
            .with_ymd_and_hms(2024, 7, 1, h, m, 0)
            .unwrap()
    }

    #[test]
    fn parses_form_actions() {
        assert_eq!(ClockAction::from_str("Clock In").unwrap(), ClockAction::ClockIn);
        assert_eq!(ClockAction::from_str("Clock Out").unwrap(), ClockAction::ClockOut);
        assert!(ClockAction::from_str("clock in").is_err());
        assert_eq!(ClockAction::ClockOut.to_string(), "Clock Out");
    }

    #[test]
    fn status_uses_stored_spelling() {
        assert_eq!(RecordStatus::ClockedIn.as_ref(), "clocked_in");
        assert_eq!(
            RecordStatus::from_str("clocked_out").unwrap(),
            RecordStatus::ClockedOut
        );
    }

    #[test]
    fn clock_in_after_clock_out_keeps_out_time_but_drops_debounce() {
        let rec = AttendanceRecord::first_clock_in("Bob", ist(10, 0))
            .clocked_out(ist(18, 0))
            .unwrap()
            .clocked_in(ist(19, 0));

        assert_eq!(rec.status(), RecordStatus::ClockedIn);
        assert_eq!(rec.in_time(), ist(19, 0));
        assert_eq!(rec.out_time(), Some(ist(18, 0)));
        assert_eq!(rec.last_clock_out_time(), None);
    }

    #[test]
    fn clock_out_requires_clocked_in() {
        let out = AttendanceRecord::first_clock_in("Bob", ist(10, 0))
            .clocked_out(ist(12, 0))
            .unwrap();
        assert!(out.clocked_out(ist(13, 0)).is_none());
        assert_eq!(out.last_clock_in_time(), ist(10, 0));
        assert_eq!(out.shift_duration(), Some(Duration::hours(2)));
    }

    #[test]
    fn from_parts_rejects_impossible_rows() {
        let err = AttendanceRecord::from_parts(
            "x".into(),
            RecordStatus::ClockedIn,
            Some(ist(10, 0)),
            None,
            Some(ist(10, 0)),
            Some(ist(11, 0)),
        );
        assert!(err.is_err());

        let err = AttendanceRecord::from_parts(
            "x".into(),
            RecordStatus::ClockedOut,
            Some(ist(10, 0)),
            None,
            Some(ist(10, 0)),
            None,
        );
        assert!(err.is_err());
    }
}
