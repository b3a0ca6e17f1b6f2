use chrono::Duration;
use std::str::FromStr;
use tracing::{info, instrument, warn};

use super::gate::AvailabilityGate;
use super::locks::NameLocks;
use super::outcome::Outcome;
use crate::model::attendance::{AttendanceRecord, ClockAction, Timestamp};
use crate::registry::{ClockRegistry, RegistryError};

/// Re-reads allowed after a versioned write loses a race. The name lock makes
/// this rare; it only happens when another process shares the database.
const MAX_CONFLICT_RETRIES: usize = 3;

/// What a clock request does to the current record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub outcome: Outcome,
    /// Record to persist; `None` for every rejection.
    pub next: Option<AttendanceRecord>,
}

impl Transition {
    fn reject(outcome: Outcome) -> Self {
        Self {
            outcome,
            next: None,
        }
    }

    fn accept(action: ClockAction, next: AttendanceRecord) -> Self {
        Self {
            outcome: Outcome::Accepted(action),
            next: Some(next),
        }
    }
}

/// Transition rule for one action against the record as last stored.
/// Debounce is checked before the already-in-state rule for both actions.
pub fn decide(
    current: Option<&AttendanceRecord>,
    name: &str,
    action: ClockAction,
    now: Timestamp,
    debounce: Duration,
) -> Transition {
    let too_soon = |last: Option<Timestamp>| last.is_some_and(|t| now - t < debounce);

    match (action, current) {
        (ClockAction::ClockIn, None) => {
            Transition::accept(action, AttendanceRecord::first_clock_in(name, now))
        }
        (ClockAction::ClockIn, Some(rec)) => {
            if too_soon(Some(rec.last_clock_in_time())) {
                Transition::reject(Outcome::RejectedDebounce(action))
            } else if rec.is_clocked_in() {
                Transition::reject(Outcome::RejectedAlreadyInState(action))
            } else {
                Transition::accept(action, rec.clocked_in(now))
            }
        }
        (ClockAction::ClockOut, None) => Transition::reject(Outcome::RejectedNotFound),
        (ClockAction::ClockOut, Some(rec)) => {
            if too_soon(rec.last_clock_out_time()) {
                return Transition::reject(Outcome::RejectedDebounce(action));
            }
            match rec.clocked_out(now) {
                Some(next) => Transition::accept(action, next),
                None => Transition::reject(Outcome::RejectedAlreadyInState(action)),
            }
        }
    }
}

pub struct AttendanceMachine<R> {
    registry: R,
    gate: AvailabilityGate,
    debounce: Duration,
    locks: NameLocks,
}

impl<R: ClockRegistry> AttendanceMachine<R> {
    pub fn new(registry: R, gate: AvailabilityGate, debounce: Duration) -> Self {
        Self {
            registry,
            gate,
            debounce,
            locks: NameLocks::default(),
        }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn gate(&self) -> &AvailabilityGate {
        &self.gate
    }

    /// Validates and applies one clock request. `now` is sampled once by the
    /// caller and used for both the decision and the stored values.
    ///
    /// Business rejections are `Ok`; only registry failures are `Err`.
    #[instrument(name = "apply_clock", skip(self, now), fields(now = %now))]
    pub async fn apply_clock(
        &self,
        name: &str,
        action: &str,
        now: Timestamp,
    ) -> Result<Outcome, RegistryError> {
        if !self.gate.is_open(&now) {
            return Ok(Outcome::RejectedGateClosed);
        }
        let Ok(action) = ClockAction::from_str(action) else {
            return Ok(Outcome::RejectedInvalidAction);
        };
        let name = name.trim();
        if name.is_empty() {
            return Ok(Outcome::RejectedInvalidInput);
        }

        let _guard = self.locks.acquire(name).await;

        let mut attempt = 0;
        loop {
            let current = self.registry.get(name).await?;
            let Transition { outcome, next } = decide(
                current.as_ref().map(|s| &s.record),
                name,
                action,
                now,
                self.debounce,
            );

            let Some(next) = next else {
                info!(outcome = ?outcome.kind(), "clock request rejected");
                return Ok(outcome);
            };

            match self
                .registry
                .upsert(&next, current.map(|s| s.version))
                .await
            {
                Ok(version) => {
                    info!(status = %next.status(), version, "clock request accepted");
                    return Ok(outcome);
                }
                Err(RegistryError::Conflict(_)) if attempt < MAX_CONFLICT_RETRIES => {
                    attempt += 1;
                    warn!(attempt, "record changed underneath us, re-reading");
                }
                Err(e) => return Err(e),
            }
        }
    }
}
