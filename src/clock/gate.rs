use chrono::{FixedOffset, NaiveTime, TimeZone};

/// Daily window during which clock operations are accepted, evaluated in a
/// fixed civil offset regardless of the host's local zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityGate {
    open: NaiveTime,
    close: NaiveTime,
    offset: FixedOffset,
}

impl AvailabilityGate {
    pub fn new(open: NaiveTime, close: NaiveTime, offset: FixedOffset) -> Self {
        Self {
            open,
            close,
            offset,
        }
    }

    /// Both bounds are inclusive. A window whose close precedes its open
    /// wraps past midnight.
    pub fn is_open<Tz: TimeZone>(&self, now: &chrono::DateTime<Tz>) -> bool {
        let local = now.with_timezone(&self.offset).time();
        if self.open <= self.close {
            self.open <= local && local <= self.close
        } else {
            local >= self.open || local <= self.close
        }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Window as shown to users, e.g. `10:00 to 23:59`.
    pub fn describe(&self) -> String {
        format!(
            "{} to {}",
            self.open.format("%H:%M"),
            self.close.format("%H:%M")
        )
    }
}
