use crate::clock::AttendanceMachine;
use crate::registry::sqlite::SqliteRegistry;

pub mod attendance;
pub mod employee;
pub mod health;
pub mod timesheet;

pub type Machine = AttendanceMachine<SqliteRegistry>;

#[cfg(test)]
pub mod test_support {
    use actix_web::web;
    use chrono::{FixedOffset, TimeZone};
    use sqlx::sqlite::SqlitePoolOptions;

    use super::Machine;
    use crate::config::Config;
    use crate::db::init_schema;
    use crate::model::attendance::{AttendanceRecord, Timestamp};
    use crate::registry::ClockRegistry;
    use crate::registry::sqlite::SqliteRegistry;
    use crate::routes;
    use crate::utils::time::Clock;

    pub fn at(h: u32, m: u32) -> Timestamp {
        FixedOffset::east_opt(19_800)
            .unwrap()
            .with_ymd_and_hms(2024, 7, 1, h, m, 0)
            .unwrap()
    }

    /// Application state over an in-memory database with time frozen at `now`.
    pub struct TestState {
        pub machine: web::Data<Machine>,
        pub config: web::Data<Config>,
        pub clock: web::Data<Clock>,
    }

    impl TestState {
        pub async fn new(now: Timestamp) -> Self {
            let config = Config::from_lookup(|_| None).unwrap();
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .connect("sqlite::memory:")
                .await
                .unwrap();
            init_schema(&pool).await.unwrap();

            let registry = SqliteRegistry::new(pool, config.utc_offset);
            let machine = Machine::new(registry, config.gate(), config.debounce);

            Self {
                machine: web::Data::new(machine),
                config: web::Data::new(config),
                clock: web::Data::new(Clock::Fixed(now)),
            }
        }

        pub fn register(&self, cfg: &mut web::ServiceConfig) {
            cfg.app_data(self.machine.clone())
                .app_data(self.config.clone())
                .app_data(self.clock.clone());
            routes::configure(cfg, &self.config);
        }

        /// Writes a record directly, bypassing gate and debounce.
        pub async fn seed(&self, name: &str, clock_in: Timestamp, clock_out: Option<Timestamp>) {
            let mut rec = AttendanceRecord::first_clock_in(name, clock_in);
            if let Some(out) = clock_out {
                rec = rec.clocked_out(out).unwrap();
            }
            self.machine.registry().upsert(&rec, None).await.unwrap();
        }
    }
}
