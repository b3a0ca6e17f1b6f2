//! Attendance state machine: availability gate, per-name serialization and
//! the clock-in/clock-out transition rules.

pub mod gate;
pub mod locks;
pub mod machine;
pub mod outcome;

pub use gate::AvailabilityGate;
pub use machine::AttendanceMachine;
