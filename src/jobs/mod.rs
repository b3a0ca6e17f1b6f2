//! Background jobs. Each runs in its own task and never touches the
//! per-name clock locks.

pub mod backup;
pub mod keepalive;
