use crate::{
    api::{attendance, employee, health, timesheet},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

/// Per-peer limiter for the clock form. Falls back to one request per
/// millisecond when the configured rate is unusable.
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        (60_000 / requests_per_min as u64).max(1)
    };
    let burst = requests_per_min.max(1);

    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(burst)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_default();
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    cfg.service(web::resource("/").route(web::get().to(attendance::index)))
        .service(
            web::resource("/clock")
                .wrap(build_limiter(config.rate_clock_per_min))
                .route(web::post().to(attendance::clock)),
        )
        .service(web::resource("/employees").route(web::get().to(employee::list_employees)))
        .service(
            web::resource("/downloadTimeSheet")
                .route(web::get().to(timesheet::download_timesheet)),
        )
        .service(web::resource("/health").route(web::get().to(health::health)));
}
