use crate::api::{attendance, dashboard, department, employee, setting};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use anyhow::Context;
use std::sync::Arc;

pub type ApiLimiter = Governor<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP limiter allowing `requests_per_min` with an equal burst.
pub fn build_limiter(requests_per_min: u32) -> anyhow::Result<ApiLimiter> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / u64::from(requests_per_min)).max(1);

    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .context("Invalid rate limiter configuration")?;
    Ok(Governor::new(&cfg))
}

/// Mount the API under `prefix`, behind the rate limiter.
pub fn configure(cfg: &mut web::ServiceConfig, prefix: &str, limiter: Arc<ApiLimiter>) {
    cfg.service(
        web::scope(prefix)
            .wrap(limiter) // rate limiting
            .configure(api_services),
    );
}

pub fn api_services(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/employee")
            // /employee
            .service(
                web::resource("")
                    .route(web::post().to(employee::create_employee))
                    .route(web::get().to(employee::list_employees)),
            )
            // /employee/{id}
            .service(
                web::resource("/{id}")
                    .route(web::put().to(employee::update_employee))
                    .route(web::get().to(employee::get_employee))
                    .route(web::delete().to(employee::delete_employee)),
            ),
    )
    .service(
        web::scope("/department")
            // /department
            .service(
                web::resource("")
                    .route(web::post().to(department::create_department))
                    .route(web::get().to(department::list_departments)),
            )
            // /department/{id}
            .service(
                web::resource("/{id}")
                    .route(web::put().to(department::update_department))
                    .route(web::get().to(department::get_department))
                    .route(web::delete().to(department::delete_department)),
            ),
    )
    .service(
        web::scope("/attendance")
            // /attendance
            .service(
                web::resource("")
                    .route(web::post().to(attendance::create_attendance))
                    .route(web::get().to(attendance::list_attendance)),
            )
            // /attendance/stats and /attendance/report before /{id}
            .service(web::resource("/stats").route(web::get().to(attendance::attendance_stats)))
            .service(web::resource("/report").route(web::get().to(attendance::attendance_report)))
            // /attendance/{id}
            .service(
                web::resource("/{id}")
                    .route(web::put().to(attendance::update_attendance))
                    .route(web::get().to(attendance::get_attendance))
                    .route(web::delete().to(attendance::delete_attendance)),
            ),
    )
    .service(web::resource("/dashboard").route(web::get().to(dashboard::get_dashboard)))
    .service(
        web::scope("/setting")
            // /setting
            .service(web::resource("").route(web::get().to(setting::list_settings)))
            // /setting/{id}
            .service(
                web::resource("/{id}")
                    .route(web::get().to(setting::get_setting))
                    .route(web::put().to(setting::update_setting)),
            ),
    );
}
