pub mod leaderboard;
pub mod people;

use actix_cors::Cors;
use actix_web::web;

/// Register all routes of the service
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(people::show_people))
        .route("/health", web::get().to(leaderboard::health))
        // JSON endpoints may be embedded from any origin
        .service(
            web::scope("/api")
                .wrap(Cors::permissive())
                .route("/leaderboard", web::get().to(leaderboard::get_leaderboard))
                .route("/refresh", web::post().to(leaderboard::trigger_refresh)),
        );
}
