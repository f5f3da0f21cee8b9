use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;

use crate::services::{LeaderboardService, RefreshOutcome};

// ============ Response DTOs ============

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub success: bool,
    pub message: String,
    pub reply_contributors: usize,
    pub pull_request_contributors: usize,
}

// ============ Leaderboard Handlers ============

/// GET /api/leaderboard
/// Last computed leaderboards, ordered by descending count
pub async fn get_leaderboard(service: web::Data<LeaderboardService>) -> impl Responder {
    HttpResponse::Ok().json(service.snapshot().as_ref())
}

/// POST /api/refresh
/// Manually trigger a refresh of both leaderboards
pub async fn trigger_refresh(service: web::Data<LeaderboardService>) -> impl Responder {
    log::info!("Manual leaderboard refresh triggered");

    match service.refresh().await {
        Ok(RefreshOutcome::Completed) => {
            let snapshot = service.snapshot();
            HttpResponse::Ok().json(RefreshResponse {
                success: true,
                message: "Refresh completed".to_string(),
                reply_contributors: snapshot.replies.len(),
                pull_request_contributors: snapshot.pull_requests.len(),
            })
        }
        Ok(RefreshOutcome::AlreadyRunning) => HttpResponse::Conflict().json(RefreshResponse {
            success: false,
            message: "A refresh is already running".to_string(),
            reply_contributors: 0,
            pull_request_contributors: 0,
        }),
        Err(e) => {
            log::error!("Manual refresh failed: {}", e);
            HttpResponse::BadGateway().json(RefreshResponse {
                success: false,
                message: format!("Refresh failed: {}", e),
                reply_contributors: 0,
                pull_request_contributors: 0,
            })
        }
    }
}

/// GET /health
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}
