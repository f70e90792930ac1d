use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    extract::rejection::JsonRejection,
    http::StatusCode,
    routing::{get, post},
};
use chrono::Utc;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tracing::info;

use crate::model::ManualCoupon;

/// Shared state handed to the router at construction. The coupon list is the
/// only state touched by more than one actor, so it sits behind a mutex.
#[derive(Clone)]
pub struct AppState {
    pub coupons: Arc<Mutex<Vec<ManualCoupon>>>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/add", post(add_coupon))
        .with_state(state)
}

async fn home() -> &'static str {
    "Bot avançado de cupons rodando!"
}

async fn add_coupon(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> (StatusCode, Json<Value>) {
    let Ok(Json(payload)) = payload else {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "Envie JSON"})));
    };

    let (Some(titulo), Some(descricao), Some(cupom), Some(detalhes)) = (
        required_field(&payload, "titulo"),
        required_field(&payload, "descricao"),
        required_field(&payload, "cupom"),
        required_field(&payload, "detalhes"),
    ) else {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "Campos faltando"})));
    };

    let coupon = ManualCoupon {
        titulo: titulo.to_string(),
        descricao: descricao.to_string(),
        cupom: cupom.to_string(),
        detalhes: detalhes.to_string(),
        received_at: Utc::now(),
    };

    let mut coupons = state.coupons.lock().await;
    coupons.push(coupon);
    info!("manual coupon added, list size is now {}", coupons.len());

    (StatusCode::OK, Json(json!({"status": "Cupom adicionado com sucesso!"})))
}

fn required_field<'a>(payload: &'a Value, name: &str) -> Option<&'a str> {
    payload
        .get(name)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
