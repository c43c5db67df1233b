use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub ok: bool,
    pub name: String,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RouteIndex {
    pub ok: bool,
    pub routes: Vec<String>,
}

pub struct HealthHandler {
    name: String,
}

impl HealthHandler {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Liveness probe. Independent of agent state so it also works for
    /// cold-start prewarming.
    pub async fn health(&self) -> impl IntoResponse {
        let status = HealthStatus {
            ok: true,
            name: self.name.clone(),
            status: "running".to_string(),
        };

        (StatusCode::OK, Json(status))
    }

    /// Route listing for quick smoke tests
    pub async fn index(&self) -> impl IntoResponse {
        let index = RouteIndex {
            ok: true,
            routes: vec!["/health".to_string(), "POST /v1/chat".to_string()],
        };

        (StatusCode::OK, Json(index))
    }
}
