//! HTTP routes.
//!
//! Handlers only extract parameters, call [`WeatherService`] and shape the JSON
//! response; [`ApiError`] turns failures into status codes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use weather_core::{WeatherError, WeatherReport, WeatherService};

type AppState = Arc<WeatherService>;

pub fn router(service: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/v1/weather", get(get_weather))
        .route("/api/v1/weather/", get(get_weather))
        .route("/api/v1/weather/cities", get(list_cities))
        .route("/api/v1/weather/heat-index", get(heat_index))
        .route("/api/v1/weather/info", get(info))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(service)
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound {
        detail: String,
        available_cities: Vec<String>,
    },
    Internal(String),
}

impl ApiError {
    fn from_weather(err: WeatherError, service: &WeatherService) -> Self {
        match err {
            WeatherError::InvalidInput(_) => Self::BadRequest(err.to_string()),
            WeatherError::CityNotFound(_) => Self::NotFound {
                detail: err.to_string(),
                available_cities: service.list_cities().into_iter().map(String::from).collect(),
            },
            WeatherError::DuplicateCity(_) => Self::Internal(err.user_message()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "detail": detail }))).into_response()
            }
            ApiError::NotFound {
                detail,
                available_cities,
            } => (
                StatusCode::NOT_FOUND,
                Json(json!({ "detail": detail, "available_cities": available_cities })),
            )
                .into_response(),
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "detail": detail })))
                    .into_response()
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub docs: String,
}

async fn root(State(service): State<AppState>) -> Json<RootResponse> {
    let settings = service.settings();
    Json(RootResponse {
        message: format!("Welcome to {}", settings.app_name),
        version: settings.api_version.clone(),
        docs: "/api/v1/weather/info".to_string(),
    })
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

#[derive(Debug, Deserialize)]
pub struct CityQuery {
    pub city: String,
}

/// `GET /api/v1/weather/?city=<name>`
async fn get_weather(
    State(service): State<AppState>,
    query: Result<Query<CityQuery>, QueryRejection>,
) -> Result<Json<WeatherReport>, ApiError> {
    let Query(CityQuery { city }) = query?;

    service
        .report(&city)
        .map(Json)
        .map_err(|e| ApiError::from_weather(e, &service))
}

async fn list_cities(State(service): State<AppState>) -> Json<Vec<String>> {
    Json(service.list_cities().into_iter().map(String::from).collect())
}

#[derive(Debug, Deserialize)]
pub struct HeatIndexQuery {
    pub temperature: f64,
    pub humidity: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HeatIndexResponse {
    pub temperature: f64,
    pub humidity: i32,
    pub heat_index: f64,
}

/// `GET /api/v1/weather/heat-index?temperature=<°F>&humidity=<percent>`
async fn heat_index(
    State(service): State<AppState>,
    query: Result<Query<HeatIndexQuery>, QueryRejection>,
) -> Result<Json<HeatIndexResponse>, ApiError> {
    let Query(HeatIndexQuery {
        temperature,
        humidity,
    }) = query?;

    let heat_index = service
        .get_heat_index(temperature, humidity)
        .map_err(|e| ApiError::from_weather(e, &service))?;

    Ok(Json(HeatIndexResponse {
        temperature,
        humidity,
        heat_index,
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InfoResponse {
    pub app_name: String,
    pub version: String,
    pub debug_mode: String,
}

async fn info(State(service): State<AppState>) -> Json<InfoResponse> {
    let info = service.get_info();
    Json(InfoResponse {
        app_name: info.app_name,
        version: info.version,
        debug_mode: (if info.debug_mode { "True" } else { "False" }).to_string(),
    })
}
