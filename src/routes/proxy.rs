use axum::{
    body::{Body, Bytes},
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::middleware::cors::insert_cors_headers;
use crate::services::proxy_service::ProxyRequest;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub path: Option<String>,
    pub method: Option<String>,
}

fn with_cors(mut response: Response) -> Response {
    insert_cors_headers(response.headers_mut());
    response
}

fn json_error(status: StatusCode, message: &str) -> Response {
    with_cors((status, Json(json!({ "error": message }))).into_response())
}

#[utoipa::path(
    post,
    path = "/proxy",
    params(
        ("path" = String, Query, description = "Upstream path to forward to"),
        ("method" = Option<String>, Query, description = "Method to use upstream; defaults to the request method")
    ),
    responses(
        (status = 204, description = "Pre-flight answered locally"),
        (status = 400, description = "Missing 'path' query parameter"),
        (status = 500, description = "Upstream unreachable")
    )
)]
pub async fn proxy(
    State(state): State<AppState>,
    method: Method,
    Query(query): Query<ProxyQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if method == Method::OPTIONS {
        return with_cors(StatusCode::NO_CONTENT.into_response());
    }

    let Some(path) = query.path.filter(|p| !p.is_empty()) else {
        return json_error(StatusCode::BAD_REQUEST, "Missing 'path' query parameter");
    };

    let forward_method = query
        .method
        .as_deref()
        .unwrap_or(method.as_str())
        .to_uppercase();
    let Ok(forward_method) = reqwest::Method::from_bytes(forward_method.as_bytes()) else {
        return json_error(StatusCode::BAD_REQUEST, "Invalid 'method' query parameter");
    };

    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let request = ProxyRequest {
        path,
        method: forward_method,
        authorization,
        body,
    };

    match state.proxy_service.forward(request).await {
        Ok(upstream) => {
            let status = StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY);
            let content_type = HeaderValue::from_str(&upstream.content_type)
                .unwrap_or_else(|_| HeaderValue::from_static("application/json"));
            let mut response = Response::new(Body::from(upstream.body));
            *response.status_mut() = status;
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, content_type);
            with_cors(response)
        }
        Err(e) => {
            tracing::error!(error = ?e, "Proxy request failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Proxy request failed")
        }
    }
}
