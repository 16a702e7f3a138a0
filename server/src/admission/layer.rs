use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::policy::Admission;
use crate::error::AppError;
use crate::state::AppState;

/// Methods granted to admitted cross-origin callers.
const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE";

/// Admission middleware: every inbound request passes here before routing.
///
/// Admitted cross-origin requests continue down the stack and the response
/// gains the CORS grant headers for that exact origin. Preflights are
/// answered directly. A rejected origin never reaches a handler; the error
/// boundary renders the rejection.
pub async fn admit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let Some(origin) = origin else {
        // No Origin header: same-origin or non-browser client.
        return Ok(next.run(req).await);
    };

    if state.policy.evaluate(Some(&origin)) == Admission::Reject {
        return Err(AppError::OriginRejected(origin));
    }

    let origin_value =
        HeaderValue::from_str(&origin).map_err(|_| AppError::OriginRejected(origin.clone()))?;

    if req.method() == Method::OPTIONS {
        // Preflight: answer directly, no handler involved.
        let requested_headers = req
            .headers()
            .get(header::ACCESS_CONTROL_REQUEST_HEADERS)
            .cloned();

        let mut response = StatusCode::NO_CONTENT.into_response();
        let headers = response.headers_mut();
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin_value);
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        if let Some(requested) = requested_headers {
            headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, requested);
        }
        return Ok(response);
    }

    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin_value);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.append(header::VARY, HeaderValue::from_static("Origin"));

    Ok(response)
}
