use std::path::Path;

use axum::{middleware, routing::get, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::{ServeDir, ServeFile};

use crate::admission;
use crate::config::Config;
use crate::error;
use crate::state::AppState;
use crate::ws::handler as ws_handler;

/// Feature router groups mounted under /api/*.
///
/// Each group is owned outside the gateway; this struct is the plug-in
/// boundary. The default leaves every group empty, which turns the
/// corresponding prefix into a plain 404 until a real router is supplied.
#[derive(Default)]
pub struct ApiRouters {
    pub auth: Router<AppState>,
    pub users: Router<AppState>,
    pub posts: Router<AppState>,
    pub business: Router<AppState>,
    pub chat: Router<AppState>,
    pub forsale: Router<AppState>,
    pub events: Router<AppState>,
}

/// Inject a hub handle into request extensions so feature handlers can push
/// realtime events via the Extension extractor without holding AppState.
async fn inject_hub(
    axum::extract::State(state): axum::extract::State<AppState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: middleware::Next,
) -> axum::response::Response {
    req.extensions_mut().insert(state.hub.clone());
    next.run(req).await
}

/// Build the full axum Router with all routes and middleware.
pub fn build_router(config: &Config, state: AppState, api: ApiRouters) -> Router {
    let api_routes = Router::new()
        .route("/api", get(liveness))
        .nest("/api/auth", api.auth)
        .nest("/api/users", api.users)
        .nest("/api/posts", api.posts)
        .nest("/api/business", api.business)
        .nest("/api/chat", api.chat)
        .nest("/api/forsale", api.forsale)
        .nest("/api/events", api.events);

    // WebSocket endpoint
    let ws_routes = Router::new().route("/ws", get(ws_handler::ws_upgrade));

    let mut app = Router::new()
        .merge(api_routes)
        .merge(ws_routes)
        .nest_service("/uploads", ServeDir::new(&config.uploads_dir));

    // Terminal branch, only reached when no structured route matched.
    // In production the built client shell resolves client-side-routed deep
    // links; otherwise unmatched paths stay plain 404s.
    if config.production {
        let public = Path::new(&config.public_dir);
        app = app.fallback_service(
            ServeDir::new(public).fallback(ServeFile::new(public.join("index.html"))),
        );
    }

    app.layer(middleware::from_fn_with_state(state.clone(), inject_hub))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admission::admit,
        ))
        .layer(CatchPanicLayer::custom(error::handle_panic))
        .with_state(state)
}

/// GET /api — liveness probe.
async fn liveness() -> &'static str {
    "Plaza API up"
}
