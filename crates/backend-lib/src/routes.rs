// ============================
// userauth-backend-lib/src/routes.rs
// ============================
//! HTTP router.
use crate::handlers::{auth, user};
use crate::middleware::{cors_layer, require_bearer};
use crate::storage::CredentialStore;
use crate::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Create the application router
pub fn create_router<S: CredentialStore + 'static>(state: Arc<AppState<S>>) -> Router {
    let auth_routes = Router::new()
        .route("/signup", post(auth::signup::<S>))
        .route("/signin", post(auth::signin::<S>));

    let user_routes = Router::new()
        .route("/userContent", get(user::user_content::<S>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer::<S>,
        ));

    let mut router = Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/user", user_routes);

    let static_files = &state.settings.static_files;
    if let Some(dir) = &static_files.dir {
        tracing::info!(mount = %static_files.mount, dir = %dir.display(), "serving static files");
        router = router.nest_service(&static_files.mount, ServeDir::new(dir));
    }

    router
        .layer(cors_layer(&state.settings.cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
