use std::any::Any;
use std::path::Path;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    services::ServeFile,
    trace::TraceLayer,
};

use crate::auth::AuthMode;
use crate::config::{AppConfig, SecurityConfig};
use crate::database::SquareStore;
use crate::error::ApiError;
use crate::handlers::{public, squares};
use crate::middleware::jwt_auth_middleware;

/// Pages served from the static directory besides `/` (index.html)
const STATIC_PAGES: [&str; 3] = ["form_page.html", "scaled_view.html", "scoped_view.html"];

/// Dependencies shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SquareStore>,
    pub auth: AuthMode,
}

impl AppState {
    pub fn new(store: Arc<dyn SquareStore>, auth: AuthMode) -> Self {
        Self { store, auth }
    }
}

/// Build the complete application router
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        // Public
        .route("/health", get(public::health))
        .merge(page_routes(&config.server.static_dir))
        // Squares: reads public, writes behind the auth middleware
        .merge(square_routes(state.clone()));

    // The placeholder token issuer only exists when tokens are checked
    if state.auth.is_enabled() {
        router = router.route("/login", post(public::login));
    }

    router
        .fallback(route_not_found)
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(cors_layer(&config.security)),
        )
        .with_state(state)
}

fn square_routes(state: AppState) -> Router<AppState> {
    let auth = middleware::from_fn_with_state(state, jwt_auth_middleware);

    Router::new()
        // Collection operations
        .route(
            "/squares",
            post(squares::create)
                .route_layer(auth.clone())
                .get(squares::list),
        )
        // Record-level operations
        .route(
            "/squares/:id",
            put(squares::update)
                .delete(squares::delete)
                .route_layer(auth)
                .get(squares::get),
        )
}

fn page_routes(static_dir: &Path) -> Router<AppState> {
    STATIC_PAGES.iter().fold(
        Router::new().route_service("/", ServeFile::new(static_dir.join("index.html"))),
        |router, page| {
            router.route_service(&format!("/{}", page), ServeFile::new(static_dir.join(page)))
        },
    )
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

/// Error boundary for panics escaping a handler
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(panic = detail, "Handler panicked");

    ApiError::internal_server_error().into_response()
}
