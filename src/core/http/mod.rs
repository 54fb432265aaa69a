//! HTTP surface of the shop server.
//!
//! One axum router over the assembled [`ShopServer`]. CORS is
//! permissive when enabled (the storefront is a browser client on a
//! different origin) and every request is traced.

mod error;
mod handlers;

pub use error::{ApiError, ApiResult};
pub use handlers::{DeleteOutcome, InsertOutcome, UpsertResponse};

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::core::Result;
use crate::core::config::HttpConfig;
use crate::core::server::ShopServer;

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The assembled shop server.
    pub(crate) server: ShopServer,
}

/// HTTP listener for the shop server.
pub struct HttpServer {
    config: HttpConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Build the application router.
    pub fn router(server: ShopServer, enable_cors: bool) -> Router {
        let state = AppState { server };

        let mut app = Router::new()
            .route("/", get(handlers::liveness))
            .route("/tools", get(handlers::list_tools).post(handlers::create_tool))
            .route(
                "/tools/{id}",
                get(handlers::get_tool).delete(handlers::delete_tool),
            )
            .route("/user", get(handlers::list_users))
            .route("/user/one", get(handlers::get_user_by_email))
            .route("/user/admin/{email}", put(handlers::promote_user))
            .route(
                "/user/{email}",
                put(handlers::upsert_user).delete(handlers::delete_user),
            )
            .route("/admin/{email}", get(handlers::check_admin))
            .route("/order", get(handlers::list_orders).post(handlers::place_order))
            .route(
                "/order/{id}",
                get(handlers::get_order).delete(handlers::delete_order),
            )
            .route(
                "/create-payment-intent",
                post(handlers::create_payment_intent),
            )
            .route("/myorder", get(handlers::list_my_orders))
            .route(
                "/myorder/{id}",
                get(handlers::get_my_order)
                    .patch(handlers::reconcile_order)
                    .delete(handlers::delete_my_order),
            )
            .route("/addReview", post(handlers::add_review))
            .route("/reviews", get(handlers::list_reviews))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        if enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app = app.layer(cors);
        }

        app
    }

    /// Bind and serve until the process is stopped.
    pub async fn run(self, server: ShopServer) -> Result<()> {
        let addr = self.address();
        let app = Self::router(server, self.config.enable_cors);

        let listener = tokio::net::TcpListener::bind(&addr).await?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!("Ready - listening on {} (CORS {})", addr, cors_status);

        axum::serve(listener, app).await?;

        Ok(())
    }
}
