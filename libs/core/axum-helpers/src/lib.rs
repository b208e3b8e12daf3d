//! # Axum Helpers
//!
//! Utilities and middleware shared by the HTTP services in this workspace.
//!
//! ## Modules
//!
//! - **[`server`]**: Router setup with OpenAPI docs, health checks, graceful shutdown
//! - **[`http`]**: HTTP middleware (CORS, security headers)
//! - **[`errors`]**: The `{success, message, errors}` error envelope
//! - **[`response`]**: The `{success, data}` success envelope
//! - **[`extractors`]**: Custom extractors (UUID path, validated JSON)
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_app, create_router};
//! use core_config::server::ServerConfig;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api_routes = Router::new(); // Add your routes
//!     let router = create_router::<ApiDoc>(api_routes).await?;
//!
//!     let config = ServerConfig::default();
//!     create_app(router, &config).await?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod response;
pub mod server;

// Re-export server types
pub use server::{
    create_app, create_router, health_router, shutdown_signal, HealthResponse, ReadyResponse,
};

// Re-export HTTP middleware
pub use http::{create_cors_layer, security_headers};

// Re-export envelope types
pub use errors::{AppError, ErrorCode, ErrorResponse, FieldError};
pub use response::ApiResponse;

// Re-export extractors
pub use extractors::{UuidPath, ValidatedJson};
