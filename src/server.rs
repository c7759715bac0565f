use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tracing::{info, warn};

use crate::auth::IdentityResolver;
use crate::config::AppConfig;
use crate::database::ResourceStore;
use crate::{app, AppState};

/// Browser origins allowed to call the API with credentials
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            // A wildcard cannot be combined with credentials
            Ok(value) if value == "*" => {
                warn!("Ignoring wildcard CORS origin, list origins explicitly");
                None
            }
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Serve the API on the configured address until Ctrl-C
pub async fn serve(config: &AppConfig, store: Arc<dyn ResourceStore>) -> anyhow::Result<()> {
    let resolver = IdentityResolver::from_config(&config.security)?;
    if resolver.allows_trusted_header() {
        warn!(
            "Trusted-header auth is enabled: requests with an X-User-Id header and no bearer token \
             are accepted without verification. Disable with TRUSTED_HEADER_AUTH=false."
        );
    }

    let router = app(AppState::new(resolver, store)).layer(cors_layer(&config.security.cors_origins));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("JobFit API listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("JobFit API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    async fn allowed_origin(origins: &[&str], origin: &str) -> Option<HeaderValue> {
        let origins: Vec<String> = origins.iter().map(|o| o.to_string()).collect();
        let router = Router::new().route("/", get(|| async { "ok" })).layer(cors_layer(&origins));
        let request = Request::builder().uri("/").header(header::ORIGIN, origin).body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).cloned()
    }

    #[tokio::test]
    async fn wildcard_origin_is_ignored() {
        let origins = ["*", "http://localhost:5173"];
        assert_eq!(
            allowed_origin(&origins, "http://localhost:5173").await,
            Some(HeaderValue::from_static("http://localhost:5173"))
        );
        assert_eq!(allowed_origin(&origins, "http://elsewhere.test").await, None);
        assert_eq!(allowed_origin(&["*"], "http://elsewhere.test").await, None);
    }

    #[tokio::test]
    async fn unparsable_origin_is_ignored() {
        let origins = ["http://bad\norigin", "http://localhost:5173"];
        assert!(allowed_origin(&origins, "http://localhost:5173").await.is_some());
    }
}
