use crate::api::handlers::accounts;
use crate::auth::middleware::auth_middleware;
use crate::types::{AccountInfo, ErrorBody, FieldError, LoginRequest, LoginResponse, RegisterRequest};
use crate::AppState;
use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

/// OpenAPI document for the accounts API.
#[derive(OpenApi)]
#[openapi(
    paths(accounts::login, accounts::register, accounts::me),
    components(schemas(LoginRequest, RegisterRequest, LoginResponse, AccountInfo, ErrorBody, FieldError)),
    modifiers(&SecurityAddon),
    tags((name = "accounts", description = "Registration, login and bearer tokens"))
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Account routes plus health and API docs, without transport layers.
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        // Public routes (no auth required)
        .route("/accounts/register", post(accounts::register))
        .route("/accounts/login", post(accounts::login));

    let protected_routes = Router::new()
        // Protected routes (bearer token required)
        .route("/accounts/me", get(accounts::me))
        .layer(middleware::from_fn_with_state(
            state.token_issuer.clone(),
            auth_middleware,
        ));

    let router = Router::new()
        .route("/health", get(health))
        .route("/openapi.json", get(openapi_json))
        .merge(public_routes)
        .merge(protected_routes);

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router.with_state(state)
}

/// Full application: routes wrapped in tracing, CORS and a body size limit.
pub fn create_app(state: AppState, body_limit_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    create_router(state)
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_account_paths() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/accounts/login"));
        assert!(doc.paths.paths.contains_key("/accounts/register"));
        assert!(doc.paths.paths.contains_key("/accounts/me"));

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer"));
    }
}
