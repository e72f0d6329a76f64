pub mod api;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod services;
pub mod utils;

use crate::config::AppConfig;
use crate::services::access::AccessPolicy;
use crate::services::account_service::AccountService;
use crate::services::folder_service::FolderService;
use crate::services::item_service::ItemService;
use crate::services::session::SessionStore;
use axum::{
    Router,
    http::{
        HeaderName, HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::auth::signup,
        api::handlers::auth::login,
        api::handlers::auth::logout,
        api::handlers::users::get_user,
        api::handlers::users::get_folders,
        api::handlers::users::update_password,
        api::handlers::users::delete_account,
        api::handlers::folders::create_folder,
        api::handlers::folders::get_folder,
        api::handlers::folders::delete_folder,
        api::handlers::folders::add_contributor,
        api::handlers::folders::get_feed,
        api::handlers::items::add_item,
        api::handlers::items::delete_item,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            api::handlers::auth::SignUpForm,
            api::handlers::auth::LoginForm,
            api::handlers::users::UserProfileResponse,
            api::handlers::users::UpdatePasswordForm,
            api::handlers::folders::FolderResponse,
            api::handlers::folders::FolderDetailsResponse,
            api::handlers::folders::ItemResponse,
            api::handlers::folders::ContributorResponse,
            api::handlers::folders::CreateFolderForm,
            api::handlers::folders::AddContributorForm,
            api::handlers::items::AddItemForm,
            api::handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "auth", description = "Sign-up and session endpoints"),
        (name = "users", description = "Account endpoints"),
        (name = "folders", description = "Folder and feed endpoints"),
        (name = "items", description = "Folder item endpoints"),
        (name = "system", description = "Health checks")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub accounts: Arc<AccountService>,
    pub folders: Arc<FolderService>,
    pub items: Arc<ItemService>,
    pub sessions: Arc<SessionStore>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        Self {
            accounts: Arc::new(AccountService::new(
                db.clone(),
                config.default_avatar_url.clone(),
            )),
            folders: Arc::new(FolderService::new(db.clone(), config.feed_limit)),
            items: Arc::new(ItemService::new(
                db.clone(),
                AccessPolicy::from_config(&config),
            )),
            sessions: Arc::new(SessionStore::new(db.clone(), &config)),
            db,
            config,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/folders", get(api::handlers::users::get_folders))
        .route("/folder", post(api::handlers::folders::create_folder))
        .route(
            "/folder/:id",
            get(api::handlers::folders::get_folder).delete(api::handlers::folders::delete_folder),
        )
        .route(
            "/folder/:id/contributor",
            post(api::handlers::folders::add_contributor),
        )
        .route("/folder/:id/item", post(api::handlers::items::add_item))
        .route(
            "/folder/:id/item/:item_id",
            delete(api::handlers::items::delete_item),
        )
        .route(
            "/user",
            get(api::handlers::users::get_user).delete(api::handlers::users::delete_account),
        )
        .route("/feed", get(api::handlers::folders::get_feed))
        .route("/password", post(api::handlers::users::update_password))
        .route_layer(from_fn_with_state(
            state.clone(),
            api::middleware::auth::auth_middleware,
        ));

    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(api::handlers::health::health_check))
        .route("/signup", post(api::handlers::auth::signup))
        .route("/login", post(api::handlers::auth::login))
        .route("/logout", post(api::handlers::auth::logout))
        .merge(protected)
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods([Method::GET, Method::POST, Method::DELETE])
                .allow_headers([CONTENT_TYPE, AUTHORIZATION])
                .expose_headers([HeaderName::from_static("hx-redirect")])
                .allow_credentials(true),
        )
        .with_state(state)
}
