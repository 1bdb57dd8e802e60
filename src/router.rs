use axum::{Router, middleware, routing::get};
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::api::verse_api::VerseApi;
use crate::config::Config;
use crate::db::sqlite::AccountsStorage;
use crate::error::{ApiError, handle_panic};
use crate::handlers::accounts::{
    create_account, delete_account, get_account, list_accounts, update_account,
};
use crate::handlers::status::{api_status, method_not_allowed, route_not_found};
use crate::handlers::verse::random_verse;
use crate::middleware::auth::RequireBearer;

/// Everything a handler needs, passed in explicitly rather than read from globals.
#[derive(Clone)]
pub struct AppState {
    pub storage: AccountsStorage,
    pub secret_key: Option<Arc<str>>,
    pub verse: VerseApi,
}

impl AppState {
    pub fn new(storage: AccountsStorage, secret_key: Option<Arc<str>>, verse: VerseApi) -> Self {
        Self {
            storage,
            secret_key,
            verse,
        }
    }

    pub async fn from_config(cfg: &Config) -> Result<Self, ApiError> {
        let storage = AccountsStorage::open(&cfg.database_url).await?;
        let verse = VerseApi::new(cfg.verse_base_url.clone(), cfg.verse_timeout())?;
        Ok(Self::new(
            storage,
            cfg.secret_key.as_deref().map(Arc::from),
            verse,
        ))
    }
}

pub fn app_router(state: AppState) -> Router {
    // The guard is a plain layer so unknown paths under the namespace are refused too.
    let accounts = Router::new()
        .route("/", get(list_accounts).post(create_account))
        .route(
            "/{id}",
            get(get_account).put(update_account).delete(delete_account),
        )
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(middleware::from_extractor_with_state::<RequireBearer, AppState>(
            state.clone(),
        ));

    let routes = Router::new()
        .route("/", get(random_verse))
        .route("/api", get(api_status))
        .nest("/api/accounts", accounts);
    with_global_layers(routes).with_state(state)
}

/// Envelope fallbacks, request tracing and panic-to-500, applied outermost.
pub fn with_global_layers<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
}
