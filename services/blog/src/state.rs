//! Application state shared across handlers

use std::sync::Arc;

use common::session::TokenService;

use crate::repositories::PostStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostStore>,
    pub tokens: TokenService,
}
