use std::{fmt, sync::Arc};

use bindery_core::{AdminActions, Catalog, Storefront};

use crate::infra::config::Config;

/// Shared handler state: the catalog repositories plus the services
/// layered on top of them.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub storefront: Storefront,
    pub admin: AdminActions,
    pub config: Arc<Config>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(catalog: Catalog, config: Arc<Config>) -> Self {
        let storefront = Storefront::new(catalog.clone());
        let admin = AdminActions::new(catalog.books.clone());
        Self {
            catalog,
            storefront,
            admin,
            config,
        }
    }
}
