//! Application context shared across route handlers via axum state.

use std::sync::Arc;

use ode_core::config::Config;

use crate::catalog::Catalog;
use crate::session::{Session, SharedSession};

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub catalog: Arc<Catalog>,
    pub session: SharedSession,
}

impl AppContext {
    pub fn new(config: Arc<Config>, catalog: Arc<Catalog>, session: SharedSession) -> Self {
        Self {
            config,
            catalog,
            session,
        }
    }

    /// Scan the games directory and build the session, pre-loading
    /// `library.initial_image` when configured. A failed pre-load is logged
    /// and leaves the medium not ready.
    pub fn from_config(config: Config) -> Self {
        let catalog = Catalog::scan(&config.library.games_dir, &config.library.extensions);
        let mut session = Session::with_image_source(config.stream.patch_region);

        if let Some(image) = &config.library.initial_image {
            session.select_image(image.clone());
            let loaded = session.load_toc().map(|blob| blob.len());
            match loaded {
                Ok(_) => tracing::info!(
                    image = %image.display(),
                    tracks = session.toc().track_count(),
                    "Loaded initial image"
                ),
                Err(e) => tracing::warn!("Initial image not loaded: {e}"),
            }
        }

        Self::new(Arc::new(config), Arc::new(catalog), session.into_shared())
    }
}
