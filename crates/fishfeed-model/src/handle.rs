//! Shared, lazily-loaded model handle.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::error::ModelError;
use crate::network::FeedModel;

/// Process-wide handle to the feed model.
///
/// The weights are read from disk at most once per process; clones share
/// the same cell. A failed load leaves the cell empty so the next caller
/// retries instead of seeing a cached failure.
#[derive(Clone)]
pub struct ModelHandle {
    path: Arc<PathBuf>,
    cell: Arc<OnceCell<Arc<FeedModel>>>,
}

impl ModelHandle {
    /// A handle that loads from `path` on first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            cell: Arc::new(OnceCell::new()),
        }
    }

    /// A handle around an already-built model (for tests and embedding).
    pub fn from_model(model: FeedModel) -> Self {
        Self {
            path: Arc::new(PathBuf::new()),
            cell: Arc::new(OnceCell::new_with(Some(Arc::new(model)))),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// Return the model, loading it on the first call.
    pub async fn get(&self) -> Result<Arc<FeedModel>, ModelError> {
        let model = self
            .cell
            .get_or_try_init(|| async {
                let path = self.path.as_ref().clone();
                let loaded = tokio::task::spawn_blocking(move || FeedModel::from_file(&path))
                    .await
                    .map_err(|e| ModelError::Load(e.to_string()))?;
                match loaded {
                    Ok(model) => {
                        info!(path = ?self.path, depth = model.depth(), "feed model ready");
                        Ok(Arc::new(model))
                    }
                    Err(e) => {
                        warn!(path = ?self.path, error = %e, "feed model failed to load");
                        Err(e)
                    }
                }
            })
            .await?;
        Ok(Arc::clone(model))
    }

    /// Load eagerly, typically at startup.
    pub async fn warm(&self) -> Result<(), ModelError> {
        self.get().await.map(|_| ())
    }

    pub async fn predict(&self, amount: f64, temper: f64, size: f64) -> Result<f64, ModelError> {
        self.get().await?.predict(amount, temper, size)
    }
}
