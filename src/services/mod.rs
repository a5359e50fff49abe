use thiserror::Error;

use crate::repository::errors::RepositoryError;
use crate::sheet::SheetError;
use crate::vtex::ApiError;

pub mod import;
pub mod sync;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors that end a sync run or an import before it completes.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("no previous sync found: the orders table is empty")]
    MissingWatermark,
    #[error("another sync is already running (lock `{0}` is held)")]
    SyncInProgress(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("{path}: {source}")]
    Sheet {
        path: String,
        #[source]
        source: SheetError,
    },
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
