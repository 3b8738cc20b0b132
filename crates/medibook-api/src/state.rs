//! Shared application state handed to every handler.

use std::sync::Arc;

use medibook_core::RecordStore;

use crate::blob::{BlobStore, DevBlobStore};
use crate::config::AppConfig;
use crate::payment::{DevPaymentGateway, PaymentGateway};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<RecordStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub payments: Arc<dyn PaymentGateway>,
}

impl AppState {
    /// State wired with the in-process collaborator implementations.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            store: Arc::new(RecordStore::new()),
            blobs: Arc::new(DevBlobStore::new()),
            payments: Arc::new(DevPaymentGateway::new()),
        }
    }
}
