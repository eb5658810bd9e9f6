//! Metering emission
//!
//! Records are created one at a time, each under its own timeout. There is
//! no retry and no rollback: when the second record of an update fails, the
//! first one stays in the store and the error is returned to the caller.

use std::sync::Arc;
use std::time::Duration;

use fabrik_common::{PersistenceError, Result};
use tracing::{error, info, instrument, warn};

use super::document::UnstructuredDocument;
use super::store::ResourceStore;
use crate::config::MeteringConfig;
use crate::metering::MeteringRecord;

/// Submits metering records to a resource store
pub struct MeteringEmitter<S: ResourceStore> {
    store: Arc<S>,
    create_timeout: Duration,
}

impl<S: ResourceStore> MeteringEmitter<S> {
    pub fn new(store: Arc<S>, config: &MeteringConfig) -> Self {
        Self {
            store,
            create_timeout: config.create_timeout(),
        }
    }

    /// Convert a record and create it in the store
    #[instrument(skip(self, record), fields(metering_id = %record.name()))]
    pub async fn emit(&self, record: &MeteringRecord) -> Result<()> {
        let document = UnstructuredDocument::from_record(record).map_err(|e| {
            error!(error = %e, "Error converting metering record");
            e
        })?;

        match tokio::time::timeout(self.create_timeout, self.store.create(&document)).await {
            Ok(Ok(())) => {
                info!("Successfully created metering resource");
                Ok(())
            }
            Ok(Err(e)) => {
                error!(error = %e, "Error creating metering resource");
                Err(e)
            }
            Err(_) => {
                let timeout_ms = self.create_timeout.as_millis() as u64;
                error!(timeout_ms, "Creating metering resource timed out");
                Err(PersistenceError::Timeout {
                    name: record.name().to_string(),
                    timeout_ms,
                }
                .into())
            }
        }
    }

    /// Emit records in order, stopping at the first failure.
    ///
    /// Returns the number of records created. On failure the records before
    /// the failing one remain created.
    pub async fn emit_all(&self, records: &[MeteringRecord]) -> Result<usize> {
        for (emitted, record) in records.iter().enumerate() {
            if let Err(e) = self.emit(record).await {
                if emitted > 0 {
                    warn!(
                        emitted,
                        total = records.len(),
                        failed_id = %record.name(),
                        "Partial metering emission, remaining records not created"
                    );
                }
                return Err(e);
            }
        }
        Ok(records.len())
    }
}
