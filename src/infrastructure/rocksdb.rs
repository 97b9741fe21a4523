use crate::domain::ports::SubscriptionStore;
use crate::domain::replacement::RecordId;
use crate::domain::subscription::Subscription;
use crate::error::{Result, UpdaterError};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing subscriptions keyed by order id.
pub const CF_SUBSCRIPTIONS: &str = "subscriptions";

/// A persistent subscription store backed by RocksDB.
///
/// Values are JSON encoded; keys are big-endian order ids so iteration
/// follows id order. `Clone` shares the underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDBSubscriptionStore {
    db: Arc<DB>,
}

impl RocksDBSubscriptionStore {
    /// Opens or creates a RocksDB instance at `path`, creating the
    /// subscriptions column family if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_subscriptions = ColumnFamilyDescriptor::new(CF_SUBSCRIPTIONS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_subscriptions])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn column(&self) -> Result<&ColumnFamily> {
        self.db.cf_handle(CF_SUBSCRIPTIONS).ok_or_else(|| {
            UpdaterError::InternalError(Box::new(std::io::Error::other(
                "Subscriptions column family not found",
            )))
        })
    }
}

fn decode(bytes: &[u8]) -> Result<Subscription> {
    serde_json::from_slice(bytes).map_err(|e| {
        UpdaterError::InternalError(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Failed to deserialize subscription: {}", e),
        )))
    })
}

#[async_trait]
impl SubscriptionStore for RocksDBSubscriptionStore {
    async fn store(&self, subscription: Subscription) -> Result<()> {
        let cf = self.column()?;
        let key = subscription.id.0.to_be_bytes();
        let value = serde_json::to_vec(&subscription)?;
        self.db.put_cf(cf, key, value)?;
        Ok(())
    }

    async fn get(&self, id: RecordId) -> Result<Option<Subscription>> {
        let cf = self.column()?;
        match self.db.get_cf(cf, id.0.to_be_bytes())? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn for_collective(&self, slug: &str) -> Result<Vec<Subscription>> {
        let cf = self.column()?;
        let mut subscriptions = Vec::new();

        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            let subscription = decode(&value)?;
            if subscription.from_collective_slug == slug {
                subscriptions.push(subscription);
            }
        }

        Ok(subscriptions)
    }
}
