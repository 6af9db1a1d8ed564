//! In-memory implementation of the URL repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// In-process repository keyed by short code.
///
/// `DashMap` shards its locks, so lookups of different codes never block each
/// other. Insertion goes through the entry API, which holds the shard lock
/// between the occupancy check and the write; that is the uniqueness
/// guarantee. Ids come from an atomic counter starting at 1.
///
/// Data lives only as long as the process.
#[derive(Debug)]
pub struct MemoryUrlRepository {
    storage: DashMap<String, UrlRecord>,
    next_id: AtomicI64,
}

impl MemoryUrlRepository {
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

impl Default for MemoryUrlRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlRepository for MemoryUrlRepository {
    async fn insert(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError> {
        match self.storage.entry(new_record.short_code) {
            Entry::Occupied(occupied) => Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "short_code", "code": occupied.key() }),
            )),
            Entry::Vacant(vacant) => {
                let record = UrlRecord::new(
                    self.next_id.fetch_add(1, Ordering::SeqCst),
                    new_record.original_url,
                    vacant.key().clone(),
                    new_record.owner_id,
                    Utc::now(),
                );
                vacant.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>, AppError> {
        Ok(self.storage.get(code).map(|entry| entry.value().clone()))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
