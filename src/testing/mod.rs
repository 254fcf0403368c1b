//! In-process stand-ins for the storage backend, used by the integration
//! tests to run the full HTTP pipeline without a database.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::{DatabaseError, Square, SquareStore};
use crate::input::SquareInput;

/// Square storage held in memory. Ids start at 1 and are never reused.
#[derive(Default)]
pub struct MemorySquareStore {
    inner: RwLock<MemoryState>,
    queries: AtomicUsize,
}

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    rows: BTreeMap<i64, Square>,
}

impl MemorySquareStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statements executed so far
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn record_query(&self) {
        self.queries.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl SquareStore for MemorySquareStore {
    async fn create(&self, input: &SquareInput) -> Result<i64, DatabaseError> {
        self.record_query();
        let mut state = self.inner.write().await;
        state.next_id += 1;
        let id = state.next_id;
        state.rows.insert(id, Square::from_input(id, input));
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<Square>, DatabaseError> {
        self.record_query();
        Ok(self.inner.read().await.rows.values().cloned().collect())
    }

    async fn find(&self, id: i64) -> Result<Option<Square>, DatabaseError> {
        self.record_query();
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn update(&self, id: i64, input: &SquareInput) -> Result<bool, DatabaseError> {
        self.record_query();
        let mut state = self.inner.write().await;
        match state.rows.get_mut(&id) {
            Some(row) => {
                *row = Square::from_input(id, input);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        self.record_query();
        Ok(self.inner.write().await.rows.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

/// A backend that is never reachable
#[derive(Default)]
pub struct UnavailableStore;

impl UnavailableStore {
    fn error() -> DatabaseError {
        DatabaseError::Unavailable("connect ECONNREFUSED 127.0.0.1:5432".to_string())
    }
}

#[async_trait]
impl SquareStore for UnavailableStore {
    async fn create(&self, _input: &SquareInput) -> Result<i64, DatabaseError> {
        Err(Self::error())
    }

    async fn list(&self) -> Result<Vec<Square>, DatabaseError> {
        Err(Self::error())
    }

    async fn find(&self, _id: i64) -> Result<Option<Square>, DatabaseError> {
        Err(Self::error())
    }

    async fn update(&self, _id: i64, _input: &SquareInput) -> Result<bool, DatabaseError> {
        Err(Self::error())
    }

    async fn delete(&self, _id: i64) -> Result<bool, DatabaseError> {
        Err(Self::error())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Err(Self::error())
    }
}

/// A backend whose every call panics with [`PanicStore::DETAIL`]
#[derive(Default)]
pub struct PanicStore;

impl PanicStore {
    pub const DETAIL: &'static str = "pool invariant broken: slot 3 of 5 double-released";
}

#[async_trait]
impl SquareStore for PanicStore {
    async fn create(&self, _input: &SquareInput) -> Result<i64, DatabaseError> {
        panic!("{}", Self::DETAIL)
    }

    async fn list(&self) -> Result<Vec<Square>, DatabaseError> {
        panic!("{}", Self::DETAIL)
    }

    async fn find(&self, _id: i64) -> Result<Option<Square>, DatabaseError> {
        panic!("{}", Self::DETAIL)
    }

    async fn update(&self, _id: i64, _input: &SquareInput) -> Result<bool, DatabaseError> {
        panic!("{}", Self::DETAIL)
    }

    async fn delete(&self, _id: i64) -> Result<bool, DatabaseError> {
        panic!("{}", Self::DETAIL)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        panic!("{}", Self::DETAIL)
    }
}
