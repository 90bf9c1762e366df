//! Test repositories — `EventRepository` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use fivedice_core::error::DomainError;
use fivedice_core::repository::{EventRepository, StoredEvent};
use uuid::Uuid;

/// An event repository that records all `append_events` calls and returns a
/// configured result from every `load_events` call.
#[derive(Debug)]
pub struct RecordingEventRepository {
    load_result: Mutex<Vec<StoredEvent>>,
    appended: Mutex<Vec<(Uuid, i64, Vec<StoredEvent>)>>,
}

impl RecordingEventRepository {
    /// Create a new recording repository that will return `load_result` from
    /// every `load_events` call.
    #[must_use]
    pub fn new(load_result: Vec<StoredEvent>) -> Self {
        Self {
            load_result: Mutex::new(load_result),
            appended: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of all events that were appended.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn appended_events(&self) -> Vec<(Uuid, i64, Vec<StoredEvent>)> {
        self.appended.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventRepository for RecordingEventRepository {
    async fn load_events(&self, _aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        Ok(self.load_result.lock().unwrap().clone())
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        self.appended
            .lock()
            .unwrap()
            .push((aggregate_id, expected_version, events.to_vec()));
        Ok(())
    }
}

/// An event repository that always returns an empty event list and silently
/// accepts appends. Useful for "aggregate not found" scenarios and creation
/// commands.
#[derive(Debug)]
pub struct EmptyEventRepository;

#[async_trait]
impl EventRepository for EmptyEventRepository {
    async fn load_events(&self, _aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        Ok(vec![])
    }

    async fn append_events(
        &self,
        _aggregate_id: Uuid,
        _expected_version: i64,
        _events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        Ok(())
    }
}

/// An event repository that always returns an infrastructure error. Useful
/// for testing error-handling paths.
#[derive(Debug)]
pub struct FailingEventRepository;

#[async_trait]
impl EventRepository for FailingEventRepository {
    async fn load_events(&self, _aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn append_events(
        &self,
        _aggregate_id: Uuid,
        _expected_version: i64,
        _events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}

/// A real in-memory event store with optimistic concurrency, for tests that
/// drive multi-command flows (a recording mock replaying one fixed load
/// result cannot carry a game through thirteen rounds).
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    streams: Mutex<HashMap<Uuid, Vec<StoredEvent>>>,
}

impl InMemoryEventRepository {
    /// Create an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        let streams = self.streams.lock().unwrap();
        Ok(streams.get(&aggregate_id).cloned().unwrap_or_default())
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        let mut streams = self.streams.lock().unwrap();
        let stream = streams.entry(aggregate_id).or_default();
        #[allow(clippy::cast_possible_wrap)]
        let actual = stream.len() as i64;
        if actual != expected_version {
            return Err(DomainError::ConcurrencyConflict {
                aggregate_id,
                expected: expected_version,
                actual,
            });
        }
        stream.extend_from_slice(events);
        Ok(())
    }
}
