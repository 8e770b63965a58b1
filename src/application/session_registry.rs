// Session registry - One isolated mission session per dashboard client
use crate::application::refresh_controller::{StateChange, StateObserver};
use crate::application::session::{MissionSession, SessionSettings};
use crate::domain::generator::{RandomWalkGenerator, SampleGenerator};
use crate::domain::telemetry::{TelemetryError, Timestamp};
use chrono::{TimeDelta, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use thiserror::Error;
use tokio::sync::broadcast;
use uuid::Uuid;

pub const UPDATE_CHANNEL_CAPACITY: usize = 32;
pub const DEFAULT_IDLE_SECS: i64 = 600;

pub type GeneratorFactory = Arc<dyn Fn() -> Box<dyn SampleGenerator> + Send + Sync>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session {0} not found")]
    NotFound(Uuid),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

/// Forwards tick notifications to every live stream of a session.
struct BroadcastObserver {
    tx: broadcast::Sender<StateChange>,
}

impl StateObserver for BroadcastObserver {
    fn state_changed(&self, change: &StateChange) {
        // No subscribers is fine.
        let _ = self.tx.send(change.clone());
    }
}

#[derive(Clone)]
pub struct SessionHandle {
    id: Uuid,
    session: Arc<Mutex<MissionSession>>,
    updates: broadcast::Sender<StateChange>,
    last_access: Arc<Mutex<Timestamp>>,
}

impl SessionHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Lock the session. Ticks run to completion under this lock, so callers
    /// must not hold the guard across an `.await`.
    pub fn lock(&self) -> MutexGuard<'_, MissionSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.updates.subscribe()
    }

    pub fn downgrade(&self) -> Weak<Mutex<MissionSession>> {
        Arc::downgrade(&self.session)
    }

    pub fn last_access(&self) -> Timestamp {
        *self.last_access.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn touch(&self, now: Timestamp) {
        let mut last = self.last_access.lock().unwrap_or_else(PoisonError::into_inner);
        *last = (*last).max(now);
    }

    /// A session with an open stream is never idle.
    fn is_idle(&self, now: Timestamp, timeout: TimeDelta) -> bool {
        self.updates.receiver_count() == 0 && now - self.last_access() > timeout
    }
}

pub struct SessionRegistry {
    settings: SessionSettings,
    generators: GeneratorFactory,
    idle_timeout: TimeDelta,
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
}

impl SessionRegistry {
    pub fn new(settings: SessionSettings, generators: GeneratorFactory) -> Self {
        Self {
            settings,
            generators,
            idle_timeout: TimeDelta::seconds(DEFAULT_IDLE_SECS),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Sessions untouched for longer than `timeout` are dropped by `evict_idle`.
    pub fn with_idle_timeout(mut self, timeout: TimeDelta) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Registry whose sessions use the random-walk generator, optionally seeded
    /// for reproducible runs.
    pub fn with_random_walk(settings: SessionSettings, rng_seed: Option<u64>) -> Self {
        let generators: GeneratorFactory = Arc::new(move || -> Box<dyn SampleGenerator> {
            match rng_seed {
                Some(seed) => Box::new(RandomWalkGenerator::from_seed(seed)),
                None => Box::new(RandomWalkGenerator::from_entropy()),
            }
        });
        Self::new(settings, generators)
    }

    pub fn create(&self, now: Timestamp) -> Result<SessionHandle, SessionError> {
        let mut session = MissionSession::initialize(&self.settings, (self.generators)(), now)?;

        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        session.subscribe(Box::new(BroadcastObserver {
            tx: updates.clone(),
        }));

        let handle = SessionHandle {
            id: Uuid::new_v4(),
            session: Arc::new(Mutex::new(session)),
            updates,
            last_access: Arc::new(Mutex::new(now)),
        };

        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(handle.id, handle.clone());

        tracing::info!(
            "Created session {} (capacity {}, {} active)",
            handle.id,
            self.settings.capacity,
            self.len()
        );
        Ok(handle)
    }

    /// Look up a session and mark it as accessed now.
    pub fn get(&self, id: Uuid) -> Result<SessionHandle, SessionError> {
        let handle = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(SessionError::NotFound(id))?;

        handle.touch(Utc::now());
        Ok(handle)
    }

    pub fn remove(&self, id: Uuid) -> Result<(), SessionError> {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);

        match removed {
            Some(_) => {
                tracing::info!("Removed session {}", id);
                Ok(())
            }
            None => Err(SessionError::NotFound(id)),
        }
    }

    /// Drop every session idle past the timeout as of `now`. Their refresh
    /// drivers stop on their next period once the last handle is gone.
    pub fn evict_idle(&self, now: Timestamp) -> Vec<Uuid> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);

        let idle: Vec<Uuid> = sessions
            .values()
            .filter(|handle| handle.is_idle(now, self.idle_timeout))
            .map(SessionHandle::id)
            .collect();

        for id in &idle {
            sessions.remove(id);
            tracing::info!("Evicted idle session {}", id);
        }
        idle
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
