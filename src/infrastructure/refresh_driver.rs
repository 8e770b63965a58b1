// External refresh driver - Ticks a session on a fixed cadence
use crate::application::session::MissionSession;
use crate::application::session_registry::SessionRegistry;
use chrono::Utc;
use std::sync::{Mutex, PoisonError, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

/// Spawn a task that ticks the session every `cadence` until the session is
/// dropped from the registry. Missed ticks are skipped, never bunched.
pub fn spawn_refresh_driver(
    session_id: Uuid,
    session: Weak<Mutex<MissionSession>>,
    cadence: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(cadence);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately; the seeded window already ends at now.
        interval.tick().await;

        loop {
            interval.tick().await;

            let Some(session) = session.upgrade() else {
                break;
            };

            let result = session
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .tick(Utc::now());

            if let Err(e) = result {
                tracing::warn!("Refresh of session {} degraded: {}", session_id, e);
            }
        }

        tracing::debug!("Refresh driver for session {} stopped", session_id);
    })
}

/// Spawn a task that evicts idle sessions every `period` until the registry
/// itself is dropped.
pub fn spawn_session_sweeper(registry: Weak<SessionRegistry>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;

            let Some(registry) = registry.upgrade() else {
                break;
            };

            let evicted = registry.evict_idle(Utc::now());
            if !evicted.is_empty() {
                tracing::debug!("Swept {} idle sessions, {} remain", evicted.len(), registry.len());
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::session::SessionSettings;
    use crate::domain::generator::RandomWalkGenerator;
    use chrono::TimeDelta;
    use std::sync::Arc;

    fn shared_session() -> Arc<Mutex<MissionSession>> {
        let session = MissionSession::initialize(
            &SessionSettings::default(),
            Box::new(RandomWalkGenerator::from_seed(12)),
            Utc::now(),
        )
        .unwrap();
        Arc::new(Mutex::new(session))
    }

    #[tokio::test]
    async fn test_driver_ticks_session() {
        let session = shared_session();
        let driver = spawn_refresh_driver(
            Uuid::new_v4(),
            Arc::downgrade(&session),
            Duration::from_millis(10),
        );

        tokio::time::sleep(Duration::from_millis(80)).await;
        let ticks = session.lock().unwrap().ticks();
        assert!(ticks >= 1, "expected at least one tick, got {}", ticks);

        driver.abort();
    }

    #[tokio::test]
    async fn test_driver_stops_when_session_dropped() {
        let session = shared_session();
        let driver = spawn_refresh_driver(
            Uuid::new_v4(),
            Arc::downgrade(&session),
            Duration::from_millis(10),
        );
        drop(session);

        let finished = tokio::time::timeout(Duration::from_secs(2), driver).await;
        assert!(finished.is_ok());
    }

    #[tokio::test]
    async fn test_idle_session_swept_and_driver_exits() {
        let registry = Arc::new(
            SessionRegistry::with_random_walk(SessionSettings::default(), Some(5))
                .with_idle_timeout(TimeDelta::zero()),
        );
        let handle = registry.create(Utc::now() - TimeDelta::seconds(1)).unwrap();
        let driver = spawn_refresh_driver(handle.id(), handle.downgrade(), Duration::from_millis(5));
        drop(handle);

        let sweeper = spawn_session_sweeper(Arc::downgrade(&registry), Duration::from_millis(5));

        let finished = tokio::time::timeout(Duration::from_secs(2), driver).await;
        assert!(finished.is_ok(), "driver kept ticking an evicted session");
        assert_eq!(registry.len(), 0);

        sweeper.abort();
    }

    #[tokio::test]
    async fn test_sweeper_stops_with_registry() {
        let registry = Arc::new(SessionRegistry::with_random_walk(
            SessionSettings::default(),
            Some(5),
        ));
        let sweeper = spawn_session_sweeper(Arc::downgrade(&registry), Duration::from_millis(5));
        drop(registry);

        let finished = tokio::time::timeout(Duration::from_secs(2), sweeper).await;
        assert!(finished.is_ok());
    }
}
