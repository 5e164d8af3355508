//! Background job that releases rooms once their bookings have checked out.
//!
//! [`AvailabilityReconciler::start`] spawns the periodic task and hands back a
//! [`ReconcilerHandle`]; the owner is expected to call
//! [`ReconcilerHandle::shutdown`] before closing the pool.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Completes every confirmed booking whose check-out date is on or before
/// `now` and makes its room available again. Returns the number of bookings
/// completed.
///
/// Rooms are locked first, in id order, so this never deadlocks against a
/// booking transaction. A room that still carries another confirmed booking
/// is left unavailable. Nothing is written when no booking has expired.
pub async fn release_expired_bookings(
    pool: &PgPool,
    now: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let today = now.date_naive();
    let mut tx = pool.begin().await?;

    let room_ids: Vec<i64> = sqlx::query_scalar(
        r#"
        SELECT room_id
        FROM rooms
        WHERE room_id IN (
            SELECT room_id FROM bookings
            WHERE status = 'confirmed' AND check_out_date <= $1
        )
        ORDER BY room_id
        FOR UPDATE
        "#,
    )
    .bind(today)
    .fetch_all(&mut *tx)
    .await?;

    if room_ids.is_empty() {
        return Ok(0);
    }

    let completed = sqlx::query(
        r#"
        UPDATE bookings
        SET status = 'completed', updated_at = NOW()
        WHERE status = 'confirmed'
          AND check_out_date <= $1
          AND room_id = ANY($2)
        "#,
    )
    .bind(today)
    .bind(&room_ids)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    let released = sqlx::query(
        r#"
        UPDATE rooms
        SET availability_status = TRUE
        WHERE room_id = ANY($1)
          AND NOT EXISTS (
              SELECT 1 FROM bookings b
              WHERE b.room_id = rooms.room_id AND b.status = 'confirmed'
          )
        "#,
    )
    .bind(&room_ids)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    tx.commit().await?;

    debug!(completed, released, %today, "Reconciled room availability");

    Ok(completed)
}

/// Periodic runner for [`release_expired_bookings`].
#[derive(Clone)]
pub struct AvailabilityReconciler {
    pool: PgPool,
    period: Duration,
}

impl AvailabilityReconciler {
    pub fn new(pool: PgPool, period: Duration) -> Self {
        Self { pool, period }
    }

    /// Runs one reconciliation against the current wall clock.
    pub async fn run_once(&self) -> Result<u64, sqlx::Error> {
        release_expired_bookings(&self.pool, Utc::now()).await
    }

    /// Spawns the periodic task. The first run happens immediately.
    ///
    /// Store errors are logged and the job waits for the next tick.
    pub fn start(self) -> ReconcilerHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            info!(
                period_secs = self.period.as_secs(),
                "Availability reconciler started"
            );

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        match self.run_once().await {
                            Ok(0) => debug!("No expired bookings"),
                            Ok(count) => info!(count, "Released rooms for completed bookings"),
                            Err(e) => error!(error = ?e, "Error updating room availability"),
                        }
                    }
                }
            }

            info!("Availability reconciler stopped");
        });

        ReconcilerHandle {
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// Owner of a running reconciler task.
pub struct ReconcilerHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ReconcilerHandle {
    /// Whether the periodic task is still alive.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Signals the task to stop and waits for an in-flight run to finish.
    pub async fn shutdown(self) {
        // The task only drops its receiver after exiting the loop.
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            warn!(error = ?e, "Availability reconciler task ended abnormally");
        }
    }
}
