mod common;

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use common::{
    booking_request, booking_status, date, insert_confirmed_booking, occupancy_violations,
    room_available, setup,
};
use staynngo_server::models::BookingStatus;
use staynngo_server::services::{book_room, release_expired_bookings, AvailabilityReconciler};

fn at(day: NaiveDate, h: u32, m: u32, s: u32) -> DateTime<Utc> {
    day.and_hms_opt(h, m, s).unwrap().and_utc()
}

#[sqlx::test]
#[test_log::test]
async fn test_checkout_day_is_inclusive(pool: PgPool) {
    let fx = setup(&pool, 100).await;
    let receipt = book_room(
        &pool,
        &booking_request(fx.room_id, fx.guest_id, date(2024, 1, 10), date(2024, 1, 12)),
    )
    .await
    .unwrap();

    let released = release_expired_bookings(&pool, at(date(2024, 1, 12), 0, 0, 0))
        .await
        .unwrap();

    assert_eq!(released, 1);
    assert_eq!(
        booking_status(&pool, receipt.booking_id).await,
        Some(BookingStatus::Completed)
    );
    assert!(room_available(&pool, fx.room_id).await);
}

#[sqlx::test]
#[test_log::test]
async fn test_stay_in_progress_is_untouched(pool: PgPool) {
    let fx = setup(&pool, 100).await;
    let receipt = book_room(
        &pool,
        &booking_request(fx.room_id, fx.guest_id, date(2024, 1, 10), date(2024, 1, 12)),
    )
    .await
    .unwrap();

    let released = release_expired_bookings(&pool, at(date(2024, 1, 11), 23, 59, 59))
        .await
        .unwrap();

    assert_eq!(released, 0);
    assert_eq!(
        booking_status(&pool, receipt.booking_id).await,
        Some(BookingStatus::Confirmed)
    );
    assert!(!room_available(&pool, fx.room_id).await);
    assert_eq!(occupancy_violations(&pool).await, 0);
}

#[sqlx::test]
#[test_log::test]
async fn test_second_run_is_a_no_op(pool: PgPool) {
    let fx = setup(&pool, 100).await;
    book_room(
        &pool,
        &booking_request(fx.room_id, fx.guest_id, date(2024, 1, 10), date(2024, 1, 12)),
    )
    .await
    .unwrap();

    let now = at(date(2024, 1, 15), 12, 0, 0);
    assert_eq!(release_expired_bookings(&pool, now).await.unwrap(), 1);
    assert_eq!(release_expired_bookings(&pool, now).await.unwrap(), 0);
    assert!(room_available(&pool, fx.room_id).await);
}

#[sqlx::test]
#[test_log::test]
async fn test_room_with_active_booking_stays_unavailable(pool: PgPool) {
    let fx = setup(&pool, 100).await;
    let expired = book_room(
        &pool,
        &booking_request(fx.room_id, fx.guest_id, date(2024, 1, 10), date(2024, 1, 12)),
    )
    .await
    .unwrap();
    let active =
        insert_confirmed_booking(&pool, fx.room_id, fx.guest_id, date(2024, 1, 12), date(2024, 1, 20))
            .await;

    let released = release_expired_bookings(&pool, at(date(2024, 1, 13), 8, 0, 0))
        .await
        .unwrap();

    assert_eq!(released, 1);
    assert_eq!(
        booking_status(&pool, expired.booking_id).await,
        Some(BookingStatus::Completed)
    );
    assert_eq!(
        booking_status(&pool, active).await,
        Some(BookingStatus::Confirmed)
    );
    assert!(!room_available(&pool, fx.room_id).await);
    assert_eq!(occupancy_violations(&pool).await, 0);
}

#[sqlx::test]
#[test_log::test]
async fn test_release_then_rebook(pool: PgPool) {
    let fx = setup(&pool, 100).await;
    book_room(
        &pool,
        &booking_request(fx.room_id, fx.guest_id, date(2024, 1, 10), date(2024, 1, 12)),
    )
    .await
    .unwrap();

    release_expired_bookings(&pool, at(date(2024, 1, 12), 11, 0, 0))
        .await
        .unwrap();

    let next = book_room(
        &pool,
        &booking_request(fx.room_id, fx.guest_id, date(2024, 1, 12), date(2024, 1, 14)),
    )
    .await
    .unwrap();

    // Same instant again: the new booking is still confirmed and the room stays taken.
    assert_eq!(
        release_expired_bookings(&pool, at(date(2024, 1, 12), 11, 0, 0))
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        booking_status(&pool, next.booking_id).await,
        Some(BookingStatus::Confirmed)
    );
    assert!(!room_available(&pool, fx.room_id).await);
}

#[sqlx::test]
#[test_log::test]
async fn test_scheduled_job_runs_and_shuts_down(pool: PgPool) {
    let fx = setup(&pool, 100).await;
    let receipt = book_room(
        &pool,
        &booking_request(fx.room_id, fx.guest_id, date(2020, 6, 1), date(2020, 6, 3)),
    )
    .await
    .unwrap();

    let handle = AvailabilityReconciler::new(pool.clone(), Duration::from_secs(3600)).start();

    let mut completed = false;
    for _ in 0..50 {
        if booking_status(&pool, receipt.booking_id).await == Some(BookingStatus::Completed) {
            completed = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    handle.shutdown().await;

    assert!(completed, "first tick should run immediately");
    assert!(room_available(&pool, fx.room_id).await);
}

#[sqlx::test]
#[test_log::test]
async fn test_run_once_uses_wall_clock(pool: PgPool) {
    let fx = setup(&pool, 100).await;
    book_room(
        &pool,
        &booking_request(fx.room_id, fx.guest_id, date(2021, 3, 1), date(2021, 3, 2)),
    )
    .await
    .unwrap();

    let reconciler = AvailabilityReconciler::new(pool.clone(), Duration::from_secs(60));

    assert_eq!(reconciler.run_once().await.unwrap(), 1);
    assert_eq!(reconciler.run_once().await.unwrap(), 0);
}

#[sqlx::test]
#[test_log::test]
async fn test_waits_for_room_lock_held_by_booking_change(pool: PgPool) {
    let fx = setup(&pool, 100).await;
    let expired = book_room(
        &pool,
        &booking_request(fx.room_id, fx.guest_id, date(2024, 1, 10), date(2024, 1, 12)),
    )
    .await
    .unwrap();

    // Another transaction holds the room, the way a cancellation does.
    let mut holder = pool.begin().await.unwrap();
    sqlx::query("SELECT room_id FROM rooms WHERE room_id = $1 FOR UPDATE")
        .bind(fx.room_id)
        .execute(&mut *holder)
        .await
        .unwrap();

    let reconcile = tokio::spawn({
        let pool = pool.clone();
        async move { release_expired_bookings(&pool, at(date(2024, 1, 13), 9, 0, 0)).await }
    });

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!reconcile.is_finished(), "reconciler must block on the room lock");
    assert_eq!(
        booking_status(&pool, expired.booking_id).await,
        Some(BookingStatus::Confirmed)
    );

    // Cancel the expired stay and rebook the room for later dates, then let go.
    sqlx::query("DELETE FROM payments WHERE booking_id = $1")
        .bind(expired.booking_id)
        .execute(&mut *holder)
        .await
        .unwrap();
    sqlx::query("DELETE FROM bookings WHERE booking_id = $1")
        .bind(expired.booking_id)
        .execute(&mut *holder)
        .await
        .unwrap();
    let rebooked: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO bookings (room_id, user_id, check_in_date, check_out_date, total_price, status)
        VALUES ($1, $2, $3, $4, 200, $5)
        RETURNING booking_id
        "#,
    )
    .bind(fx.room_id)
    .bind(fx.guest_id)
    .bind(date(2024, 2, 1))
    .bind(date(2024, 2, 3))
    .bind(BookingStatus::Confirmed)
    .fetch_one(&mut *holder)
    .await
    .unwrap();
    holder.commit().await.unwrap();

    let completed = reconcile.await.unwrap().unwrap();

    assert_eq!(completed, 0);
    assert_eq!(booking_status(&pool, expired.booking_id).await, None);
    assert_eq!(
        booking_status(&pool, rebooked).await,
        Some(BookingStatus::Confirmed)
    );
    assert!(!room_available(&pool, fx.room_id).await);
    assert_eq!(occupancy_violations(&pool).await, 0);
}

#[sqlx::test]
#[test_log::test]
async fn test_scheduled_job_survives_failed_run(pool: PgPool) {
    let fx = setup(&pool, 100).await;
    let receipt = book_room(
        &pool,
        &booking_request(fx.room_id, fx.guest_id, date(2020, 6, 1), date(2020, 6, 3)),
    )
    .await
    .unwrap();

    sqlx::query("ALTER TABLE bookings RENAME TO bookings_offline")
        .execute(&pool)
        .await
        .unwrap();

    let handle = AvailabilityReconciler::new(pool.clone(), Duration::from_millis(100)).start();

    // Several ticks fail against the missing table.
    tokio::time::sleep(Duration::from_millis(350)).await;
    assert!(handle.is_running());

    sqlx::query("ALTER TABLE bookings_offline RENAME TO bookings")
        .execute(&pool)
        .await
        .unwrap();

    let mut completed = false;
    for _ in 0..50 {
        if booking_status(&pool, receipt.booking_id).await == Some(BookingStatus::Completed) {
            completed = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    assert!(handle.is_running());
    handle.shutdown().await;

    assert!(completed, "a later tick should finish the work");
    assert!(room_available(&pool, fx.room_id).await);
}
