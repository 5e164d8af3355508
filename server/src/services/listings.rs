use serde::Serialize;
use sqlx::PgPool;

use crate::models::{Amenity, BookingSummary, Property, Room, RoomOccupancy, RoomReview, User};

#[derive(Debug, Serialize)]
pub struct RoomListing {
    #[serde(flatten)]
    pub room: Room,
    pub reviews: Vec<RoomReview>,
}

#[derive(Debug, Serialize)]
pub struct PropertyDetails {
    pub property: Property,
    pub amenities: Vec<Amenity>,
    pub rooms: Vec<RoomListing>,
}

pub async fn list_properties(pool: &PgPool) -> Result<Vec<Property>, sqlx::Error> {
    sqlx::query_as::<_, Property>(
        r#"
        SELECT property_id, owner_id, address, city, state, country,
               description, image_url, image_description
        FROM properties
        ORDER BY property_id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_property(pool: &PgPool, property_id: i64) -> Result<Option<Property>, sqlx::Error> {
    sqlx::query_as::<_, Property>(
        r#"
        SELECT property_id, owner_id, address, city, state, country,
               description, image_url, image_description
        FROM properties
        WHERE property_id = $1
        "#,
    )
    .bind(property_id)
    .fetch_optional(pool)
    .await
}

/// Property with its amenities and every room, each room carrying its reviews newest first.
pub async fn property_details(
    pool: &PgPool,
    property_id: i64,
) -> Result<Option<PropertyDetails>, sqlx::Error> {
    let Some(property) = get_property(pool, property_id).await? else {
        return Ok(None);
    };

    let amenities = sqlx::query_as::<_, Amenity>(
        "SELECT amenity_id, property_id, name, description FROM amenities WHERE property_id = $1 ORDER BY amenity_id",
    )
    .bind(property_id)
    .fetch_all(pool)
    .await?;

    let mut rooms = Vec::new();
    for room in rooms_for_property(pool, property_id).await? {
        let reviews = reviews_for_room(pool, room.room_id).await?;
        rooms.push(RoomListing { room, reviews });
    }

    Ok(Some(PropertyDetails {
        property,
        amenities,
        rooms,
    }))
}

pub async fn rooms_for_property(pool: &PgPool, property_id: i64) -> Result<Vec<Room>, sqlx::Error> {
    sqlx::query_as::<_, Room>(
        r#"
        SELECT room_id, property_id, room_type, capacity, price_per_night, availability_status
        FROM rooms
        WHERE property_id = $1
        ORDER BY room_id
        "#,
    )
    .bind(property_id)
    .fetch_all(pool)
    .await
}

pub async fn get_room(pool: &PgPool, room_id: i64) -> Result<Option<Room>, sqlx::Error> {
    sqlx::query_as::<_, Room>(
        r#"
        SELECT room_id, property_id, room_type, capacity, price_per_night, availability_status
        FROM rooms
        WHERE room_id = $1
        "#,
    )
    .bind(room_id)
    .fetch_optional(pool)
    .await
}

/// Rooms of a property alongside the confirmed booking currently holding each one.
pub async fn room_status(pool: &PgPool, property_id: i64) -> Result<Vec<RoomOccupancy>, sqlx::Error> {
    sqlx::query_as::<_, RoomOccupancy>(
        r#"
        SELECT r.room_id, r.room_type, r.capacity, r.price_per_night, r.availability_status,
               b.booking_id, b.check_in_date, b.check_out_date, u.name AS guest_name
        FROM rooms r
        LEFT JOIN bookings b ON r.room_id = b.room_id AND b.status = 'confirmed'
        LEFT JOIN users u ON b.user_id = u.user_id
        WHERE r.property_id = $1
        ORDER BY r.room_id
        "#,
    )
    .bind(property_id)
    .fetch_all(pool)
    .await
}

pub async fn reviews_for_room(pool: &PgPool, room_id: i64) -> Result<Vec<RoomReview>, sqlx::Error> {
    sqlx::query_as::<_, RoomReview>(
        r#"
        SELECT r.review_id, r.rating, r.comment, u.name AS user_name, r.created_at
        FROM reviews r
        JOIN users u ON r.user_id = u.user_id
        WHERE r.room_id = $1
        ORDER BY r.created_at DESC, r.review_id DESC
        "#,
    )
    .bind(room_id)
    .fetch_all(pool)
    .await
}

pub async fn get_user(pool: &PgPool, user_id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT user_id, name, email, role, phone_number, created_at FROM users WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn bookings_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<BookingSummary>, sqlx::Error> {
    sqlx::query_as::<_, BookingSummary>(
        r#"
        SELECT b.booking_id, b.check_in_date, b.check_out_date, b.total_price, b.status,
               r.room_type, p.address
        FROM bookings b
        JOIN rooms r ON b.room_id = r.room_id
        JOIN properties p ON r.property_id = p.property_id
        WHERE b.user_id = $1
        ORDER BY b.check_in_date DESC, b.booking_id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
