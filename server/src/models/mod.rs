pub mod amenity;
pub mod booking;
pub mod payment;
pub mod property;
pub mod review;
pub mod room;
pub mod user;

pub use amenity::Amenity;
pub use booking::{Booking, BookingStatus, BookingSummary};
pub use payment::{Payment, PaymentStatus};
pub use property::Property;
pub use review::{Review, RoomReview};
pub use room::{Room, RoomOccupancy};
pub use user::{User, UserRole};
