pub mod booking;
pub mod listings;
pub mod reconciler;
pub mod reviews;

pub use booking::{
    book_room, cancel_booking, BookingError, BookingReceipt, BookingRequest, CancellationError,
};
pub use reconciler::{release_expired_bookings, AvailabilityReconciler, ReconcilerHandle};
pub use reviews::{add_review, NewReview, ReviewError};
