/// Database models for Tablekeep
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts with the admin role flag
/// - `token`: Opaque bearer tokens issued at login
/// - `reservation`: Table reservations owned by users
///
/// # Ownership
///
/// A user owns zero or more tokens and zero or more reservations; deleting
/// a user cascades to both (enforced by foreign keys in the schema).

pub mod reservation;
pub mod token;
pub mod user;
