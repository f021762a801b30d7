//! Entity module - Contains the SeaORM entity definitions for the database.
//! The contact model here is shared by both storage paths: it maps to the
//! `contact_submissions` table on the relational side and to the JSON array
//! elements of the file fallback.

pub mod contact;

// Re-export specific types to avoid conflicts
pub use contact::{
    Column as ContactColumn, ContactStatus, Entity as Contact, Model as ContactModel,
};
