//! SQLite implementation of the durable user mirror.

mod user_mirror;

pub use user_mirror::{MirroredUser, SqliteUserMirror};
