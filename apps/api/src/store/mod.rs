//! Document store over PostgreSQL. Profiles and analyses are kept as JSONB so
//! the stored shape is exactly the serialized domain type.

pub mod applications;
pub mod chat;
pub mod jobs;
pub mod profiles;
pub mod users;
