pub mod chat;
pub mod job;
pub mod profile;
pub mod user;

pub use chat::{ChatMessage, ChatRole};
pub use job::{ApplicationStatus, Job, JobAnalysis, JobApplication};
pub use profile::{ParsedProfile, Profile};
pub use user::User;
