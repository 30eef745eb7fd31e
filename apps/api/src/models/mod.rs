pub mod bullet;
pub mod document;
pub mod job;
pub mod profile;
