pub mod project;
pub mod resume;
pub mod user;
