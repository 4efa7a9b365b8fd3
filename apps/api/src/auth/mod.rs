// Bearer-token authentication: argon2 password hashes, sha256-hashed session
// tokens in PostgreSQL, and request extractors for signed-in users and recruiters.

mod crypto;
mod db;
mod extractor;
pub mod handlers;

pub use extractor::{AuthUser, RecruiterUser};
