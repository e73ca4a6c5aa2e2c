//! Editor authentication

mod extractor;
mod jwt;

pub use extractor::EditorIdentity;
pub use jwt::{EditorClaims, JwtError, JwtService};
