pub mod claims;
pub mod error;
pub mod guard;
pub mod jwks;

pub use claims::{Audience, Claims};
pub use error::AuthError;
pub use guard::{check_permissions, get_token_auth_header, AuthVerifier, GuardError};
pub use jwks::{KeySetError, KeySource, RemoteKeySet, StaticKeySet};
