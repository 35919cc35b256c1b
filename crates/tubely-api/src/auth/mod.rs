//! Bearer-token authentication.
//!
//! Tokens are HS256 JWTs whose subject is the user id. Handlers take an
//! [`AuthenticatedUser`] argument; requests without a valid token never reach them.

pub mod bearer;
pub mod jwt;
pub mod models;

pub use bearer::get_bearer_token;
pub use jwt::{make_jwt, validate_jwt, JwtClaims, TOKEN_ISSUER};
pub use models::AuthenticatedUser;
