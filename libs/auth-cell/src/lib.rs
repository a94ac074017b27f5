pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{AuthError, AuthResponse, LoginRequest, OAuthExchangeRequest, RegisterRequest};
