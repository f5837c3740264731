pub mod auth;
pub mod error_code;
pub mod helpers;
pub mod links;
pub mod redirect;
pub mod routes;
pub mod types;

pub use error_code::ErrorCode;
pub use helpers::{
    CookieBuilder, api_result, created_response, error_from_shortleak, error_response,
    json_response, success_response,
};
pub use routes::configure_app;
pub use types::*;
