pub mod password;
pub mod url_validator;
pub mod validation;

pub use url_validator::{DefaultUrlValidator, UrlValidator};
