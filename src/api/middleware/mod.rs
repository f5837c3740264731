pub mod auth;
pub mod request_id;
pub mod visitor;

pub use auth::{AuthUser, SessionAuth};
pub use request_id::{RequestId, RequestIdMiddleware};
pub use visitor::{VisitorId, VisitorIdentity};
