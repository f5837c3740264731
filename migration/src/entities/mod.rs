pub mod link;
pub mod log;
pub mod user;

pub use link::Entity as LinkEntity;
pub use log::Entity as LogEntity;
pub use user::Entity as UserEntity;
