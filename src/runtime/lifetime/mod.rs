pub mod shutdown;
pub mod startup;

pub use startup::{AppContext, StartupContext, prepare_server_startup};
