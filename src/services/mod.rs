//! Business services
//!
//! Each service depends only on the store traits, so handlers and tests can
//! wire any implementation in.

pub mod auth_service;
pub mod link_service;
pub mod metadata;
pub mod redirect;
pub mod stats_service;
pub mod token;
pub mod visit_logger;

pub use auth_service::AuthService;
pub use link_service::{LinkDetails, LinkService};
pub use metadata::{
    DisabledMetadataFetcher, HttpMetadataFetcher, MetadataFetcher, PageMetadata, build_fetcher,
};
pub use redirect::RedirectService;
pub use stats_service::{LinkStats, StatsService};
pub use token::TokenGenerator;
pub use visit_logger::VisitLogger;
