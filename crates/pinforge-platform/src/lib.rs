//! Pinterest and RSS integrations.
//!
//! All outbound calls go through [`FallbackTransport`], which retries once via
//! a proxy on network-level failures.

pub mod client;
pub mod error;
pub mod feed;
pub mod oauth;
pub mod transport;

pub use client::{Board, PinPublisher, PinterestClient};
pub use error::PlatformError;
pub use feed::{fetch_feed, parse_feed};
pub use oauth::{authorize_url, generate_state, states_match, OAuthConfig, PinterestAuth};
pub use transport::FallbackTransport;
