//! Middleware and request extractors.

pub mod identity;
pub mod session;

pub use identity::CurrentRequester;
pub use session::create_session_layer;
