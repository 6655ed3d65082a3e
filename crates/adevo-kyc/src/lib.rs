//! Identity lookup: the BVN provider port, an in-memory fixture provider, and
//! an HTTP client for a KYC service.

mod fixture;
mod lookup;

#[cfg(feature = "http")]
pub mod http;

pub use fixture::{FixtureLookup, NOT_FOUND_MESSAGE, demo_record};
pub use lookup::{IdentityLookup, LookupError};

#[cfg(feature = "http")]
pub use http::HttpLookup;
