//! TWA Signing Core Library
//!
//! Keystore generation and Digital Asset Links rendering for Trusted Web
//! Activity packaging. All certificate work is delegated to the JDK `keytool`.

pub mod assetlinks;
pub mod config;
pub mod dname;
pub mod error;
pub mod fingerprint;
pub mod keygen;
pub mod keytool;
pub mod prompt;
pub mod report;

pub use error::{Result, TwaError};
pub use fingerprint::Fingerprint;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
