//! GitHub profile explorer.
//!
//! Looks up a public GitHub profile by handle and turns the result into a
//! view state for the desktop window: a populated card, a loading
//! indicator, or one fixed message per failure kind.

pub mod client;
pub mod components;
pub mod config;
pub mod error;
pub mod models;
pub mod state;

pub use client::{GitHubClient, ProfileLookup};
pub use error::{FailureKind, LookupError};
pub use models::{map_user, Profile, RawUser};
pub use state::{Coordinator, StalePolicy, ViewError, ViewState};
