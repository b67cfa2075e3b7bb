#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Name canonicalization for clubs, meets, and WSO regions.
//!
//! Everything in this crate is a pure function over strings. Names are
//! folded into comparable keys ([`normalize`]), URL slugs ([`slugify`]),
//! and resolved back to display names through the embedded region table
//! ([`regions`]). Fuzzy slug lookup against near-duplicate club rows
//! lives in [`matching`].

pub mod documents;
pub mod location;
pub mod matching;
pub mod normalize;
pub mod regions;

pub use normalize::{normalize, slugify};
