//! This module defines the core, strongly-typed data representations used
//! throughout the analysis toolkit.
//!
//! The benchmark harness writes every encoding choice as free text. These types
//! replace that text with explicit enums and newtypes so that the order-sensitive
//! codec chain and the order-insensitive codec set can never be confused.

pub mod encoding;
pub mod record;

// Re-export the main type(s) for easier access.
pub use encoding::{CodecChain, CodecSet, EncodedField, Method, IDENTITY_CHAIN};
pub use record::{BenchmarkRecord, Column, InputLayout, Knockout, NormalizedField};
