//! Pure decision logic for the Outbox site behavior layer.
//!
//! Everything in this crate is browser-free. The wasm layer in
//! `outbox-web` reads the DOM, asks these modules what to do, and applies
//! the answer. The split keeps every policy testable with plain
//! `cargo test` and no browser in the loop.

#![forbid(unsafe_code)]

/// Counter animation math: easing, sampling, display formatting
pub mod animate;

/// Cookie-consent gating for privacy-sensitive scripts
pub mod consent;

/// Debounce policy with a caller-supplied clock
pub mod debounce;

/// In-page pub/sub event names and payloads
pub mod events;

/// External-link classification
pub mod links;

/// Third-party script registry and loading decisions
pub mod scripts;

/// Scroll-position thresholds
pub mod scroll;
