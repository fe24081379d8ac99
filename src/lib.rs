//! Rentora Core - tenant-selection domain services and client state.
//!
//! This crate is the headless core of the Rentora landlord dashboard: it
//! owns the API client layer, the normalized entity stores, the derived-state
//! selectors, and the async state-mutation services. Rendering is a consumer
//! of this crate, never a participant in its mutations.

pub mod api;
pub mod configs;
pub mod constants;
pub mod decisions;
pub mod documents;
pub mod errors;
pub mod leads;
pub mod logging;
pub mod realtime;
pub mod state;
pub mod store;
pub mod viewings;

// Re-export error types
pub use errors::Error;
pub use errors::Result;

// Re-export the shared state handle
pub use state::SelectionState;
