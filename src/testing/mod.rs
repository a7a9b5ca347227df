//! Test support

mod mock_backend;

pub use mock_backend::{MockBackend, MockBehavior};
