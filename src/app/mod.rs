pub mod error;

pub use error::{FreshetError, Result};
