//! Lock-free limit order book matching core.
//!
//! The book accepts order submissions and, for each one, atomically enters it
//! into the book and matches it against the opposite side, returning every
//! trade produced. See [`engine::prelude`] for the public surface.

pub mod engine;

pub mod prelude {
    pub use crate::engine::prelude::*;
}
