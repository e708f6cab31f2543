//! Generic helper utilities intended to be used exclusively in tests and hidden
//! setup for examples

mod documents;
mod resolvers;
mod time;

pub use documents::*;
pub use resolvers::*;
pub use time::*;
