//! Text endpoints ([`Source`], [`Sink`]) and the data [`Format`]s read
//! through them.

mod source;
mod sink;
mod format;

pub use source::*;
pub use sink::*;
pub use format::*;
