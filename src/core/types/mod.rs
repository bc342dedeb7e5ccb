//! Data types recorded every simulation tick.

mod episode;
mod frame;
mod metadata;
mod step;

pub use episode::Episode;
pub use frame::Frame;
pub use metadata::{MetaValue, Metadata};
pub use step::{ACTION_DIM, Step};
