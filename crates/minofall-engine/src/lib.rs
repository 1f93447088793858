pub use self::{collab::*, engine::*, event::*, polling::*, relay::*, stats::*, timer::*};

pub mod collab;
pub mod engine;
pub mod event;
pub mod polling;
pub mod relay;
pub mod stats;
pub mod timer;
