//! Small helpers shared across modules.

pub mod html;
pub mod path;
mod plural;

pub use plural::plural_count;
