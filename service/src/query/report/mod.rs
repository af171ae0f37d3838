//! Reports aggregated over the whole inventory.

pub mod municipality;
pub mod overdue;

pub use self::{municipality::Municipality, overdue::Overdue};
