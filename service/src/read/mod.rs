//! Read entities definitions.

pub mod billboard;
pub mod contract;

/// Selector of the next value of a database sequence, like a new contract
/// number.
#[derive(Clone, Copy, Debug, Default)]
pub struct Next;
