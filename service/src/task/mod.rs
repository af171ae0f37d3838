//! Background [`Task`]s definitions.

mod background;
pub mod release_expired_contracts;

pub use common::Handler as Task;

pub use self::{
    background::Background,
    release_expired_contracts::ReleaseExpiredContracts,
};
