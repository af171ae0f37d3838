//! [`Command`] definition.

pub mod complete_maintenance;
pub mod create_billboard;
pub mod create_contract;
pub mod record_payment;
pub mod remove_billboard;
pub mod start_maintenance;
pub mod terminate_contract;
pub mod update_billboard;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    complete_maintenance::CompleteMaintenance,
    create_billboard::CreateBillboard, create_contract::CreateContract,
    record_payment::RecordPayment, remove_billboard::RemoveBillboard,
    start_maintenance::StartMaintenance,
    terminate_contract::TerminateContract, update_billboard::UpdateBillboard,
};
