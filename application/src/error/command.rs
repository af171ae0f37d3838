//! [`Error`]s of [`service::command`]s executions.

use service::command;

use crate::{define_error, AsError, Error};

use super::{BillboardError, ContractError, PaymentError};

impl AsError for command::update_billboard::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::BillboardNotExists(_) => BillboardError::NotExists.into(),
            Self::BillboardRemoved(_) => BillboardError::Removed.into(),
        })
    }
}

impl AsError for command::remove_billboard::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::BillboardNotExists(_) => BillboardError::NotExists.into(),
            Self::BillboardRented(_) => BillboardError::Rented.into(),
        })
    }
}

impl AsError for command::start_maintenance::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "ALREADY_IN_MAINTENANCE"]
                #[status = CONFLICT]
                #[message = "`Billboard` is under maintenance already"]
                AlreadyInMaintenance,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::AlreadyInMaintenance(_) => {
                Error::AlreadyInMaintenance.into()
            }
            Self::BillboardNotExists(_) => BillboardError::NotExists.into(),
            Self::BillboardRemoved(_) => BillboardError::Removed.into(),
        })
    }
}

impl AsError for command::complete_maintenance::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "MAINTENANCE_ALREADY_COMPLETED"]
                #[status = CONFLICT]
                #[message = "Maintenance is completed already"]
                AlreadyCompleted,

                #[code = "MAINTENANCE_RECORD_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`MaintenanceRecord` with the provided ID does \
                             not exist"]
                RecordNotExists,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::AlreadyCompleted(_) => Error::AlreadyCompleted.into(),
            // Records never outlive their `Billboard`s.
            Self::BillboardNotExists(_) => return None,
            Self::RecordNotExists(_) => Error::RecordNotExists.into(),
        })
    }
}

impl AsError for command::create_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_PERIOD"]
                #[status = BAD_REQUEST]
                #[message = "`Contract` must end after it starts"]
                InvalidPeriod,

                #[code = "NO_BILLBOARDS"]
                #[status = BAD_REQUEST]
                #[message = "At least one `Billboard` must be rented"]
                NoBillboards,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::BillboardNotAvailable(_) => {
                BillboardError::NotAvailable.into()
            }
            Self::BillboardNotExists(_) => BillboardError::NotExists.into(),
            Self::CurrencyMismatch => ContractError::CurrencyMismatch.into(),
            Self::InvalidPeriod => Error::InvalidPeriod.into(),
            Self::NoBillboards => Error::NoBillboards.into(),
        })
    }
}

impl AsError for command::terminate_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ContractAlreadyTerminated(_) => {
                ContractError::AlreadyTerminated.into()
            }
            Self::ContractNotExists(_) => ContractError::NotExists.into(),
        })
    }
}

impl AsError for command::record_payment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ContractNotExists(_) => ContractError::NotExists.into(),
            Self::CurrencyMismatch(_) => ContractError::CurrencyMismatch.into(),
            Self::NonPositiveAmount(_) => {
                PaymentError::NonPositiveAmount.into()
            }
            Self::Overpayment { .. } => PaymentError::Overpayment.into(),
        })
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::Money;
    use http::StatusCode;
    use service::{
        command::{
            complete_maintenance, create_contract, record_payment,
            remove_billboard,
        },
        domain::billboard,
    };

    use crate::AsError as _;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    #[test]
    fn payment_rules() {
        let err = record_payment::ExecutionError::Overpayment {
            amount: money("700LYD"),
            remaining: money("600LYD"),
        }
        .as_error();
        assert_eq!(err.code, "OVERPAYMENT");
        assert_eq!(err.status_code, StatusCode::CONFLICT);

        let err =
            record_payment::ExecutionError::CurrencyMismatch(money("5USD"))
                .as_error();
        assert_eq!(err.code, "CURRENCY_MISMATCH");
        assert_eq!(err.status_code, StatusCode::BAD_REQUEST);

        let err =
            record_payment::ExecutionError::NonPositiveAmount(money("0LYD"))
                .as_error();
        assert_eq!(err.code, "NON_POSITIVE_AMOUNT");
        assert_eq!(err.status_code, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn billboard_availability() {
        let id = billboard::Id::new();

        let err = create_contract::ExecutionError::BillboardNotAvailable(id)
            .as_error();
        assert_eq!(err.code, "BILLBOARD_NOT_AVAILABLE");
        assert_eq!(err.status_code, StatusCode::CONFLICT);

        let err =
            remove_billboard::ExecutionError::BillboardRented(id).as_error();
        assert_eq!(err.code, "BILLBOARD_RENTED");
        assert_eq!(err.status_code, StatusCode::CONFLICT);

        let err =
            remove_billboard::ExecutionError::BillboardNotExists(id).as_error();
        assert_eq!(err.code, "BILLBOARD_NOT_EXISTS");
        assert_eq!(err.status_code, StatusCode::NOT_FOUND);
    }

    #[test]
    fn dangling_record_is_internal() {
        let err = complete_maintenance::ExecutionError::BillboardNotExists(
            billboard::Id::new(),
        )
        .as_error();

        assert_eq!(err.code, "INTERNAL_SERVER_ERROR");
        assert_eq!(err.status_code, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn traced_errors_keep_backtrace() {
        let err = tracerr::new!(create_contract::ExecutionError::NoBillboards)
            .as_error();

        assert_eq!(err.code, "NO_BILLBOARDS");
        assert!(err.backtrace.is_some());
    }
}
