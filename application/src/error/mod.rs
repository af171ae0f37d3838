//! [`Error`]-related definitions.
//!
//! Every [`Error`] reaching a GraphQL client carries a stable machine-readable
//! [`Code`] and the HTTP status the response is sent with.

mod command;

use std::{fmt, num::TryFromIntError};

use derive_more::Error as StdError;
use itertools::Itertools as _;
use juniper::IntoFieldError;
use service::infra::database;
use tracerr::{Trace, Traced};

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[status = $status_code:ident]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        #[repr(u16)]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self {
                            code: $code,
                            status_code: ::http::StatusCode::$status_code,
                            message: $message.to_string(),
                            backtrace: None,
                        },
                    )*
                }
            }
        }
    };
}

/// GraphQL API [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// [`http::StatusCode`] of this [`Error`].
    pub status_code: http::StatusCode,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,
}

impl Error {
    /// Create a new [`Error`] representing an internal server error.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: "INTERNAL_SERVER_ERROR",
            status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            backtrace: None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            status_code: _,
            backtrace,
            message,
        } = self;

        write!(
            f,
            "[{code}]: {message}{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("{trace}"))),
        )
    }
}

impl<S> IntoFieldError<S> for Error
where
    S: From<String> + From<i32>,
{
    fn into_field_error(self) -> juniper::FieldError<S> {
        let mut ext = juniper::Object::with_capacity(3);
        drop(
            ext.add_field("code", juniper::Value::scalar(self.code.to_owned())),
        );
        drop(ext.add_field(
            "status",
            juniper::Value::scalar(i32::from(self.status_code.as_u16())),
        ));
        drop(
            ext.add_field(
                "backtrace",
                juniper::Value::list(
                    self.backtrace
                        .iter()
                        .flat_map(|trace| trace.iter())
                        .map(|frame| juniper::Value::scalar(frame.to_string()))
                        .collect(),
                ),
            ),
        );
        juniper::FieldError::new(self.message, juniper::Value::object(ext))
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

impl AsError for database::Error {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "DATABASE_UNAVAILABLE"]
                #[status = SERVICE_UNAVAILABLE]
                #[message = "Database is unavailable, retry later"]
                Unavailable,
            }
        }

        self.is_unavailable().then(|| Error::Unavailable.into())
    }
}

define_error! {
    enum BillboardError {
        #[code = "BILLBOARD_NOT_AVAILABLE"]
        #[status = CONFLICT]
        #[message = "`Billboard` is not available for rent"]
        NotAvailable,

        #[code = "BILLBOARD_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Billboard` with the provided ID does not exist"]
        NotExists,

        #[code = "BILLBOARD_REMOVED"]
        #[status = CONFLICT]
        #[message = "`Billboard` is removed from the inventory"]
        Removed,

        #[code = "BILLBOARD_RENTED"]
        #[status = CONFLICT]
        #[message = "`Billboard` is rented by a `Contract`"]
        Rented,
    }
}

define_error! {
    enum ContractError {
        #[code = "CONTRACT_ALREADY_TERMINATED"]
        #[status = CONFLICT]
        #[message = "`Contract` is terminated already"]
        AlreadyTerminated,

        #[code = "CURRENCY_MISMATCH"]
        #[status = BAD_REQUEST]
        #[message = "Prices and payments must be in the `Contract` currency"]
        CurrencyMismatch,

        #[code = "CONTRACT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Contract` with the provided ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum PaymentError {
        #[code = "NON_POSITIVE_AMOUNT"]
        #[status = BAD_REQUEST]
        #[message = "`Payment` amount must be positive"]
        NonPositiveAmount,

        #[code = "PAYMENT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Payment` with the provided ID does not exist"]
        NotExists,

        #[code = "OVERPAYMENT"]
        #[status = CONFLICT]
        #[message = "`Payment` amount exceeds the remaining balance"]
        Overpayment,
    }
}

impl AsError for TryFromIntError {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

#[cfg(test)]
mod spec {
    use juniper::{DefaultScalarValue, IntoFieldError as _, ScalarValue};

    use super::{BillboardError, Error, PaymentError};

    #[test]
    fn field_error_carries_code_and_status() {
        let err: juniper::FieldError<DefaultScalarValue> =
            Error::from(BillboardError::Rented).into_field_error();
        let ext = err.extensions().as_object_value().unwrap();

        assert_eq!(err.message(), "`Billboard` is rented by a `Contract`");
        assert_eq!(
            ext.get_field_value("code")
                .and_then(juniper::Value::as_string_value),
            Some("BILLBOARD_RENTED"),
        );
        assert_eq!(
            ext.get_field_value("status")
                .and_then(juniper::Value::as_scalar)
                .and_then(ScalarValue::as_int),
            Some(409),
        );
    }

    #[test]
    fn displays_code_and_message() {
        let err = Error::from(PaymentError::Overpayment);

        assert_eq!(
            err.to_string(),
            "[OVERPAYMENT]: `Payment` amount exceeds the remaining balance",
        );
    }
}
