//! GraphQL scalar definitions.

use std::{fmt, marker::PhantomData, str::FromStr};

use juniper::{
    GraphQLType, InputValue, ParseScalarResult, ParseScalarValue, ScalarToken,
    ScalarValue, Value,
};

/// Helper type to use in `#[graphql(with = ..)]` attribute for domain text
/// newtypes.
///
/// Outputs the [`Display`] form of the wrapped `As` value and parses inputs
/// with its [`FromStr`] impl. Surrounding whitespace of the input is ignored,
/// as it comes from hand-filled forms.
///
/// Target type must implement [`TryFrom`] and [`AsRef`] for `As` type.
///
/// [`Display`]: fmt::Display
#[derive(Debug)]
pub struct Via<As>(PhantomData<As>);

impl<As> Via<As> {
    /// Converts the target type into a string scalar [`Value`].
    pub fn to_output<T, S>(value: &T) -> Value<S>
    where
        As: fmt::Display,
        T: AsRef<As>,
        S: ScalarValue,
    {
        Value::from(value.as_ref().to_string())
    }

    /// Constructs the target type out of a string scalar [`InputValue`].
    ///
    /// # Errors
    ///
    /// If the input is not a string, or is rejected by `As` or the target
    /// type.
    pub fn from_input<T, S>(input: &InputValue<S>) -> Result<T, String>
    where
        As: FromStr,
        As::Err: fmt::Display,
        T: TryFrom<As> + GraphQLType<S, TypeInfo = ()>,
        T::Error: fmt::Display,
        S: ScalarValue,
    {
        let name = T::name(&()).unwrap_or("scalar");
        let s = input.as_string_value().ok_or_else(|| {
            format!("`{name}` expects a string, found: {input}")
        })?;
        s.trim()
            .parse::<As>()
            .map_err(|e| format!("invalid `{name}` \"{s}\": {e}"))?
            .try_into()
            .map_err(|e| format!("invalid `{name}` \"{s}\": {e}"))
    }

    /// Parses the provided [`ScalarToken`] as a string.
    ///
    /// # Errors
    ///
    /// If the token is not a string.
    pub fn parse_token<S: ScalarValue>(
        value: ScalarToken<'_>,
    ) -> ParseScalarResult<S> {
        <String as ParseScalarValue<S>>::from_str(value)
    }
}

#[cfg(test)]
mod spec {
    use juniper::{DefaultScalarValue, InputValue};
    use service::domain::billboard;

    use crate::api::billboard::{Name, Size};

    use super::Via;

    fn input(s: &str) -> InputValue<DefaultScalarValue> {
        InputValue::scalar(s.to_owned())
    }

    #[test]
    fn trims_input() {
        let size = Via::<billboard::Size>::from_input::<Size, _>(&input(
            " 4.5x12 ",
        ))
        .unwrap();

        assert_eq!(size.to_string(), "4.5x12");
    }

    #[test]
    fn names_scalar_in_errors() {
        let err = Via::<billboard::Size>::from_input::<Size, _>(&input(
            "large",
        ))
        .unwrap_err();
        assert!(err.contains("BillboardSize"), "{err}");
        assert!(err.contains("large"), "{err}");

        let err = Via::<billboard::Name>::from_input::<Name, _>(
            &InputValue::<DefaultScalarValue>::scalar(3),
        )
        .unwrap_err();
        assert!(err.contains("expects a string"), "{err}");
    }
}
