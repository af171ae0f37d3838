//! Domain definitions.

pub mod billboard;
pub mod contract;
pub mod maintenance;
pub mod payment;

pub use self::{billboard::Billboard, contract::Contract, payment::Payment};

/// Macro for defining a validated single-line text value.
///
/// The value is trimmed, non-empty and not longer than the provided number
/// of bytes.
macro_rules! define_text {
    (
        #[doc = $doc:literal]
        $name:ident(max = $max:literal)
    ) => {
        #[doc = $doc]
        #[derive(
            ::derive_more::AsRef,
            Clone,
            Debug,
            ::derive_more::Display,
            Eq,
            Hash,
            Ord,
            PartialEq,
            PartialOrd,
        )]
        #[as_ref(str, String)]
        #[cfg_attr(
            feature = "postgres",
            derive(::postgres_types::FromSql, ::postgres_types::ToSql),
            postgres(transparent)
        )]
        pub struct $name(String);

        impl $name {
            /// Creates a new value without checking its format.
            ///
            /// # Safety
            ///
            /// The caller must ensure that the value matches the format.
            #[expect(unsafe_code, reason = "bypass")]
            #[must_use]
            pub unsafe fn new_unchecked(val: impl Into<String>) -> Self {
                Self(val.into())
            }

            /// Creates a new value if the provided one is valid.
            #[must_use]
            pub fn new(val: impl Into<String>) -> Option<Self> {
                let val = val.into();
                Self::check(&val).then_some(Self(val))
            }

            /// Checks whether the provided value is valid.
            fn check(val: &str) -> bool {
                val.trim() == val && !val.is_empty() && val.len() <= $max
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = &'static str;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s).ok_or(concat!("invalid `", stringify!($name), "`"))
            }
        }

        impl ::maud::Render for $name {
            fn render_to(&self, buffer: &mut String) {
                ::maud::Render::render_to(self.0.as_str(), buffer);
            }
        }
    };
}
pub(crate) use define_text;
