//! Shared trait plumbing for value objects stored as canonical text.
//!
//! The type must provide `new(&str) -> Result<Self>`, `as_str(&self) -> &str`
//! and a `Default` zero value whose `as_str()` is empty.

/// Implements `FromStr`, `TryFrom<String>`, `Into<String>`, `AsRef<str>`,
/// [`Valuer`](crate::sql::Valuer) and [`Scanner`](crate::sql::Scanner).
macro_rules! text_value_object {
    ($($ty:ident),+ $(,)?) => {$(
        impl ::std::str::FromStr for $ty {
            type Err = $crate::error::Error;

            fn from_str(s: &str) -> $crate::error::Result<Self> {
                $ty::new(s)
            }
        }

        impl ::std::convert::TryFrom<String> for $ty {
            type Error = $crate::error::Error;

            fn try_from(value: String) -> $crate::error::Result<Self> {
                $ty::new(&value)
            }
        }

        impl ::std::convert::From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.as_str().to_string()
            }
        }

        impl ::std::convert::AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl $crate::sql::Valuer for $ty {
            fn to_sql(&self) -> $crate::sql::SqlValue {
                if self.as_str().is_empty() {
                    $crate::sql::SqlValue::Null
                } else {
                    $crate::sql::SqlValue::Text(self.as_str().to_string())
                }
            }
        }

        impl $crate::sql::Scanner for $ty {
            fn scan(src: $crate::sql::SqlValue) -> $crate::error::Result<Self> {
                match src.into_text(stringify!($ty))? {
                    None => Ok(<$ty as ::std::default::Default>::default()),
                    Some(text) => $ty::new(&text),
                }
            }
        }
    )+};
}
