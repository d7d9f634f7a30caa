//! # sqlx Integration (feature `sqlx`)
//!
//! Lets value objects be bound as query parameters and read as row columns
//! on SQLite:
//!
//! ```rust,ignore
//! sqlx::query("INSERT INTO customers (id, cpf, email) VALUES (?, ?, ?)")
//!     .bind(Uuid::new_v7())
//!     .bind(Cpf::new("529.982.247-25")?)
//!     .bind(Email::new("ana@example.com")?)
//!     .execute(&pool)
//!     .await?;
//!
//! let cpf: Cpf = row.try_get("cpf")?;
//! ```
//!
//! Encoding goes through [`Valuer`] and decoding through [`Scanner`], so
//! the database sees exactly the scalar the driver-neutral hooks produce and
//! every decoded value passes constructor validation. NULL decodes to the
//! zero value; bind `Option<T>` / read `Option<T>` to keep NULL as `None`.
//!
//! `Money` spans two columns and is bound through
//! [`Money::to_sql_columns`](crate::Money::to_sql_columns) instead.

use chrono::{DateTime, Utc};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{Sqlite, SqliteTypeInfo};
use sqlx::{Database, Decode, Encode, Type};

use crate::sql::{Scanner, SqlValue, Valuer};
use crate::{
    AuditUser, BirthDate, Cep, Cnpj, Cpf, CreatedAt, Currency, Date, DateRange, Day, Email, FileExtension,
    IpAddress, MimeType, NullableTime, Percentage, Phone, PortNumber, Quantity, Slug, Uf, UpdatedAt, Uuid,
    Version,
};

fn encode_sql_value<'q>(
    value: SqlValue,
    buf: &mut <Sqlite as Database>::ArgumentBuffer<'q>,
) -> Result<IsNull, BoxDynError> {
    match value {
        SqlValue::Null => Ok(IsNull::Yes),
        SqlValue::Integer(v) => <i64 as Encode<'q, Sqlite>>::encode(v, buf),
        SqlValue::Real(v) => <f64 as Encode<'q, Sqlite>>::encode(v, buf),
        SqlValue::Text(v) => <String as Encode<'q, Sqlite>>::encode(v, buf),
        SqlValue::Blob(v) => <Vec<u8> as Encode<'q, Sqlite>>::encode(v, buf),
        SqlValue::Timestamp(v) => <DateTime<Utc> as Encode<'q, Sqlite>>::encode(v, buf),
    }
}

/// `$column` is the Rust type SQLite stores the value as.
macro_rules! sqlx_value_object {
    ($column:ty => $($ty:ty),+ $(,)?) => {$(
        impl Type<Sqlite> for $ty {
            fn type_info() -> SqliteTypeInfo {
                <$column as Type<Sqlite>>::type_info()
            }

            fn compatible(ty: &SqliteTypeInfo) -> bool {
                <$column as Type<Sqlite>>::compatible(ty)
            }
        }

        impl<'q> Encode<'q, Sqlite> for $ty {
            fn encode_by_ref(
                &self,
                buf: &mut <Sqlite as Database>::ArgumentBuffer<'q>,
            ) -> Result<IsNull, BoxDynError> {
                encode_sql_value(self.to_sql(), buf)
            }
        }

        impl<'r> Decode<'r, Sqlite> for $ty {
            fn decode(value: <Sqlite as Database>::ValueRef<'r>) -> Result<Self, BoxDynError> {
                let raw = <Option<$column> as Decode<'r, Sqlite>>::decode(value)?;
                Ok(<$ty as Scanner>::scan(SqlValue::from(raw))?)
            }
        }
    )+};
}

sqlx_value_object!(String =>
    Currency, Cpf, Cnpj, Quantity, Email, Phone, Cep, Uf, Uuid, Slug, IpAddress,
    FileExtension, MimeType, Date, DateRange, BirthDate, AuditUser,
);

sqlx_value_object!(i64 => Percentage, PortNumber, Day, Version);

sqlx_value_object!(DateTime<Utc> => CreatedAt, UpdatedAt, NullableTime);
