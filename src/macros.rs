//! Macros for mapping domain newtypes and string enums onto SQL types.
//! Pair each invocation with `#[derive(FromSqlRow, AsExpression)]` and a
//! `#[sql_type = "..."]` attribute on the type itself.

/// Implements `FromSql`/`ToSql` for a newtype by delegating to the inner
/// representation.
macro_rules! newtype_sql {
    ($t:ident, $sql:ty, $inner:ty) => {
        impl ::diesel::deserialize::FromSql<$sql, ::diesel::pg::Pg> for $t {
            fn from_sql(bytes: Option<&[u8]>) -> ::diesel::deserialize::Result<Self> {
                <$inner as ::diesel::deserialize::FromSql<$sql, ::diesel::pg::Pg>>::from_sql(bytes).map($t)
            }
        }

        impl ::diesel::serialize::ToSql<$sql, ::diesel::pg::Pg> for $t {
            fn to_sql<W: ::std::io::Write>(
                &self,
                out: &mut ::diesel::serialize::Output<W, ::diesel::pg::Pg>,
            ) -> ::diesel::serialize::Result {
                <$inner as ::diesel::serialize::ToSql<$sql, ::diesel::pg::Pg>>::to_sql(&self.0, out)
            }
        }
    };
}

/// Implements `FromSql`/`ToSql` for a unit enum stored as `VarChar`, with
/// the exact wire strings listed in the invocation.
macro_rules! enum_varchar_sql {
    ($t:ident { $($variant:ident => $val:tt),+ $(,)* }) => {
        impl ::diesel::deserialize::FromSql<::diesel::sql_types::VarChar, ::diesel::pg::Pg> for $t {
            fn from_sql(bytes: Option<&[u8]>) -> ::diesel::deserialize::Result<Self> {
                match bytes {
                    $(Some($val) => Ok($t::$variant),)+
                    Some(value) => Err(format!(
                        concat!("Unrecognized enum variant for ", stringify!($t), ": {}"),
                        ::std::str::from_utf8(value).unwrap_or("unreadable value")
                    ).into()),
                    None => Err(concat!("Unexpected null for non-null column `", stringify!($t), "`").into()),
                }
            }
        }

        impl ::diesel::serialize::ToSql<::diesel::sql_types::VarChar, ::diesel::pg::Pg> for $t {
            fn to_sql<W: ::std::io::Write>(
                &self,
                out: &mut ::diesel::serialize::Output<W, ::diesel::pg::Pg>,
            ) -> ::diesel::serialize::Result {
                match *self {
                    $($t::$variant => out.write_all($val)?,)+
                }
                Ok(::diesel::serialize::IsNull::No)
            }
        }
    };
}
