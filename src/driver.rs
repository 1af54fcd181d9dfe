//! Driver：外部数据库驱动的抽象，以及内置的离线字面量转义驱动。

use crate::error::DriverError;
use crate::flavor::{Flavor, default_flavor};
use crate::value::SqlValue;
use std::collections::BTreeMap;
use std::fmt;

/// 查询结果中的一行：列名到值。
pub type Record = BTreeMap<String, SqlValue>;

/// 底层驱动需要提供的能力。
///
/// `escape_literal` 只会收到非 NULL 的值；NULL 由引擎直接渲染为 `NULL`。
pub trait Driver: fmt::Debug {
    /// 把值转义为带引号的字符串字面量；无法安全转义时必须返回错误。
    fn escape_literal(&self, value: &SqlValue) -> Result<String, DriverError>;

    /// 执行语句，返回受影响行数。
    fn execute(&self, sql: &str) -> Result<u64, DriverError>;

    fn query(&self, sql: &str) -> Result<Vec<Record>, DriverError>;

    fn last_insert_id(&self) -> Result<Option<String>, DriverError> {
        Ok(None)
    }
}

/// 只负责转义、不连接数据库的驱动。
///
/// 所有非 NULL 标量都按字符串字面量输出（`1` → `'1'`）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiteralDriver {
    flavor: Flavor,
}

impl Default for LiteralDriver {
    fn default() -> Self {
        Self::new(default_flavor())
    }
}

impl LiteralDriver {
    pub fn new(flavor: Flavor) -> Self {
        Self { flavor }
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }
}

impl Driver for LiteralDriver {
    fn escape_literal(&self, value: &SqlValue) -> Result<String, DriverError> {
        encode_sql_value(value, self.flavor)
    }

    fn execute(&self, _sql: &str) -> Result<u64, DriverError> {
        Err(DriverError::NotConnected)
    }

    fn query(&self, _sql: &str) -> Result<Vec<Record>, DriverError> {
        Err(DriverError::NotConnected)
    }
}

fn encode_sql_value(v: &SqlValue, flavor: Flavor) -> Result<String, DriverError> {
    let mut out = String::new();
    match v {
        SqlValue::Null => out.push_str("NULL"),
        SqlValue::Bool(b) => quote_string(&mut out, if *b { "1" } else { "0" }, flavor)?,
        SqlValue::I64(n) => quote_string(&mut out, &n.to_string(), flavor)?,
        SqlValue::U64(n) => quote_string(&mut out, &n.to_string(), flavor)?,
        SqlValue::F64(n) => {
            if !n.is_finite() {
                return Err(DriverError::Unquotable(format!("non-finite float {n}")));
            }
            quote_string(&mut out, &n.to_string(), flavor)?;
        }
        SqlValue::String(s) => quote_string(&mut out, s.as_ref(), flavor)?,
        SqlValue::Bytes(b) => {
            let s = std::str::from_utf8(b).map_err(|_| {
                DriverError::Unquotable(format!("{} bytes of binary data", b.len()))
            })?;
            quote_string(&mut out, s, flavor)?;
        }
        SqlValue::DateTime(dt) => {
            let s = dt
                .format(time::macros::format_description!(
                    "[year]-[month]-[day] [hour]:[minute]:[second]"
                ))
                .map_err(|e| DriverError::Unquotable(e.to_string()))?;
            quote_string(&mut out, &s, flavor)?;
        }
    }
    Ok(out)
}

fn quote_string(out: &mut String, s: &str, flavor: Flavor) -> Result<(), DriverError> {
    out.push('\'');
    if flavor.backslash_escapes() {
        for ch in s.chars() {
            match ch {
                '\u{0000}' => out.push_str("\\0"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\u{001a}' => out.push_str("\\Z"),
                '\'' => out.push_str("\\'"),
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                _ => out.push(ch),
            }
        }
    } else {
        for ch in s.chars() {
            match ch {
                // PostgreSQL/SQLite 的 text 无法容纳 NUL
                '\u{0000}' => {
                    return Err(DriverError::Unquotable(
                        "string containing NUL character".into(),
                    ));
                }
                '\'' => out.push_str("''"),
                _ => out.push(ch),
            }
        }
    }
    out.push('\'');
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Driver, LiteralDriver};
    use crate::error::DriverError;
    use crate::flavor::Flavor;
    use crate::value::SqlValue;
    use pretty_assertions::assert_eq;
    use time::UtcOffset;
    use time::macros::datetime;

    #[test]
    fn mysql_escapes_with_backslashes() {
        let d = LiteralDriver::new(Flavor::MySQL);
        assert_eq!(
            d.escape_literal(&SqlValue::from("I'm \"fine\"\n")).unwrap(),
            "'I\\'m \\\"fine\\\"\\n'"
        );
        assert_eq!(d.escape_literal(&SqlValue::from("a\\b")).unwrap(), "'a\\\\b'");
    }

    #[test]
    fn postgres_doubles_single_quotes() {
        let d = LiteralDriver::new(Flavor::PostgreSQL);
        assert_eq!(d.escape_literal(&SqlValue::from("I'm")).unwrap(), "'I''m'");
        assert!(matches!(
            d.escape_literal(&SqlValue::from("a\u{0}b")),
            Err(DriverError::Unquotable(_))
        ));
    }

    #[test]
    fn scalars_become_string_literals() {
        let d = LiteralDriver::new(Flavor::MySQL);
        assert_eq!(d.escape_literal(&SqlValue::I64(-7)).unwrap(), "'-7'");
        assert_eq!(d.escape_literal(&SqlValue::U64(7)).unwrap(), "'7'");
        assert_eq!(d.escape_literal(&SqlValue::F64(1.5)).unwrap(), "'1.5'");
        assert_eq!(d.escape_literal(&SqlValue::Bool(true)).unwrap(), "'1'");
        assert_eq!(d.escape_literal(&SqlValue::Bool(false)).unwrap(), "'0'");
    }

    #[test]
    fn refuses_unquotable_values() {
        let d = LiteralDriver::new(Flavor::MySQL);
        assert!(d.escape_literal(&SqlValue::F64(f64::NAN)).is_err());
        assert!(d.escape_literal(&SqlValue::F64(f64::INFINITY)).is_err());
        assert_eq!(
            d.escape_literal(&SqlValue::Bytes(vec![0xff, 0xfe])),
            Err(DriverError::Unquotable("2 bytes of binary data".into()))
        );
    }

    #[test]
    fn datetime_literal() {
        let d = LiteralDriver::new(Flavor::MySQL);
        let dt = datetime!(2019-04-24 12:23:34.123456789)
            .assume_offset(UtcOffset::from_hms(8, 0, 0).unwrap());
        assert_eq!(
            d.escape_literal(&SqlValue::DateTime(dt)).unwrap(),
            "'2019-04-24 12:23:34'"
        );
    }

    #[test]
    fn not_connected() {
        let d = LiteralDriver::default();
        assert_eq!(d.execute("SELECT 1;"), Err(DriverError::NotConnected));
        assert_eq!(d.query("SELECT 1;"), Err(DriverError::NotConnected));
        assert_eq!(d.last_insert_id(), Ok(None));
    }
}
