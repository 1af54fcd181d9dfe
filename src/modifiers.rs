//! 参数修饰器：Raw 原样表达式、条件右值 Arg、标识符 Ident 与 Builder trait。

use crate::error::QueryResult;
use crate::value::SqlValue;
use dyn_clone::DynClone;
use std::fmt;

/// Raw：标记为原样拼入 SQL（不做任何引号或转义）。
///
/// 调用方需自行保证文本安全，常用于函数调用、子查询或列引用。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Raw {
    pub(crate) expr: String,
}

impl Raw {
    pub fn new(expr: impl Into<String>) -> Self {
        Self { expr: expr.into() }
    }

    /// 原样文本。
    pub fn value(&self) -> &str {
        &self.expr
    }
}

impl fmt::Display for Raw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expr)
    }
}

pub fn raw(expr: impl Into<String>) -> Raw {
    Raw::new(expr)
}

/// 条件右值与赋值值：标量、原样表达式或值列表。
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Value(SqlValue),
    Raw(Raw),
    /// IN / BETWEEN / GREATEST 等运算符使用的值列表。
    List(Vec<Arg>),
}

impl Arg {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Value(SqlValue::Null))
    }
}

/// List：把多个值打包成一个列表参数。
pub fn list<T: Into<Arg>>(values: impl IntoIterator<Item = T>) -> Arg {
    Arg::List(values.into_iter().map(Into::into).collect())
}

impl From<SqlValue> for Arg {
    fn from(v: SqlValue) -> Self {
        Self::Value(v)
    }
}

impl From<Raw> for Arg {
    fn from(v: Raw) -> Self {
        Self::Raw(v)
    }
}

impl From<()> for Arg {
    fn from(_: ()) -> Self {
        SqlValue::Null.into()
    }
}

impl From<i32> for Arg {
    fn from(v: i32) -> Self {
        SqlValue::I64(v as i64).into()
    }
}
impl From<i64> for Arg {
    fn from(v: i64) -> Self {
        SqlValue::I64(v).into()
    }
}
impl From<u32> for Arg {
    fn from(v: u32) -> Self {
        SqlValue::U64(v as u64).into()
    }
}
impl From<u64> for Arg {
    fn from(v: u64) -> Self {
        SqlValue::U64(v).into()
    }
}
impl From<usize> for Arg {
    fn from(v: usize) -> Self {
        SqlValue::U64(v as u64).into()
    }
}
impl From<bool> for Arg {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v).into()
    }
}
impl From<f64> for Arg {
    fn from(v: f64) -> Self {
        SqlValue::F64(v).into()
    }
}
impl From<&str> for Arg {
    fn from(v: &str) -> Self {
        SqlValue::from(v.to_string()).into()
    }
}
impl From<String> for Arg {
    fn from(v: String) -> Self {
        SqlValue::from(v).into()
    }
}
impl From<time::OffsetDateTime> for Arg {
    fn from(v: time::OffsetDateTime) -> Self {
        SqlValue::from(v).into()
    }
}

impl<T> From<Option<T>> for Arg
where
    T: Into<SqlValue>,
{
    fn from(v: Option<T>) -> Self {
        SqlValue::from_option(v).into()
    }
}

/// 标识符：列名/表名，可带别名，也可以是原样表达式。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ident {
    /// 普通名字，支持 `db.table.field` 形式。
    Name(String),
    Raw(Raw),
    /// `source AS alias`。
    Aliased { alias: String, source: Box<Ident> },
}

impl Ident {
    /// 给当前标识符加别名。
    pub fn as_(self, alias: impl Into<String>) -> Self {
        Self::Aliased {
            alias: alias.into(),
            source: Box::new(self),
        }
    }
}

/// `alias("u", "users")` 等价于 `users AS u`。
pub fn alias(alias: impl Into<String>, source: impl Into<Ident>) -> Ident {
    source.into().as_(alias)
}

impl From<&str> for Ident {
    fn from(v: &str) -> Self {
        Self::Name(v.to_string())
    }
}

impl From<String> for Ident {
    fn from(v: String) -> Self {
        Self::Name(v)
    }
}

impl From<&String> for Ident {
    fn from(v: &String) -> Self {
        Self::Name(v.clone())
    }
}

impl From<Raw> for Ident {
    fn from(v: Raw) -> Self {
        Self::Raw(v)
    }
}

/// 语句构建器：可嵌套（UNION、子查询）。
pub trait Builder: DynClone + fmt::Debug {
    /// 非终结形式：不带结尾分号。
    fn to_sql(&self) -> QueryResult<String>;

    /// 终结形式：带结尾分号。
    fn build(&self) -> QueryResult<String> {
        Ok(format!("{};", self.to_sql()?))
    }
}

dyn_clone::clone_trait_object!(Builder);

impl Builder for Box<dyn Builder> {
    fn to_sql(&self) -> QueryResult<String> {
        (**self).to_sql()
    }
}
