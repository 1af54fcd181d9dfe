//! 条件引擎：累积 WHERE/HAVING 条件，并渲染为有序的 SQL 片段。
//!
//! 每个条件列表的第一项不带 `AND`/`OR`，而是由子句关键字（`WHERE`/`HAVING`）替代；
//! 嵌套分组内部不带任何关键字。分组可以任意深度嵌套，括号总是成对出现。

use crate::error::{QueryError, QueryResult};
use crate::modifiers::{Arg, Raw, raw};
use crate::quoter::Quoter;
use std::fmt;
use std::str::FromStr;

/// 条件之间的连接词。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// 比较运算符（输入大小写不敏感，输出统一大写）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,
    /// `!=`
    NotEqual,
    /// `<>`
    LessGreater,
    /// `<=>`
    NullSafeEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    Like,
    NotLike,
    Regexp,
    NotRegexp,
    Is,
    IsNot,
    In,
    NotIn,
    Between,
    NotBetween,
    Greatest,
    Least,
    Coalesce,
    Interval,
    Strcmp,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::LessGreater => "<>",
            Self::NullSafeEqual => "<=>",
            Self::LessThan => "<",
            Self::LessEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterEqual => ">=",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::Regexp => "REGEXP",
            Self::NotRegexp => "NOT REGEXP",
            Self::Is => "IS",
            Self::IsNot => "IS NOT",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::Between => "BETWEEN",
            Self::NotBetween => "NOT BETWEEN",
            Self::Greatest => "GREATEST",
            Self::Least => "LEAST",
            Self::Coalesce => "COALESCE",
            Self::Interval => "INTERVAL",
            Self::Strcmp => "STRCMP",
        }
    }

    /// 解析运算符 token，忽略大小写与多余空白（`not  in` 也可以）。
    pub fn parse(token: &str) -> QueryResult<Self> {
        let normalized = token
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_lowercase();
        let op = match normalized.as_str() {
            "=" => Self::Equal,
            "!=" => Self::NotEqual,
            "<>" => Self::LessGreater,
            "<=>" => Self::NullSafeEqual,
            "<" => Self::LessThan,
            "<=" => Self::LessEqual,
            ">" => Self::GreaterThan,
            ">=" => Self::GreaterEqual,
            "like" => Self::Like,
            "not like" => Self::NotLike,
            "regexp" => Self::Regexp,
            "not regexp" => Self::NotRegexp,
            "is" => Self::Is,
            "is not" => Self::IsNot,
            "in" => Self::In,
            "not in" => Self::NotIn,
            "between" => Self::Between,
            "not between" => Self::NotBetween,
            "greatest" => Self::Greatest,
            "least" => Self::Least,
            "coalesce" => Self::Coalesce,
            "interval" => Self::Interval,
            "strcmp" => Self::Strcmp,
            _ => {
                return Err(QueryError::shape(format!(
                    "unknown operator `{}`",
                    token.trim()
                )));
            }
        };
        Ok(op)
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 条件列表中的一项。
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionEntry {
    /// 原样输出；位于列表首位时会补上子句关键字，否则连接词需由调用方自带。
    Raw(Raw),
    /// `field operator value`。
    Comparison {
        connector: Connector,
        field: String,
        operator: Operator,
        value: Arg,
    },
    /// 带连接词的原样条件（`whereRaw`、`whereColumn` 使用）。
    RawComparison { connector: Connector, raw: Raw },
    /// 回调构建出的括号分组。
    Group {
        connector: Connector,
        entries: Vec<ConditionEntry>,
    },
}

/// 条件组：WHERE、HAVING 以及嵌套分组都用它来收集条件。
///
/// 添加阶段发现的形状错误（未知运算符等）会被记录下来，在渲染时返回。
#[derive(Debug, Clone)]
pub struct ConditionGroup {
    quoter: Quoter,
    entries: Vec<ConditionEntry>,
    error: Option<QueryError>,
}

impl ConditionGroup {
    pub fn new(quoter: Quoter) -> Self {
        Self {
            quoter,
            entries: Vec::new(),
            error: None,
        }
    }

    pub fn entries(&self) -> &[ConditionEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 第一个被记录的形状错误。
    pub fn error(&self) -> Option<&QueryError> {
        self.error.as_ref()
    }

    fn fail(&mut self, err: QueryError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    pub fn push(&mut self, entry: ConditionEntry) -> &mut Self {
        self.entries.push(entry);
        self
    }

    pub fn add_condition(
        &mut self,
        connector: Connector,
        field: &str,
        operator: &str,
        value: impl Into<Arg>,
    ) -> &mut Self {
        match Operator::parse(operator) {
            Ok(operator) => self.entries.push(ConditionEntry::Comparison {
                connector,
                field: field.to_string(),
                operator,
                value: value.into(),
            }),
            Err(e) => self.fail(e),
        }
        self
    }

    pub fn add_raw(&mut self, connector: Connector, expr: Raw) -> &mut Self {
        self.entries.push(ConditionEntry::RawComparison {
            connector,
            raw: expr,
        });
        self
    }

    /// 两列比较：两侧都按标识符加引号。
    pub fn add_column(
        &mut self,
        connector: Connector,
        left: &str,
        operator: &str,
        right: &str,
    ) -> &mut Self {
        match Operator::parse(operator) {
            Ok(op) => {
                let expr = raw(format!(
                    "{} {} {}",
                    self.quoter.quote_qualified(left),
                    op,
                    self.quoter.quote_qualified(right)
                ));
                self.add_raw(connector, expr)
            }
            Err(e) => {
                self.fail(e);
                self
            }
        }
    }

    /// 括号分组：回调拿到一个全新的空条件组；回调什么都没加时不产生任何输出。
    pub fn add_group(
        &mut self,
        connector: Connector,
        f: impl FnOnce(&mut ConditionGroup),
    ) -> &mut Self {
        let mut group = ConditionGroup::new(self.quoter.clone());
        f(&mut group);
        if let Some(e) = group.error {
            self.fail(e);
            return self;
        }
        if group.entries.is_empty() {
            return self;
        }
        self.entries.push(ConditionEntry::Group {
            connector,
            entries: group.entries,
        });
        self
    }

    pub fn where_(&mut self, field: &str, operator: &str, value: impl Into<Arg>) -> &mut Self {
        self.add_condition(Connector::And, field, operator, value)
    }

    pub fn or_where(&mut self, field: &str, operator: &str, value: impl Into<Arg>) -> &mut Self {
        self.add_condition(Connector::Or, field, operator, value)
    }

    /// HAVING 分组里的写法，与 `where_` 等价。
    pub fn having(&mut self, field: &str, operator: &str, value: impl Into<Arg>) -> &mut Self {
        self.add_condition(Connector::And, field, operator, value)
    }

    pub fn or_having(&mut self, field: &str, operator: &str, value: impl Into<Arg>) -> &mut Self {
        self.add_condition(Connector::Or, field, operator, value)
    }

    pub fn where_raw(&mut self, expr: Raw) -> &mut Self {
        self.add_raw(Connector::And, expr)
    }

    pub fn or_where_raw(&mut self, expr: Raw) -> &mut Self {
        self.add_raw(Connector::Or, expr)
    }

    pub fn where_column(&mut self, left: &str, operator: &str, right: &str) -> &mut Self {
        self.add_column(Connector::And, left, operator, right)
    }

    pub fn or_where_column(&mut self, left: &str, operator: &str, right: &str) -> &mut Self {
        self.add_column(Connector::Or, left, operator, right)
    }

    pub fn where_group(&mut self, f: impl FnOnce(&mut ConditionGroup)) -> &mut Self {
        self.add_group(Connector::And, f)
    }

    pub fn or_where_group(&mut self, f: impl FnOnce(&mut ConditionGroup)) -> &mut Self {
        self.add_group(Connector::Or, f)
    }

    /// 渲染为片段列表；`keyword` 为空字符串时不加任何前缀。
    pub fn render(&self, keyword: &str) -> QueryResult<Vec<String>> {
        if let Some(e) = &self.error {
            return Err(e.clone());
        }
        render(&self.entries, keyword, &self.quoter)
    }
}

/// 渲染算法：空列表原样返回（不输出关键字）。
pub fn render(
    entries: &[ConditionEntry],
    keyword: &str,
    quoter: &Quoter,
) -> QueryResult<Vec<String>> {
    let mut out = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        match entry {
            ConditionEntry::Raw(r) => {
                if i == 0 {
                    out.push(prefixed(keyword, r.value()));
                } else {
                    out.push(r.value().to_string());
                }
            }
            ConditionEntry::RawComparison { connector, raw } => {
                out.push(prefixed(leading(i, keyword, *connector), raw.value()));
            }
            ConditionEntry::Comparison {
                connector,
                field,
                operator,
                value,
            } => {
                let (op, right) = resolve(*operator, value, quoter)?;
                let expr = format!("{} {} {}", quoter.quote_qualified(field), op, right);
                out.push(prefixed(leading(i, keyword, *connector), &expr));
            }
            ConditionEntry::Group { connector, entries } => {
                out.push(prefixed(leading(i, keyword, *connector), "("));
                out.extend(render(entries, "", quoter)?);
                out.push(")".to_string());
            }
        }
    }
    Ok(out)
}

fn leading(index: usize, keyword: &str, connector: Connector) -> &str {
    if index == 0 {
        keyword
    } else {
        connector.as_str()
    }
}

fn prefixed(keyword: &str, text: &str) -> String {
    if keyword.is_empty() {
        text.to_string()
    } else {
        format!("{keyword} {text}")
    }
}

/// 按运算符决定最终的运算符文本与右值文本。
fn resolve(operator: Operator, value: &Arg, quoter: &Quoter) -> QueryResult<(String, String)> {
    use Operator::*;

    match operator {
        In | NotIn => Ok((
            operator.as_str().to_string(),
            quote_list(operator, value, quoter)?,
        )),
        Greatest | Least | Coalesce | Interval | Strcmp => Ok((
            format!("= {}", operator.as_str()),
            quote_list(operator, value, quoter)?,
        )),
        Equal if value.is_null() => Ok(("IS".to_string(), "NULL".to_string())),
        NotEqual | LessGreater if value.is_null() => {
            Ok(("IS NOT".to_string(), "NULL".to_string()))
        }
        Between | NotBetween => match value {
            Arg::List(items) if items.len() == 2 => Ok((
                operator.as_str().to_string(),
                format!(
                    "{} AND {}",
                    quoter.quote_arg(&items[0])?,
                    quoter.quote_arg(&items[1])?
                ),
            )),
            _ => Err(QueryError::shape(format!(
                "{operator} requires exactly two values"
            ))),
        },
        _ => match value {
            Arg::Raw(r) => Ok((operator.as_str().to_string(), r.value().to_string())),
            Arg::Value(v) => Ok((operator.as_str().to_string(), quoter.quote_value(v)?)),
            Arg::List(_) => Err(QueryError::shape(format!(
                "operator {operator} does not accept a value list"
            ))),
        },
    }
}

fn quote_list(operator: Operator, value: &Arg, quoter: &Quoter) -> QueryResult<String> {
    match value {
        Arg::List(items) if items.is_empty() => Err(QueryError::shape(format!(
            "{operator} requires at least one value"
        ))),
        Arg::List(items) => Ok(format!("({})", quoter.quote_array(items)?.join(", "))),
        Arg::Raw(r) => Ok(format!("({})", r.value())),
        Arg::Value(_) => Err(QueryError::shape(format!(
            "{operator} requires a value list"
        ))),
    }
}
