//! InsertBuilder：构建 INSERT 语句。
//!
//! 单行用 `INSERT INTO t SET a='1', b='2'`，多行用 `INSERT INTO t (a, b) VALUES (...),(...)`。

use crate::connection::Connection;
use crate::error::{QueryError, QueryResult};
use crate::modifiers::{Arg, Builder, Ident};
use crate::quoter::{Quoter, Row};
use std::ops::Deref;

/// INSERT 优先级修饰符。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPriority {
    LowPriority,
    Delayed,
    HighPriority,
}

impl InsertPriority {
    fn as_str(self) -> &'static str {
        match self {
            Self::LowPriority => "LOW_PRIORITY",
            Self::Delayed => "DELAYED",
            Self::HighPriority => "HIGH_PRIORITY",
        }
    }
}

#[derive(Debug, Clone)]
enum InsertValues {
    Empty,
    Single(Row),
    Multi(Vec<Row>),
}

#[derive(Debug, Clone)]
pub struct InsertBuilder {
    conn: Connection,
    quoter: Quoter,

    table: Option<Ident>,
    priority: Option<InsertPriority>,
    ignore: bool,
    values: InsertValues,
    duplicates: Row,
}

impl Deref for InsertBuilder {
    type Target = Quoter;
    fn deref(&self) -> &Self::Target {
        &self.quoter
    }
}

fn collect_row<K, V>(row: impl IntoIterator<Item = (K, V)>) -> Row
where
    K: Into<String>,
    V: Into<Arg>,
{
    row.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

/// 按第一行的列顺序重排一行的值；列集合不一致时报错。
fn align_row(columns: &[&str], row: &[(String, Arg)]) -> QueryResult<Row> {
    if row.len() != columns.len() {
        return Err(QueryError::shape(format!(
            "INSERT row has {} columns, expected {}",
            row.len(),
            columns.len()
        )));
    }
    columns
        .iter()
        .map(|col| {
            row.iter()
                .find(|(k, _)| k.as_str() == *col)
                .cloned()
                .ok_or_else(|| QueryError::shape(format!("INSERT row is missing column `{col}`")))
        })
        .collect()
}

impl InsertBuilder {
    pub fn new(conn: Connection) -> Self {
        let quoter = conn.quoter();
        Self {
            conn,
            quoter,
            table: None,
            priority: None,
            ignore: false,
            values: InsertValues::Empty,
            duplicates: Row::new(),
        }
    }

    pub fn build(&self) -> QueryResult<String> {
        Builder::build(self)
    }

    /// 执行并返回受影响行数。
    pub fn execute(&self) -> QueryResult<u64> {
        let sql = self.build()?;
        self.conn.execute(&sql)
    }

    /// 执行并返回驱动报告的自增 ID。
    pub fn insert_get_id(&self) -> QueryResult<Option<String>> {
        self.execute()?;
        self.conn.last_insert_id()
    }

    pub fn table(&mut self, table: impl Into<Ident>) -> &mut Self {
        self.table = Some(table.into());
        self
    }

    pub fn low_priority(&mut self) -> &mut Self {
        self.priority = Some(InsertPriority::LowPriority);
        self
    }

    pub fn delayed(&mut self) -> &mut Self {
        self.priority = Some(InsertPriority::Delayed);
        self
    }

    pub fn high_priority(&mut self) -> &mut Self {
        self.priority = Some(InsertPriority::HighPriority);
        self
    }

    pub fn ignore(&mut self) -> &mut Self {
        self.ignore = true;
        self
    }

    /// 单行：`SET col=val, ...`。
    pub fn set<K, V>(&mut self, row: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<Arg>,
    {
        self.values = InsertValues::Single(collect_row(row));
        self
    }

    /// 多行：`(cols) VALUES (...),(...)`，列名与顺序取自第一行，其余行按列名对齐。
    pub fn set_rows<R, K, V>(&mut self, rows: impl IntoIterator<Item = R>) -> &mut Self
    where
        R: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Arg>,
    {
        self.values = InsertValues::Multi(rows.into_iter().map(collect_row).collect());
        self
    }

    pub fn on_duplicate_key_update<K, V>(
        &mut self,
        row: impl IntoIterator<Item = (K, V)>,
    ) -> &mut Self
    where
        K: Into<String>,
        V: Into<Arg>,
    {
        self.duplicates.extend(collect_row(row));
        self
    }

    fn values_sql(&self) -> QueryResult<String> {
        match &self.values {
            InsertValues::Single(row) if !row.is_empty() => {
                Ok(format!("SET {}", self.quote_set_values(row)?))
            }
            InsertValues::Multi(rows) if !rows.is_empty() => {
                let columns: Vec<&str> = rows[0].iter().map(|(k, _)| k.as_str()).collect();
                if columns.is_empty() {
                    return Err(QueryError::shape("INSERT row has no columns"));
                }
                let tuples = rows
                    .iter()
                    .map(|row| {
                        let aligned = align_row(&columns, row)?;
                        Ok(format!("({})", self.quote_bulk_values(&aligned)?))
                    })
                    .collect::<QueryResult<Vec<_>>>()?;
                Ok(format!(
                    "({}) VALUES {}",
                    self.quote_fields(&rows[0]),
                    tuples.join(",")
                ))
            }
            _ => Err(QueryError::shape("INSERT requires at least one value")),
        }
    }
}

impl Builder for InsertBuilder {
    fn to_sql(&self) -> QueryResult<String> {
        let table = self
            .table
            .as_ref()
            .ok_or_else(|| QueryError::shape("INSERT requires a table"))?;

        let mut sql = vec!["INSERT".to_string()];
        if let Some(priority) = self.priority {
            sql.push(priority.as_str().to_string());
        }
        if self.ignore {
            sql.push("IGNORE".to_string());
        }
        sql.push(format!("INTO {}", self.quote_name(table)));
        sql.push(self.values_sql()?);
        if !self.duplicates.is_empty() {
            sql.push(format!(
                "ON DUPLICATE KEY UPDATE {}",
                self.quote_set_values(&self.duplicates)?
            ));
        }
        Ok(sql.join(" "))
    }
}
