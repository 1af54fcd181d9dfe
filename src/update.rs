//! UpdateBuilder：构建 UPDATE 语句。

use crate::condition::ConditionGroup;
use crate::connection::Connection;
use crate::error::{QueryError, QueryResult};
use crate::modifiers::{Arg, Builder, Ident, Raw, raw};
use crate::quoter::{Quoter, Row};
use crate::value::SqlValue;
use std::ops::Deref;

#[derive(Debug, Clone)]
pub struct UpdateBuilder {
    conn: Connection,
    quoter: Quoter,

    table: Option<Ident>,
    low_priority: bool,
    ignore: bool,
    assignments: Row,

    where_: ConditionGroup,
    order_by: Vec<Ident>,
    limit: Option<u64>,

    error: Option<QueryError>,
}

impl Deref for UpdateBuilder {
    type Target = Quoter;
    fn deref(&self) -> &Self::Target {
        &self.quoter
    }
}

impl UpdateBuilder {
    pub fn new(conn: Connection) -> Self {
        let quoter = conn.quoter();
        Self {
            conn,
            where_: ConditionGroup::new(quoter.clone()),
            quoter,
            table: None,
            low_priority: false,
            ignore: false,
            assignments: Row::new(),
            order_by: Vec::new(),
            limit: None,
            error: None,
        }
    }

    fn fail(&mut self, err: QueryError) {
        if self.error.is_none() {
            self.error = Some(err);
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

    pub fn table(&mut self, table: impl Into<Ident>) -> &mut Self {
        self.table = Some(table.into());
        self
    }

    pub fn low_priority(&mut self) -> &mut Self {
        self.low_priority = true;
        self
    }

    pub fn ignore(&mut self) -> &mut Self {
        self.ignore = true;
        self
    }

    /// 追加赋值；同一列多次赋值会按顺序全部输出。
    pub fn set<K, V>(&mut self, row: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<Arg>,
    {
        self.assignments
            .extend(row.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    fn step(&self, column: &str, sign: char, amount: SqlValue) -> QueryResult<Raw> {
        Ok(raw(format!(
            "{}{sign}{}",
            self.quote_qualified(column),
            self.quote_value(&amount)?
        )))
    }

    fn push_step(&mut self, column: &str, sign: char, amount: SqlValue) -> &mut Self {
        match self.step(column, sign, amount) {
            Ok(expr) => self.assignments.push((column.to_string(), expr.into())),
            Err(e) => self.fail(e),
        }
        self
    }

    /// `col=col+'1'`。
    pub fn increment(&mut self, column: &str) -> &mut Self {
        self.increment_by(column, 1)
    }

    pub fn increment_by(&mut self, column: &str, amount: impl Into<SqlValue>) -> &mut Self {
        self.push_step(column, '+', amount.into())
    }

    pub fn decrement(&mut self, column: &str) -> &mut Self {
        self.decrement_by(column, 1)
    }

    pub fn decrement_by(&mut self, column: &str, amount: impl Into<SqlValue>) -> &mut Self {
        self.push_step(column, '-', amount.into())
    }

    pub fn where_(&mut self, field: &str, operator: &str, value: impl Into<Arg>) -> &mut Self {
        self.where_.where_(field, operator, value);
        self
    }

    pub fn or_where(&mut self, field: &str, operator: &str, value: impl Into<Arg>) -> &mut Self {
        self.where_.or_where(field, operator, value);
        self
    }

    pub fn where_raw(&mut self, expr: Raw) -> &mut Self {
        self.where_.where_raw(expr);
        self
    }

    pub fn or_where_raw(&mut self, expr: Raw) -> &mut Self {
        self.where_.or_where_raw(expr);
        self
    }

    pub fn where_column(&mut self, left: &str, operator: &str, right: &str) -> &mut Self {
        self.where_.where_column(left, operator, right);
        self
    }

    pub fn or_where_column(&mut self, left: &str, operator: &str, right: &str) -> &mut Self {
        self.where_.or_where_column(left, operator, right);
        self
    }

    pub fn where_group(&mut self, f: impl FnOnce(&mut ConditionGroup)) -> &mut Self {
        self.where_.where_group(f);
        self
    }

    pub fn or_where_group(&mut self, f: impl FnOnce(&mut ConditionGroup)) -> &mut Self {
        self.where_.or_where_group(f);
        self
    }

    pub fn order_by<T: Into<Ident>>(&mut self, fields: impl IntoIterator<Item = T>) -> &mut Self {
        self.order_by.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit = Some(limit);
        self
    }
}

impl Builder for UpdateBuilder {
    fn to_sql(&self) -> QueryResult<String> {
        if let Some(e) = &self.error {
            return Err(e.clone());
        }
        let table = self
            .table
            .as_ref()
            .ok_or_else(|| QueryError::shape("UPDATE requires a table"))?;
        if self.assignments.is_empty() {
            return Err(QueryError::shape("UPDATE requires at least one assignment"));
        }

        let mut sql = vec!["UPDATE".to_string()];
        if self.low_priority {
            sql.push("LOW_PRIORITY".to_string());
        }
        if self.ignore {
            sql.push("IGNORE".to_string());
        }
        sql.push(self.quote_name(table));
        sql.push(format!("SET {}", self.quote_set_values(&self.assignments)?));
        sql.extend(self.where_.render("WHERE")?);
        if !self.order_by.is_empty() {
            sql.push(format!(
                "ORDER BY {}",
                self.quote_by_fields(&self.order_by).join(", ")
            ));
        }
        if let Some(limit) = self.limit {
            sql.push(format!("LIMIT {limit}"));
        }
        Ok(sql.join(" "))
    }
}
