//! DeleteBuilder：构建 DELETE 语句与 `TRUNCATE TABLE`。

use crate::condition::ConditionGroup;
use crate::connection::Connection;
use crate::error::{QueryError, QueryResult};
use crate::modifiers::{Arg, Builder, Ident, Raw};
use crate::quoter::Quoter;
use std::ops::Deref;

#[derive(Debug, Clone)]
pub struct DeleteBuilder {
    conn: Connection,
    quoter: Quoter,

    table: Option<Ident>,
    low_priority: bool,
    quick: bool,
    ignore: bool,
    truncate: bool,

    where_: ConditionGroup,
    order_by: Vec<Ident>,
    limit: Option<u64>,
}

impl Deref for DeleteBuilder {
    type Target = Quoter;
    fn deref(&self) -> &Self::Target {
        &self.quoter
    }
}

impl DeleteBuilder {
    pub fn new(conn: Connection) -> Self {
        let quoter = conn.quoter();
        Self {
            conn,
            where_: ConditionGroup::new(quoter.clone()),
            quoter,
            table: None,
            low_priority: false,
            quick: false,
            ignore: false,
            truncate: false,
            order_by: Vec::new(),
            limit: None,
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

    pub fn from(&mut self, table: impl Into<Ident>) -> &mut Self {
        self.table = Some(table.into());
        self
    }

    pub fn low_priority(&mut self) -> &mut Self {
        self.low_priority = true;
        self
    }

    pub fn quick(&mut self) -> &mut Self {
        self.quick = true;
        self
    }

    pub fn ignore(&mut self) -> &mut Self {
        self.ignore = true;
        self
    }

    /// 改为输出 `TRUNCATE TABLE t`，WHERE/ORDER BY/LIMIT 以及修饰符全部忽略。
    pub fn truncate(&mut self) -> &mut Self {
        self.truncate = true;
        self
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

impl Builder for DeleteBuilder {
    fn to_sql(&self) -> QueryResult<String> {
        let table = self
            .table
            .as_ref()
            .ok_or_else(|| QueryError::shape("DELETE requires a table"))?;
        if self.truncate {
            return Ok(format!("TRUNCATE TABLE {}", self.quote_name(table)));
        }

        let mut sql = vec!["DELETE".to_string()];
        if self.low_priority {
            sql.push("LOW_PRIORITY".to_string());
        }
        if self.quick {
            sql.push("QUICK".to_string());
        }
        if self.ignore {
            sql.push("IGNORE".to_string());
        }
        sql.push(format!("FROM {}", self.quote_name(table)));
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
