//! SelectBuilder：构建 SELECT 语句。

use crate::condition::{ConditionGroup, Connector, Operator};
use crate::connection::Connection;
use crate::driver::Record;
use crate::error::{QueryError, QueryResult};
use crate::functions::FunctionBuilder;
use crate::modifiers::{Arg, Builder, Ident, Raw, raw};
use crate::quoter::Quoter;
use std::collections::BTreeSet;
use std::ops::Deref;

/// MySQL SELECT 修饰符，按声明顺序输出。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SelectOption {
    Distinct,
    DistinctRow,
    HighPriority,
    StraightJoin,
    SmallResult,
    BigResult,
    BufferResult,
    CalcFoundRows,
}

impl SelectOption {
    fn as_str(self) -> &'static str {
        match self {
            Self::Distinct => "DISTINCT",
            Self::DistinctRow => "DISTINCTROW",
            Self::HighPriority => "HIGH_PRIORITY",
            Self::StraightJoin => "STRAIGHT_JOIN",
            Self::SmallResult => "SQL_SMALL_RESULT",
            Self::BigResult => "SQL_BIG_RESULT",
            Self::BufferResult => "SQL_BUFFER_RESULT",
            Self::CalcFoundRows => "SQL_CALC_FOUND_ROWS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOption {
    Inner,
    Left,
    Right,
    Cross,
}

impl JoinOption {
    fn as_str(self) -> &'static str {
        match self {
            Self::Inner => "INNER",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Cross => "CROSS",
        }
    }
}

#[derive(Debug, Clone)]
enum JoinOn {
    None,
    Columns {
        left: String,
        operator: String,
        right: String,
    },
    Raw(Raw),
}

#[derive(Debug, Clone)]
struct Join {
    option: JoinOption,
    table: Ident,
    on: JoinOn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnionOption {
    Union,
    All,
    Distinct,
}

impl UnionOption {
    fn as_str(self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::All => "UNION ALL",
            Self::Distinct => "UNION DISTINCT",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SelectBuilder {
    conn: Connection,
    quoter: Quoter,

    options: BTreeSet<SelectOption>,
    columns: Vec<Ident>,
    table: Option<Ident>,
    joins: Vec<Join>,

    where_: ConditionGroup,
    having: ConditionGroup,

    group_by: Vec<Ident>,
    order_by: Vec<Ident>,
    limit: Option<u64>,
    offset: Option<u64>,
    unions: Vec<(UnionOption, Box<dyn Builder>)>,

    error: Option<QueryError>,
}

impl Deref for SelectBuilder {
    type Target = Quoter;
    fn deref(&self) -> &Self::Target {
        &self.quoter
    }
}

impl SelectBuilder {
    pub fn new(conn: Connection) -> Self {
        let quoter = conn.quoter();
        Self {
            conn,
            where_: ConditionGroup::new(quoter.clone()),
            having: ConditionGroup::new(quoter.clone()),
            quoter,
            options: BTreeSet::new(),
            columns: Vec::new(),
            table: None,
            joins: Vec::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            unions: Vec::new(),
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

    /// 执行并返回全部结果行。
    pub fn fetch_all(&self) -> QueryResult<Vec<Record>> {
        let sql = self.build()?;
        self.conn.query(&sql)
    }

    pub fn func(&self) -> FunctionBuilder {
        FunctionBuilder::new(self.quoter.clone())
    }

    pub fn option(&mut self, option: SelectOption) -> &mut Self {
        self.options.insert(option);
        self
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.option(SelectOption::Distinct)
    }

    pub fn distinct_row(&mut self) -> &mut Self {
        self.option(SelectOption::DistinctRow)
    }

    pub fn high_priority(&mut self) -> &mut Self {
        self.option(SelectOption::HighPriority)
    }

    pub fn straight_join(&mut self) -> &mut Self {
        self.option(SelectOption::StraightJoin)
    }

    pub fn sql_small_result(&mut self) -> &mut Self {
        self.option(SelectOption::SmallResult)
    }

    pub fn sql_big_result(&mut self) -> &mut Self {
        self.option(SelectOption::BigResult)
    }

    pub fn sql_buffer_result(&mut self) -> &mut Self {
        self.option(SelectOption::BufferResult)
    }

    pub fn calc_found_rows(&mut self) -> &mut Self {
        self.option(SelectOption::CalcFoundRows)
    }

    /// 追加列；不设置任何列时输出 `*`。
    pub fn columns<T: Into<Ident>>(&mut self, cols: impl IntoIterator<Item = T>) -> &mut Self {
        self.columns.extend(cols.into_iter().map(Into::into));
        self
    }

    fn sub_query(&self, f: impl FnOnce(&mut SelectBuilder)) -> QueryResult<String> {
        let mut sub = SelectBuilder::new(self.conn.clone());
        f(&mut sub);
        sub.to_sql()
    }

    /// 子查询列：回调拿到一个全新的 SelectBuilder，生成的 SQL（不带分号）原样作为一列。
    pub fn column_query(&mut self, f: impl FnOnce(&mut SelectBuilder)) -> &mut Self {
        match self.sub_query(f) {
            Ok(sql) => self.columns.push(raw(sql).into()),
            Err(e) => self.fail(e),
        }
        self
    }

    /// 带别名的子查询列：`(SELECT ...) AS alias`。
    pub fn column_query_as(
        &mut self,
        alias: &str,
        f: impl FnOnce(&mut SelectBuilder),
    ) -> &mut Self {
        match self.sub_query(f) {
            Ok(sql) => self.columns.push(Ident::from(raw(format!("({sql})"))).as_(alias)),
            Err(e) => self.fail(e),
        }
        self
    }

    /// 把当前查询包装成派生表/标量子查询：`(SELECT ...) AS alias`。
    pub fn alias(&self, alias: &str) -> QueryResult<Ident> {
        let sql = self.to_sql()?;
        Ok(Ident::from(raw(format!("({sql})"))).as_(alias))
    }

    pub fn from(&mut self, table: impl Into<Ident>) -> &mut Self {
        self.table = Some(table.into());
        self
    }

    fn push_join(
        &mut self,
        option: JoinOption,
        table: impl Into<Ident>,
        left: &str,
        operator: &str,
        right: &str,
    ) -> &mut Self {
        self.joins.push(Join {
            option,
            table: table.into(),
            on: JoinOn::Columns {
                left: left.to_string(),
                operator: operator.to_string(),
                right: right.to_string(),
            },
        });
        self
    }

    /// `INNER JOIN table ON left op right`（两侧都是列）。
    pub fn join(
        &mut self,
        table: impl Into<Ident>,
        left: &str,
        operator: &str,
        right: &str,
    ) -> &mut Self {
        self.push_join(JoinOption::Inner, table, left, operator, right)
    }

    pub fn left_join(
        &mut self,
        table: impl Into<Ident>,
        left: &str,
        operator: &str,
        right: &str,
    ) -> &mut Self {
        self.push_join(JoinOption::Left, table, left, operator, right)
    }

    pub fn right_join(
        &mut self,
        table: impl Into<Ident>,
        left: &str,
        operator: &str,
        right: &str,
    ) -> &mut Self {
        self.push_join(JoinOption::Right, table, left, operator, right)
    }

    pub fn cross_join(&mut self, table: impl Into<Ident>) -> &mut Self {
        self.joins.push(Join {
            option: JoinOption::Cross,
            table: table.into(),
            on: JoinOn::None,
        });
        self
    }

    /// `INNER JOIN table ON (raw)`，用于多列等复杂 ON 条件。
    pub fn join_raw(&mut self, table: impl Into<Ident>, on: Raw) -> &mut Self {
        self.joins.push(Join {
            option: JoinOption::Inner,
            table: table.into(),
            on: JoinOn::Raw(on),
        });
        self
    }

    pub fn left_join_raw(&mut self, table: impl Into<Ident>, on: Raw) -> &mut Self {
        self.joins.push(Join {
            option: JoinOption::Left,
            table: table.into(),
            on: JoinOn::Raw(on),
        });
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

    pub fn having(&mut self, field: &str, operator: &str, value: impl Into<Arg>) -> &mut Self {
        self.having.add_condition(Connector::And, field, operator, value);
        self
    }

    pub fn or_having(&mut self, field: &str, operator: &str, value: impl Into<Arg>) -> &mut Self {
        self.having.add_condition(Connector::Or, field, operator, value);
        self
    }

    pub fn having_raw(&mut self, expr: Raw) -> &mut Self {
        self.having.add_raw(Connector::And, expr);
        self
    }

    pub fn or_having_raw(&mut self, expr: Raw) -> &mut Self {
        self.having.add_raw(Connector::Or, expr);
        self
    }

    /// HAVING 分组：回调里用 `having` / `or_having`（或 `where_` 系列）添加条件。
    pub fn having_group(&mut self, f: impl FnOnce(&mut ConditionGroup)) -> &mut Self {
        self.having.add_group(Connector::And, f);
        self
    }

    pub fn or_having_group(&mut self, f: impl FnOnce(&mut ConditionGroup)) -> &mut Self {
        self.having.add_group(Connector::Or, f);
        self
    }

    /// 字段可带 `ASC`/`DESC` 后缀。
    pub fn group_by<T: Into<Ident>>(&mut self, fields: impl IntoIterator<Item = T>) -> &mut Self {
        self.group_by.extend(fields.into_iter().map(Into::into));
        self
    }

    /// 字段可带 `ASC`/`DESC` 后缀，例如 `"users.id DESC"`。
    pub fn order_by<T: Into<Ident>>(&mut self, fields: impl IntoIterator<Item = T>) -> &mut Self {
        self.order_by.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    /// 只有设置了 LIMIT 且 offset 大于 0 时才会输出 OFFSET。
    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    pub fn union(&mut self, query: impl Builder + 'static) -> &mut Self {
        self.unions.push((UnionOption::Union, Box::new(query)));
        self
    }

    pub fn union_all(&mut self, query: impl Builder + 'static) -> &mut Self {
        self.unions.push((UnionOption::All, Box::new(query)));
        self
    }

    pub fn union_distinct(&mut self, query: impl Builder + 'static) -> &mut Self {
        self.unions.push((UnionOption::Distinct, Box::new(query)));
        self
    }

    fn select_sql(&self) -> String {
        let mut parts = vec!["SELECT".to_string()];
        parts.extend(self.options.iter().map(|o| o.as_str().to_string()));
        if self.columns.is_empty() {
            parts.push("*".to_string());
        } else {
            parts.push(self.quote_names(&self.columns).join(", "));
        }
        parts.join(" ")
    }

    fn join_sql(&self) -> QueryResult<Vec<String>> {
        self.joins
            .iter()
            .map(|j| {
                let head = format!(
                    "{} JOIN {}",
                    j.option.as_str(),
                    self.quote_name(&j.table)
                );
                match &j.on {
                    JoinOn::None => Ok(head),
                    JoinOn::Raw(r) => Ok(format!("{head} ON ({})", r.value())),
                    JoinOn::Columns {
                        left,
                        operator,
                        right,
                    } => {
                        let op = Operator::parse(operator)?;
                        Ok(format!(
                            "{head} ON {} {op} {}",
                            self.quote_qualified(left),
                            self.quote_qualified(right)
                        ))
                    }
                }
            })
            .collect()
    }

    fn limit_sql(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(limit) = self.limit {
            out.push(format!("LIMIT {limit}"));
            if let Some(offset) = self.offset.filter(|o| *o > 0) {
                out.push(format!("OFFSET {offset}"));
            }
        }
        out
    }
}

impl Builder for SelectBuilder {
    fn to_sql(&self) -> QueryResult<String> {
        if let Some(e) = &self.error {
            return Err(e.clone());
        }

        let mut sql = vec![self.select_sql()];
        if let Some(table) = &self.table {
            sql.push(format!("FROM {}", self.quote_name(table)));
        }
        sql.extend(self.join_sql()?);
        sql.extend(self.where_.render("WHERE")?);
        if !self.group_by.is_empty() {
            sql.push(format!(
                "GROUP BY {}",
                self.quote_by_fields(&self.group_by).join(", ")
            ));
        }
        sql.extend(self.having.render("HAVING")?);
        if !self.order_by.is_empty() {
            sql.push(format!(
                "ORDER BY {}",
                self.quote_by_fields(&self.order_by).join(", ")
            ));
        }
        sql.extend(self.limit_sql());
        for (option, query) in &self.unions {
            sql.push(format!("{} {}", option.as_str(), query.to_sql()?));
        }
        Ok(sql.join(" "))
    }
}
