//! Quoter：标识符与字面量的转义引擎。
//!
//! 标识符（列名/表名/别名）统一加方言引号并把内嵌引号字符加倍；字面量交给驱动的
//! `escape_literal` 转义。只有 [`Raw`](crate::modifiers::Raw) 会被原样输出。

use crate::driver::Driver;
use crate::error::{QueryError, QueryResult};
use crate::flavor::Flavor;
use crate::modifiers::{Arg, Ident};
use crate::value::SqlValue;
use std::rc::Rc;

/// 一行赋值数据：有序的 `(列名, 值)`。
pub type Row = Vec<(String, Arg)>;

#[derive(Debug, Clone)]
pub struct Quoter {
    driver: Rc<dyn Driver>,
    flavor: Flavor,
}

impl Quoter {
    pub fn new(driver: Rc<dyn Driver>, flavor: Flavor) -> Self {
        Self { driver, flavor }
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    /// 单个标识符：去掉首尾空白，`*` 原样返回，其余加引号。
    ///
    /// 空字符串会得到一对空引号（例如 ``` `` ```）。
    pub fn quote_identifier(&self, name: &str) -> String {
        let name = name.trim();
        if name == "*" {
            return name.to_string();
        }
        let q = self.flavor.quote_char();
        let mut out = String::with_capacity(name.len() + 2);
        out.push(q);
        for ch in name.chars() {
            if ch == q {
                out.push(q);
            }
            out.push(ch);
        }
        out.push(q);
        out
    }

    /// 限定名（`db.table.field`）与别名（`source AS alias`）。
    pub fn quote_name(&self, ident: &Ident) -> String {
        match ident {
            Ident::Name(name) => self.quote_qualified(name),
            Ident::Raw(r) => r.value().to_string(),
            Ident::Aliased { alias, source } => format!(
                "{} AS {}",
                self.quote_name(source),
                self.quote_identifier(alias)
            ),
        }
    }

    /// 在最后一个 `.` 处切分，前缀递归处理。
    pub(crate) fn quote_qualified(&self, name: &str) -> String {
        match name.rsplit_once('.') {
            Some((prefix, suffix)) => format!(
                "{}.{}",
                self.quote_qualified(prefix),
                self.quote_identifier(suffix)
            ),
            None => self.quote_identifier(name),
        }
    }

    pub fn quote_names(&self, idents: &[Ident]) -> Vec<String> {
        idents.iter().map(|i| self.quote_name(i)).collect()
    }

    /// 字面量：`NULL` 不经过驱动，其余交给驱动转义。
    pub fn quote_value(&self, value: &SqlValue) -> QueryResult<String> {
        if value.is_null() {
            return Ok("NULL".to_string());
        }
        self.driver.escape_literal(value).map_err(|e| {
            tracing::debug!(target: "selective.quote", error = %e, "driver refused to quote value");
            QueryError::from(e)
        })
    }

    /// 单个右值：Raw 原样输出，列表不允许出现在这里。
    pub fn quote_arg(&self, arg: &Arg) -> QueryResult<String> {
        match arg {
            Arg::Value(v) => self.quote_value(v),
            Arg::Raw(r) => Ok(r.value().to_string()),
            Arg::List(_) => Err(QueryError::shape("nested value list cannot be quoted")),
        }
    }

    pub fn quote_array(&self, values: &[Arg]) -> QueryResult<Vec<String>> {
        values.iter().map(|v| self.quote_arg(v)).collect()
    }

    /// ORDER BY / GROUP BY 字段：只给标识符部分加引号，`ASC`/`DESC` 等后缀原样保留。
    pub fn quote_by_fields(&self, fields: &[Ident]) -> Vec<String> {
        fields
            .iter()
            .map(|f| match f {
                Ident::Name(name) => match name.trim().split_once(char::is_whitespace) {
                    Some((ident, suffix)) => {
                        format!("{} {}", self.quote_qualified(ident), suffix.trim_start())
                    }
                    None => self.quote_qualified(name),
                },
                other => self.quote_name(other),
            })
            .collect()
    }

    /// SET 子句：`` `k`='v', `k2`=NOW() ``。
    pub fn quote_set_values(&self, row: &[(String, Arg)]) -> QueryResult<String> {
        let pairs = row
            .iter()
            .map(|(k, v)| Ok(format!("{}={}", self.quote_qualified(k), self.quote_arg(v)?)))
            .collect::<QueryResult<Vec<_>>>()?;
        Ok(pairs.join(", "))
    }

    /// 多行 INSERT 的一行值（不含括号），逗号紧密连接：`'1','x'`。
    pub fn quote_bulk_values(&self, row: &[(String, Arg)]) -> QueryResult<String> {
        let values = row
            .iter()
            .map(|(_, v)| self.quote_arg(v))
            .collect::<QueryResult<Vec<_>>>()?;
        Ok(values.join(","))
    }

    /// INSERT 列名列表（不含括号）。
    pub fn quote_fields(&self, row: &[(String, Arg)]) -> String {
        row.iter()
            .map(|(k, _)| self.quote_qualified(k))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
