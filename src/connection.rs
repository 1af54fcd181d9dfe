//! Connection：持有驱动与方言，负责创建各类语句 builder 并把最终 SQL 交给驱动执行。

use crate::delete::DeleteBuilder;
use crate::driver::{Driver, LiteralDriver, Record};
use crate::error::{QueryError, QueryResult};
use crate::flavor::{Flavor, default_flavor};
use crate::insert::InsertBuilder;
use crate::quoter::Quoter;
use crate::select::SelectBuilder;
use crate::update::UpdateBuilder;
use std::rc::Rc;

/// 数据库连接句柄（单线程共享，不做连接池）。
#[derive(Debug, Clone)]
pub struct Connection {
    driver: Rc<dyn Driver>,
    flavor: Flavor,
}

impl Connection {
    /// 使用全局默认 Flavor 包装一个驱动。
    pub fn new(driver: impl Driver + 'static) -> Self {
        Self::from_rc(Rc::new(driver))
    }

    pub fn from_rc(driver: Rc<dyn Driver>) -> Self {
        Self {
            driver,
            flavor: default_flavor(),
        }
    }

    /// 只转义、不执行的离线连接，适合单纯拼接 SQL。
    pub fn offline(flavor: Flavor) -> Self {
        Self::new(LiteralDriver::new(flavor)).with_flavor(flavor)
    }

    pub fn with_flavor(mut self, flavor: Flavor) -> Self {
        self.flavor = flavor;
        self
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    pub fn quoter(&self) -> Quoter {
        Quoter::new(self.driver.clone(), self.flavor)
    }

    pub fn select(&self) -> SelectBuilder {
        SelectBuilder::new(self.clone())
    }

    pub fn insert(&self) -> InsertBuilder {
        InsertBuilder::new(self.clone())
    }

    pub fn update(&self) -> UpdateBuilder {
        UpdateBuilder::new(self.clone())
    }

    pub fn delete(&self) -> DeleteBuilder {
        DeleteBuilder::new(self.clone())
    }

    /// 执行语句，返回受影响行数。
    pub fn execute(&self, sql: &str) -> QueryResult<u64> {
        tracing::debug!(target: "selective.sql", sql, "execute");
        self.driver.execute(sql).map_err(|e| {
            tracing::warn!(target: "selective.sql", sql, error = %e, "execute failed");
            QueryError::from(e)
        })
    }

    pub fn query(&self, sql: &str) -> QueryResult<Vec<Record>> {
        tracing::debug!(target: "selective.sql", sql, "query");
        self.driver.query(sql).map_err(|e| {
            tracing::warn!(target: "selective.sql", sql, error = %e, "query failed");
            QueryError::from(e)
        })
    }

    pub fn last_insert_id(&self) -> QueryResult<Option<String>> {
        Ok(self.driver.last_insert_id()?)
    }
}
