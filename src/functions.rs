//! FunctionBuilder：生成常用 SQL 函数调用的原样表达式。

use crate::error::QueryResult;
use crate::modifiers::{Arg, Raw, raw};
use crate::quoter::Quoter;

#[derive(Debug, Clone)]
pub struct FunctionBuilder {
    quoter: Quoter,
}

impl FunctionBuilder {
    pub fn new(quoter: Quoter) -> Self {
        Self { quoter }
    }

    fn aggregate(&self, name: &str, field: &str) -> Raw {
        raw(format!("{name}({})", self.quoter.quote_qualified(field)))
    }

    /// `COUNT(*)` 或 `COUNT(`field`)`。
    pub fn count(&self, field: &str) -> Raw {
        self.aggregate("COUNT", field)
    }

    pub fn sum(&self, field: &str) -> Raw {
        self.aggregate("SUM", field)
    }

    pub fn avg(&self, field: &str) -> Raw {
        self.aggregate("AVG", field)
    }

    pub fn min(&self, field: &str) -> Raw {
        self.aggregate("MIN", field)
    }

    pub fn max(&self, field: &str) -> Raw {
        self.aggregate("MAX", field)
    }

    pub fn now(&self) -> Raw {
        raw("NOW()")
    }

    /// 任意函数：参数按字面量转义，Raw 参数原样输出（列引用请用 `raw`）。
    pub fn call<T: Into<Arg>>(
        &self,
        name: &str,
        args: impl IntoIterator<Item = T>,
    ) -> QueryResult<Raw> {
        let args: Vec<Arg> = args.into_iter().map(Into::into).collect();
        let quoted = self.quoter.quote_array(&args)?;
        Ok(raw(format!(
            "{}({})",
            name.trim().to_ascii_uppercase(),
            quoted.join(", ")
        )))
    }
}
