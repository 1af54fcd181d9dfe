//! 错误类型：驱动错误与构建错误。

/// 构建/执行结果别名。
pub type QueryResult<T> = Result<T, QueryError>;

/// 外部驱动返回的错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DriverError {
    /// 驱动无法安全地把该值转义为字面量。
    #[error("driver cannot quote value: {0}")]
    Unquotable(String),
    #[error("no database connection")]
    NotConnected,
    /// 语句准备/执行失败（原样透传驱动信息）。
    #[error("statement failed: {0}")]
    Statement(String),
}

/// 构建 SQL 时的错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// 条件形状不合法（运算符未知、BETWEEN 元素个数不对等），属于调用方的使用错误。
    #[error("invalid condition: {0}")]
    Shape(String),
    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl QueryError {
    pub(crate) fn shape(message: impl Into<String>) -> Self {
        Self::Shape(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::{DriverError, QueryError};
    use pretty_assertions::assert_eq;

    #[test]
    fn driver_error_converts_transparently() {
        let err: QueryError = DriverError::Unquotable("NaN".into()).into();
        assert_eq!(err.to_string(), "driver cannot quote value: NaN");
    }

    #[test]
    fn shape_error_message() {
        assert_eq!(
            QueryError::shape("unknown operator `~~`").to_string(),
            "invalid condition: unknown operator `~~`"
        );
    }
}
