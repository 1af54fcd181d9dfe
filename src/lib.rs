//! selective：流式 SQL 查询构建器，条件引擎负责括号与转义，驱动负责字面量与执行。

pub mod condition;
#[cfg(test)]
mod condition_tests;
pub mod connection;
pub mod delete;
pub mod driver;
pub mod error;
pub mod flavor;
pub mod functions;
pub mod insert;
pub mod macros;
pub use crate::macros::*;
pub mod modifiers;
pub mod quoter;
#[cfg(test)]
mod quoter_tests;
pub mod select;
#[cfg(test)]
mod test_driver;
pub mod update;
pub mod value;

pub use crate::condition::{ConditionEntry, ConditionGroup, Connector, Operator};
pub use crate::connection::Connection;
pub use crate::delete::DeleteBuilder;
pub use crate::driver::{Driver, LiteralDriver, Record};
pub use crate::error::{DriverError, QueryError, QueryResult};
pub use crate::flavor::{
    DefaultFlavorGuard, Flavor, default_flavor, set_default_flavor, set_default_flavor_scoped,
};
pub use crate::functions::FunctionBuilder;
pub use crate::insert::{InsertBuilder, InsertPriority};
pub use crate::modifiers::{Arg, Builder, Ident, Raw, alias, list, raw};
pub use crate::quoter::{Quoter, Row};
pub use crate::select::{JoinOption, SelectBuilder, SelectOption, UnionOption};
pub use crate::update::UpdateBuilder;
pub use crate::value::SqlValue;
