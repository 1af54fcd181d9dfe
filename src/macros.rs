//! 宏集合：为 builder 提供可变参数调用封装。
//! `row!` 构建异构值的有序赋值行；`select_cols!` / `order_by_cols!` 等宏允许把普通名字与
//! `raw(...)` 混在一起传入，而无需手动创建 `Vec<Ident>`。

/// 构建一行有序赋值数据（`Vec<(String, Arg)>`），值可以是任意能转成 `Arg` 的类型。
///
/// ```
/// use selective::{raw, row};
///
/// let r = row! { "name" => "admin", "age" => 18, "created_at" => raw("NOW()") };
/// assert_eq!(r.len(), 3);
/// ```
#[macro_export]
macro_rules! row {
    () => {
        $crate::quoter::Row::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut row = $crate::quoter::Row::new();
        $(
            row.push((::std::string::String::from($key), $crate::modifiers::Arg::from($value)));
        )+
        row
    }};
}
pub use crate::row;

#[doc(hidden)]
#[macro_export]
macro_rules! __collect_idents {
    ($($value:expr),* $(,)?) => {
        ::std::vec![$($crate::modifiers::Ident::from($value)),*]
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __builder_with_idents {
    ($builder:expr, $method:ident $(, $arg:expr)* $(,)?) => {
        $builder.$method($crate::__collect_idents!($($arg),*))
    };
}

/// 为 `SelectBuilder::columns` 提供可变参数调用。
#[macro_export]
macro_rules! select_cols {
    ($builder:expr $(, $col:expr)* $(,)?) => {
        $crate::__builder_with_idents!($builder, columns $(, $col)*)
    };
}
pub use crate::select_cols;

/// 为 `group_by` 提供可变参数调用。
#[macro_export]
macro_rules! group_by_cols {
    ($builder:expr $(, $col:expr)* $(,)?) => {
        $crate::__builder_with_idents!($builder, group_by $(, $col)*)
    };
}
pub use crate::group_by_cols;

/// 为所有 `order_by` 调用提供可变参数调用（Select/Update/Delete）。
#[macro_export]
macro_rules! order_by_cols {
    ($builder:expr $(, $col:expr)* $(,)?) => {
        $crate::__builder_with_idents!($builder, order_by $(, $col)*)
    };
}
pub use crate::order_by_cols;
