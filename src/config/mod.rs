//! 应用配置
//!
//! 配置在启动时加载一次，之后只读。

mod r#impl;
mod structs;

pub use structs::*;
