//! 静态配置
//!
//! 启动时从 TOML 文件与环境变量加载一次，之后通过参数显式传递给各组件。

mod structs;
pub mod validators;

pub use structs::*;
