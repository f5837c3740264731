//! Application lifecycle
//!
//! - `lifetime`: 启动装配与优雅关闭
//! - `modes`: 运行模式（目前只有 HTTP server）

pub mod lifetime;
pub mod modes;
