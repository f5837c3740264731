//! HTTP API
//!
//! - `jwt`: 会话令牌签发与校验
//! - `middleware`: 请求 ID、会话认证、访客标识
//! - `services`: 处理函数与路由

pub mod constants;
pub mod jwt;
pub mod middleware;
pub mod services;
