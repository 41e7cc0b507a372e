//! matc-common - 跨 crate 共享的工具

pub mod retry;

pub use retry::*;
