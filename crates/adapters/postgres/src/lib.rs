//! matc-adapter-postgres - PostgreSQL 连接与迁移

mod connection;
mod migration;

pub use connection::*;
pub use migration::*;
