pub mod config;
pub mod fql;
pub mod position;
pub mod query;

#[cfg(feature = "cli")]
pub mod cli;

pub use config::{Config, ConfigError};
pub use fql::{
    Entity, FilterPolicy, FqlError, InterceptError, Interceptor, InterceptorFactory, Queryable,
    Request,
};
pub use position::Position;
pub use query::{Param, Predicate, QueryBuilder};
