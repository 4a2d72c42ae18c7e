use thiserror::Error;

use crate::fql::{
    FqlError, compile,
    interceptor::{InterceptError, Interceptor, Queryable},
    parser::is_valid_key,
    request::Request,
};
use crate::query::{Param, QueryBuilder};

/// Query parameter holding the filter unless configured otherwise.
pub const DEFAULT_FILTER_PARAM: &str = "filter";

/// What to do with a filter parameter that does not compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterPolicy {
    /// Log a warning and run the query unfiltered
    #[default]
    Lenient,
    /// Return the error so the caller can answer 400
    Strict,
}

/// Errors surfaced by [`InterceptorFactory::apply`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error(transparent)]
    Compile(#[from] FqlError),

    #[error(transparent)]
    Intercept(#[from] InterceptError),
}

/// Creates interceptors from inbound requests.
///
/// # Examples
///
/// ```
/// use fql_lang::fql::{Entity, InterceptorFactory, Request};
///
/// let users = Entity::new("users", "u");
/// let mut qb = users.query_builder();
/// let request = Request::from_query_string("filter=age:gte:18");
///
/// let applied = InterceptorFactory::new().apply(&request, &mut qb, &users).unwrap();
/// assert!(applied);
/// assert_eq!(qb.to_sql(), "SELECT u FROM users u WHERE u.age >= ?1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterceptorFactory {
    param: String,
    policy: FilterPolicy,
}

impl Default for InterceptorFactory {
    fn default() -> Self {
        InterceptorFactory {
            param: DEFAULT_FILTER_PARAM.to_string(),
            policy: FilterPolicy::default(),
        }
    }
}

impl InterceptorFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_param(mut self, name: impl Into<String>) -> Self {
        self.param = name.into();
        self
    }

    pub fn with_policy(mut self, policy: FilterPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn param(&self) -> &str {
        &self.param
    }

    pub fn policy(&self) -> FilterPolicy {
        self.policy
    }

    /// Builds an interceptor for the request's filter parameter.
    ///
    /// Returns `Ok(None)` when the parameter is absent, or when it does not
    /// compile under [`FilterPolicy::Lenient`]; the caller then runs the
    /// unfiltered query.
    pub fn create<'a, E: Queryable + ?Sized>(
        &self,
        request: &Request,
        builder: &'a mut QueryBuilder,
        entity: &'a E,
    ) -> Result<Option<Interceptor<'a, E>>, FqlError> {
        let Some(raw) = request.query_param(&self.param) else {
            log::debug!("no '{}' parameter, query left unfiltered", self.param);
            return Ok(None);
        };

        match compile(raw) {
            Ok(ast) => Ok(Some(Interceptor::new(ast, builder, entity))),
            Err(err) => match self.policy {
                FilterPolicy::Lenient => {
                    log::warn!("ignoring malformed '{}' parameter: {}", self.param, err);
                    Ok(None)
                }
                FilterPolicy::Strict => Err(err),
            },
        }
    }

    /// Creates and runs the interceptor in one go.
    ///
    /// Returns whether a filter was applied.
    pub fn apply<E: Queryable + ?Sized>(
        &self,
        request: &Request,
        builder: &mut QueryBuilder,
        entity: &E,
    ) -> Result<bool, FilterError> {
        match self.create(request, builder, entity)? {
            Some(interceptor) => {
                interceptor.intercept()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Adds `alias.name = ?N` for each route parameter present on the request.
///
/// Used by repositories that narrow results by `scope`, `district` or
/// `village` alongside the request's filter. Names must pass the same check
/// as filter keys; others are skipped. Returns how many were added.
pub fn scope_by_route(request: &Request, builder: &mut QueryBuilder, names: &[&str]) -> usize {
    let mut added = 0;
    for name in names {
        if !is_valid_key(name) {
            log::warn!("route parameter '{}' is not a valid column name, skipped", name);
            continue;
        }
        let Some(value) = request.route_param(name) else {
            continue;
        };
        let index = builder.next_parameter_index();
        let column = format!("{}.{}", builder.alias(), name);
        let predicate = builder.expr().eq(&column, &format!("?{}", index));
        builder
            .and_where(predicate)
            .set_parameter(index, Param::String(value.to_string()));
        added += 1;
    }
    added
}
