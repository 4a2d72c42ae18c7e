use std::collections::HashMap;

use url::Url;

/// The parts of an inbound HTTP request the filter layer looks at.
///
/// Query parameters are percent-decoded; route parameters (such as `scope`,
/// `district` or `village`) are supplied by the router.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    query: Vec<(String, String)>,
    route: HashMap<String, String>,
}

impl Request {
    /// Builds a request from a raw query string, with or without the leading `?`.
    ///
    /// # Examples
    ///
    /// ```
    /// use fql_lang::fql::Request;
    ///
    /// let request = Request::from_query_string("?filter=name%3Afoo&page=2");
    /// assert_eq!(request.query_param("filter"), Some("name:foo"));
    /// assert_eq!(request.query_param("page"), Some("2"));
    /// ```
    pub fn from_query_string(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Request {
            query: url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
            route: HashMap::new(),
        }
    }

    /// Builds a request from an absolute URL.
    pub fn from_url(url: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(url)?;
        Ok(Request {
            query: url.query_pairs().into_owned().collect(),
            route: HashMap::new(),
        })
    }

    /// Adds a query parameter whose value is already decoded.
    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn with_route_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.route.insert(name.into(), value.into());
        self
    }

    /// First value of the named query parameter.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn route_param(&self, name: &str) -> Option<&str> {
        self.route.get(name).map(String::as_str)
    }
}
