use actix_web::{web, HttpRequest};

/// Query parameters in request order, repeated keys included.
pub(crate) struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub(crate) fn from_request(req: &HttpRequest) -> Self {
        let pairs = web::Query::<Vec<(String, String)>>::from_query(req.query_string())
            .map(web::Query::into_inner)
            .unwrap_or_default();

        Self(pairs)
    }

    pub(crate) fn first(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First non-empty value among `names`, tried in order.
    pub(crate) fn first_non_empty(&self, names: &[&str]) -> Option<&str> {
        names
            .iter()
            .filter_map(|name| self.first(name))
            .find(|value| !value.is_empty())
    }

    pub(crate) fn all<'a>(&'a self, names: &'a [&'a str]) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(key, _)| names.contains(&key.as_str()))
            .map(|(_, value)| value.as_str())
    }
}
