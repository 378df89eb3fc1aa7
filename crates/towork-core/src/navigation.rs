use url::form_urlencoded;

/// Where the client is and where it can go.
///
/// The router implements this; the auth-error interceptor uses it to send
/// the user back to `/login` with a `returnUrl`.
pub trait Navigator: Send + Sync {
    fn current_url(&self) -> String;

    fn navigate(&self, path: &str, query: &[(&str, &str)]);
}

/// `path?key=value&...` with every pair form-encoded.
pub fn href(path: &str, query: &[(&str, &str)]) -> String {
    if query.is_empty() {
        return path.to_string();
    }
    let encoded = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query)
        .finish();
    format!("{path}?{encoded}")
}

/// Decoded value of `name` in the query part of `url`.
pub fn query_param(url: &str, name: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or(query);
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_query_survives_the_round_trip() {
        let url = href("/login", &[("returnUrl", "/missions?a=1&b=2")]);
        assert_eq!(url, "/login?returnUrl=%2Fmissions%3Fa%3D1%26b%3D2");
        assert_eq!(query_param(&url, "returnUrl").as_deref(), Some("/missions?a=1&b=2"));
        assert_eq!(query_param(&url, "b"), None);
    }

    #[test]
    fn bare_path_has_no_query() {
        assert_eq!(href("/login", &[]), "/login");
        assert_eq!(query_param("/login", "returnUrl"), None);
    }
}
