use crate::scheme::Scheme;
use hyper::header::HOST;
use hyper::Request;

/// `{scheme}://{host}{path}`, with no normalization of either part.
pub fn reconstruct(scheme: Scheme, host: &str, path: &str) -> String {
    format!("{}://{}{}", scheme, host, path)
}

/// Rebuild the URL the client asked for, as it would appear in its address bar.
pub fn from_request<B>(scheme: Scheme, req: &Request<B>) -> String {
    let uri = req.uri();
    // http2 requests carry :authority instead of a host header
    let host = req
        .headers()
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .unwrap_or("");
    let path = uri.path_and_query().map_or(uri.path(), |p| p.as_str());
    reconstruct(scheme, host, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;

    #[test]
    fn concatenates_without_normalizing() {
        assert_eq!(
            reconstruct(Scheme::Https, "example.com", "/foo//bar"),
            "https://example.com/foo//bar"
        );
        assert_eq!(reconstruct(Scheme::Http, "h", "/"), "http://h/");
        assert_eq!(reconstruct(Scheme::Http, "", "/x"), "http:///x");
    }

    #[test]
    fn uses_host_header_and_query() {
        let req = Request::builder()
            .uri("/search?q=1")
            .header(HOST, "example.com:8080")
            .body(())
            .unwrap();
        assert_eq!(
            from_request(Scheme::Http, &req),
            "http://example.com:8080/search?q=1"
        );
    }

    #[test]
    fn falls_back_to_uri_authority() {
        let req = Request::builder()
            .uri("https://example.com/foo")
            .body(())
            .unwrap();
        assert_eq!(from_request(Scheme::Https, &req), "https://example.com/foo");
    }

    #[test]
    fn missing_host_is_empty() {
        let req = Request::builder().uri("/foo").body(()).unwrap();
        assert_eq!(from_request(Scheme::Https, &req), "https:///foo");
    }

    #[test]
    fn non_text_host_header_is_ignored() {
        let mut req = Request::builder().uri("/foo").body(()).unwrap();
        req.headers_mut()
            .insert(HOST, HeaderValue::from_bytes(b"ex\xffmple").unwrap());
        assert_eq!(from_request(Scheme::Http, &req), "http:///foo");
    }
}
