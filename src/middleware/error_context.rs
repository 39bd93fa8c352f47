use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::header,
    middleware::Next,
    response::Response,
};
use serde_json::Value;

/// Error bodies are rewritten in memory; anything larger than this passes
/// through untouched.
const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

/// Enriches JSON error responses with the request path and method, matching
/// the shape of the not-found fallback. Success responses pass through
/// untouched.
pub async fn attach_error_context(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let response = next.run(req).await;

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/json"))
        .unwrap_or(false);
    if !is_json {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_ERROR_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => return Response::from_parts(parts, Body::empty()),
    };

    if let Some(enriched) = enrich_error_json(&bytes, &path, method.as_str()) {
        parts.headers.remove(header::CONTENT_LENGTH);
        return Response::from_parts(parts, Body::from(enriched));
    }
    Response::from_parts(parts, Body::from(bytes))
}

/// Returns the rewritten body when `bytes` is a JSON object carrying an
/// `error` key but no `path` yet.
fn enrich_error_json(bytes: &[u8], path: &str, method: &str) -> Option<Vec<u8>> {
    let mut map = match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => map,
        _ => return None,
    };
    if !map.contains_key("error") || map.contains_key("path") {
        return None;
    }
    map.insert("path".into(), Value::String(path.to_owned()));
    map.insert("method".into(), Value::String(method.to_owned()));
    serde_json::to_vec(&Value::Object(map)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_path_and_method_to_error_bodies() {
        let body = br#"{"error":"Customer not found","timestamp":"2026-08-22T10:00:00"}"#;
        let enriched = enrich_error_json(body, "/api/customers/99", "GET").unwrap();
        let value: Value = serde_json::from_slice(&enriched).unwrap();
        assert_eq!(value["error"], "Customer not found");
        assert_eq!(value["path"], "/api/customers/99");
        assert_eq!(value["method"], "GET");
    }

    #[test]
    fn leaves_bodies_that_already_carry_a_path() {
        let body = br#"{"error":"Endpoint not found","path":"/nope","method":"GET"}"#;
        assert!(enrich_error_json(body, "/other", "POST").is_none());
    }

    #[test]
    fn ignores_json_without_an_error_key() {
        assert!(enrich_error_json(br#"{"message":"ok"}"#, "/x", "GET").is_none());
    }

    #[test]
    fn ignores_non_object_bodies() {
        assert!(enrich_error_json(b"[1,2,3]", "/x", "GET").is_none());
        assert!(enrich_error_json(b"plain text", "/x", "GET").is_none());
    }
}
