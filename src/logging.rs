//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::{Method, StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The number of bytes of a request or response body to log at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Form fields whose values are replaced before a request body is logged.
const REDACTED_FIELDS: [&str; 1] = ["student_id"];

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the response body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and logged at the `debug` level.
///
/// Student IDs in submitted forms are redacted.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body_text) = match read_body(request.into_parts()).await {
        Ok(request) => request,
        Err(response) => return response,
    };

    if is_form_submission(&parts) {
        let display_text = REDACTED_FIELDS
            .iter()
            .fold(body_text.clone(), |text, field| redact_field(&text, field));
        log_request(&parts, &display_text);
    } else {
        log_request(&parts, &body_text);
    }

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_text = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).to_string(),
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return Response::from_parts(parts, Body::empty());
        }
    };
    log_response(&parts, &body_text);

    Response::from_parts(parts, body_text.into())
}

async fn read_body(
    (parts, body): (axum::http::request::Parts, Body),
) -> Result<(axum::http::request::Parts, String), Response> {
    match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => Ok((parts, String::from_utf8_lossy(&bytes).to_string())),
        Err(error) => {
            tracing::error!("Could not read request body: {error}");
            Err(StatusCode::BAD_REQUEST.into_response())
        }
    }
}

fn is_form_submission(parts: &axum::http::request::Parts) -> bool {
    let is_form = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|content_type| content_type.to_str().ok())
        .is_some_and(|content_type| {
            content_type.starts_with("application/x-www-form-urlencoded")
        });

    is_form && matches!(parts.method, Method::POST | Method::PUT)
}

/// Replace the value of every `field_name` in an URL encoded form with asterisks.
fn redact_field(form_text: &str, field_name: &str) -> String {
    let prefix = format!("{field_name}=");

    form_text
        .split('&')
        .map(|pair| {
            if pair.starts_with(&prefix) {
                format!("{prefix}********")
            } else {
                pair.to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn truncate(body: &str) -> &str {
    let mut end = LOG_BODY_LENGTH_LIMIT.min(body.len());

    while !body.is_char_boundary(end) {
        end -= 1;
    }

    &body[..end]
}

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!("Received request: {parts:#?}\nbody: {:}...", truncate(body));
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!("Received request: {parts:#?}\nbody: {body:?}");
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!("Sending response: {parts:#?}\nbody: {:}...", truncate(body));
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {parts:#?}\nbody: {body:?}");
    }
}

#[cfg(test)]
mod logging_tests {
    use axum::{Router, middleware, routing::post};
    use axum_test::TestServer;

    use super::{LOG_BODY_LENGTH_LIMIT, logging_middleware, redact_field, truncate};

    #[test]
    fn redacts_student_id() {
        let got = redact_field("name=Alice&student_id=1001", "student_id");

        assert_eq!(got, "name=Alice&student_id=********");
    }

    #[test]
    fn redacts_every_occurrence() {
        let got = redact_field("student_id=1&student_id=2", "student_id");

        assert_eq!(got, "student_id=********&student_id=********");
    }

    #[test]
    fn leaves_other_fields_alone() {
        let got = redact_field("amount=12.5&not_student_id=3", "student_id");

        assert_eq!(got, "amount=12.5&not_student_id=3");
    }

    #[test]
    fn truncates_on_char_boundary() {
        let body = "¥".repeat(LOG_BODY_LENGTH_LIMIT);

        let got = truncate(&body);

        assert!(got.len() <= LOG_BODY_LENGTH_LIMIT);
        assert!(got.chars().all(|c| c == '¥'));
    }

    #[tokio::test]
    async fn passes_request_body_through_unchanged() {
        let app = Router::new()
            .route("/echo", post(|body: String| async move { body }))
            .layer(middleware::from_fn(logging_middleware));

        let server = TestServer::new(app);

        let response = server
            .post("/echo")
            .form(&[("name", "Alice"), ("student_id", "1001")])
            .await;

        response.assert_status_ok();
        response.assert_text("name=Alice&student_id=1001");
    }
}
