//! The page to display for an internal server error.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// What went wrong and what the user can do about it.
pub struct InternalServerErrorPage<'a> {
    pub description: &'a str,
    pub fix: &'a str,
}

impl Default for InternalServerErrorPage<'_> {
    fn default() -> Self {
        Self {
            description: "Sorry, something went wrong.",
            fix: "Try again later or check the server logs",
        }
    }
}

impl InternalServerErrorPage<'_> {
    pub fn into_html(self) -> Html<String> {
        Html(error_view("Internal Server Error", "500", self.description, self.fix).into_string())
    }
}

pub fn render_internal_server_error(page: InternalServerErrorPage) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, page.into_html()).into_response()
}

pub async fn get_internal_server_error_page() -> Response {
    render_internal_server_error(Default::default())
}

#[cfg(test)]
mod internal_server_error_tests {
    use axum::http::StatusCode;

    use crate::test_utils::{assert_content_type, assert_valid_html, parse_html_document};

    use super::get_internal_server_error_page;

    #[tokio::test]
    async fn renders_error_page() {
        let response = get_internal_server_error_page().await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
    }
}
