//! Alert system for displaying success and error messages to users.
//!
//! Alerts are rendered as fragments that htmx swaps into the alert container
//! at the bottom of every page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// An alert message for a user action.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    SuccessSimple { message: String },
    Error { message: String, details: String },
}

impl Alert {
    fn is_error(&self) -> bool {
        matches!(self, Alert::Error { .. })
    }

    pub fn into_html(self) -> Markup {
        let is_error = self.is_error();
        let (message, details) = match self {
            Alert::Error { message, details } => (message, details),
            Alert::SuccessSimple { message } => (message, String::new()),
        };

        let style = if is_error {
            "flex items-start gap-3 p-4 rounded-lg shadow-lg border \
            text-red-800 bg-red-50 border-red-300 \
            dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
        } else {
            "flex items-start gap-3 p-4 rounded-lg shadow-lg border \
            text-green-800 bg-green-50 border-green-300 \
            dark:bg-gray-800 dark:text-green-400 dark:border-green-800"
        };

        html!(
            div
                class=(style)
                role="alert"
                data-alert-kind=(if is_error { "error" } else { "success" })
            {
                div class="flex-1"
                {
                    p class="font-semibold" { (message) }

                    @if !details.is_empty() {
                        span class="block text-sm mt-1" { (details) }
                    }
                }

                button
                    type="button"
                    class="text-sm font-medium underline"
                    onclick="dismissAlert()"
                    aria-label="Dismiss"
                {
                    "Dismiss"
                }
            }
        )
    }

    /// Render the alert with a specific status code.
    ///
    /// htmx only swaps error responses into the alert container when the
    /// status code is an error, so error alerts should use a 4xx or 5xx code.
    pub fn into_response_with_status(self, status_code: StatusCode) -> Response {
        (status_code, self.into_html()).into_response()
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        let status_code = if self.is_error() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::OK
        };

        self.into_response_with_status(status_code)
    }
}

#[cfg(test)]
mod alert_tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use scraper::Selector;

    use crate::test_utils::{assert_valid_html, parse_html_fragment};

    use super::Alert;

    #[tokio::test]
    async fn error_alert_has_message_and_details() {
        let response = Alert::Error {
            message: "Could not find member".to_owned(),
            details: "Try refreshing the page.".to_owned(),
        }
        .into_response_with_status(StatusCode::NOT_FOUND);

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);

        let alert = html
            .select(&Selector::parse("div[role=alert]").unwrap())
            .next()
            .expect("No alert found");
        assert_eq!(alert.value().attr("data-alert-kind"), Some("error"));

        let text = alert.text().collect::<String>();
        assert!(text.contains("Could not find member"));
        assert!(text.contains("Try refreshing the page."));
    }

    #[tokio::test]
    async fn success_alert_defaults_to_ok() {
        let response = Alert::SuccessSimple {
            message: "Member deleted".to_owned(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let alert = html
            .select(&Selector::parse("div[role=alert]").unwrap())
            .next()
            .expect("No alert found");
        assert_eq!(alert.value().attr("data-alert-kind"), Some("success"));
    }
}
