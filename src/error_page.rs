//! Full-page responses for bad requests, missing resources and server errors.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// Renders the 400 page with what was wrong with the request.
pub struct BadRequestError<'a> {
    pub description: &'a str,
    pub fix: &'a str,
}

impl IntoResponse for BadRequestError<'_> {
    fn into_response(self) -> Response {
        let page = error_view("Bad Request", "400", self.description, self.fix);

        (StatusCode::BAD_REQUEST, Html(page.into_string())).into_response()
    }
}

/// Renders the 404 page.
pub struct NotFoundError;

impl IntoResponse for NotFoundError {
    fn into_response(self) -> Response {
        let page = error_view(
            "Not Found",
            "404",
            "Something's missing.",
            "Sorry, we can't find that page. Head back to the dashboard to find your accounts.",
        );

        (StatusCode::NOT_FOUND, Html(page.into_string())).into_response()
    }
}

/// Renders the 500 page with a short description of what went wrong and how to fix it.
pub struct InternalServerError<'a> {
    pub description: &'a str,
    pub fix: &'a str,
}

impl Default for InternalServerError<'_> {
    fn default() -> Self {
        Self {
            description: "Sorry, something went wrong.",
            fix: "Try again later or check the server logs",
        }
    }
}

impl IntoResponse for InternalServerError<'_> {
    fn into_response(self) -> Response {
        let page = error_view("Internal Server Error", "500", self.description, self.fix);

        (StatusCode::INTERNAL_SERVER_ERROR, Html(page.into_string())).into_response()
    }
}

/// Fallback handler for routes that do not exist.
pub async fn get_404_not_found() -> Response {
    NotFoundError.into_response()
}

/// The page that HTMX redirects to when a request fails unexpectedly.
pub async fn get_internal_server_error_page() -> Response {
    InternalServerError::default().into_response()
}
