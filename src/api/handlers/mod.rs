pub mod auth;
pub mod folders;
pub mod health;
pub mod items;
pub mod users;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// `202 Accepted` plus an `HX-Redirect` header telling the client where to go next.
pub struct HxRedirect(pub String);

impl HxRedirect {
    pub fn to(location: impl Into<String>) -> Self {
        Self(location.into())
    }
}

impl IntoResponse for HxRedirect {
    fn into_response(self) -> Response {
        (StatusCode::ACCEPTED, [("HX-Redirect", self.0)]).into_response()
    }
}
