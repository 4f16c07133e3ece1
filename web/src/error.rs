//! HTTP-facing error handling: domain errors are mapped to a status code and
//! logged at the point they're turned into a response, the same "log once,
//! propagate a plain status" pattern the rest of the gateway follows.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gui::{GuiError, GuiErrorKind};
use log::*;

#[derive(Debug)]
pub enum Error {
    Gui(GuiError),
    BadRequest(String),
}

impl From<GuiError> for Error {
    fn from(e: GuiError) -> Self {
        Error::Gui(e)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Gui(e) => {
                warn!("{e}");
                let status = match e.kind {
                    GuiErrorKind::UnknownNamespace | GuiErrorKind::PageNotFound => StatusCode::NOT_FOUND,
                    GuiErrorKind::CallbackNotFound => StatusCode::NO_CONTENT,
                    GuiErrorKind::PageConstruction => StatusCode::INTERNAL_SERVER_ERROR,
                };
                status.into_response()
            }
            Error::BadRequest(message) => {
                warn!("bad request: {message}");
                (StatusCode::BAD_REQUEST, message).into_response()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
