use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failures the routing layer can see. Everything else is folded into
/// `Internal` and reported as a 500 without leaking context chains.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("no nutrition data found for '{0}', check the spelling")]
    NoMatch(String),

    #[error("no {nutrient} value found for '{query}'")]
    MissingNutrient {
        nutrient: &'static str,
        query: String,
    },

    #[error("no entry with id '{0}'")]
    EntryNotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NoMatch(_) | AppError::MissingNutrient { .. } => StatusCode::NOT_FOUND,
            AppError::EntryNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        error: "internal error".into(),
                    }),
                )
                    .into_response();
            }
        };
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
