use std::process::{ExitCode, Termination};

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use error_stack::{AttachmentKind, FrameKind, Report};

use kernel::{KernelError, Resource};

use crate::request::ValidationErrors;
use crate::response::ApiResponse;

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub enum ErrorStatus {
    Kernel(Report<KernelError>),
    Validation(ValidationErrors),
}

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus::Kernel(e)
    }
}

impl From<ValidationErrors> for ErrorStatus {
    fn from(e: ValidationErrors) -> Self {
        ErrorStatus::Validation(e)
    }
}

impl From<JsonRejection> for ErrorStatus {
    fn from(rejection: JsonRejection) -> Self {
        ErrorStatus::Validation(ValidationErrors::single("body", rejection.body_text()))
    }
}

impl From<QueryRejection> for ErrorStatus {
    fn from(rejection: QueryRejection) -> Self {
        ErrorStatus::Validation(ValidationErrors::single("query", rejection.body_text()))
    }
}

impl From<PathRejection> for ErrorStatus {
    fn from(rejection: PathRejection) -> Self {
        ErrorStatus::Validation(ValidationErrors::single("path", rejection.body_text()))
    }
}

/// Latest printable attachment, falling back to the context itself.
fn client_message(report: &Report<KernelError>) -> String {
    report
        .frames()
        .find_map(|frame| match frame.kind() {
            FrameKind::Attachment(AttachmentKind::Printable(printable)) => {
                Some(printable.to_string())
            }
            _ => None,
        })
        .unwrap_or_else(|| report.current_context().to_string())
}

impl ErrorStatus {
    fn into_api_response(self) -> ApiResponse<ValidationErrors> {
        let report = match self {
            ErrorStatus::Validation(errors) => {
                return ApiResponse::failure(
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_FAILED",
                    "Validation failed",
                    Some(errors),
                )
            }
            ErrorStatus::Kernel(report) => report,
        };
        let (status, code) = match report.current_context() {
            KernelError::NotFound(Resource::Book) => (StatusCode::NOT_FOUND, "BOOK_NOT_FOUND"),
            KernelError::NotFound(Resource::Member) => (StatusCode::NOT_FOUND, "MEMBER_NOT_FOUND"),
            KernelError::DuplicateResource => (StatusCode::CONFLICT, "DUPLICATE_RESOURCE"),
            KernelError::InvalidArgument => (StatusCode::BAD_REQUEST, "ILLEGAL_ARGUMENT"),
            KernelError::InvalidState => (StatusCode::BAD_REQUEST, "ILLEGAL_STATE"),
            KernelError::Timeout => (StatusCode::SERVICE_UNAVAILABLE, "TIMEOUT"),
            KernelError::Internal => {
                tracing::error!("{report:?}");
                return ApiResponse::failure(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "An internal server error occurred",
                    None,
                );
            }
        };
        ApiResponse::failure(status, code, client_message(&report), None)
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> axum::response::Response {
        self.into_api_response().into_response()
    }
}
