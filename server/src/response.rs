mod book;
mod member;

pub use self::{book::*, member::*};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use time::OffsetDateTime;

use kernel::prelude::entity::Page;

const DEFAULT_MESSAGE: &str = "Request processed successfully";

/// Envelope wrapped around every response body, successful or not.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    #[serde(skip)]
    status: StatusCode,
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<&'static str>,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            success: true,
            message: DEFAULT_MESSAGE.to_string(),
            data: Some(data),
            error_code: None,
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    pub fn failure(
        status: StatusCode,
        error_code: &'static str,
        message: impl Into<String>,
        data: Option<T>,
    ) -> Self {
        Self {
            status,
            success: false,
            message: message.into(),
            data,
            error_code: Some(error_code),
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Keeps the outcome and message but drops the payload.
    pub fn without_data(self) -> ApiResponse<()> {
        ApiResponse {
            status: self.status,
            success: self.success,
            message: self.message,
            data: None,
            error_code: self.error_code,
            timestamp: self.timestamp,
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        ApiResponse::success(()).with_message(message).without_data()
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, axum::Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    items: Vec<T>,
    total: i64,
    limit: i32,
    offset: i32,
}

impl<T> PageResponse<T> {
    pub fn from_page<D>(page: Page<D>, f: impl FnMut(D) -> T) -> Self {
        let limit = *page.limit().as_ref();
        let offset = *page.offset().as_ref();
        let total = page.total();
        Self {
            items: page.into_items().into_iter().map(f).collect(),
            total,
            limit,
            offset,
        }
    }
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use kernel::prelude::entity::{Page, SelectLimit, SelectOffset};

    use super::{ApiResponse, PageResponse};

    #[test]
    fn success_omits_error_code() {
        let body = serde_json::to_value(ApiResponse::success(json!({"id": 1}))).unwrap();
        assert_eq!(body["success"], Value::Bool(true));
        assert_eq!(body["data"]["id"], 1);
        assert!(body.get("errorCode").is_none());
        assert!(body.get("status").is_none());
        assert!(body["timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn message_only_omits_data() {
        let body = serde_json::to_value(ApiResponse::message("Book deleted")).unwrap();
        assert_eq!(body["message"], "Book deleted");
        assert!(body.get("data").is_none());
    }

    #[test]
    fn failure_carries_code() {
        let response =
            ApiResponse::<()>::failure(StatusCode::NOT_FOUND, "BOOK_NOT_FOUND", "missing", None);
        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["success"], Value::Bool(false));
        assert_eq!(body["errorCode"], "BOOK_NOT_FOUND");
        assert_eq!(body["message"], "missing");
    }

    #[test]
    fn page_keeps_paging_window() {
        let page = Page::new(vec![1, 2], 7, SelectLimit::new(2), SelectOffset::new(4));
        let body = serde_json::to_value(PageResponse::from_page(page, |n| n * 10)).unwrap();
        assert_eq!(body, json!({"items": [10, 20], "total": 7, "limit": 2, "offset": 4}));
    }
}
