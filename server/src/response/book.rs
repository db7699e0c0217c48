use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use application::transfer::{BookDto, CategoryCountDto};
use kernel::prelude::entity::{BookStatus, Page};

use crate::controller::Exhaust;
use crate::response::{ApiResponse, PageResponse};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    book_id: Uuid,
    title: String,
    author: String,
    isbn: String,
    publisher: Option<String>,
    price: i32,
    stock_quantity: i32,
    description: Option<String>,
    category: Option<String>,
    status: BookStatus,
    status_description: &'static str,
    #[serde(with = "time::serde::rfc3339::option")]
    published_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl From<BookDto> for BookResponse {
    fn from(value: BookDto) -> Self {
        Self {
            book_id: value.id,
            title: value.title,
            author: value.author,
            isbn: value.isbn,
            publisher: value.publisher,
            price: value.price,
            stock_quantity: value.stock_quantity,
            description: value.description,
            category: value.category,
            status_description: value.status.description(),
            status: value.status,
            published_at: value.published_at,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Shape used by listings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSummaryResponse {
    book_id: Uuid,
    title: String,
    author: String,
    price: i32,
    stock_quantity: i32,
    category: Option<String>,
    status: BookStatus,
}

impl From<BookDto> for BookSummaryResponse {
    fn from(value: BookDto) -> Self {
        Self {
            book_id: value.id,
            title: value.title,
            author: value.author,
            price: value.price,
            stock_quantity: value.stock_quantity,
            category: value.category,
            status: value.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryCountResponse {
    category: Option<String>,
    count: i64,
}

pub struct BookPresenter;

impl Exhaust<()> for BookPresenter {
    type To = ApiResponse<()>;
    fn emit(&self, input: ()) -> Self::To {
        ApiResponse::success(input).without_data()
    }
}

impl Exhaust<BookDto> for BookPresenter {
    type To = ApiResponse<BookResponse>;
    fn emit(&self, input: BookDto) -> Self::To {
        ApiResponse::success(BookResponse::from(input))
    }
}

impl Exhaust<Page<BookDto>> for BookPresenter {
    type To = ApiResponse<PageResponse<BookSummaryResponse>>;
    fn emit(&self, input: Page<BookDto>) -> Self::To {
        ApiResponse::success(PageResponse::from_page(input, BookSummaryResponse::from))
    }
}

impl Exhaust<Vec<BookDto>> for BookPresenter {
    type To = ApiResponse<Vec<BookResponse>>;
    fn emit(&self, input: Vec<BookDto>) -> Self::To {
        ApiResponse::success(input.into_iter().map(BookResponse::from).collect())
    }
}

impl Exhaust<Vec<CategoryCountDto>> for BookPresenter {
    type To = ApiResponse<Vec<CategoryCountResponse>>;
    fn emit(&self, input: Vec<CategoryCountDto>) -> Self::To {
        let counts = input
            .into_iter()
            .map(|CategoryCountDto { category, count }| CategoryCountResponse { category, count })
            .collect();
        ApiResponse::success(counts)
    }
}
