use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{Book, BookCategory, BookFilter, BookStatus, DestructBook};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDto {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publisher: Option<String>,
    pub price: i32,
    pub stock_quantity: i32,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: BookStatus,
    pub published_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<Book> for BookDto {
    fn from(value: Book) -> Self {
        let DestructBook {
            id,
            title,
            author,
            isbn,
            publisher,
            price,
            stock_quantity,
            description,
            category,
            status,
            published_at,
            created_at,
            updated_at,
        } = value.into_destruct();
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
            publisher: publisher.map(Into::into),
            price: price.into(),
            stock_quantity: stock_quantity.into(),
            description: description.map(Into::into),
            category: category.map(Into::into),
            status,
            published_at: published_at.map(Into::into),
            created_at: created_at.into(),
            updated_at: updated_at.into(),
        }
    }
}

pub struct GetBookDto {
    pub id: Uuid,
}

pub struct GetBookByIsbnDto {
    pub isbn: String,
}

#[derive(Debug)]
pub struct ListBooksDto {
    pub filter: BookFilter,
    pub limit: i32,
    pub offset: i32,
}

#[derive(Debug)]
pub struct LowStockBooksDto {
    pub threshold: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCountDto {
    pub category: Option<String>,
    pub count: i64,
}

impl From<(Option<BookCategory>, i64)> for CategoryCountDto {
    fn from((category, count): (Option<BookCategory>, i64)) -> Self {
        Self {
            category: category.map(Into::into),
            count,
        }
    }
}

#[derive(Debug)]
pub struct CreateBookDto {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publisher: Option<String>,
    pub price: i32,
    pub stock_quantity: Option<i32>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: Option<BookStatus>,
    pub published_at: Option<OffsetDateTime>,
}

#[derive(Debug)]
pub struct UpdateBookDto {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub publisher: Option<String>,
    pub price: i32,
    pub description: Option<String>,
    pub category: Option<String>,
}

pub struct MoveStockDto {
    pub id: Uuid,
    pub quantity: i32,
}

pub struct ChangeBookStatusDto {
    pub id: Uuid,
    pub status: BookStatus,
}

pub struct DeleteBookDto {
    pub id: Uuid,
}
