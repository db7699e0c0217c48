use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

use application::transfer::{
    ChangeBookStatusDto, CreateBookDto, DeleteBookDto, GetBookByIsbnDto, GetBookDto,
    ListBooksDto, LowStockBooksDto, MoveStockDto, UpdateBookDto,
};
use kernel::prelude::entity::{BookFilter, BookPrice, BookStatus};

use crate::controller::{Intake, TryIntake};
use crate::request::{PageQuery, ValidationErrors};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    title: Option<String>,
    author: Option<String>,
    isbn: Option<String>,
    publisher: Option<String>,
    price: Option<i32>,
    stock_quantity: Option<i32>,
    description: Option<String>,
    category: Option<String>,
    status: Option<BookStatus>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    published_at: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookRequest {
    title: Option<String>,
    author: Option<String>,
    publisher: Option<String>,
    price: Option<i32>,
    description: Option<String>,
    category: Option<String>,
}

#[derive(Debug)]
pub struct GetBookRequest {
    id: Uuid,
}

impl GetBookRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct GetBookByIsbnRequest {
    isbn: String,
}

impl GetBookByIsbnRequest {
    pub fn new(isbn: String) -> Self {
        Self { isbn }
    }
}

#[derive(Debug)]
pub struct DeleteBookRequest {
    id: Uuid,
}

impl DeleteBookRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug, Deserialize)]
pub struct KeywordQuery {
    keyword: String,
    limit: Option<i32>,
    offset: Option<i32>,
}

impl KeywordQuery {
    pub fn into_parts(self) -> (String, PageQuery) {
        (self.keyword, PageQuery::new(self.limit, self.offset))
    }
}

#[derive(Debug, Deserialize)]
pub struct PriceRangeQuery {
    min: i32,
    max: i32,
    limit: Option<i32>,
    offset: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct LowStockQuery {
    threshold: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct QuantityQuery {
    quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    status: BookStatus,
}

pub struct BookTransformer;

fn text_fields(
    errors: &mut ValidationErrors,
    title: &Option<String>,
    author: &Option<String>,
    publisher: &Option<String>,
    description: &Option<String>,
    category: &Option<String>,
) {
    if let Some(title) = errors.required("title", "Title", title) {
        errors.max_chars("title", "Title", title, 200);
    }
    if let Some(author) = errors.required("author", "Author", author) {
        errors.max_chars("author", "Author", author, 100);
    }
    errors.optional_max_chars("publisher", "Publisher", publisher, 100);
    errors.optional_max_chars("description", "Description", description, 2000);
    errors.optional_max_chars("category", "Category", category, 50);
}

impl TryIntake<CreateBookRequest> for BookTransformer {
    type To = CreateBookDto;
    type Error = ValidationErrors;
    fn emit(&self, input: CreateBookRequest) -> Result<Self::To, Self::Error> {
        let mut errors = ValidationErrors::new();
        text_fields(
            &mut errors,
            &input.title,
            &input.author,
            &input.publisher,
            &input.description,
            &input.category,
        );
        errors.isbn(&input.isbn);
        let price = errors.price(input.price);
        if matches!(input.stock_quantity, Some(stock) if stock < 0) {
            errors.add("stockQuantity", "Stock quantity must be zero or positive");
        }
        errors.finish(CreateBookDto {
            title: input.title.unwrap_or_default(),
            author: input.author.unwrap_or_default(),
            isbn: input.isbn.unwrap_or_default(),
            publisher: input.publisher,
            price,
            stock_quantity: input.stock_quantity,
            description: input.description,
            category: input.category,
            status: input.status,
            published_at: input.published_at,
        })
    }
}

impl TryIntake<(Uuid, UpdateBookRequest)> for BookTransformer {
    type To = UpdateBookDto;
    type Error = ValidationErrors;
    fn emit(&self, input: (Uuid, UpdateBookRequest)) -> Result<Self::To, Self::Error> {
        let (id, input) = input;
        let mut errors = ValidationErrors::new();
        text_fields(
            &mut errors,
            &input.title,
            &input.author,
            &input.publisher,
            &input.description,
            &input.category,
        );
        let price = errors.price(input.price);
        errors.finish(UpdateBookDto {
            id,
            title: input.title.unwrap_or_default(),
            author: input.author.unwrap_or_default(),
            publisher: input.publisher,
            price,
            description: input.description,
            category: input.category,
        })
    }
}

impl TryIntake<(BookFilter, PageQuery)> for BookTransformer {
    type To = ListBooksDto;
    type Error = ValidationErrors;
    fn emit(&self, input: (BookFilter, PageQuery)) -> Result<Self::To, Self::Error> {
        let (filter, page) = input;
        let mut errors = ValidationErrors::new();
        let (limit, offset) = page.resolve(&mut errors);
        errors.finish(ListBooksDto {
            filter,
            limit,
            offset,
        })
    }
}

impl TryIntake<PriceRangeQuery> for BookTransformer {
    type To = ListBooksDto;
    type Error = ValidationErrors;
    fn emit(&self, input: PriceRangeQuery) -> Result<Self::To, Self::Error> {
        let mut errors = ValidationErrors::new();
        if input.min > input.max {
            errors.add("min", "min must not be greater than max");
        }
        let (limit, offset) = PageQuery::new(input.limit, input.offset).resolve(&mut errors);
        errors.finish(ListBooksDto {
            filter: BookFilter::PriceBetween {
                min: BookPrice::new(input.min),
                max: BookPrice::new(input.max),
            },
            limit,
            offset,
        })
    }
}

impl TryIntake<LowStockQuery> for BookTransformer {
    type To = LowStockBooksDto;
    type Error = ValidationErrors;
    fn emit(&self, input: LowStockQuery) -> Result<Self::To, Self::Error> {
        let mut errors = ValidationErrors::new();
        let threshold = input
            .threshold
            .unwrap_or(BookFilter::DEFAULT_LOW_STOCK_THRESHOLD);
        if threshold < 0 {
            errors.add("threshold", "threshold must be zero or positive");
        }
        errors.finish(LowStockBooksDto { threshold })
    }
}

impl Intake<GetBookRequest> for BookTransformer {
    type To = GetBookDto;
    fn emit(&self, input: GetBookRequest) -> Self::To {
        GetBookDto { id: input.id }
    }
}

impl Intake<GetBookByIsbnRequest> for BookTransformer {
    type To = GetBookByIsbnDto;
    fn emit(&self, input: GetBookByIsbnRequest) -> Self::To {
        GetBookByIsbnDto { isbn: input.isbn }
    }
}

impl Intake<DeleteBookRequest> for BookTransformer {
    type To = DeleteBookDto;
    fn emit(&self, input: DeleteBookRequest) -> Self::To {
        DeleteBookDto { id: input.id }
    }
}

impl Intake<(Uuid, QuantityQuery)> for BookTransformer {
    type To = MoveStockDto;
    fn emit(&self, input: (Uuid, QuantityQuery)) -> Self::To {
        let (id, query) = input;
        MoveStockDto {
            id,
            quantity: query.quantity,
        }
    }
}

impl Intake<(Uuid, StatusQuery)> for BookTransformer {
    type To = ChangeBookStatusDto;
    fn emit(&self, input: (Uuid, StatusQuery)) -> Self::To {
        let (id, query) = input;
        ChangeBookStatusDto {
            id,
            status: query.status,
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;
    use uuid::Uuid;

    use kernel::prelude::entity::{BookFilter, BookStatus};

    use crate::controller::TryIntake;
    use crate::request::{
        BookTransformer, CreateBookRequest, LowStockQuery, PageQuery, PriceRangeQuery,
        UpdateBookRequest,
    };

    fn create(body: serde_json::Value) -> CreateBookRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn create_request_maps_to_dto() {
        let request = create(json!({
            "title": "Effective Java",
            "author": "Joshua Bloch",
            "isbn": "978-0134685991",
            "price": 45000,
            "status": "DISCONTINUED",
            "publishedAt": "2018-01-06T00:00:00+09:00"
        }));
        let dto = BookTransformer.emit(request).unwrap();
        assert_eq!(dto.title, "Effective Java");
        assert_eq!(dto.stock_quantity, None);
        assert_eq!(dto.status, Some(BookStatus::Discontinued));
        assert!(dto.published_at.is_some());
    }

    #[test]
    fn create_request_reports_every_invalid_field() {
        let request = create(json!({
            "title": " ",
            "author": "a".repeat(101),
            "isbn": "ISBN-1",
            "price": 0,
            "stockQuantity": -1,
            "category": "c".repeat(51)
        }));
        let errors = BookTransformer.emit(request).unwrap_err();
        let fields = errors.fields();
        assert_eq!(fields["title"], "Title is required");
        assert_eq!(fields["author"], "Author must be at most 100 characters");
        assert_eq!(fields["isbn"], "ISBN may contain only digits and hyphens");
        assert_eq!(fields["price"], "Price must be positive");
        assert!(fields.contains_key("stockQuantity"));
        assert!(fields.contains_key("category"));
        assert!(!fields.contains_key("publisher"));
    }

    #[test]
    fn update_request_requires_price() {
        let request: UpdateBookRequest = serde_json::from_value(json!({
            "title": "Clean Code",
            "author": "Robert C. Martin"
        }))
        .unwrap();
        let errors = BookTransformer.emit((Uuid::now_v7(), request)).unwrap_err();
        assert_eq!(errors.fields()["price"], "Price is required");
    }

    #[test]
    fn listing_rejects_out_of_range_paging() {
        let errors = BookTransformer
            .emit((BookFilter::All, PageQuery::new(Some(500), None)))
            .unwrap_err();
        assert!(errors.fields().contains_key("limit"));
    }

    #[test]
    fn price_range_must_be_ordered() {
        let query: PriceRangeQuery =
            serde_json::from_value(json!({"min": 30000, "max": 10000})).unwrap();
        let errors = BookTransformer.emit(query).unwrap_err();
        assert!(errors.fields().contains_key("min"));
    }

    #[test]
    fn low_stock_threshold_defaults_to_ten() {
        let query: LowStockQuery = serde_json::from_value(json!({})).unwrap();
        assert_eq!(BookTransformer.emit(query).unwrap().threshold, 10);

        let query: LowStockQuery = serde_json::from_value(json!({"threshold": -1})).unwrap();
        let errors = BookTransformer.emit(query).unwrap_err();
        assert!(errors.fields().contains_key("threshold"));
    }
}
