use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{BookQuery, DependOnBookQuery};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{
    Book, BookAuthor, BookCategory, BookDescription, BookFilter, BookId, BookPrice, BookTitle,
    CreatedAt, Isbn, Page, PublishedAt, Publisher, SelectLimit, SelectOffset, StockDelta,
    StockQuantity, UpdatedAt,
};
use kernel::{KernelError, Resource};

use crate::transfer::{
    BookDto, CategoryCountDto, ChangeBookStatusDto, CreateBookDto, DeleteBookDto,
    GetBookByIsbnDto, GetBookDto, ListBooksDto, LowStockBooksDto, MoveStockDto, UpdateBookDto,
};

fn book_not_found(id: &BookId) -> Report<KernelError> {
    Report::new(KernelError::NotFound(Resource::Book))
        .attach_printable(format!("Book not found: {}", id.as_ref()))
}

#[async_trait::async_trait]
pub trait GetBookService: 'static + Sync + Send + DependOnBookQuery {
    async fn get_book(&self, dto: GetBookDto) -> error_stack::Result<BookDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let id = BookId::new(dto.id);
        let book = self
            .book_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| book_not_found(&id))?;
        Ok(BookDto::from(book))
    }

    async fn get_book_by_isbn(
        &self,
        dto: GetBookByIsbnDto,
    ) -> error_stack::Result<BookDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let isbn = Isbn::new(dto.isbn);
        let book = self
            .book_query()
            .find_by_isbn(&mut connection, &isbn)
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::NotFound(Resource::Book))
                    .attach_printable(format!("Book not found: isbn {}", isbn.as_ref()))
            })?;
        Ok(BookDto::from(book))
    }

    async fn list_books(
        &self,
        dto: ListBooksDto,
    ) -> error_stack::Result<Page<BookDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let page = self
            .book_query()
            .find_page(
                &mut connection,
                &dto.filter,
                &SelectLimit::new(dto.limit),
                &SelectOffset::new(dto.offset),
            )
            .await?;
        Ok(page.map(BookDto::from))
    }

    /// Books still on sale with at most `threshold` units left, unpaged.
    async fn list_low_stock_books(
        &self,
        dto: LowStockBooksDto,
    ) -> error_stack::Result<Vec<BookDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let filter = BookFilter::LowStock {
            threshold: StockQuantity::new(dto.threshold),
        };
        let books = self
            .book_query()
            .find_all_by(&mut connection, &filter)
            .await?;
        Ok(books.into_iter().map(BookDto::from).collect())
    }

    async fn count_books_by_category(
        &self,
    ) -> error_stack::Result<Vec<CategoryCountDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let counts = self.book_query().count_by_category(&mut connection).await?;
        Ok(counts.into_iter().map(CategoryCountDto::from).collect())
    }
}

impl<T> GetBookService for T where T: DependOnBookQuery {}

#[async_trait::async_trait]
pub trait CreateBookService:
    'static + Sync + Send + DependOnBookQuery + DependOnBookModifier
{
    async fn create_book(&self, dto: CreateBookDto) -> error_stack::Result<BookDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let isbn = Isbn::new(dto.isbn);
        if self
            .book_query()
            .exists_by_isbn(&mut connection, &isbn)
            .await?
        {
            return Err(Report::new(KernelError::DuplicateResource)
                .attach_printable(format!("ISBN already registered: {}", isbn.as_ref())));
        }

        let created_at = CreatedAt::<Book>::now();
        let updated_at = UpdatedAt::new(*created_at.as_ref());
        let book = Book::new(
            BookId::generate(),
            BookTitle::new(dto.title),
            BookAuthor::new(dto.author),
            isbn,
            dto.publisher.map(Publisher::new),
            BookPrice::new(dto.price),
            dto.stock_quantity.map(StockQuantity::new).unwrap_or_default(),
            dto.description.map(BookDescription::new),
            dto.category.map(BookCategory::new),
            dto.status.unwrap_or_default(),
            dto.published_at.map(PublishedAt::new),
            created_at,
            updated_at,
        );
        self.book_modifier().create(&mut connection, &book).await?;
        connection.commit().await?;

        tracing::info!(id = %book.id().as_ref(), isbn = %book.isbn().as_ref(), "Book created");
        Ok(BookDto::from(book))
    }
}

impl<T> CreateBookService for T where T: DependOnBookQuery + DependOnBookModifier {}

#[async_trait::async_trait]
pub trait UpdateBookService:
    'static + Sync + Send + DependOnBookQuery + DependOnBookModifier
{
    async fn update_book(&self, dto: UpdateBookDto) -> error_stack::Result<BookDto, KernelError> {
        let id = BookId::new(dto.id);
        let fields = (
            BookTitle::new(dto.title),
            BookAuthor::new(dto.author),
            dto.publisher.map(Publisher::new),
            BookPrice::new(dto.price),
            dto.description.map(BookDescription::new),
            dto.category.map(BookCategory::new),
        );
        let book = modify_book(self, &id, |book| {
            let (title, author, publisher, price, description, category) = fields;
            book.update_info(title, author, publisher, price, description, category);
            Ok(())
        })
        .await?;
        tracing::info!(id = %id.as_ref(), "Book updated");
        Ok(book)
    }

    async fn add_stock(&self, dto: MoveStockDto) -> error_stack::Result<BookDto, KernelError> {
        let delta = StockDelta::new(dto.quantity)?;
        let id = BookId::new(dto.id);
        let book = modify_book(self, &id, |book| book.add_stock(delta)).await?;
        tracing::info!(
            id = %id.as_ref(),
            quantity = dto.quantity,
            stock = book.stock_quantity,
            "Stock added"
        );
        Ok(book)
    }

    async fn remove_stock(&self, dto: MoveStockDto) -> error_stack::Result<BookDto, KernelError> {
        let delta = StockDelta::new(dto.quantity)?;
        let id = BookId::new(dto.id);
        let book = modify_book(self, &id, |book| book.remove_stock(delta)).await?;
        tracing::info!(
            id = %id.as_ref(),
            quantity = dto.quantity,
            stock = book.stock_quantity,
            "Stock removed"
        );
        Ok(book)
    }

    async fn change_book_status(
        &self,
        dto: ChangeBookStatusDto,
    ) -> error_stack::Result<BookDto, KernelError> {
        let id = BookId::new(dto.id);
        let book = modify_book(self, &id, |book| {
            book.change_status(dto.status);
            Ok(())
        })
        .await?;
        tracing::info!(id = %id.as_ref(), status = %dto.status, "Book status changed");
        Ok(book)
    }
}

impl<T> UpdateBookService for T where T: DependOnBookQuery + DependOnBookModifier {}

/// Locks the book row, applies `f` and persists the result in one transaction.
/// Nothing is written when `f` fails.
async fn modify_book<S, F>(
    service: &S,
    id: &BookId,
    f: F,
) -> error_stack::Result<BookDto, KernelError>
where
    S: DependOnBookQuery + DependOnBookModifier + ?Sized,
    F: FnOnce(&mut Book) -> error_stack::Result<(), KernelError> + Send,
{
    let mut connection = service.database_connection().transact().await?;
    let mut book = service
        .book_query()
        .find_by_id_for_update(&mut connection, id)
        .await?
        .ok_or_else(|| book_not_found(id))?;
    f(&mut book)?;
    service.book_modifier().update(&mut connection, &book).await?;
    connection.commit().await?;
    Ok(BookDto::from(book))
}

#[async_trait::async_trait]
pub trait DeleteBookService:
    'static + Sync + Send + DependOnBookQuery + DependOnBookModifier
{
    async fn delete_book(&self, dto: DeleteBookDto) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let id = BookId::new(dto.id);
        if self
            .book_query()
            .find_by_id_for_update(&mut connection, &id)
            .await?
            .is_none()
        {
            return Err(book_not_found(&id));
        }
        self.book_modifier().delete(&mut connection, &id).await?;
        connection.commit().await?;
        tracing::info!(id = %id.as_ref(), "Book deleted");
        Ok(())
    }
}

impl<T> DeleteBookService for T where T: DependOnBookQuery + DependOnBookModifier {}
