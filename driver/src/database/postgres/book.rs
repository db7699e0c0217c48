use error_stack::ResultExt;
use sqlx::{PgConnection, Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{
    Book, BookAuthor, BookCategory, BookDescription, BookFilter, BookId, BookPrice, BookStatus,
    BookTitle, CreatedAt, Isbn, Page, PublishedAt, Publisher, SelectLimit, SelectOffset,
    StockQuantity, UpdatedAt,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresBookRepository;

#[async_trait::async_trait]
impl BookQuery for PostgresBookRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_id(con, id, false).await
    }

    async fn find_by_id_for_update(
        &self,
        con: &mut PostgresTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_id(con, id, true).await
    }

    async fn find_by_isbn(
        &self,
        con: &mut PostgresTransaction,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_isbn(con, isbn).await
    }

    async fn exists_by_isbn(
        &self,
        con: &mut PostgresTransaction,
        isbn: &Isbn,
    ) -> error_stack::Result<bool, KernelError> {
        PgBookInternal::exists_by_isbn(con, isbn).await
    }

    async fn find_page(
        &self,
        con: &mut PostgresTransaction,
        filter: &BookFilter,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Page<Book>, KernelError> {
        let items = PgBookInternal::find_all(con, filter, Some((limit, offset))).await?;
        let total = PgBookInternal::count_by(con, filter).await?;
        Ok(Page::new(items, total, limit.clone(), offset.clone()))
    }

    async fn find_all_by(
        &self,
        con: &mut PostgresTransaction,
        filter: &BookFilter,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        PgBookInternal::find_all(con, filter, None).await
    }

    async fn count_by(
        &self,
        con: &mut PostgresTransaction,
        filter: &BookFilter,
    ) -> error_stack::Result<i64, KernelError> {
        PgBookInternal::count_by(con, filter).await
    }

    async fn count_by_category(
        &self,
        con: &mut PostgresTransaction,
    ) -> error_stack::Result<Vec<(Option<BookCategory>, i64)>, KernelError> {
        PgBookInternal::count_by_category(con).await
    }
}

#[async_trait::async_trait]
impl BookModifier for PostgresBookRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::create(con, book).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::update(con, book).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::delete(con, book_id).await
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    book_id: Uuid,
    title: String,
    author: String,
    isbn: String,
    publisher: Option<String>,
    price: i32,
    stock_quantity: i32,
    description: Option<String>,
    category: Option<String>,
    status: String,
    published_at: Option<OffsetDateTime>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TryFrom<BookRow> for Book {
    type Error = error_stack::Report<KernelError>;
    fn try_from(value: BookRow) -> Result<Self, Self::Error> {
        let status = value
            .status
            .parse::<BookStatus>()
            .change_context(KernelError::Internal)?;
        Ok(Book::new(
            BookId::new(value.book_id),
            BookTitle::new(value.title),
            BookAuthor::new(value.author),
            Isbn::new(value.isbn),
            value.publisher.map(Publisher::new),
            BookPrice::new(value.price),
            StockQuantity::new(value.stock_quantity),
            value.description.map(BookDescription::new),
            value.category.map(BookCategory::new),
            status,
            value.published_at.map(PublishedAt::new),
            CreatedAt::new(value.created_at),
            UpdatedAt::new(value.updated_at),
        ))
    }
}

/// Appends the `WHERE` clause matching `filter`; [`BookFilter::matches`] is the reference.
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &BookFilter) {
    match filter {
        BookFilter::All => {}
        BookFilter::TitleContains(title) => {
            builder
                .push(" WHERE strpos(title, ")
                .push_bind(title.clone())
                .push(") > 0");
        }
        BookFilter::AuthorContains(author) => {
            builder
                .push(" WHERE strpos(author, ")
                .push_bind(author.clone())
                .push(") > 0");
        }
        BookFilter::Keyword(keyword) => {
            builder
                .push(" WHERE strpos(title, ")
                .push_bind(keyword.clone())
                .push(") > 0 OR strpos(author, ")
                .push_bind(keyword.clone())
                .push(") > 0");
        }
        BookFilter::Category(category) => {
            builder
                .push(" WHERE category = ")
                .push_bind(String::from(category.clone()));
        }
        BookFilter::Status(status) => {
            builder.push(" WHERE status = ").push_bind(status.as_str());
        }
        BookFilter::PriceBetween { min, max } => {
            builder
                .push(" WHERE price BETWEEN ")
                .push_bind(i32::from(*min))
                .push(" AND ")
                .push_bind(i32::from(*max));
        }
        BookFilter::LowStock { threshold } => {
            builder
                .push(" WHERE stock_quantity <= ")
                .push_bind(i32::from(*threshold))
                .push(" AND status = ")
                .push_bind(BookStatus::Available.as_str());
        }
    }
}

pub(in crate::database) struct PgBookInternal;

impl PgBookInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &BookId,
        lock: bool,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let query = if lock {
            // language=postgresql
            r#"
            SELECT book_id, title, author, isbn, publisher, price, stock_quantity, description,
                   category, status, published_at, created_at, updated_at
            FROM books
            WHERE book_id = $1
            FOR UPDATE
            "#
        } else {
            // language=postgresql
            r#"
            SELECT book_id, title, author, isbn, publisher, price, stock_quantity, description,
                   category, status, published_at, created_at, updated_at
            FROM books
            WHERE book_id = $1
            "#
        };
        let row = sqlx::query_as::<_, BookRow>(query)
            .bind(id.as_ref())
            .fetch_optional(con)
            .await
            .convert_error()?;
        row.map(Book::try_from).transpose()
    }

    async fn find_by_isbn(
        con: &mut PgConnection,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT book_id, title, author, isbn, publisher, price, stock_quantity, description,
                   category, status, published_at, created_at, updated_at
            FROM books
            WHERE isbn = $1
            "#,
        )
        .bind(isbn.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(Book::try_from).transpose()
    }

    async fn exists_by_isbn(
        con: &mut PgConnection,
        isbn: &Isbn,
    ) -> error_stack::Result<bool, KernelError> {
        sqlx::query_scalar::<_, bool>(
            // language=postgresql
            r#"
            SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)
            "#,
        )
        .bind(isbn.as_ref())
        .fetch_one(con)
        .await
        .convert_error()
    }

    async fn find_all(
        con: &mut PgConnection,
        filter: &BookFilter,
        window: Option<(&SelectLimit, &SelectOffset)>,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            // language=postgresql
            r#"
            SELECT book_id, title, author, isbn, publisher, price, stock_quantity, description,
                   category, status, published_at, created_at, updated_at
            FROM books
            "#,
        );
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY created_at DESC, book_id DESC");
        if let Some((limit, offset)) = window {
            builder
                .push(" LIMIT ")
                .push_bind(i64::from(*limit.as_ref()))
                .push(" OFFSET ")
                .push_bind(i64::from(*offset.as_ref()));
        }
        let rows = builder
            .build_query_as::<BookRow>()
            .fetch_all(con)
            .await
            .convert_error()?;
        rows.into_iter().map(Book::try_from).collect()
    }

    async fn count_by(
        con: &mut PgConnection,
        filter: &BookFilter,
    ) -> error_stack::Result<i64, KernelError> {
        // language=postgresql
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM books");
        push_filter(&mut builder, filter);
        builder
            .build_query_scalar::<i64>()
            .fetch_one(con)
            .await
            .convert_error()
    }

    async fn count_by_category(
        con: &mut PgConnection,
    ) -> error_stack::Result<Vec<(Option<BookCategory>, i64)>, KernelError> {
        let rows = sqlx::query_as::<_, (Option<String>, i64)>(
            // language=postgresql
            r#"
            SELECT category, COUNT(*)
            FROM books
            GROUP BY category
            ORDER BY category NULLS LAST
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows
            .into_iter()
            .map(|(category, count)| (category.map(BookCategory::new), count))
            .collect())
    }

    async fn create(con: &mut PgConnection, book: &Book) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO books (book_id, title, author, isbn, publisher, price, stock_quantity,
                               description, category, status, published_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(book.id().as_ref())
        .bind(book.title().as_ref())
        .bind(book.author().as_ref())
        .bind(book.isbn().as_ref())
        .bind(book.publisher().as_ref().map(AsRef::<String>::as_ref))
        .bind(book.price().as_ref())
        .bind(book.stock_quantity().as_ref())
        .bind(book.description().as_ref().map(AsRef::<String>::as_ref))
        .bind(book.category().as_ref().map(AsRef::<String>::as_ref))
        .bind(book.status().as_str())
        .bind(
            book.published_at()
                .as_ref()
                .map(AsRef::<OffsetDateTime>::as_ref),
        )
        .bind(book.created_at().as_ref())
        .bind(book.updated_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update(con: &mut PgConnection, book: &Book) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            UPDATE books
            SET title = $2, author = $3, publisher = $4, price = $5, stock_quantity = $6,
                description = $7, category = $8, status = $9, updated_at = $10
            WHERE book_id = $1
            "#,
        )
        .bind(book.id().as_ref())
        .bind(book.title().as_ref())
        .bind(book.author().as_ref())
        .bind(book.publisher().as_ref().map(AsRef::<String>::as_ref))
        .bind(book.price().as_ref())
        .bind(book.stock_quantity().as_ref())
        .bind(book.description().as_ref().map(AsRef::<String>::as_ref))
        .bind(book.category().as_ref().map(AsRef::<String>::as_ref))
        .bind(book.status().as_str())
        .bind(book.updated_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn delete(con: &mut PgConnection, book_id: &BookId) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            DELETE FROM books
            WHERE book_id = $1
            "#,
        )
        .bind(book_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::BookQuery;
    use kernel::interface::update::BookModifier;
    use kernel::prelude::entity::{
        Book, BookAuthor, BookCategory, BookFilter, BookId, BookPrice, BookStatus, BookTitle,
        CreatedAt, Isbn, SelectLimit, SelectOffset, StockDelta, StockQuantity, UpdatedAt,
    };
    use kernel::KernelError;

    use crate::database::postgres::PostgresDatabase;
    use crate::database::PostgresBookRepository;

    fn book(title: &str, category: Option<&str>, stock: i32) -> Book {
        let created_at = CreatedAt::<Book>::now();
        let updated_at = UpdatedAt::new(*created_at.as_ref());
        Book::new(
            BookId::generate(),
            BookTitle::new(title),
            BookAuthor::new("Joshua Bloch"),
            Isbn::new(format!("978-{}", rand::random::<u32>())),
            None,
            BookPrice::new(45000),
            StockQuantity::new(stock),
            None,
            category.map(BookCategory::new),
            BookStatus::Available,
            None,
            created_at,
            updated_at,
        )
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn basic_modify() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;

        let mut book = book("Effective Java", None, 3);
        PostgresBookRepository.create(&mut con, &book).await?;

        let found = PostgresBookRepository.find_by_id(&mut con, book.id()).await?;
        assert_eq!(found, Some(book.clone()));
        let found = PostgresBookRepository
            .find_by_isbn(&mut con, book.isbn())
            .await?;
        assert_eq!(found, Some(book.clone()));
        assert!(PostgresBookRepository.exists_by_isbn(&mut con, book.isbn()).await?);

        book.remove_stock(StockDelta::new(3)?)?;
        PostgresBookRepository.update(&mut con, &book).await?;
        let found = PostgresBookRepository
            .find_by_id_for_update(&mut con, book.id())
            .await?;
        assert_eq!(found, Some(book.clone()));
        assert_eq!(found.map(|b| *b.status()), Some(BookStatus::OutOfStock));

        PostgresBookRepository.delete(&mut con, book.id()).await?;
        let found = PostgresBookRepository.find_by_id(&mut con, book.id()).await?;
        assert!(found.is_none());
        assert!(!PostgresBookRepository.exists_by_isbn(&mut con, book.isbn()).await?);

        con.roll_back().await
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn duplicate_isbn_is_reported_as_duplicate() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;

        let first = book("Effective Java", None, 1);
        PostgresBookRepository.create(&mut con, &first).await?;
        let second = first.clone().reconstruct(|b| b.id = BookId::generate());
        let error = PostgresBookRepository
            .create(&mut con, &second)
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::DuplicateResource);

        con.roll_back().await
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn filtered_pages() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;

        let category = format!("cat-{}", rand::random::<u32>());
        let token = format!("tok{}", rand::random::<u32>());
        let old = book(&format!("{token} old"), Some(&category), 5);
        let new = book(&format!("{token} new"), Some(&category), 50);
        let mut discontinued = book("Other", Some(&category), 1);
        discontinued.change_status(BookStatus::Discontinued);
        for book in [&old, &new, &discontinued] {
            PostgresBookRepository.create(&mut con, book).await?;
        }

        let page = PostgresBookRepository
            .find_page(
                &mut con,
                &BookFilter::Category(BookCategory::new(category.clone())),
                &SelectLimit::new(2),
                &SelectOffset::new(0),
            )
            .await?;
        assert_eq!(page.total(), 3);
        assert_eq!(page.items().len(), 2);
        assert_eq!(page.items()[0].id(), discontinued.id());
        assert_eq!(page.items()[1].id(), new.id());

        let page = PostgresBookRepository
            .find_page(
                &mut con,
                &BookFilter::Keyword(token.clone()),
                &SelectLimit::default(),
                &SelectOffset::default(),
            )
            .await?;
        assert_eq!(page.total(), 2);

        let low = PostgresBookRepository
            .find_all_by(
                &mut con,
                &BookFilter::LowStock {
                    threshold: StockQuantity::new(10),
                },
            )
            .await?;
        assert!(low.iter().any(|b| b.id() == old.id()));
        assert!(low.iter().all(|b| b.id() != discontinued.id()));
        assert!(low.iter().all(|b| b.id() != new.id()));

        let counts = PostgresBookRepository.count_by_category(&mut con).await?;
        assert!(counts.contains(&(Some(BookCategory::new(category)), 3)));

        con.roll_back().await
    }
}
