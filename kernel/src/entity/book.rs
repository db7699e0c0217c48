mod author;
mod category;
mod description;
mod filter;
mod id;
mod isbn;
mod price;
mod published_at;
mod publisher;
mod status;
mod stock;
mod title;

pub use self::{
    author::*, category::*, description::*, filter::*, id::*, isbn::*, price::*, published_at::*,
    publisher::*, status::*, stock::*, title::*,
};
use crate::entity::{CreatedAt, UpdatedAt};
use crate::KernelError;
use destructure::Destructure;
use error_stack::Report;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Book {
    id: BookId,
    title: BookTitle,
    author: BookAuthor,
    isbn: Isbn,
    publisher: Option<Publisher>,
    price: BookPrice,
    stock_quantity: StockQuantity,
    description: Option<BookDescription>,
    category: Option<BookCategory>,
    status: BookStatus,
    published_at: Option<PublishedAt>,
    created_at: CreatedAt<Book>,
    updated_at: UpdatedAt<Book>,
}

impl Book {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: BookId,
        title: BookTitle,
        author: BookAuthor,
        isbn: Isbn,
        publisher: Option<Publisher>,
        price: BookPrice,
        stock_quantity: StockQuantity,
        description: Option<BookDescription>,
        category: Option<BookCategory>,
        status: BookStatus,
        published_at: Option<PublishedAt>,
        created_at: CreatedAt<Book>,
        updated_at: UpdatedAt<Book>,
    ) -> Self {
        Self {
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
        }
    }

    pub fn add_stock(&mut self, delta: StockDelta) -> error_stack::Result<(), KernelError> {
        let Some(remaining) = self.stock_quantity.checked_add(delta) else {
            return Err(Report::new(KernelError::InvalidState)
                .attach_printable("Stock quantity would overflow"));
        };
        self.apply_movement(StockMovement::Inbound, remaining);
        Ok(())
    }

    pub fn remove_stock(&mut self, delta: StockDelta) -> error_stack::Result<(), KernelError> {
        let Some(remaining) = self.stock_quantity.checked_sub(delta) else {
            return Err(Report::new(KernelError::InvalidState).attach_printable(format!(
                "Insufficient stock: {} in stock, {} requested",
                self.stock_quantity.as_ref(),
                delta.as_ref()
            )));
        };
        self.apply_movement(StockMovement::Outbound, remaining);
        Ok(())
    }

    /// Overwrites the status without looking at the stock.
    pub fn change_status(&mut self, status: BookStatus) {
        self.status = status;
        self.touch();
    }

    pub fn update_info(
        &mut self,
        title: BookTitle,
        author: BookAuthor,
        publisher: Option<Publisher>,
        price: BookPrice,
        description: Option<BookDescription>,
        category: Option<BookCategory>,
    ) {
        self.title = title;
        self.author = author;
        self.publisher = publisher;
        self.price = price;
        self.description = description;
        self.category = category;
        self.touch();
    }

    fn apply_movement(&mut self, movement: StockMovement, remaining: StockQuantity) {
        self.status = self.status.after(movement, &remaining);
        self.stock_quantity = remaining;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = UpdatedAt::now();
    }
}

#[cfg(test)]
pub(crate) mod test {
    use time::macros::datetime;

    use crate::entity::{
        Book, BookAuthor, BookCategory, BookDescription, BookId, BookPrice, BookStatus,
        BookTitle, CreatedAt, Isbn, Publisher, StockDelta, StockQuantity, UpdatedAt,
    };
    use crate::KernelError;

    pub fn book(stock: i32, status: BookStatus) -> Book {
        let stamp = datetime!(2024-01-01 0:00 UTC);
        Book::new(
            BookId::generate(),
            BookTitle::new("Effective Java"),
            BookAuthor::new("Joshua Bloch"),
            Isbn::new("978-0134685991"),
            Some(Publisher::new("Addison-Wesley")),
            BookPrice::new(45000),
            StockQuantity::new(stock),
            None,
            Some(BookCategory::new("Programming")),
            status,
            None,
            CreatedAt::new(stamp),
            UpdatedAt::new(stamp),
        )
    }

    #[test]
    fn add_stock_revives_out_of_stock() {
        let mut book = book(0, BookStatus::OutOfStock);
        let before = book.updated_at().clone();
        book.add_stock(StockDelta::new(5).unwrap()).unwrap();
        assert_eq!(book.stock_quantity(), &StockQuantity::new(5));
        assert_eq!(book.status(), &BookStatus::Available);
        assert_ne!(book.updated_at(), &before);
    }

    #[test]
    fn remove_stock_to_zero_marks_out_of_stock() {
        let mut book = book(10, BookStatus::Available);
        book.remove_stock(StockDelta::new(10).unwrap()).unwrap();
        assert_eq!(book.stock_quantity(), &StockQuantity::new(0));
        assert_eq!(book.status(), &BookStatus::OutOfStock);
    }

    #[test]
    fn draining_then_restocking_one_unit_puts_book_back_on_sale() {
        let mut book = book(50, BookStatus::Available);
        book.remove_stock(StockDelta::new(50).unwrap()).unwrap();
        assert_eq!(book.stock_quantity(), &StockQuantity::new(0));
        assert_eq!(book.status(), &BookStatus::OutOfStock);

        book.add_stock(StockDelta::new(1).unwrap()).unwrap();
        assert_eq!(book.stock_quantity(), &StockQuantity::new(1));
        assert_eq!(book.status(), &BookStatus::Available);
    }

    #[test]
    fn add_then_remove_same_quantity_restores_stock_and_status() {
        for (stock, status) in [
            (3, BookStatus::Available),
            (12, BookStatus::Available),
            (4, BookStatus::Discontinued),
        ] {
            let mut book = book(stock, status);
            book.add_stock(StockDelta::new(7).unwrap()).unwrap();
            book.remove_stock(StockDelta::new(7).unwrap()).unwrap();
            assert_eq!(book.stock_quantity(), &StockQuantity::new(stock));
            assert_eq!(book.status(), &status);
        }
    }

    #[test]
    fn remove_stock_beyond_holding_leaves_book_untouched() {
        let mut book = book(5, BookStatus::Available);
        let snapshot = book.clone();
        let error = book.remove_stock(StockDelta::new(6).unwrap()).unwrap_err();
        assert_eq!(error.current_context(), &KernelError::InvalidState);
        assert_eq!(book, snapshot);
    }

    #[test]
    fn add_stock_overflow_is_invalid_state() {
        let mut book = book(i32::MAX, BookStatus::Available);
        let error = book.add_stock(StockDelta::new(1).unwrap()).unwrap_err();
        assert_eq!(error.current_context(), &KernelError::InvalidState);
        assert_eq!(book.stock_quantity(), &StockQuantity::new(i32::MAX));
    }

    #[test]
    fn change_status_ignores_stock() {
        let mut book = book(0, BookStatus::OutOfStock);
        book.change_status(BookStatus::Available);
        assert_eq!(book.status(), &BookStatus::Available);
        assert_eq!(book.stock_quantity(), &StockQuantity::new(0));
    }

    #[test]
    fn update_info_replaces_only_descriptive_fields() {
        let mut book = book(7, BookStatus::Available);
        let isbn = book.isbn().clone();
        book.update_info(
            BookTitle::new("Effective Java 3rd"),
            BookAuthor::new("J. Bloch"),
            None,
            BookPrice::new(50000),
            Some(BookDescription::new("Best practices")),
            None,
        );
        assert_eq!(book.title(), &BookTitle::new("Effective Java 3rd"));
        assert_eq!(book.author(), &BookAuthor::new("J. Bloch"));
        assert_eq!(book.publisher(), &None);
        assert_eq!(book.price(), &BookPrice::new(50000));
        assert_eq!(book.description(), &Some(BookDescription::new("Best practices")));
        assert_eq!(book.category(), &None);
        assert_eq!(book.isbn(), &isbn);
        assert_eq!(book.stock_quantity(), &StockQuantity::new(7));
        assert_eq!(book.status(), &BookStatus::Available);
    }
}
