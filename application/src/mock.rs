//! In-memory stand-ins for the storage traits, used by the service tests.
//!
//! A transaction works on a private copy of the store and publishes it on commit,
//! so a dropped transaction leaves no trace. `create` rejects duplicate ISBNs and
//! emails the way the unique constraints of the real schema do.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{BookQuery, DependOnBookQuery, DependOnMemberQuery, MemberQuery};
use kernel::interface::update::{
    BookModifier, DependOnBookModifier, DependOnMemberModifier, MemberModifier,
};
use kernel::prelude::entity::{
    Book, BookCategory, BookFilter, BookId, Isbn, Member, MemberEmail, MemberFilter, MemberId,
    MemberStatus, Page, SelectLimit, SelectOffset,
};
use kernel::KernelError;

#[derive(Debug, Clone, Default)]
pub struct Store {
    pub books: Vec<Book>,
    pub members: Vec<Member>,
}

#[derive(Clone, Default)]
pub struct MockDatabase {
    store: Arc<Mutex<Store>>,
}

impl MockDatabase {
    pub fn snapshot(&self) -> Store {
        self.store.lock().unwrap().clone()
    }
}

pub struct MockTransaction {
    shared: Arc<Mutex<Store>>,
    work: Store,
}

#[async_trait::async_trait]
impl Transaction for MockTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        *self.shared.lock().unwrap() = self.work;
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for MockDatabase {
    type Transaction = MockTransaction;

    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let work = self.store.lock().unwrap().clone();
        Ok(MockTransaction {
            shared: Arc::clone(&self.store),
            work,
        })
    }
}

fn paginate<T>(items: Vec<T>, limit: &SelectLimit, offset: &SelectOffset) -> Page<T> {
    let total = items.len() as i64;
    let items = items
        .into_iter()
        .skip(*offset.as_ref() as usize)
        .take(*limit.as_ref() as usize)
        .collect();
    Page::new(items, total, limit.clone(), offset.clone())
}

pub struct MockBookRepository;

impl MockBookRepository {
    fn newest_first(books: &[Book], filter: &BookFilter) -> Vec<Book> {
        let mut found = books
            .iter()
            .filter(|book| filter.matches(book))
            .cloned()
            .collect::<Vec<_>>();
        found.sort_by(|a, b| {
            let newer = (b.created_at().as_ref(), b.id().as_ref());
            newer.cmp(&(a.created_at().as_ref(), a.id().as_ref()))
        });
        found
    }
}

#[async_trait::async_trait]
impl BookQuery for MockBookRepository {
    type Transaction = MockTransaction;

    async fn find_by_id(
        &self,
        con: &mut MockTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        Ok(con.work.books.iter().find(|book| book.id() == id).cloned())
    }

    async fn find_by_id_for_update(
        &self,
        con: &mut MockTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        self.find_by_id(con, id).await
    }

    async fn find_by_isbn(
        &self,
        con: &mut MockTransaction,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        Ok(con.work.books.iter().find(|book| book.isbn() == isbn).cloned())
    }

    async fn exists_by_isbn(
        &self,
        con: &mut MockTransaction,
        isbn: &Isbn,
    ) -> error_stack::Result<bool, KernelError> {
        Ok(con.work.books.iter().any(|book| book.isbn() == isbn))
    }

    async fn find_page(
        &self,
        con: &mut MockTransaction,
        filter: &BookFilter,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Page<Book>, KernelError> {
        let found = Self::newest_first(&con.work.books, filter);
        Ok(paginate(found, limit, offset))
    }

    async fn find_all_by(
        &self,
        con: &mut MockTransaction,
        filter: &BookFilter,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        Ok(Self::newest_first(&con.work.books, filter))
    }

    async fn count_by(
        &self,
        con: &mut MockTransaction,
        filter: &BookFilter,
    ) -> error_stack::Result<i64, KernelError> {
        Ok(con.work.books.iter().filter(|book| filter.matches(book)).count() as i64)
    }

    async fn count_by_category(
        &self,
        con: &mut MockTransaction,
    ) -> error_stack::Result<Vec<(Option<BookCategory>, i64)>, KernelError> {
        let mut counts = BTreeMap::<Option<BookCategory>, i64>::new();
        for book in &con.work.books {
            *counts.entry(book.category().clone()).or_default() += 1;
        }
        Ok(counts.into_iter().collect())
    }
}

#[async_trait::async_trait]
impl BookModifier for MockBookRepository {
    type Transaction = MockTransaction;

    async fn create(
        &self,
        con: &mut MockTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        if con.work.books.iter().any(|stored| stored.isbn() == book.isbn()) {
            return Err(Report::new(KernelError::DuplicateResource)
                .attach_printable("unique constraint books_isbn_key violated"));
        }
        con.work.books.push(book.clone());
        Ok(())
    }

    async fn update(
        &self,
        con: &mut MockTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        if let Some(stored) = con.work.books.iter_mut().find(|stored| stored.id() == book.id()) {
            *stored = book.clone();
        }
        Ok(())
    }

    async fn delete(
        &self,
        con: &mut MockTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        con.work.books.retain(|book| book.id() != book_id);
        Ok(())
    }
}

pub struct MockMemberRepository;

#[async_trait::async_trait]
impl MemberQuery for MockMemberRepository {
    type Transaction = MockTransaction;

    async fn find_by_id(
        &self,
        con: &mut MockTransaction,
        id: &MemberId,
    ) -> error_stack::Result<Option<Member>, KernelError> {
        Ok(con.work.members.iter().find(|member| member.id() == id).cloned())
    }

    async fn find_by_id_for_update(
        &self,
        con: &mut MockTransaction,
        id: &MemberId,
    ) -> error_stack::Result<Option<Member>, KernelError> {
        self.find_by_id(con, id).await
    }

    async fn find_by_email(
        &self,
        con: &mut MockTransaction,
        email: &MemberEmail,
    ) -> error_stack::Result<Option<Member>, KernelError> {
        Ok(con
            .work
            .members
            .iter()
            .find(|member| member.email() == email)
            .cloned())
    }

    async fn exists_by_email(
        &self,
        con: &mut MockTransaction,
        email: &MemberEmail,
    ) -> error_stack::Result<bool, KernelError> {
        Ok(con.work.members.iter().any(|member| member.email() == email))
    }

    async fn find_page(
        &self,
        con: &mut MockTransaction,
        filter: &MemberFilter,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Page<Member>, KernelError> {
        let mut found = con
            .work
            .members
            .iter()
            .filter(|member| filter.matches(member))
            .cloned()
            .collect::<Vec<_>>();
        found.sort_by(|a, b| {
            let newer = (b.created_at().as_ref(), b.id().as_ref());
            newer.cmp(&(a.created_at().as_ref(), a.id().as_ref()))
        });
        Ok(paginate(found, limit, offset))
    }

    async fn count_by(
        &self,
        con: &mut MockTransaction,
        filter: &MemberFilter,
    ) -> error_stack::Result<i64, KernelError> {
        Ok(con
            .work
            .members
            .iter()
            .filter(|member| filter.matches(member))
            .count() as i64)
    }

    async fn count_by_status(
        &self,
        con: &mut MockTransaction,
    ) -> error_stack::Result<Vec<(MemberStatus, i64)>, KernelError> {
        let mut counts = BTreeMap::<MemberStatus, i64>::new();
        for member in &con.work.members {
            *counts.entry(*member.status()).or_default() += 1;
        }
        Ok(counts.into_iter().collect())
    }
}

#[async_trait::async_trait]
impl MemberModifier for MockMemberRepository {
    type Transaction = MockTransaction;

    async fn create(
        &self,
        con: &mut MockTransaction,
        member: &Member,
    ) -> error_stack::Result<(), KernelError> {
        if con.work.members.iter().any(|stored| stored.email() == member.email()) {
            return Err(Report::new(KernelError::DuplicateResource)
                .attach_printable("unique constraint members_email_key violated"));
        }
        con.work.members.push(member.clone());
        Ok(())
    }

    async fn update(
        &self,
        con: &mut MockTransaction,
        member: &Member,
    ) -> error_stack::Result<(), KernelError> {
        if let Some(stored) = con
            .work
            .members
            .iter_mut()
            .find(|stored| stored.id() == member.id())
        {
            *stored = member.clone();
        }
        Ok(())
    }

    async fn delete(
        &self,
        con: &mut MockTransaction,
        member_id: &MemberId,
    ) -> error_stack::Result<(), KernelError> {
        con.work.members.retain(|member| member.id() != member_id);
        Ok(())
    }
}

impl DependOnBookQuery for MockDatabase {
    type BookQuery = MockBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &MockBookRepository
    }
}

impl DependOnBookModifier for MockDatabase {
    type BookModifier = MockBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &MockBookRepository
    }
}

impl DependOnMemberQuery for MockDatabase {
    type MemberQuery = MockMemberRepository;
    fn member_query(&self) -> &Self::MemberQuery {
        &MockMemberRepository
    }
}

impl DependOnMemberModifier for MockDatabase {
    type MemberModifier = MockMemberRepository;
    fn member_modifier(&self) -> &Self::MemberModifier {
        &MockMemberRepository
    }
}
