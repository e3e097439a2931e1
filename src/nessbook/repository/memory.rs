use super::BookRepository;
use crate::error::{NessbookError, Result};
use crate::model::BookRecord;
use std::collections::HashSet;
use uuid::Uuid;

/// Repository operations, used to make a single operation fail on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Get,
    Create,
    Replace,
    Delete,
}

/// In-memory repository for testing and development.
/// Does NOT persist data.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    books: Vec<BookRecord>,
    failing: HashSet<Operation>,
    auth_expired: bool,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `op` fail with a network error until [`recover`](Self::recover).
    pub fn fail(&mut self, op: Operation) {
        self.failing.insert(op);
    }

    pub fn recover(&mut self, op: Operation) {
        self.failing.remove(&op);
    }

    /// Makes every operation answer as if the credential had expired.
    pub fn expire_credential(&mut self) {
        self.auth_expired = true;
    }

    /// Stored books in server order.
    pub fn books(&self) -> &[BookRecord] {
        &self.books
    }

    fn check(&self, op: Operation) -> Result<()> {
        if self.auth_expired {
            return Err(NessbookError::AuthExpired);
        }
        if self.failing.contains(&op) {
            return Err(NessbookError::Network(format!("{:?} unavailable", op)));
        }
        Ok(())
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.books
            .iter()
            .position(|b| b.id.as_deref() == Some(id))
            .ok_or_else(|| NessbookError::NotFound(id.to_string()))
    }
}

impl BookRepository for InMemoryRepository {
    fn list_books(&self) -> Result<Vec<BookRecord>> {
        self.check(Operation::List)?;
        Ok(self.books.clone())
    }

    fn get_book(&self, id: &str) -> Result<BookRecord> {
        self.check(Operation::Get)?;
        let idx = self.position(id)?;
        Ok(self.books[idx].clone())
    }

    fn create_book(&mut self, draft: &BookRecord) -> Result<BookRecord> {
        self.check(Operation::Create)?;
        let mut book = draft.clone();
        book.id = Some(Uuid::new_v4().simple().to_string());
        self.books.push(book.clone());
        Ok(book)
    }

    fn replace_book(&mut self, id: &str, record: &BookRecord) -> Result<Option<BookRecord>> {
        self.check(Operation::Replace)?;
        let idx = self.position(id)?;
        let mut book = record.clone();
        book.id = Some(id.to_string());
        self.books[idx] = book;
        Ok(None)
    }

    fn delete_book(&mut self, id: &str) -> Result<()> {
        self.check(Operation::Delete)?;
        let idx = self.position(id)?;
        self.books.remove(idx);
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    pub struct RepositoryFixture {
        pub repository: InMemoryRepository,
    }

    impl Default for RepositoryFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl RepositoryFixture {
        pub fn new() -> Self {
            Self {
                repository: InMemoryRepository::new(),
            }
        }

        pub fn with_books(mut self, count: usize) -> Self {
            for i in 0..count {
                let book = BookRecord::new(
                    format!("Book {}", i + 1),
                    format!("Author {}", i + 1),
                    "Fantasy",
                );
                self.repository.create_book(&book).unwrap();
            }
            self
        }

        pub fn with_book(mut self, title: &str, author: &str, genre: &str) -> Self {
            let book = BookRecord::new(title, author, genre);
            self.repository.create_book(&book).unwrap();
            self
        }

        pub fn with_rated_book(mut self, title: &str, rating: u8, favorite: bool) -> Self {
            let mut book = BookRecord::new(title, "Someone", "Romance");
            book.ratings.rating = rating;
            book.is_favorite = favorite;
            self.repository.create_book(&book).unwrap();
            self
        }

        pub fn ids(&self) -> Vec<String> {
            self.repository
                .books()
                .iter()
                .filter_map(|b| b.id.clone())
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_assigns_id_and_keeps_insertion_order() {
        let mut repo = InMemoryRepository::new();
        let a = repo.create_book(&BookRecord::new("A", "x", "g")).unwrap();
        repo.create_book(&BookRecord::new("B", "x", "g")).unwrap();

        assert!(a.id.is_some());
        let titles: Vec<_> = repo.list_books().unwrap().into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn replace_keeps_id_and_position() {
        let mut repo = InMemoryRepository::new();
        let a = repo.create_book(&BookRecord::new("A", "x", "g")).unwrap();
        repo.create_book(&BookRecord::new("B", "x", "g")).unwrap();
        let id = a.id.unwrap();

        repo.replace_book(&id, &BookRecord::new("A2", "y", "g")).unwrap();

        let books = repo.list_books().unwrap();
        assert_eq!(books[0].title, "A2");
        assert_eq!(books[0].id.as_deref(), Some(id.as_str()));
    }

    #[test]
    fn missing_ids_are_not_found() {
        let mut repo = InMemoryRepository::new();
        assert!(matches!(
            repo.get_book("nope"),
            Err(NessbookError::NotFound(_))
        ));
        assert!(matches!(
            repo.delete_book("nope"),
            Err(NessbookError::NotFound(_))
        ));
    }

    #[test]
    fn injected_failures_are_network_errors() {
        let mut repo = InMemoryRepository::new();
        repo.fail(Operation::List);
        assert!(matches!(repo.list_books(), Err(NessbookError::Network(_))));
        repo.recover(Operation::List);
        assert!(repo.list_books().is_ok());
    }

    #[test]
    fn expired_credential_rejects_everything() {
        let mut repo = InMemoryRepository::new();
        repo.expire_credential();
        assert!(matches!(repo.list_books(), Err(NessbookError::AuthExpired)));
        assert!(matches!(
            repo.create_book(&BookRecord::default()),
            Err(NessbookError::AuthExpired)
        ));
    }
}
