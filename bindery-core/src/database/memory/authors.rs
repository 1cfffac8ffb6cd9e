use async_trait::async_trait;
use chrono::Utc;

use bindery_model::{Author, AuthorDraft, AuthorID};

use crate::{
    CatalogError, Result,
    database::{
        memory::{Shared, read, write},
        ports::AuthorRepository,
    },
};

#[derive(Clone, Debug)]
pub struct MemoryAuthorRepository {
    shared: Shared,
}

impl MemoryAuthorRepository {
    pub(crate) fn new(shared: Shared) -> Self {
        Self { shared }
    }
}

#[async_trait]
impl AuthorRepository for MemoryAuthorRepository {
    async fn create(&self, draft: AuthorDraft) -> Result<Author> {
        let draft = draft.normalized();
        draft.validate()?;

        let author = Author {
            id: AuthorID::new(),
            first_name: draft.first_name,
            last_name: draft.last_name,
            bio: draft.bio,
            birth_date: draft.birth_date,
            website: draft.website,
            created_at: Utc::now(),
        };
        write(&self.shared).authors.insert(author.id, author.clone());
        Ok(author)
    }

    async fn get(&self, id: AuthorID) -> Result<Option<Author>> {
        Ok(read(&self.shared).authors.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Author>> {
        let mut authors: Vec<Author> =
            read(&self.shared).authors.values().cloned().collect();
        authors.sort_by(|a, b| {
            (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name))
        });
        Ok(authors)
    }

    async fn update(
        &self,
        id: AuthorID,
        draft: AuthorDraft,
    ) -> Result<Author> {
        let draft = draft.normalized();
        draft.validate()?;

        let mut tables = write(&self.shared);
        let author = tables
            .authors
            .get_mut(&id)
            .ok_or_else(|| CatalogError::NotFound(format!("author {id}")))?;
        author.first_name = draft.first_name;
        author.last_name = draft.last_name;
        author.bio = draft.bio;
        author.birth_date = draft.birth_date;
        author.website = draft.website;
        Ok(author.clone())
    }

    async fn delete(&self, id: AuthorID) -> Result<()> {
        let mut tables = write(&self.shared);
        if tables.authors.remove(&id).is_none() {
            return Err(CatalogError::NotFound(format!("author {id}")));
        }
        // Drop the association rows; the books themselves survive.
        for book in tables.books.values_mut() {
            book.author_ids.retain(|author_id| *author_id != id);
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        Ok(read(&self.shared).authors.len() as u64)
    }

    async fn book_count(&self, id: AuthorID) -> Result<u64> {
        Ok(read(&self.shared)
            .books
            .values()
            .filter(|book| book.author_ids.contains(&id))
            .count() as u64)
    }
}
