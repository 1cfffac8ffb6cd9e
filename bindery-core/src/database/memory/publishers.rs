use async_trait::async_trait;
use chrono::Utc;

use bindery_model::{Publisher, PublisherDraft, PublisherID, ValidationError};

use crate::{
    CatalogError, Result,
    database::{
        memory::{Shared, read, write},
        ports::PublisherRepository,
    },
};

#[derive(Clone, Debug)]
pub struct MemoryPublisherRepository {
    shared: Shared,
}

impl MemoryPublisherRepository {
    pub(crate) fn new(shared: Shared) -> Self {
        Self { shared }
    }
}

fn check_unique_name(
    tables: &super::Tables,
    name: &str,
    exclude: Option<PublisherID>,
) -> Result<()> {
    let taken = tables
        .publishers
        .values()
        .any(|publisher| publisher.name == name && Some(publisher.id) != exclude);
    if taken {
        return Err(ValidationError::Unique {
            field: "name",
            value: name.to_string(),
        }
        .into());
    }
    Ok(())
}

#[async_trait]
impl PublisherRepository for MemoryPublisherRepository {
    async fn create(&self, draft: PublisherDraft) -> Result<Publisher> {
        let draft = draft.normalized();
        draft.validate()?;

        let mut tables = write(&self.shared);
        check_unique_name(&tables, &draft.name, None)?;

        let publisher = Publisher {
            id: PublisherID::new(),
            name: draft.name,
            address: draft.address,
            website: draft.website,
            established_year: draft.established_year,
            created_at: Utc::now(),
        };
        tables.publishers.insert(publisher.id, publisher.clone());
        Ok(publisher)
    }

    async fn get(&self, id: PublisherID) -> Result<Option<Publisher>> {
        Ok(read(&self.shared).publishers.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Publisher>> {
        let mut publishers: Vec<Publisher> =
            read(&self.shared).publishers.values().cloned().collect();
        publishers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(publishers)
    }

    async fn update(
        &self,
        id: PublisherID,
        draft: PublisherDraft,
    ) -> Result<Publisher> {
        let draft = draft.normalized();
        draft.validate()?;

        let mut tables = write(&self.shared);
        if !tables.publishers.contains_key(&id) {
            return Err(CatalogError::NotFound(format!("publisher {id}")));
        }
        check_unique_name(&tables, &draft.name, Some(id))?;

        let publisher = tables
            .publishers
            .get_mut(&id)
            .ok_or_else(|| CatalogError::NotFound(format!("publisher {id}")))?;
        publisher.name = draft.name;
        publisher.address = draft.address;
        publisher.website = draft.website;
        publisher.established_year = draft.established_year;
        Ok(publisher.clone())
    }

    async fn delete(&self, id: PublisherID) -> Result<()> {
        let mut tables = write(&self.shared);
        if tables.publishers.remove(&id).is_none() {
            return Err(CatalogError::NotFound(format!("publisher {id}")));
        }
        // Nullify, never cascade.
        for book in tables.books.values_mut() {
            if book.publisher_id == Some(id) {
                book.publisher_id = None;
            }
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        Ok(read(&self.shared).publishers.len() as u64)
    }

    async fn book_count(&self, id: PublisherID) -> Result<u64> {
        Ok(read(&self.shared)
            .books
            .values()
            .filter(|book| book.publisher_id == Some(id))
            .count() as u64)
    }
}
