use async_trait::async_trait;
use chrono::Utc;

use bindery_model::{Category, CategoryDraft, CategoryID, ValidationError};

use crate::{
    CatalogError, Result,
    database::{
        memory::{Shared, read, write},
        ports::CategoryRepository,
    },
};

#[derive(Clone, Debug)]
pub struct MemoryCategoryRepository {
    shared: Shared,
}

impl MemoryCategoryRepository {
    pub(crate) fn new(shared: Shared) -> Self {
        Self { shared }
    }
}

fn check_unique_name(
    tables: &super::Tables,
    name: &str,
    exclude: Option<CategoryID>,
) -> Result<()> {
    let taken = tables
        .categories
        .values()
        .any(|category| category.name == name && Some(category.id) != exclude);
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
impl CategoryRepository for MemoryCategoryRepository {
    async fn create(&self, draft: CategoryDraft) -> Result<Category> {
        let draft = draft.normalized();
        draft.validate()?;

        let mut tables = write(&self.shared);
        check_unique_name(&tables, &draft.name, None)?;

        let category = Category {
            id: CategoryID::new(),
            name: draft.name,
            description: draft.description,
            created_at: Utc::now(),
        };
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn get(&self, id: CategoryID) -> Result<Option<Category>> {
        Ok(read(&self.shared).categories.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Category>> {
        let mut categories: Vec<Category> =
            read(&self.shared).categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn update(
        &self,
        id: CategoryID,
        draft: CategoryDraft,
    ) -> Result<Category> {
        let draft = draft.normalized();
        draft.validate()?;

        let mut tables = write(&self.shared);
        if !tables.categories.contains_key(&id) {
            return Err(CatalogError::NotFound(format!("category {id}")));
        }
        check_unique_name(&tables, &draft.name, Some(id))?;

        let category = tables
            .categories
            .get_mut(&id)
            .ok_or_else(|| CatalogError::NotFound(format!("category {id}")))?;
        category.name = draft.name;
        category.description = draft.description;
        Ok(category.clone())
    }

    async fn delete(&self, id: CategoryID) -> Result<()> {
        let mut tables = write(&self.shared);
        if tables.categories.remove(&id).is_none() {
            return Err(CatalogError::NotFound(format!("category {id}")));
        }
        // Detach, never cascade: books keep existing without a category.
        for book in tables.books.values_mut() {
            if book.category_id == Some(id) {
                book.category_id = None;
            }
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        Ok(read(&self.shared).categories.len() as u64)
    }

    async fn book_count(&self, id: CategoryID) -> Result<u64> {
        Ok(read(&self.shared)
            .books
            .values()
            .filter(|book| book.category_id == Some(id))
            .count() as u64)
    }
}
