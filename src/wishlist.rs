use crate::error::WishlistError;
use crate::model::{self, ItemForm, ItemRecord, WishlistItem};
use crate::store::ItemStore;

pub struct Wishlist<'a> {
    store: &'a dyn ItemStore,
}

impl<'a> Wishlist<'a> {
    pub fn new(store: &'a dyn ItemStore) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<WishlistItem>, WishlistError> {
        let items = self.store.list_all().await?;
        Ok(model::sort_by_priority(items))
    }

    pub async fn create(&self, form: ItemForm) -> Result<String, WishlistError> {
        let input = form.validate().map_err(WishlistError::Validation)?;

        // One clock read: a fresh item has created_at == updated_at.
        let now = model::now_timestamp();
        let record = ItemRecord::from_input(input, now.clone(), now);

        let id = self.store.create(&record).await?;
        Ok(id)
    }

    pub async fn update(&self, id: &str, form: ItemForm) -> Result<(), WishlistError> {
        let input = form.validate().map_err(WishlistError::Validation)?;

        let existing = match self.store.get(id).await? {
            Some(item) => item,
            None => return Err(WishlistError::NotFound(id.to_string())),
        };

        let now = model::now_timestamp();
        let created_at = if existing.record.created_at.is_empty() {
            now.clone()
        } else {
            existing.record.created_at
        };

        let record = ItemRecord::from_input(input, created_at, now);
        self.store.replace(id, &record).await?;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<(), WishlistError> {
        if self.store.get(id).await?.is_none() {
            return Err(WishlistError::NotFound(id.to_string()));
        }

        self.store.delete(id).await?;
        Ok(())
    }
}
