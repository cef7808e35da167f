//! Paginated document source for export operations
//!
//! Documents are fetched in bounded pages sorted by `_id`, each page
//! resuming after the last id of the previous one. Bounding each request
//! keeps it inside server time limits on large collections; the stable
//! sort key makes the pagination repeatable.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::Collection;
use mongodb::bson::{Bson, Document, doc};
use tracing::debug;

use crate::error::{ExportError, Result};

/// One page of documents, paired with their `_id` values
pub struct DocumentPage {
    /// Documents in `_id` order, each with its identifier
    pub docs: Vec<(Bson, Document)>,
}

/// Trait for fetching documents page by page
///
/// This is the seam between the export loop and the database: the
/// coordinator only ever sees pages, so tests can drive it without a
/// running server.
#[async_trait]
pub trait PageSource: Send {
    /// Fetch the next page of documents
    ///
    /// # Returns
    /// * `Result<Option<DocumentPage>>` - Next non-empty page, or None once
    ///   the collection is exhausted
    async fn next_page(&mut self) -> Result<Option<DocumentPage>>;
}

/// Cursor-paginated source over a MongoDB collection
pub struct CollectionSource {
    collection: Collection<Document>,
    page_size: u32,
    /// `_id` of the last document returned, None before the first page
    cursor: Option<Bson>,
    total_fetched: u64,
    exhausted: bool,
}

impl CollectionSource {
    /// Create a new paginated source
    ///
    /// # Arguments
    /// * `collection` - Collection to read from
    /// * `page_size` - Maximum documents per page (must be non-zero)
    pub fn new(collection: Collection<Document>, page_size: u32) -> Self {
        Self {
            collection,
            page_size,
            cursor: None,
            total_fetched: 0,
            exhausted: false,
        }
    }
}

/// Build the filter for the next page
///
/// First page reads from the start; later pages resume strictly after the
/// last `_id` seen.
pub(crate) fn page_filter(cursor: Option<&Bson>) -> Document {
    match cursor {
        Some(last) => doc! { "_id": { "$gt": last.clone() } },
        None => Document::new(),
    }
}

#[async_trait]
impl PageSource for CollectionSource {
    async fn next_page(&mut self) -> Result<Option<DocumentPage>> {
        if self.exhausted {
            return Ok(None);
        }

        let filter = page_filter(self.cursor.as_ref());
        let mut stream = self
            .collection
            .find(filter)
            .sort(doc! { "_id": 1 })
            .limit(self.page_size as i64)
            .await?;

        let mut docs = Vec::with_capacity(self.page_size as usize);
        while let Some(doc) = stream.try_next().await? {
            let id = doc
                .get("_id")
                .cloned()
                .ok_or(ExportError::MissingDocumentId)?;
            docs.push((id, doc));
        }

        // A short page means there is nothing after it.
        if (docs.len() as u32) < self.page_size {
            self.exhausted = true;
        }

        if docs.is_empty() {
            debug!(
                total = self.total_fetched,
                "Collection exhausted, no further pages"
            );
            return Ok(None);
        }

        self.cursor = docs.last().map(|(id, _)| id.clone());
        self.total_fetched += docs.len() as u64;
        debug!(
            page_docs = docs.len(),
            total = self.total_fetched,
            "Fetched page"
        );

        Ok(Some(DocumentPage { docs }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn test_first_page_filter_is_empty() {
        assert_eq!(page_filter(None), Document::new());
    }

    #[test]
    fn test_resume_filter_starts_after_cursor() {
        let last = Bson::ObjectId(ObjectId::new());
        let filter = page_filter(Some(&last));
        assert_eq!(filter, doc! { "_id": { "$gt": last } });
    }

    #[test]
    fn test_resume_filter_with_string_id() {
        let last = Bson::String("order-1042".into());
        let filter = page_filter(Some(&last));
        assert_eq!(filter, doc! { "_id": { "$gt": "order-1042" } });
    }

    #[test]
    fn test_page_source_trait_object() {
        fn _accepts_page_source(_source: Box<dyn PageSource>) {}
    }
}
