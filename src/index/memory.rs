//! In-memory full-text index.
//!
//! Each content kind gets its own RAM-backed tantivy index, ranked with
//! tantivy's BM25 scoring over the default lowercasing tokenizer.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tantivy::collector::TopDocs;
use tantivy::query::{AllQuery, Query, QueryParser};
use tantivy::schema::{Field, Schema, Value, INDEXED, STORED, TEXT};
use tantivy::{DocAddress, Index, IndexReader, IndexWriter, ReloadPolicy, Score, TantivyDocument};

use crate::error::{Error, Result};

use super::entry::{ContentKind, EntryMetadata, IndexEntry};
use super::{ContentIndex, SearchHit};

/// Writer heap, single-threaded; tantivy requires at least 15MB per thread.
const WRITER_MEMORY_BUDGET: usize = 50_000_000;

#[derive(Clone, Copy)]
struct Fields {
    id: Field,
    page_index: Field,
    local_index: Field,
    document: Field,
}

impl Fields {
    fn schema() -> (Schema, Fields) {
        let mut builder = Schema::builder();
        let fields = Fields {
            id: builder.add_u64_field("id", INDEXED | STORED),
            page_index: builder.add_u64_field("page_index", STORED),
            local_index: builder.add_u64_field("local_index", STORED),
            document: builder.add_text_field("document", TEXT | STORED),
        };
        (builder.build(), fields)
    }
}

struct Collection {
    index: Index,
    reader: IndexReader,
    fields: Fields,
}

impl Collection {
    fn new() -> Result<Self> {
        let (schema, fields) = Fields::schema();
        let index = Index::create_in_ram(schema);
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;
        Ok(Self {
            index,
            reader,
            fields,
        })
    }

    fn len(&self) -> usize {
        self.reader.searcher().num_docs() as usize
    }

    fn add(&mut self, entries: Vec<IndexEntry>) -> Result<()> {
        let mut writer: IndexWriter =
            self.index.writer_with_num_threads(1, WRITER_MEMORY_BUDGET)?;
        let f = self.fields;
        for entry in entries {
            writer.add_document(tantivy::doc!(
                f.id => entry.id as u64,
                f.page_index => entry.metadata.page_index as u64,
                f.local_index => entry.metadata.local_index as u64,
                f.document => entry.document.as_ref()
            ))?;
        }
        writer.commit()?;
        self.reader.reload()?;
        Ok(())
    }

    fn entry(&self, address: DocAddress) -> Result<IndexEntry> {
        let doc: TantivyDocument = self.reader.searcher().doc(address)?;
        let number = |field: Field| {
            doc.get_first(field)
                .and_then(|v| v.as_u64())
                .map(|n| n as usize)
                .ok_or_else(|| Error::Index(format!("stored document has no {:?} value", field)))
        };
        let document: Arc<str> = doc
            .get_first(self.fields.document)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .into();

        Ok(IndexEntry {
            id: number(self.fields.id)?,
            document,
            metadata: EntryMetadata {
                page_index: number(self.fields.page_index)?,
                local_index: number(self.fields.local_index)?,
            },
        })
    }

    /// Highest score wins, ties go to the lowest id. A query sharing no term
    /// with any entry still returns the lowest id, with score 0.
    fn best(&self, text: &str) -> Result<Option<SearchHit>> {
        let limit = self.len();
        if limit == 0 {
            return Ok(None);
        }

        let parser = QueryParser::for_index(&self.index, vec![self.fields.document]);
        let (query, errors) = parser.parse_query_lenient(text);
        if !errors.is_empty() {
            log::debug!("Ignored {} query syntax errors in {:?}", errors.len(), text);
        }

        let mut scored = self.candidates(query.as_ref(), limit)?;
        if scored.is_empty() {
            scored = self
                .candidates(&AllQuery, limit)?
                .into_iter()
                .map(|(_, entry)| (0.0, entry))
                .collect();
        }
        log::debug!("{} candidates in {} entries", scored.len(), limit);

        Ok(scored
            .into_iter()
            .reduce(|best, next| {
                let better = next.0 > best.0 || (next.0 == best.0 && next.1.id < best.1.id);
                if better {
                    next
                } else {
                    best
                }
            })
            .map(|(score, entry)| SearchHit::new(entry, score)))
    }

    fn candidates(&self, query: &dyn Query, limit: usize) -> Result<Vec<(Score, IndexEntry)>> {
        let searcher = self.reader.searcher();
        searcher
            .search(query, &TopDocs::with_limit(limit))?
            .into_iter()
            .map(|(score, address)| Ok((score, self.entry(address)?)))
            .collect()
    }
}

/// An index that lives for one session.
#[derive(Default)]
pub struct MemoryIndex {
    collections: HashMap<ContentKind, Collection>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries indexed for `kind`, `None` if never added.
    pub fn len(&self, kind: ContentKind) -> Option<usize> {
        self.collections.get(&kind).map(Collection::len)
    }
}

impl fmt::Debug for MemoryIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for kind in ContentKind::ALL {
            if let Some(collection) = self.collections.get(&kind) {
                map.entry(&kind.collection_name(), &collection.len());
            }
        }
        map.finish()
    }
}

impl ContentIndex for MemoryIndex {
    fn add(&mut self, kind: ContentKind, entries: Vec<IndexEntry>) -> Result<()> {
        log::debug!(
            "Adding {} entries to {}",
            entries.len(),
            kind.collection_name()
        );
        let collection = match self.collections.entry(kind) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(Collection::new()?),
        };
        collection.add(entries)
    }

    fn query(&self, kind: ContentKind, text: &str) -> Result<Option<SearchHit>> {
        self.collections
            .get(&kind)
            .ok_or(Error::CollectionNotFound(kind))?
            .best(text)
    }
}
