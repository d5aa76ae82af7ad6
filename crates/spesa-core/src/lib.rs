//! Spesa Core Library
//!
//! This crate provides the core functionality for Spesa, a shared household
//! shopping list: lists are identified by short codes, items are reconciled
//! on insertion (duplicate names merge, quantities sum when units agree),
//! and every addition feeds a per-list frequency history.
//!
//! # Architecture
//!
//! All state lives behind the [`storage::KeyValueBackend`] trait. Every
//! mutation is a read-modify-write of one list's full item collection;
//! there are no cross-key transactions and concurrent writers resolve as
//! last write wins.
//!
//! # Quick Start
//!
//! ```text
//! let backend: Arc<dyn KeyValueBackend> = Arc::new(MemoryBackend::new());
//! let registry = ListRegistry::new(Arc::clone(&backend));
//! let store = ItemStore::new(backend);
//!
//! let code = registry.create_list()?;
//! store.add_items(&code, &[NewItem::named("Latte").with_quantity("1 L")])?;
//! let items = store.get_items(&code)?;
//! ```
//!
//! # Modules
//!
//! - `store`: item collection CRUD and dedup-aware insertion
//! - `quantity`: quantity parsing and unit-aware merging
//! - `history`: per-list purchase-frequency counts
//! - `registry`: list creation and code validation
//! - `code`: the 6-character list code type
//! - `actions`: tagged mutation dispatch for transport layers
//! - `storage`: the key-value backend trait and implementations
//! - `speech`: transcription/extraction collaborator contract
//! - `config`: application configuration

pub mod actions;
pub mod categories;
pub mod code;
pub mod config;
pub mod history;
pub mod models;
pub mod quantity;
pub mod registry;
pub mod speech;
pub mod storage;
pub mod store;

pub use actions::ListAction;
pub use categories::Category;
pub use code::{CodeError, ListCode, CODE_ALPHABET, CODE_LENGTH};
pub use config::Config;
pub use history::HistoryTracker;
pub use models::{GroceryItem, HistoryEntry, ItemUpdate, NewItem};
pub use quantity::{merge_quantities, parse_quantity, ParsedQuantity};
pub use registry::ListRegistry;
pub use speech::{ItemExtractor, OpenAiSpeech, SpeechError, Transcriber};
pub use storage::{BackendError, FileBackend, KeyValueBackend, MemoryBackend};
pub use store::ItemStore;
