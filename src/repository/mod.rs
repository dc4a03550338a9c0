//! Record management over persistence handles
//!
//! A repository multiplexes many [`Record`]s sharing one configuration.
//! [`Repository`] looks records up on demand; [`CachedRepository`] preloads
//! everything the backend knows about and serves lookups synchronously.
//! Both keep an optional [`CacheHandler`] coherent with every write and
//! delete.

pub mod cache;
pub mod cached;
mod container;
pub mod lazy;
pub mod record;

pub use cache::{CacheHandler, CacheRemoval, MapCache};
pub use cached::CachedRepository;
pub use container::RepositoryConfig;
pub use lazy::Repository;
pub use record::{GenericRecord, Record, RecordKind};
