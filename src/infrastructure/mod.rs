//! Adapters implementing the domain ports.

pub mod backend;
pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
pub mod tokenizer;
