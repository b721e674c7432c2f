//! File-backed repositories.

mod catalog;

pub use catalog::FileCatalogRepository;
