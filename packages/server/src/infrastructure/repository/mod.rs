//! Repository 実装
//!
//! - `file`: JSON ファイルをストレージとする実装

pub mod file;

pub use file::FileCatalogRepository;
