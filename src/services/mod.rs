pub mod catalog;

pub use catalog::ProductCatalogService;
