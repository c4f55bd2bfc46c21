pub mod crawl_import;
pub mod scoring;
