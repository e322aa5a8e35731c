pub mod config;
pub mod document;
pub mod extractor;
pub mod fbref_parser;
pub mod fotmob_parser;
pub mod http_client;
pub mod page_cache;
pub mod persist;
pub mod roster;
pub mod runner;
pub mod selector;
pub mod site;

pub use document::StatDocument;
pub use extractor::Extractor;
pub use site::Site;
