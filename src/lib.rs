pub mod config;
pub mod content;
pub mod content_index;
pub mod derive;
pub mod error;
pub mod feed;
pub mod listing;
pub mod logger;
pub mod paginator;
pub mod pipeline;
pub mod query_string;
pub mod search;
pub mod source;
pub mod taxonomy;
pub mod text_utils;
#[cfg(test)]
mod test_data;
