pub mod analyzer;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod http;
pub mod segmenter;
