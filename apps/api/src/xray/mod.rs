//! Resume X-Ray search: query building, result screening, document
//! extraction and identity parsing.

pub mod cache;
pub mod classifiers;
pub mod fetcher;
pub mod gate;
pub mod handlers;
pub mod identity;
pub mod patterns;
pub mod pipeline;
pub mod query;
pub mod search;
pub mod text;
pub mod urls;
pub mod vocab;
