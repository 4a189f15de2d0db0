//! Cross-cutting runtime services shared by the API layer.

pub mod cache;
