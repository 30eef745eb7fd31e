// Document tailoring: relevance selection, template rendering, citations, and the
// pipeline that ties them to the stores.
// Rendering is template-based; no model calls happen anywhere in this module.

pub mod citations;
pub mod engine;
pub mod handlers;
pub mod memory;
pub mod relevance;
pub mod renderer;
pub mod store;

#[cfg(test)]
pub mod fixtures;
