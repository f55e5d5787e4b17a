//! Minimal deterministic PDF builder
//!
//! Produces small, paginated, text-only PDF documents (service-order
//! receipts) without external dependencies. Output is byte-for-byte
//! deterministic for the same input: no creation dates, no random ids.

pub mod builder;
pub mod encoding;

pub use builder::PdfBuilder;
