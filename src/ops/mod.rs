pub mod schema_ops;
pub mod section_ops;
pub mod entry_ops;
pub mod draft_ops;
pub mod filter;
