pub mod field;
pub mod entry;
pub mod section;
pub mod catalog;
pub mod config;

pub use field::*;
pub use entry::*;
pub use section::*;
pub use catalog::*;
pub use config::*;
