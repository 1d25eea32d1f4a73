//! Data module - CSV loading, column access and pagination

pub mod columns;
pub mod dates;
mod loader;
mod table;

pub use columns::FilterDimension;
pub use loader::DataLoader;
pub use table::{TablePage, TablePager, DEFAULT_PAGE_SIZE};
