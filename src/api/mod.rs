pub mod extract;
pub mod pagination;

pub use extract::{parse_id, RawJson, ValidatedJson};
pub use pagination::{total_pages, PageQuery};
