pub mod pagination;
pub mod query_helpers;

pub use pagination::{Paged, Pagination};
pub use query_helpers::{PgParam, WhereBuilder};
