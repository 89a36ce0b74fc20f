/// Paginated fetch over a re-executable row source
pub mod paginated;

pub use paginated::{FetchCursor, FetchState, PageSize, PaginatedFetch, Pages};
