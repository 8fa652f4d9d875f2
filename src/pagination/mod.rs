//! Pagination module
//!
//! Census paginates with HATEOAS links: every list response carries a `next`
//! field holding the URL of the following page, or a falsy value on the last
//! page. The client never counts pages itself; the query string of the
//! continuation URL is overlaid on the base request parameters.

mod strategies;
mod types;

pub use strategies::NextUrlPaginator;
pub use types::{overlay_params, NextPage, PaginationState, Paginator};

#[cfg(test)]
mod tests;
