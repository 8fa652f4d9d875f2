//! Partition routing module
//!
//! Child streams are partitioned by their parent: every parent record yields
//! a child context such as `{"sync_id": 42}`, and the child stream runs one
//! full page sequence per context.

mod routers;
mod types;

pub use routers::ParentRouter;
pub use types::Context;
