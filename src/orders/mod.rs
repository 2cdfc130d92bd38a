//! Orders
//!
//! Order construction, numbering, and lifecycle mutation. Every write
//! path runs inside one transaction so a failed line never leaves a
//! partial order behind.

pub mod builder;
pub mod mutator;
pub mod number;

pub use builder::create_order;
pub use mutator::{delete_order, update_order, update_status};
pub use number::next_order_number;
