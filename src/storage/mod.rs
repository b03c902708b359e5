//! Serialized file storage
//!
//! One [`StorageAccessor`] owns one path. All access to that path goes through
//! the accessor's worker task:
//!
//! | Operation | Caller waits | Outcome reported |
//! |-----------|--------------|------------------|
//! | initialize | no | logged |
//! | read | yes | `None` on any failure |
//! | write | no | logged |
//! | delete | yes | logged |
//! | flush | yes | - |

mod accessor;
pub mod atomic;

pub use accessor::StorageAccessor;
