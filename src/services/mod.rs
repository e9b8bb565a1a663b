//! Business logic services.

pub mod api_key;
pub mod enqueue;
pub mod license;

pub use enqueue::{enqueue_job, parse_job_params};
pub use license::check_license;
