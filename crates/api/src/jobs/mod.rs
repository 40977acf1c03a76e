//! Background job scheduler and job implementations.

mod inventory_metrics;
mod pool_metrics;
mod scheduler;

pub use inventory_metrics::InventoryMetricsJob;
pub use pool_metrics::PoolMetricsJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};
