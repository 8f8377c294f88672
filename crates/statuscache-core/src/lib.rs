// Core runtime support shared by status cache crates

pub mod clock;
pub mod config;
pub mod tracing;

pub use clock::{ClockSource, ManualClock, SystemClock};
pub use config::{DirectoryConfig, StatusCacheConfig, TracingConfig};
pub use self::tracing::init_tracing;
