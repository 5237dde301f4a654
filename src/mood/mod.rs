pub mod aggregator;
pub mod classifier;
pub mod session;

pub use aggregator::*;
pub use classifier::*;
pub use session::*;
