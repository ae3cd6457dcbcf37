mod executor;
mod warmup;

pub use executor::{Relay, Relayed};
pub use warmup::{WarmupOutcome, WarmupReport};
