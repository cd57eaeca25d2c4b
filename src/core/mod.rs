pub mod rules;
pub mod sync;

pub use crate::domain::model::{AddressRange, FirewallRule, SyncReport};
pub use crate::domain::ports::{FirewallApi, RangeSource};
pub use crate::utils::error::Result;
