//! Post-execution triggers.
//!
//! - [`ChannelDataTrigger`]: closed kind set, fails on anything else.
//! - [`CustomerExtensionTrigger`]: open kind set, ignores anything else.

mod channel_data;
mod customer;
mod lookup;

pub use channel_data::ChannelDataTrigger;
pub use customer::CustomerExtensionTrigger;
pub use lookup::ExtensionLookup;
