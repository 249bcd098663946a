//! Pipeline data model: requests, responses, and extensible entities.

mod entity;
mod property_bag;
mod request;
mod response;

pub use entity::{ChannelConfiguration, Customer, Extensible, GlobalCustomer, Shared};
pub use property_bag::{ConfigurationParameter, Property, PropertyBag, PropertyValue};
pub use request::{Request, RequestKind};
pub use response::Response;
