//! Responses produced by the host pipeline and enriched in place.

use std::sync::Arc;

use super::{ChannelConfiguration, Customer, GlobalCustomer, Shared};

/// Result of executing a [`Request`](super::Request).
///
/// Owned by the dispatcher. Handlers return it, triggers mutate it through
/// `&mut Response`; it is never replaced by a trigger.
#[derive(Debug, Clone)]
pub enum Response {
    /// Single customer, `None` when not found.
    Customer(Option<Customer>),
    Customers(Vec<Customer>),
    GlobalCustomers(Vec<GlobalCustomer>),
    /// Cached channel configuration, shared with every other reader.
    ChannelConfiguration(Option<Arc<Shared<ChannelConfiguration>>>),
    Empty,
}

impl Response {
    /// Short name of the variant, for log fields and error messages.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Response::Customer(_) => "Customer",
            Response::Customers(_) => "Customers",
            Response::GlobalCustomers(_) => "GlobalCustomers",
            Response::ChannelConfiguration(_) => "ChannelConfiguration",
            Response::Empty => "Empty",
        }
    }
}

impl PartialEq for Response {
    /// Shared entities compare by instance, everything else by value.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Response::Customer(a), Response::Customer(b)) => a == b,
            (Response::Customers(a), Response::Customers(b)) => a == b,
            (Response::GlobalCustomers(a), Response::GlobalCustomers(b)) => a == b,
            (Response::ChannelConfiguration(a), Response::ChannelConfiguration(b)) => {
                match (a, b) {
                    (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                    (None, None) => true,
                    _ => false,
                }
            }
            (Response::Empty, Response::Empty) => true,
            _ => false,
        }
    }
}
