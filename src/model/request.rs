//! Requests flowing through the host pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Customer;

/// Discriminant of a [`Request`], used for trigger registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    GetChannelConfiguration,
    SearchCustomers,
    GetCustomer,
    GetCustomers,
    CreateOrUpdateCustomer,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::GetChannelConfiguration => "GetChannelConfiguration",
            RequestKind::SearchCustomers => "SearchCustomers",
            RequestKind::GetCustomer => "GetCustomer",
            RequestKind::GetCustomers => "GetCustomers",
            RequestKind::CreateOrUpdateCustomer => "CreateOrUpdateCustomer",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dispatched operation and its input parameters.
///
/// Immutable once dispatched; handlers and triggers only ever see `&Request`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Request {
    GetChannelConfiguration { channel_id: i64 },
    SearchCustomers { keyword: String },
    GetCustomer { account_number: String },
    GetCustomers { account_numbers: Vec<String> },
    CreateOrUpdateCustomer { customer: Customer },
}

impl Request {
    pub fn kind(&self) -> RequestKind {
        match self {
            Request::GetChannelConfiguration { .. } => RequestKind::GetChannelConfiguration,
            Request::SearchCustomers { .. } => RequestKind::SearchCustomers,
            Request::GetCustomer { .. } => RequestKind::GetCustomer,
            Request::GetCustomers { .. } => RequestKind::GetCustomers,
            Request::CreateOrUpdateCustomer { .. } => RequestKind::CreateOrUpdateCustomer,
        }
    }
}
