//! Commerce entities that carry extension properties.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::{Deserialize, Serialize};

use super::PropertyBag;

/// An entity with a stable identity and an extension property bag.
pub trait Extensible {
    /// Stable identity (account number, channel id).
    fn identity(&self) -> String;

    fn properties(&self) -> &PropertyBag;

    fn properties_mut(&mut self) -> &mut PropertyBag;
}

/// Customer record as returned by customer reads and written by
/// create/update requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub account_number: String,
    pub name: String,
    #[serde(default)]
    pub properties: PropertyBag,
}

impl Customer {
    pub fn new(account_number: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            account_number: account_number.into(),
            name: name.into(),
            properties: PropertyBag::new(),
        }
    }
}

/// Customer search result row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalCustomer {
    pub account_number: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub properties: PropertyBag,
}

impl GlobalCustomer {
    pub fn new(account_number: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            account_number: account_number.into(),
            full_name: full_name.into(),
            ..Self::default()
        }
    }
}

/// Channel configuration. Lives in the process-wide cache and is shared by
/// every request for the same channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfiguration {
    pub channel_id: i64,
    pub currency: String,
    #[serde(default)]
    pub properties: PropertyBag,
}

impl ChannelConfiguration {
    pub fn new(channel_id: i64, currency: impl Into<String>) -> Self {
        Self {
            channel_id,
            currency: currency.into(),
            properties: PropertyBag::new(),
        }
    }
}

macro_rules! impl_extensible {
    ($ty:ty, |$this:ident| $identity:expr) => {
        impl Extensible for $ty {
            fn identity(&self) -> String {
                let $this = self;
                $identity
            }

            fn properties(&self) -> &PropertyBag {
                &self.properties
            }

            fn properties_mut(&mut self) -> &mut PropertyBag {
                &mut self.properties
            }
        }
    };
}

impl_extensible!(Customer, |c| c.account_number.clone());
impl_extensible!(GlobalCustomer, |c| c.account_number.clone());
impl_extensible!(ChannelConfiguration, |c| c.channel_id.to_string());

/// A cached entity instance shared across concurrent requests.
///
/// The lock belongs to this instance only; enrichments of unrelated entities
/// never contend. Guards are synchronous and `!Send`, so they cannot be held
/// across an `.await` inside a spawned task.
#[derive(Debug, Default)]
pub struct Shared<T> {
    inner: RwLock<T>,
}

impl<T> Shared<T> {
    pub fn new(entity: T) -> Self {
        Self {
            inner: RwLock::new(entity),
        }
    }

    /// Shared read access. Readers never block each other.
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.inner.read()
    }

    /// Exclusive access for a check-and-set.
    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.inner.write()
    }
}

impl<T: Extensible> Shared<T> {
    pub fn contains(&self, key: &str) -> bool {
        self.read().properties().contains(key)
    }

    /// Snapshot of the value stored under `key`.
    pub fn property(&self, key: &str) -> Option<super::PropertyValue> {
        self.read().properties().get(key).cloned()
    }

    pub fn identity(&self) -> String {
        self.read().identity()
    }
}
