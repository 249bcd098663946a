//! Customer extension trigger.
//!
//! Meant to be registered broadly: request kinds it does not enrich pass
//! through untouched.

use async_trait::async_trait;
use tracing::debug;

use super::ExtensionLookup;
use crate::interfaces::handler::Result;
use crate::interfaces::{PipelineError, Trigger};
use crate::model::{Request, RequestKind, Response};

const KINDS: &[RequestKind] = &[RequestKind::GetCustomer, RequestKind::GetCustomers];

/// Adds the side-table extension value to customers read by the host.
///
/// Customers are response-scoped, so values are set directly without the
/// enrichment guard. A customer with no row, or a NULL value, gets nothing.
pub struct CustomerExtensionTrigger {
    lookup: ExtensionLookup,
}

impl CustomerExtensionTrigger {
    pub fn new(lookup: ExtensionLookup) -> Self {
        Self { lookup }
    }

    fn unexpected(&self, expected: &str, response: &Response) -> PipelineError {
        PipelineError::Validation(format!(
            "{} expected {} response, got {}",
            self.name(),
            expected,
            response.variant_name()
        ))
    }

    async fn enrich_one(&self, response: &mut Response) -> Result<()> {
        let customer = match response {
            Response::Customer(Some(customer)) => customer,
            Response::Customer(None) => return Ok(()),
            other => return Err(self.unexpected("Customer", other)),
        };

        let key = &self.lookup.config().property_key;
        if customer.properties.contains(key) {
            debug!(account = %customer.account_number, key = %key, "Customer already enriched");
            return Ok(());
        }

        if let Some(value) = self.lookup.fetch(&customer.account_number).await? {
            customer.properties.set(key.clone(), value);
        }
        Ok(())
    }

    async fn enrich_many(&self, response: &mut Response) -> Result<()> {
        let customers = match response {
            Response::Customers(customers) => customers,
            other => return Err(self.unexpected("Customers", other)),
        };

        let accounts = customers.iter().map(|c| c.account_number.clone()).collect();
        let values = self.lookup.fetch_each(accounts).await?;

        let key = &self.lookup.config().property_key;
        for (customer, value) in customers.iter_mut().zip(values) {
            if let Some(value) = value {
                customer.properties.push(key.clone(), value);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Trigger for CustomerExtensionTrigger {
    fn name(&self) -> &str {
        "customer-extension"
    }

    fn supported_kinds(&self) -> &[RequestKind] {
        KINDS
    }

    async fn after_execute(&self, request: &Request, response: &mut Response) -> Result<()> {
        match request {
            Request::GetCustomer { .. } => self.enrich_one(response).await,
            Request::GetCustomers { .. } => self.enrich_many(response).await,
            _ => Ok(()),
        }
    }
}
