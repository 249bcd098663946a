//! Channel data trigger.
//!
//! Registered for a closed set of request kinds. Any other kind is a
//! configuration error and fails with [`PipelineError::Unsupported`].

use async_trait::async_trait;
use tracing::debug;

use super::ExtensionLookup;
use crate::guard::{enrich_once, EnrichOutcome};
use crate::interfaces::handler::Result;
use crate::interfaces::{PipelineError, Trigger};
use crate::model::{PropertyValue, Request, RequestKind, Response};

const KINDS: &[RequestKind] = &[
    RequestKind::GetChannelConfiguration,
    RequestKind::SearchCustomers,
];

/// Enriches the cached channel configuration with its configuration
/// parameters, and customer search results with their extension value.
pub struct ChannelDataTrigger {
    lookup: ExtensionLookup,
}

impl ChannelDataTrigger {
    pub fn new(lookup: ExtensionLookup) -> Self {
        Self { lookup }
    }

    async fn enrich_channel(&self, channel_id: i64, response: &Response) -> Result<()> {
        let Response::ChannelConfiguration(Some(channel)) = response else {
            debug!(
                channel = channel_id,
                response = response.variant_name(),
                "No channel configuration to enrich"
            );
            return Ok(());
        };

        let key = &self.lookup.config().channel_property_key;
        let outcome = enrich_once(channel.as_ref(), key, move || async move {
            self.lookup
                .channel_parameters(channel_id)
                .await
                .map(PropertyValue::Parameters)
        })
        .await?;

        if outcome == EnrichOutcome::AlreadyPresent {
            debug!(channel = channel_id, "Channel configuration already enriched");
        }
        Ok(())
    }

    async fn enrich_search(&self, response: &mut Response) -> Result<()> {
        let Response::GlobalCustomers(customers) = response else {
            return Err(PipelineError::Validation(format!(
                "{} expected GlobalCustomers response, got {}",
                self.name(),
                response.variant_name()
            )));
        };

        let accounts = customers.iter().map(|c| c.account_number.clone()).collect();
        let values = self.lookup.fetch_each(accounts).await?;

        let key = &self.lookup.config().search_property_key;
        for (customer, value) in customers.iter_mut().zip(values) {
            customer.properties.push(key.clone(), value.unwrap_or_default());
        }

        debug!(count = customers.len(), "Search results enriched");
        Ok(())
    }
}

#[async_trait]
impl Trigger for ChannelDataTrigger {
    fn name(&self) -> &str {
        "channel-data"
    }

    fn supported_kinds(&self) -> &[RequestKind] {
        KINDS
    }

    async fn after_execute(&self, request: &Request, response: &mut Response) -> Result<()> {
        match request {
            Request::GetChannelConfiguration { channel_id } => {
                self.enrich_channel(*channel_id, response).await
            }
            Request::SearchCustomers { .. } => self.enrich_search(response).await,
            other => Err(PipelineError::Unsupported { kind: other.kind() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::Barrier;

    use super::*;
    use crate::config::ExtensionConfig;
    use crate::interfaces::Row;
    use crate::model::{ChannelConfiguration, ConfigurationParameter, Customer, GlobalCustomer, Shared};
    use crate::storage::MockRowStore;

    const CHANNEL_KEY: &str = "ExtConfigurationParameters";

    async fn store_with_parameters() -> Arc<MockRowStore> {
        let store = Arc::new(MockRowStore::new());
        store
            .insert_row(
                None,
                "RETAILCONFIGURATIONPARAMETERS",
                Row::new()
                    .with("CHANNEL", Some("5".to_string()))
                    .with("NAME", Some("Color".to_string()))
                    .with("VALUE", Some("Blue".to_string())),
            )
            .await;
        store
            .insert_row(
                None,
                "CONTOSOCUSTTABLEEXTENSION",
                Row::new()
                    .with("ACCOUNTNUM", Some("C0001".to_string()))
                    .with("REFNOEXT", Some("ABC123".to_string())),
            )
            .await;
        store
    }

    fn trigger(store: Arc<MockRowStore>) -> ChannelDataTrigger {
        ChannelDataTrigger::new(ExtensionLookup::new(store, ExtensionConfig::default()))
    }

    fn channel_response() -> (Arc<Shared<ChannelConfiguration>>, Response) {
        let channel = Arc::new(Shared::new(ChannelConfiguration::new(5, "USD")));
        let response = Response::ChannelConfiguration(Some(channel.clone()));
        (channel, response)
    }

    #[tokio::test]
    async fn test_installs_channel_parameters() {
        let store = store_with_parameters().await;
        let trigger = trigger(store);
        let (channel, mut response) = channel_response();

        trigger
            .after_execute(&Request::GetChannelConfiguration { channel_id: 5 }, &mut response)
            .await
            .unwrap();

        assert_eq!(
            channel.property(CHANNEL_KEY),
            Some(PropertyValue::Parameters(vec![ConfigurationParameter {
                name: "Color".to_string(),
                value: "Blue".to_string(),
            }]))
        );
    }

    #[tokio::test]
    async fn test_already_enriched_channel_skips_lookup() {
        let store = store_with_parameters().await;
        let trigger = trigger(store.clone());
        let (channel, mut response) = channel_response();
        let request = Request::GetChannelConfiguration { channel_id: 5 };

        trigger.after_execute(&request, &mut response).await.unwrap();
        trigger.after_execute(&request, &mut response).await.unwrap();

        assert_eq!(store.query_count().await, 1);
        assert_eq!(channel.read().properties.count(CHANNEL_KEY), 1);
    }

    #[tokio::test]
    async fn test_missing_channel_is_noop() {
        let store = store_with_parameters().await;
        let trigger = trigger(store.clone());
        let request = Request::GetChannelConfiguration { channel_id: 5 };

        let mut response = Response::ChannelConfiguration(None);
        trigger.after_execute(&request, &mut response).await.unwrap();
        let mut response = Response::Empty;
        trigger.after_execute(&request, &mut response).await.unwrap();

        assert_eq!(store.query_count().await, 0);
    }

    #[tokio::test]
    async fn test_lookup_failure_leaves_channel_untouched() {
        let store = store_with_parameters().await;
        store.fail_lookups_for("5").await;
        let trigger = trigger(store.clone());
        let (channel, mut response) = channel_response();

        let err = trigger
            .after_execute(&Request::GetChannelConfiguration { channel_id: 5 }, &mut response)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::DataAccess(_)));
        assert!(!channel.contains(CHANNEL_KEY));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_requests_install_once() {
        let store = store_with_parameters().await;
        let trigger = Arc::new(trigger(store));
        let (channel, _) = channel_response();
        let barrier = Arc::new(Barrier::new(6));

        let tasks: Vec<_> = (0..6)
            .map(|_| {
                let trigger = trigger.clone();
                let channel = channel.clone();
                let barrier = barrier.clone();
                tokio::spawn(async move {
                    let mut response = Response::ChannelConfiguration(Some(channel));
                    barrier.wait().await;
                    trigger
                        .after_execute(
                            &Request::GetChannelConfiguration { channel_id: 5 },
                            &mut response,
                        )
                        .await
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(channel.read().properties.count(CHANNEL_KEY), 1);
    }

    #[tokio::test]
    async fn test_search_results_get_value_or_empty() {
        let store = store_with_parameters().await;
        let trigger = trigger(store);
        let mut response = Response::GlobalCustomers(vec![
            GlobalCustomer::new("C0001", "Ada"),
            GlobalCustomer::new("C0002", "Grace"),
        ]);

        trigger
            .after_execute(
                &Request::SearchCustomers {
                    keyword: "a".to_string(),
                },
                &mut response,
            )
            .await
            .unwrap();

        let Response::GlobalCustomers(customers) = response else {
            panic!("expected search results");
        };
        assert_eq!(customers[0].properties.string_or_empty("RefNoExt"), "ABC123");
        assert!(customers[1].properties.contains("RefNoExt"));
        assert_eq!(customers[1].properties.string_or_empty("RefNoExt"), "");
    }

    #[tokio::test]
    async fn test_search_with_wrong_response_is_validation_error() {
        let trigger = trigger(Arc::new(MockRowStore::new()));
        let mut response = Response::Customers(vec![]);

        let err = trigger
            .after_execute(
                &Request::SearchCustomers {
                    keyword: "a".to_string(),
                },
                &mut response,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unsupported_kind_fails() {
        let trigger = trigger(Arc::new(MockRowStore::new()));
        let mut response = Response::Customer(None);

        let err = trigger
            .after_execute(
                &Request::CreateOrUpdateCustomer {
                    customer: Customer::new("C0001", "Ada"),
                },
                &mut response,
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Unsupported {
                kind: RequestKind::CreateOrUpdateCustomer
            }
        ));
    }
}
