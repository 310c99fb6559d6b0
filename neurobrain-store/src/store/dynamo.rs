use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::{
    config::{http::HttpResponse, Region},
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    types::{AttributeValue, KeySchemaElement, ReturnConsumedCapacity, Select},
    Client,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::{
    AttributeDefinition, IndexDescription, KeyElement, KeyValueStore, PutOutput, ScanFilter,
    ScanOutput, ScanRequest, TableDescription,
};
use crate::config::Aws;
use crate::error::{StoreError, StoreResult};
use crate::item::{AttrValue, Item};

/// [`KeyValueStore`] backed by Amazon DynamoDB
#[derive(Clone, Debug)]
pub struct DynamoStore {
    client: Client,
}

impl DynamoStore {
    /// Build a client from the AWS settings.
    ///
    /// Credentials come from the standard provider chain
    /// (`AWS_ACCESS_KEY_ID`/`AWS_SECRET_ACCESS_KEY`, profiles, instance roles).
    pub async fn connect(aws: &Aws) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(aws.region.clone()));
        if let Some(profile) = &aws.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(endpoint) = &aws.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        tracing::debug!(
            region = %aws.region,
            endpoint = aws.endpoint_url.as_deref().unwrap_or("default"),
            "DynamoDB client configured"
        );
        Self::from_client(Client::new(&sdk_config))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

/// Map an SDK failure onto the store error taxonomy by service error code
fn classify<E>(err: SdkError<E, HttpResponse>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    match err.as_service_error() {
        Some(service) => StoreError::from_code(
            service.code().unwrap_or("Unknown"),
            service.message().unwrap_or_default(),
        ),
        None => StoreError::Transport(DisplayErrorContext(&err).to_string()),
    }
}

fn to_dynamo_value(value: AttrValue) -> AttributeValue {
    match value {
        AttrValue::S(s) => AttributeValue::S(s),
        AttrValue::N(n) => AttributeValue::N(n),
        AttrValue::Bool(b) => AttributeValue::Bool(b),
        AttrValue::Ss(values) => AttributeValue::Ss(values),
    }
}

fn from_dynamo_value(value: &AttributeValue) -> Option<AttrValue> {
    match value {
        AttributeValue::S(s) => Some(AttrValue::S(s.clone())),
        AttributeValue::N(n) => Some(AttrValue::N(n.clone())),
        AttributeValue::Bool(b) => Some(AttrValue::Bool(*b)),
        AttributeValue::Ss(values) => Some(AttrValue::Ss(values.clone())),
        _ => None,
    }
}

fn to_dynamo_item(item: Item) -> HashMap<String, AttributeValue> {
    item.into_iter()
        .map(|(name, value)| (name, to_dynamo_value(value)))
        .collect()
}

fn from_dynamo_item(item: &HashMap<String, AttributeValue>) -> Item {
    item.iter()
        .filter_map(|(name, value)| match from_dynamo_value(value) {
            Some(value) => Some((name.clone(), value)),
            None => {
                tracing::debug!(attribute = %name, "Skipping attribute of unsupported type");
                None
            }
        })
        .collect()
}

fn key_element(key: &KeySchemaElement) -> KeyElement {
    KeyElement {
        attribute_name: key.attribute_name().to_string(),
        key_type: key.key_type().as_str().to_string(),
    }
}

#[async_trait]
impl KeyValueStore for DynamoStore {
    async fn put_item(&self, table: &str, item: Item) -> StoreResult<PutOutput> {
        let output = self
            .client
            .put_item()
            .table_name(table)
            .set_item(Some(to_dynamo_item(item)))
            .return_consumed_capacity(ReturnConsumedCapacity::Total)
            .send()
            .await
            .map_err(classify)?;

        Ok(PutOutput {
            consumed_capacity: output.consumed_capacity().and_then(|c| c.capacity_units()),
        })
    }

    async fn scan(&self, table: &str, request: ScanRequest) -> StoreResult<ScanOutput> {
        let mut builder = self
            .client
            .scan()
            .table_name(table)
            .set_limit(request.limit)
            .return_consumed_capacity(ReturnConsumedCapacity::Total);

        if request.count_only {
            builder = builder.select(Select::Count);
        }
        if let Some(ScanFilter::BeginsWith { attribute, prefix }) = request.filter {
            builder = builder
                .filter_expression("begins_with(#attr, :prefix)")
                .expression_attribute_names("#attr", attribute)
                .expression_attribute_values(":prefix", AttributeValue::S(prefix));
        }

        let output = builder.send().await.map_err(classify)?;
        Ok(ScanOutput {
            items: output.items().iter().map(from_dynamo_item).collect(),
            count: output.count().max(0) as usize,
            consumed_capacity: output.consumed_capacity().and_then(|c| c.capacity_units()),
        })
    }

    async fn describe_table(&self, table: &str) -> StoreResult<TableDescription> {
        let output = self
            .client
            .describe_table()
            .table_name(table)
            .send()
            .await
            .map_err(classify)?;

        let t = output.table().ok_or_else(|| {
            StoreError::Malformed(format!("No description returned for table {}", table))
        })?;

        Ok(TableDescription {
            name: t.table_name().unwrap_or(table).to_string(),
            status: t
                .table_status()
                .map(|s| s.as_str().to_string())
                .unwrap_or_else(|| "UNKNOWN".to_string()),
            item_count: t.item_count(),
            creation_date: t
                .creation_date_time()
                .and_then(|d| DateTime::<Utc>::from_timestamp(d.secs(), d.subsec_nanos())),
            key_schema: t.key_schema().iter().map(key_element).collect(),
            attribute_definitions: t
                .attribute_definitions()
                .iter()
                .map(|a| AttributeDefinition {
                    attribute_name: a.attribute_name().to_string(),
                    attribute_type: a.attribute_type().as_str().to_string(),
                })
                .collect(),
            global_secondary_indexes: t
                .global_secondary_indexes()
                .iter()
                .map(|index| IndexDescription {
                    index_name: index.index_name().unwrap_or_default().to_string(),
                    key_schema: index.key_schema().iter().map(key_element).collect(),
                })
                .collect(),
            local_secondary_indexes: t
                .local_secondary_indexes()
                .iter()
                .map(|index| IndexDescription {
                    index_name: index.index_name().unwrap_or_default().to_string(),
                    key_schema: index.key_schema().iter().map(key_element).collect(),
                })
                .collect(),
        })
    }

    async fn list_tables(&self) -> StoreResult<Vec<String>> {
        let mut names = Vec::new();
        let mut start: Option<String> = None;

        loop {
            let output = self
                .client
                .list_tables()
                .set_exclusive_start_table_name(start.take())
                .send()
                .await
                .map_err(classify)?;

            names.extend(output.table_names().iter().cloned());
            match output.last_evaluated_table_name() {
                Some(last) => start = Some(last.to_string()),
                None => break,
            }
        }

        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_conversion_keeps_supported_types() {
        let mut item = Item::new();
        item.insert("atom_id".to_string(), AttrValue::string("a-1"));
        item.insert("review_count".to_string(), AttrValue::number(3));
        item.insert("tags".to_string(), AttrValue::Ss(vec!["Math".to_string()]));

        let dynamo = to_dynamo_item(item.clone());
        assert_eq!(dynamo["review_count"], AttributeValue::N("3".to_string()));
        assert_eq!(from_dynamo_item(&dynamo), item);
    }

    #[test]
    fn test_unsupported_attributes_are_dropped() {
        let mut dynamo = HashMap::new();
        dynamo.insert("NoteId".to_string(), AttributeValue::S("note-1".to_string()));
        dynamo.insert("Extra".to_string(), AttributeValue::Null(true));

        let item = from_dynamo_item(&dynamo);
        assert_eq!(item.len(), 1);
        assert!(item.contains_key("NoteId"));
    }
}
