use async_trait::async_trait;
use folio_core::post::TagData;

use crate::collaborators::TagResolver;
use crate::error::HistoryResult;

/// Derives tag records from the values alone.
#[derive(Debug, Clone, Default)]
pub struct BasicTagResolver;

#[async_trait]
impl TagResolver for BasicTagResolver {
    async fn tag_data(&self, values: &[String]) -> HistoryResult<Vec<TagData>> {
        Ok(values.iter().map(|value| TagData::from_value(value)).collect())
    }
}
