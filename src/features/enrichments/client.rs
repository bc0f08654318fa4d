use crate::api::{ApiClient, ApiResponse};
use crate::features::enrichments::types::EnrichmentStats;

pub async fn fetch_stats(client: &ApiClient) -> ApiResponse<EnrichmentStats> {
    client.get("/v1/enrichments/stats").await
}
