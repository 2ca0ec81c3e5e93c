//! HTTP implementation of the Liongard API.
//!
//! Thin wrapper over the Liongard REST endpoints. Construction is cheap and
//! performs no network I/O; every method issues exactly one request and
//! returns the raw JSON payload.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::api::{LiongardApi, MetricEvaluation, NewEnvironment, NewLaunchpoint, PageQuery};
use super::error::{ClientError, ClientResult};

/// Header carrying the Liongard API key.
const API_KEY_HEADER: &str = "X-ROAR-API-KEY";

/// Liongard REST API client.
pub struct LiongardClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl LiongardClient {
    /// Create a client for the given API key and instance.
    ///
    /// `instance` is the instance subdomain (e.g. `acme` for
    /// `acme.app.liongard.com`); a value containing a dot is used as a full
    /// host verbatim.
    pub fn new(api_key: &str, instance: &str) -> ClientResult<Self> {
        let host = if instance.contains('.') {
            instance.to_string()
        } else {
            format!("{instance}.app.liongard.com")
        };

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::construction(e.to_string()))?;

        Ok(Self {
            http,
            base_url: format!("https://{host}/api"),
            api_key: api_key.to_string(),
        })
    }

    /// Base URL this client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json(&self, path: &str, query: &[(String, String)]) -> ClientResult<Value> {
        debug!("GET {}/{}", self.base_url, path);
        let response = self
            .http
            .get(format!("{}/{}", self.base_url, path))
            .header(API_KEY_HEADER, &self.api_key)
            .query(query)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn post_json<B: serde::Serialize>(&self, path: &str, body: &B) -> ClientResult<Value> {
        debug!("POST {}/{}", self.base_url, path);
        let response = self
            .http
            .post(format!("{}/{}", self.base_url, path))
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode(response: reqwest::Response) -> ClientResult<Value> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::api(status.as_u16(), body));
        }
        // Mutating endpoints may answer with an empty body.
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    fn page_params(page: PageQuery) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(p) = page.page {
            params.push(("page".to_string(), p.to_string()));
        }
        if let Some(size) = page.page_size {
            params.push(("pageSize".to_string(), size.to_string()));
        }
        params
    }

    /// Flatten a free-form filter object into query parameters.
    fn filter_params(filters: Option<Value>) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(Value::Object(map)) = filters {
            for (key, value) in map {
                let rendered = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                params.push((key, rendered));
            }
        }
        params
    }

    fn filtered_page_params(page: PageQuery, filters: Option<Value>) -> Vec<(String, String)> {
        let mut params = Self::page_params(page);
        params.extend(Self::filter_params(filters));
        params
    }
}

#[async_trait]
impl LiongardApi for LiongardClient {
    async fn list_environments(&self, page: PageQuery) -> ClientResult<Value> {
        self.get_json("v1/environments", &Self::page_params(page))
            .await
    }

    async fn get_environment(&self, id: u64) -> ClientResult<Value> {
        self.get_json(&format!("v1/environments/{id}"), &[]).await
    }

    async fn create_environment(&self, fields: NewEnvironment) -> ClientResult<Value> {
        self.post_json("v1/environments", &fields).await
    }

    async fn count_environments(&self) -> ClientResult<u64> {
        let value = self.get_json("v1/environments/count", &[]).await?;
        let count = value
            .as_u64()
            .or_else(|| value.get("Data").and_then(Value::as_u64))
            .unwrap_or_default();
        Ok(count)
    }

    async fn get_environment_related(&self, id: u64) -> ClientResult<Value> {
        self.get_json(&format!("v1/environments/{id}/relatedentities"), &[])
            .await
    }

    async fn list_agents(&self, page: PageQuery) -> ClientResult<Value> {
        self.get_json("v1/agents", &Self::page_params(page)).await
    }

    async fn delete_agents(&self, ids: &[u64]) -> ClientResult<()> {
        debug!("DELETE {}/v1/agents", self.base_url);
        let response = self
            .http
            .delete(format!("{}/v1/agents", self.base_url))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&ids)
            .send()
            .await?;
        Self::decode(response).await?;
        Ok(())
    }

    async fn generate_agent_installer(&self) -> ClientResult<Value> {
        self.get_json("v1/agents/installer", &[]).await
    }

    async fn list_inspectors(&self, page: PageQuery) -> ClientResult<Value> {
        self.get_json("v1/inspectors", &Self::page_params(page))
            .await
    }

    async fn list_launchpoints(&self, page: PageQuery) -> ClientResult<Value> {
        self.get_json("v1/launchpoints", &Self::page_params(page))
            .await
    }

    async fn create_launchpoint(&self, fields: NewLaunchpoint) -> ClientResult<Value> {
        self.post_json("v1/launchpoints", &fields).await
    }

    async fn run_launchpoint(&self, id: u64) -> ClientResult<()> {
        self.post_json(&format!("v1/launchpoints/{id}/run"), &Value::Null)
            .await?;
        Ok(())
    }

    async fn list_systems(&self, page: PageQuery) -> ClientResult<Value> {
        self.get_json("v1/systems", &Self::page_params(page)).await
    }

    async fn get_system(&self, id: u64) -> ClientResult<Value> {
        self.get_json(&format!("v1/systems/{id}"), &[]).await
    }

    async fn list_detections(
        &self,
        page: PageQuery,
        filters: Option<Value>,
    ) -> ClientResult<Value> {
        self.get_json("v1/detections", &Self::filtered_page_params(page, filters))
            .await
    }

    async fn list_alerts(&self, page: PageQuery) -> ClientResult<Value> {
        self.get_json("v1/alerts", &Self::page_params(page)).await
    }

    async fn get_alert(&self, id: u64) -> ClientResult<Value> {
        self.get_json(&format!("v1/alerts/{id}"), &[]).await
    }

    async fn list_metrics(&self) -> ClientResult<Value> {
        self.get_json("v2/metrics", &[]).await
    }

    async fn evaluate_metrics(&self, request: MetricEvaluation) -> ClientResult<Value> {
        self.post_json("v2/metrics/evaluate", &request).await
    }

    async fn evaluate_metrics_by_system(&self, request: MetricEvaluation) -> ClientResult<Value> {
        self.post_json("v2/metrics/evaluate/system", &request).await
    }

    async fn list_timeline(&self, page: PageQuery, filters: Option<Value>) -> ClientResult<Value> {
        self.get_json("v1/timeline", &Self::filtered_page_params(page, filters))
            .await
    }

    async fn list_identities(
        &self,
        page: PageQuery,
        filters: Option<Value>,
    ) -> ClientResult<Value> {
        self.get_json("v2/identities", &Self::filtered_page_params(page, filters))
            .await
    }

    async fn get_identity(&self, id: u64) -> ClientResult<Value> {
        self.get_json(&format!("v2/identities/{id}"), &[]).await
    }

    async fn list_devices(&self, page: PageQuery, filters: Option<Value>) -> ClientResult<Value> {
        self.get_json("v2/devices", &Self::filtered_page_params(page, filters))
            .await
    }

    async fn get_device(&self, id: u64) -> ClientResult<Value> {
        self.get_json(&format!("v2/devices/{id}"), &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_base_url_from_subdomain() {
        let client = LiongardClient::new("key", "acme").unwrap();
        assert_eq!(client.base_url(), "https://acme.app.liongard.com/api");
    }

    #[test]
    fn test_base_url_from_full_host() {
        let client = LiongardClient::new("key", "acme.us2.liongard.com").unwrap();
        assert_eq!(client.base_url(), "https://acme.us2.liongard.com/api");
    }

    #[test]
    fn test_page_params_absent() {
        assert!(LiongardClient::page_params(PageQuery::default()).is_empty());
    }

    #[test]
    fn test_page_params_present() {
        let params = LiongardClient::page_params(PageQuery::new(Some(3), Some(10)));
        assert_eq!(
            params,
            vec![
                ("page".to_string(), "3".to_string()),
                ("pageSize".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_filter_params_flattened() {
        let filters = json!({"environmentId": 42, "severity": "high"});
        let params = LiongardClient::filter_params(Some(filters));
        assert!(params.contains(&("environmentId".to_string(), "42".to_string())));
        assert!(params.contains(&("severity".to_string(), "high".to_string())));
    }

    #[test]
    fn test_filter_params_none() {
        assert!(LiongardClient::filter_params(None).is_empty());
    }
}
