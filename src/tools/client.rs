//! HTTP client for the travel data service

use reqwest::Url;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde_json::Value;
use tracing::{debug, instrument};

use super::ToolContext;
use crate::config::TravelApiConfig;
use crate::deadline::with_deadline;
use crate::{Result, TravelPlannerError};

const SERVICE: &str = "travel-api";

pub struct TravelApiClient {
    http: ClientWithMiddleware,
    base_url: String,
}

impl TravelApiClient {
    pub fn new(config: &TravelApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("travel-planner/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TravelPlannerError::config(format!("Failed to create HTTP client: {e}")))?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let http = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` with query `params`; any non-2xx answer is an upstream error.
    #[instrument(skip(self, ctx), fields(session_id = %ctx.session_id))]
    pub async fn get_json(
        &self,
        path: &str,
        params: &[(&str, &str)],
        ctx: &ToolContext,
    ) -> Result<Value> {
        let url = Url::parse_with_params(&format!("{}{}", self.base_url, path), params)
            .map_err(|e| TravelPlannerError::config(format!("Invalid travel API URL: {e}")))?;
        debug!(%url, "Calling travel API");

        let request = self.http.get(url).timeout(ctx.timeout);
        with_deadline(SERVICE, ctx.timeout, &ctx.cancellation, async move {
            let response = request.send().await.map_err(|e| match e {
                reqwest_middleware::Error::Reqwest(err) if err.is_timeout() => {
                    TravelPlannerError::timeout(SERVICE, ctx.timeout)
                }
                other => TravelPlannerError::upstream(SERVICE, other.to_string()),
            })?;

            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                let text = text.chars().take(200).collect::<String>();
                return Err(TravelPlannerError::upstream(
                    SERVICE,
                    format!("HTTP {status}: {text}"),
                ));
            }

            response
                .json::<Value>()
                .await
                .map_err(|e| TravelPlannerError::upstream(SERVICE, format!("invalid JSON: {e}")))
        })
        .await
    }
}
