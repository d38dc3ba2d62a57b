//! prp-client: HTTP + JSON implementation of the plan service contract.

use std::time::Duration;

use async_trait::async_trait;
use prp_core::{
    CalculatedPlan, GoalQuote, GoalQuoteRequest, PlanService, Profile, SaveAck, SavePlanRequest,
    SavedPlan, SchemeRates, ServiceError,
};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// Talks to the planning backend under `<base_url>/api/...`.
#[derive(Debug, Clone)]
pub struct HttpPlanService {
    base_url: Url,
    http: Client,
}

impl HttpPlanService {
    /// `timeout` of `None` means requests wait as long as the server takes.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ServiceError> {
        let base_url = Url::parse(base_url).map_err(|e| ServiceError::Transport {
            call: "client",
            reason: format!("invalid base url '{base_url}': {e}"),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::Transport {
                call: "client",
                reason: format!("base url '{base_url}' cannot carry a path"),
            });
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("prp-client/", env!("CARGO_PKG_VERSION")));
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let http = builder.build().map_err(|e| ServiceError::Transport {
            call: "client",
            reason: e.to_string(),
        })?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `<base>/api/<segments...>`, each segment percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    async fn send<T: DeserializeOwned>(
        &self,
        call: &'static str,
        request: RequestBuilder,
    ) -> Result<T, ServiceError> {
        let resp = request.send().await.map_err(|e| {
            warn!(call, error = %e, "request failed");
            ServiceError::Transport {
                call,
                reason: e.to_string(),
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            warn!(call, %status, "service returned an error status");
            return Err(ServiceError::Status {
                call,
                status: status.as_u16(),
            });
        }

        let out = resp.json::<T>().await.map_err(|e| ServiceError::Decode {
            call,
            reason: e.to_string(),
        })?;
        debug!(call, "response decoded");
        Ok(out)
    }
}

#[async_trait]
impl PlanService for HttpPlanService {
    async fn calculate_plan(&self, profile: &Profile) -> Result<CalculatedPlan, ServiceError> {
        info!(age = profile.age, "POST calculate-plan");
        let url = self.endpoint(&["calculate-plan"]);
        self.send("calculate-plan", self.http.post(url).json(profile))
            .await
    }

    async fn calculate_goal(&self, request: GoalQuoteRequest) -> Result<GoalQuote, ServiceError> {
        info!(years = request.years, "POST calculate-goal");
        let url = self.endpoint(&["calculate-goal"]);
        self.send("calculate-goal", self.http.post(url).json(&request))
            .await
    }

    async fn save_plan(&self, request: &SavePlanRequest) -> Result<SaveAck, ServiceError> {
        info!(user_id = %request.user_id, "POST plans");
        let url = self.endpoint(&["plans"]);
        self.send("plans", self.http.post(url).json(request)).await
    }

    async fn user_plans(&self, user_id: &str) -> Result<Vec<SavedPlan>, ServiceError> {
        let url = self.endpoint(&["plans", user_id]);
        self.send("plans", self.http.get(url)).await
    }

    async fn plan(&self, plan_id: &str) -> Result<SavedPlan, ServiceError> {
        let url = self.endpoint(&["plan", plan_id]);
        self.send("plan", self.http.get(url)).await
    }

    async fn scheme_rates(&self) -> Result<SchemeRates, ServiceError> {
        let url = self.endpoint(&["scheme-rates"]);
        self.send("scheme-rates", self.http.get(url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_and_encodes() {
        let svc = HttpPlanService::new("http://localhost:8001", None).unwrap();
        assert_eq!(
            svc.endpoint(&["calculate-plan"]).as_str(),
            "http://localhost:8001/api/calculate-plan"
        );
        assert_eq!(
            svc.endpoint(&["plans", "user 1/x"]).as_str(),
            "http://localhost:8001/api/plans/user%201%2Fx"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let svc = HttpPlanService::new("https://example.com/prp/", None).unwrap();
        assert_eq!(svc.base_url().path(), "/prp/");
        assert_eq!(
            svc.endpoint(&["scheme-rates"]).as_str(),
            "https://example.com/prp/api/scheme-rates"
        );
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let err = HttpPlanService::new("not a url", None).unwrap_err();
        assert_eq!(err.call(), "client");
        assert!(HttpPlanService::new("mailto:x@example.com", None).is_err());
    }
}
