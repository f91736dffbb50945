//! [`DataGateway`] over the `welfare-api` HTTP interface.
//!
//! Requests use the API's query conventions (`page`, `page_size`, `column`,
//! `value`, `view`) and decode its `{ data }` and paged envelopes. Status
//! codes map back onto [`GatewayError`]:
//!
//! | Status              | Error                                   |
//! |---------------------|-----------------------------------------|
//! | 404                 | `NotFound` (or `None` / `false`)        |
//! | 400, 422            | `InvalidRequest`                        |
//! | 409                 | `Conflict`                              |
//! | 408, 503, 504       | `Unavailable`                           |
//! | anything else       | `Backend`                               |
//!
//! Connection failures and timeouts are `Unavailable`.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use welfare_core::eligibility::{EligibilityView, EvaluationRow};
use welfare_core::geo::DistrictEligibilitySummary;
use welfare_core::insights::SchemeTally;
use welfare_core::listing::{ColumnFilter, ListQuery, Page};
use welfare_db::gateway::{DataGateway, GatewayError, GatewayResult};
use welfare_db::models::campaign::{Campaign, CampaignCitizen, CampaignCitizenScheme, NewCampaign};
use welfare_db::models::citizen::{Citizen, CitizenProfile};
use welfare_db::models::dashboard::DashboardStats;
use welfare_db::models::eligibility::{CitizenEligibilitySummary, EligibilityEvaluation};
use welfare_db::models::scheme::Scheme;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

// ---------------------------------------------------------------------------
// Wire envelopes
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct PagedEnvelope<T> {
    data: Vec<T>,
    total_count: i64,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct HealthBody {
    db_healthy: bool,
}

#[derive(Deserialize)]
struct PopulateBody {
    added: i64,
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

impl HttpGateway {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let base_url = Url::parse(&config.api_url)
            .map_err(|e| ClientError::Config(format!("Invalid API URL '{}': {e}", config.api_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "API URL '{}' cannot carry a path",
                config.api_url
            )));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects URLs that cannot be a base.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn list_url(&self, segments: &[&str], query: &ListQuery) -> Url {
        let mut url = self.url(segments);
        url.query_pairs_mut()
            .append_pair("page", &query.page.to_string())
            .append_pair("page_size", &query.page_size.to_string());
        if let Some(filter) = &query.filter {
            append_filter(&mut url, filter);
        }
        url
    }

    /// Send a request. A 404 is `Ok(None)`; other failures are errors.
    async fn send(&self, request: RequestBuilder) -> GatewayResult<Option<Response>> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(Some(response));
        }
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };
        Err(status_error(status, message))
    }

    async fn get_data<T: DeserializeOwned>(&self, url: Url) -> GatewayResult<Option<T>> {
        match self.send(self.client.get(url)).await? {
            Some(response) => Ok(Some(decode::<DataEnvelope<T>>(response).await?.data)),
            None => Ok(None),
        }
    }

    async fn get_required<T: DeserializeOwned>(&self, url: Url, entity: &'static str, id: &str) -> GatewayResult<T> {
        self.get_data(url).await?.ok_or_else(|| GatewayError::NotFound {
            entity,
            id: id.to_string(),
        })
    }

    async fn get_page<T: DeserializeOwned>(&self, url: Url) -> GatewayResult<Page<T>> {
        let path = url.path().to_string();
        let response = self
            .send(self.client.get(url))
            .await?
            .ok_or(GatewayError::NotFound { entity: "List", id: path })?;
        let envelope: PagedEnvelope<T> = decode(response).await?;
        Ok(Page {
            rows: envelope.data,
            total_count: envelope.total_count,
        })
    }

    async fn populate(&self, campaign_id: &str) -> GatewayResult<i64> {
        let url = self.url(&["campaigns", campaign_id, "populate"]);
        let response = self
            .send(self.client.post(url))
            .await?
            .ok_or_else(|| campaign_not_found(campaign_id))?;
        Ok(decode::<DataEnvelope<PopulateBody>>(response).await?.data.added)
    }
}

#[async_trait]
impl DataGateway for HttpGateway {
    async fn ping(&self) -> GatewayResult<()> {
        let url = self
            .base_url
            .join("/health")
            .map_err(|e| GatewayError::InvalidRequest(e.to_string()))?;
        let response = self
            .send(self.client.get(url))
            .await?
            .ok_or_else(|| GatewayError::Unavailable("Health endpoint not found".to_string()))?;
        let health: HealthBody = decode(response).await?;
        if !health.db_healthy {
            return Err(GatewayError::Unavailable(
                "Data backend reported unhealthy".to_string(),
            ));
        }
        Ok(())
    }

    async fn list_citizens(&self, query: &ListQuery) -> GatewayResult<Page<Citizen>> {
        self.get_page(self.list_url(&["citizens"], query)).await
    }

    async fn list_schemes(&self, query: &ListQuery) -> GatewayResult<Page<Scheme>> {
        self.get_page(self.list_url(&["schemes"], query)).await
    }

    async fn list_campaigns(&self, query: &ListQuery) -> GatewayResult<Page<Campaign>> {
        self.get_page(self.list_url(&["campaigns"], query)).await
    }

    async fn citizen_eligibility_summary(
        &self,
        query: &ListQuery,
        view: EligibilityView,
    ) -> GatewayResult<Page<CitizenEligibilitySummary>> {
        let mut url = self.list_url(&["eligibility", "summary"], query);
        url.query_pairs_mut().append_pair("view", view.as_str());
        self.get_page(url).await
    }

    async fn citizen_rule_explanations(
        &self,
        citizen_id: &str,
        filter: Option<&ColumnFilter>,
    ) -> GatewayResult<Vec<EvaluationRow>> {
        let mut url = self.url(&["citizens", citizen_id, "rule-explanations"]);
        if let Some(filter) = filter {
            append_filter(&mut url, filter);
        }
        self.get_required(url, "Citizen", citizen_id).await
    }

    async fn citizen_profile(&self, citizen_id: &str) -> GatewayResult<Option<CitizenProfile>> {
        self.get_data(self.url(&["citizens", citizen_id])).await
    }

    async fn district_summaries(&self) -> GatewayResult<Vec<DistrictEligibilitySummary>> {
        self.get_required(self.url(&["districts", "summary"]), "Districts", "summary")
            .await
    }

    async fn dashboard_stats(&self) -> GatewayResult<DashboardStats> {
        self.get_required(self.url(&["dashboard", "stats"]), "Dashboard", "stats")
            .await
    }

    async fn recent_evaluations(&self, limit: i64) -> GatewayResult<Vec<EligibilityEvaluation>> {
        let mut url = self.url(&["dashboard", "recent"]);
        url.query_pairs_mut().append_pair("limit", &limit.to_string());
        self.get_required(url, "Dashboard", "recent").await
    }

    async fn scheme_tallies(&self, eligible: bool) -> GatewayResult<Vec<SchemeTally>> {
        let url = if eligible {
            self.url(&["segments"])
        } else {
            self.url(&["intelligence", "gaps"])
        };
        self.get_required(url, "Tallies", if eligible { "segments" } else { "gaps" })
            .await
    }

    async fn find_campaign(&self, campaign_id: &str) -> GatewayResult<Option<Campaign>> {
        self.get_data(self.url(&["campaigns", campaign_id])).await
    }

    async fn campaign_citizens(&self, campaign_id: &str) -> GatewayResult<Vec<CampaignCitizen>> {
        self.get_required(
            self.url(&["campaigns", campaign_id, "citizens"]),
            "Campaign",
            campaign_id,
        )
        .await
    }

    async fn campaign_citizen_schemes(
        &self,
        campaign_id: &str,
    ) -> GatewayResult<Vec<CampaignCitizenScheme>> {
        self.get_required(
            self.url(&["campaigns", campaign_id, "citizen-schemes"]),
            "Campaign",
            campaign_id,
        )
        .await
    }

    async fn create_campaign(&self, record: &NewCampaign) -> GatewayResult<Campaign> {
        let request = self.client.post(self.url(&["campaigns"])).json(record);
        let response = self.send(request).await?.ok_or_else(|| {
            GatewayError::Backend("Campaign endpoint not found".to_string())
        })?;
        Ok(decode::<DataEnvelope<Campaign>>(response).await?.data)
    }

    async fn delete_campaign(&self, campaign_id: &str) -> GatewayResult<bool> {
        let request = self.client.delete(self.url(&["campaigns", campaign_id]));
        Ok(self.send(request).await?.is_some())
    }

    async fn populate_geography_campaign(&self, campaign_id: &str) -> GatewayResult<i64> {
        self.populate(campaign_id).await
    }

    async fn populate_scheme_campaign(&self, campaign_id: &str) -> GatewayResult<i64> {
        self.populate(campaign_id).await
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn append_filter(url: &mut Url, filter: &ColumnFilter) {
    url.query_pairs_mut()
        .append_pair("column", filter.column)
        .append_pair("value", &filter.value.to_param());
}

async fn decode<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| GatewayError::Backend(format!("Malformed response: {e}")))
}

fn transport_error(err: reqwest::Error) -> GatewayError {
    tracing::warn!(error = %err, "Welfare API request failed");
    if err.is_decode() {
        GatewayError::Backend(err.to_string())
    } else {
        GatewayError::Unavailable(err.to_string())
    }
}

fn status_error(status: StatusCode, message: String) -> GatewayError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            GatewayError::InvalidRequest(message)
        }
        StatusCode::CONFLICT => GatewayError::Conflict(message),
        StatusCode::REQUEST_TIMEOUT
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => GatewayError::Unavailable(message),
        _ => {
            tracing::error!(%status, error = %message, "Welfare API error");
            GatewayError::Backend(message)
        }
    }
}

fn campaign_not_found(campaign_id: &str) -> GatewayError {
    GatewayError::NotFound {
        entity: "Campaign",
        id: campaign_id.to_string(),
    }
}
