use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::domain::entities::query::{PageResult, Query};
use crate::domain::entities::record::Record;
use crate::usecase::ports::repo::{RepoError, Repository};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub base_url: String,
    pub bearer_token: Option<String>,
    pub timeout: Duration,
}

impl HttpConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bearer_token: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Body of the collection endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaginatedResponse<R> {
    data: Vec<R>,
    total: u64,
}

/// Option endpoints answer either a bare list or `{ "data": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OptionsResponse {
    Flat(Vec<String>),
    Wrapped { data: Vec<String> },
}

impl OptionsResponse {
    fn into_values(self) -> Vec<String> {
        match self {
            OptionsResponse::Flat(values) | OptionsResponse::Wrapped { data: values } => values,
        }
    }
}

/// REST backend for one resource. Success is signalled by the HTTP status
/// alone; response bodies of DELETE are ignored.
pub struct HttpRepository<R: Record> {
    client: Client,
    config: HttpConfig,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> HttpRepository<R> {
    pub fn new(config: HttpConfig) -> Result<Self, RepoError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| RepoError::Network(format!("failed to build http client: {err}")))?;
        Ok(Self {
            client,
            config,
            _record: PhantomData,
        })
    }

    fn collection_url(&self) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            R::RESOURCE
        )
    }

    fn record_url(&self, id: &R::Id) -> String {
        format!("{}/{id}", self.collection_url())
    }

    fn options_url(&self, field: &str) -> String {
        format!("{}/{field}-options", self.collection_url())
    }

    async fn send(&self, request: RequestBuilder, target: &str) -> Result<Response, RepoError> {
        let request = match &self.config.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request
            .send()
            .await
            .map_err(|err| RepoError::Network(format!("request failed: {err}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(RepoError::NotFound {
                resource: R::RESOURCE.to_string(),
                id: target.to_string(),
            });
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .ok()
                .filter(|text| !text.trim().is_empty())
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            return Err(RepoError::Status {
                code: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, RepoError> {
        response
            .json::<T>()
            .await
            .map_err(|err| RepoError::Decode(err.to_string()))
    }
}

pub fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut params = vec![
        ("page".to_string(), query.page.to_string()),
        ("pageSize".to_string(), query.page_size.to_string()),
        ("sortBy".to_string(), query.sort_field.clone()),
        ("sortOrder".to_string(), query.sort_direction.as_str().to_string()),
    ];
    params.extend(
        query
            .active_filters()
            .map(|(field, value)| (field.to_string(), value.to_string())),
    );
    params
}

#[async_trait(?Send)]
impl<R: Record> Repository<R> for HttpRepository<R> {
    async fn list(&self, query: &Query) -> Result<PageResult<R>, RepoError> {
        query.validate()?;
        let request = self
            .client
            .get(self.collection_url())
            .query(&query_params(query));
        let response = self.send(request, R::RESOURCE).await?;
        let body: PaginatedResponse<R> = Self::decode(response).await?;
        Ok(PageResult {
            items: body.data,
            total: body.total,
            page: query.page,
            page_size: query.page_size,
        })
    }

    async fn get(&self, id: &R::Id) -> Result<R, RepoError> {
        let request = self.client.get(self.record_url(id));
        let response = self.send(request, &id.to_string()).await?;
        Self::decode(response).await
    }

    async fn create(&self, payload: R::Payload) -> Result<R, RepoError> {
        let request = self.client.post(self.collection_url()).json(&payload);
        let response = self.send(request, R::RESOURCE).await?;
        Self::decode(response).await
    }

    async fn update(&self, id: &R::Id, payload: R::Payload) -> Result<R, RepoError> {
        let request = self.client.put(self.record_url(id)).json(&payload);
        let response = self.send(request, &id.to_string()).await?;
        Self::decode(response).await
    }

    async fn delete(&self, id: &R::Id) -> Result<(), RepoError> {
        let request = self.client.delete(self.record_url(id));
        self.send(request, &id.to_string()).await?;
        Ok(())
    }

    async fn options(&self, field: &str) -> Result<Vec<String>, RepoError> {
        let request = self.client.get(self.options_url(field));
        let response = self.send(request, field).await?;
        let body: OptionsResponse = Self::decode(response).await?;
        Ok(body.into_values())
    }
}
