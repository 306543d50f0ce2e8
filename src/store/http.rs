//! HTTP document store client.
//!
//! Talks to a remote document-store endpoint over its REST surface. The
//! access key travels in the `authorization` header; query paging uses the
//! `x-continuation` request/response header pair.

use async_trait::async_trait;
use reqwest::{Response, StatusCode, header};
use serde_json::{Value, json};

use super::{CollectionUri, DocumentPage, DocumentStore, DocumentUri, StoreError, StoreResult};

const CONTINUATION_HEADER: &str = "x-continuation";

pub struct HttpDocumentStore {
    client: reqwest::Client,
    endpoint: String,
    auth_key: String,
}

impl HttpDocumentStore {
    pub fn new(endpoint: &str, auth_key: &str) -> StoreResult<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            auth_key: auth_key.to_string(),
        })
    }

    fn url(&self, path: impl std::fmt::Display) -> String {
        format!("{}{}", self.endpoint, path)
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header(header::AUTHORIZATION, &self.auth_key)
    }

    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        resource: &str,
    ) -> StoreResult<Response> {
        let response = builder.send().await?;
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(resource.to_string())),
            StatusCode::CONFLICT => Err(StoreError::Conflict(resource.to_string())),
            StatusCode::BAD_REQUEST => Err(StoreError::BadRequest(resource.to_string())),
            status => Err(StoreError::Unexpected(status.as_u16())),
        }
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn read_database(&self, database: &str) -> StoreResult<()> {
        let path = format!("/dbs/{database}");
        self.send(self.request(reqwest::Method::GET, self.url(&path)), &path)
            .await?;
        Ok(())
    }

    async fn create_database(&self, database: &str) -> StoreResult<()> {
        let path = format!("/dbs/{database}");
        self.send(
            self.request(reqwest::Method::POST, self.url("/dbs"))
                .json(&json!({ "id": database })),
            &path,
        )
        .await?;
        Ok(())
    }

    async fn read_collection(&self, uri: &CollectionUri) -> StoreResult<()> {
        self.send(
            self.request(reqwest::Method::GET, self.url(uri)),
            &uri.to_string(),
        )
        .await?;
        Ok(())
    }

    async fn create_collection(&self, uri: &CollectionUri, throughput: u32) -> StoreResult<()> {
        let colls = format!("/dbs/{}/colls", uri.database);
        self.send(
            self.request(reqwest::Method::POST, self.url(&colls))
                .json(&json!({ "id": uri.collection, "throughput": throughput })),
            &uri.to_string(),
        )
        .await?;
        Ok(())
    }

    async fn read_document(&self, uri: &DocumentUri) -> StoreResult<Value> {
        let response = self
            .send(
                self.request(reqwest::Method::GET, self.url(uri)),
                &uri.to_string(),
            )
            .await?;
        Ok(response.json().await?)
    }

    async fn create_document(&self, uri: &CollectionUri, document: Value) -> StoreResult<Value> {
        let docs = format!("{uri}/docs");
        let response = self
            .send(
                self.request(reqwest::Method::POST, self.url(&docs))
                    .json(&document),
                &uri.to_string(),
            )
            .await?;
        Ok(response.json().await?)
    }

    async fn replace_document(&self, uri: &DocumentUri, document: Value) -> StoreResult<Value> {
        let response = self
            .send(
                self.request(reqwest::Method::PUT, self.url(uri))
                    .json(&document),
                &uri.to_string(),
            )
            .await?;
        Ok(response.json().await?)
    }

    async fn delete_document(&self, uri: &DocumentUri) -> StoreResult<()> {
        self.send(
            self.request(reqwest::Method::DELETE, self.url(uri)),
            &uri.to_string(),
        )
        .await?;
        Ok(())
    }

    async fn query_documents(
        &self,
        uri: &CollectionUri,
        continuation: Option<&str>,
    ) -> StoreResult<DocumentPage> {
        let docs = format!("{uri}/docs");
        let mut builder = self.request(reqwest::Method::GET, self.url(&docs));
        if let Some(token) = continuation {
            builder = builder.header(CONTINUATION_HEADER, token);
        }

        let response = self.send(builder, &uri.to_string()).await?;
        let continuation = response
            .headers()
            .get(CONTINUATION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let documents: Vec<Value> = response.json().await?;

        Ok(DocumentPage {
            documents,
            continuation,
        })
    }
}
