use super::ConfluenceApi;
use crate::config::CflConfig;
use crate::error::{CflError, Result};
use crate::model::{Attachment, NewPage, Page, PageUpdate, SearchHit, Space};
use crate::pagination::ResultPage;
use chrono::{DateTime, Utc};
use log::debug;
use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(30);
const API_V2: &str = "/wiki/api/v2";
const API_V1: &str = "/wiki/rest/api";

/// Blocking REST client for a single Confluence Cloud site.
pub struct HttpClient {
    client: Client,
    base_url: String,
    email: String,
    api_token: String,
}

#[derive(Debug, Default, Deserialize)]
struct Links {
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    results: Vec<T>,
    #[serde(rename = "_links", default)]
    links: Links,
}

impl<T> From<ListResponse<T>> for ResultPage<T> {
    fn from(resp: ListResponse<T>) -> Self {
        ResultPage::new(resp.results).with_cursor(resp.links.next)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    results: Vec<SearchResult>,
    total_size: Option<u64>,
    #[serde(rename = "_links", default)]
    links: Links,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResult {
    content: Option<SearchContent>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    excerpt: String,
    #[serde(default)]
    url: String,
    last_modified: Option<String>,
    result_global_container: Option<Container>,
}

#[derive(Debug, Deserialize)]
struct SearchContent {
    id: String,
    #[serde(rename = "type")]
    content_type: String,
}

#[derive(Debug, Deserialize)]
struct Container {
    title: String,
}

impl From<SearchResult> for SearchHit {
    fn from(r: SearchResult) -> Self {
        let (id, content_type) = r
            .content
            .map(|c| (c.id, c.content_type))
            .unwrap_or_default();
        SearchHit {
            id,
            content_type,
            title: r.title,
            space: r.result_global_container.map(|c| c.title),
            excerpt: r.excerpt,
            url: r.url,
            last_modified: r
                .last_modified
                .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                .map(|d| d.with_timezone(&Utc)),
        }
    }
}

/// Attachment as returned by the v1 upload endpoint.
#[derive(Debug, Deserialize)]
struct UploadedAttachment {
    id: String,
    title: String,
    #[serde(default)]
    extensions: UploadExtensions,
    #[serde(rename = "_links", default)]
    links: UploadLinks,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadExtensions {
    #[serde(default)]
    media_type: String,
    #[serde(default)]
    file_size: u64,
}

#[derive(Debug, Default, Deserialize)]
struct UploadLinks {
    download: Option<String>,
}

impl HttpClient {
    pub fn new(config: &CflConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(TIMEOUT)
            .user_agent(concat!("cfl/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.clone(),
            email: config.email.clone(),
            api_token: config.api_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .basic_auth(&self.email, Some(&self.api_token))
            .header("Accept", "application/json")
    }

    fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let request = self.authed(builder).build()?;
        debug!("{} {}", request.method(), request.url());

        let response = self.client.execute(request)?;
        let status = response.status();
        debug!("-> {}", status);

        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().unwrap_or_default();
            Err(CflError::Upstream {
                status: status.as_u16(),
                message: error_message(&body, status.canonical_reason()),
            })
        }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let response = self.send(self.client.get(self.url(path)).query(query))?;
        Ok(response.json()?)
    }

    fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<ResultPage<T>> {
        let resp: ListResponse<T> = self.get_json(path, query)?;
        Ok(resp.into())
    }
}

/// Pulls a human readable message out of a Confluence error body.
///
/// v2 endpoints answer `{"errors": [{"title": ..., "detail": ...}]}`, v1 answers
/// `{"message": ...}`. Anything else falls back to the HTTP reason phrase.
fn error_message(body: &str, reason: Option<&str>) -> String {
    let fallback = || reason.unwrap_or("request failed").to_string();
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return fallback();
    };

    if let Some(msg) = value.get("message").and_then(|m| m.as_str()) {
        return msg.to_string();
    }
    if let Some(first) = value
        .get("errors")
        .and_then(|e| e.as_array())
        .and_then(|e| e.first())
    {
        let title = first.get("title").and_then(|t| t.as_str());
        let detail = first.get("detail").and_then(|d| d.as_str());
        return match (title, detail) {
            (Some(t), Some(d)) => format!("{} ({})", t, d),
            (Some(t), None) => t.to_string(),
            (None, Some(d)) => d.to_string(),
            (None, None) => fallback(),
        };
    }
    fallback()
}

impl ConfluenceApi for HttpClient {
    fn search(&self, cql: &str, limit: u32) -> Result<ResultPage<SearchHit>> {
        let resp: SearchResponse = self.get_json(
            &format!("{}/search", API_V1),
            &[("cql", cql.to_string()), ("limit", limit.to_string())],
        )?;
        debug!(
            "search returned {} results (totalSize {:?})",
            resp.results.len(),
            resp.total_size
        );
        Ok(
            ResultPage::new(resp.results.into_iter().map(SearchHit::from).collect())
                .with_total(resp.total_size)
                .with_cursor(resp.links.next),
        )
    }

    fn list_spaces(&self, limit: u32) -> Result<ResultPage<Space>> {
        self.list(
            &format!("{}/spaces", API_V2),
            &[("limit", limit.to_string())],
        )
    }

    fn get_space(&self, key: &str) -> Result<Space> {
        let page: ResultPage<Space> = self.list(
            &format!("{}/spaces", API_V2),
            &[("keys", key.to_string()), ("limit", "1".to_string())],
        )?;
        page.into_items()
            .into_iter()
            .next()
            .ok_or_else(|| CflError::NotFound(format!("space '{}'", key)))
    }

    fn list_pages(&self, space_id: &str, limit: u32) -> Result<ResultPage<Page>> {
        self.list(
            &format!("{}/spaces/{}/pages", API_V2, space_id),
            &[("limit", limit.to_string()), ("status", "current".to_string())],
        )
    }

    fn get_page(&self, id: &str) -> Result<Page> {
        self.get_json(
            &format!("{}/pages/{}", API_V2, id),
            &[("body-format", "storage".to_string())],
        )
    }

    fn create_page(&self, page: &NewPage) -> Result<Page> {
        let mut payload = json!({
            "spaceId": page.space_id,
            "status": "current",
            "title": page.title,
            "body": { "representation": "storage", "value": page.body },
        });
        if let Some(parent) = &page.parent_id {
            payload["parentId"] = json!(parent);
        }

        let response = self.send(
            self.client
                .post(self.url(&format!("{}/pages", API_V2)))
                .json(&payload),
        )?;
        Ok(response.json()?)
    }

    fn update_page(&self, update: &PageUpdate) -> Result<Page> {
        let payload = json!({
            "id": update.id,
            "status": "current",
            "title": update.title,
            "body": { "representation": "storage", "value": update.body },
            "version": { "number": update.version },
        });

        let response = self.send(
            self.client
                .put(self.url(&format!("{}/pages/{}", API_V2, update.id)))
                .json(&payload),
        )?;
        Ok(response.json()?)
    }

    fn delete_page(&self, id: &str) -> Result<()> {
        self.send(
            self.client
                .delete(self.url(&format!("{}/pages/{}", API_V2, id))),
        )?;
        Ok(())
    }

    fn list_attachments(&self, page_id: &str, limit: u32) -> Result<ResultPage<Attachment>> {
        self.list(
            &format!("{}/pages/{}/attachments", API_V2, page_id),
            &[("limit", limit.to_string())],
        )
    }

    fn get_attachment(&self, id: &str) -> Result<Attachment> {
        self.get_json(&format!("{}/attachments/{}", API_V2, id), &[])
    }

    fn upload_attachment(&self, page_id: &str, file: &Path) -> Result<Attachment> {
        let form = multipart::Form::new().file("file", file)?;
        let response = self.send(
            self.client
                .post(self.url(&format!("{}/content/{}/child/attachment", API_V1, page_id)))
                .header("X-Atlassian-Token", "nocheck")
                .multipart(form),
        )?;

        let uploaded: ListResponse<UploadedAttachment> = response.json()?;
        let first = uploaded
            .results
            .into_iter()
            .next()
            .ok_or_else(|| CflError::Upstream {
                status: 200,
                message: "upload response contained no attachment".into(),
            })?;

        Ok(Attachment {
            id: first.id,
            title: first.title,
            media_type: first.extensions.media_type,
            file_size: first.extensions.file_size,
            download_link: first.links.download,
            page_id: Some(page_id.to_string()),
        })
    }

    fn download_attachment(&self, attachment: &Attachment) -> Result<Vec<u8>> {
        let link = attachment.download_link.as_deref().ok_or_else(|| {
            CflError::NotFound(format!("download link for attachment {}", attachment.id))
        })?;
        let response = self.send(self.client.get(self.url(&format!("/wiki{}", link))))?;
        Ok(response.bytes()?.to_vec())
    }

    fn delete_attachment(&self, id: &str) -> Result<()> {
        self.send(
            self.client
                .delete(self.url(&format!("{}/attachments/{}", API_V2, id))),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_reads_v2_errors() {
        let body = r#"{"errors":[{"status":404,"code":"NOT_FOUND","title":"Not Found","detail":null}]}"#;
        assert_eq!(error_message(body, Some("Not Found")), "Not Found");
    }

    #[test]
    fn error_message_reads_v1_message() {
        let body = r#"{"statusCode":400,"message":"Could not parse cql : text ~"}"#;
        assert_eq!(
            error_message(body, Some("Bad Request")),
            "Could not parse cql : text ~"
        );
    }

    #[test]
    fn error_message_falls_back_to_reason() {
        assert_eq!(error_message("<html>", Some("Bad Gateway")), "Bad Gateway");
    }

    #[test]
    fn search_response_keeps_total_and_container() {
        let json = r#"{
            "results": [{
                "content": {"id": "123", "type": "page", "title": "Deploy"},
                "title": "Deploy",
                "excerpt": "how to deploy k8s",
                "url": "/spaces/DEV/pages/123/Deploy",
                "lastModified": "2024-03-02T12:00:00.000Z",
                "resultGlobalContainer": {"title": "Development", "displayUrl": "/spaces/DEV"}
            }],
            "start": 0, "limit": 1, "size": 1, "totalSize": 40,
            "_links": {"next": "/rest/api/search?next=true&cursor=xyz"}
        }"#;
        let resp: SearchResponse = serde_json::from_str(json).unwrap();
        let page = ResultPage::new(resp.results.into_iter().map(SearchHit::from).collect())
            .with_total(resp.total_size)
            .with_cursor(resp.links.next);

        assert!(page.has_more());
        let hit = &page.items()[0];
        assert_eq!(hit.id, "123");
        assert_eq!(hit.content_type, "page");
        assert_eq!(hit.space.as_deref(), Some("Development"));
        assert!(hit.last_modified.is_some());
    }

    #[test]
    fn list_response_without_links_is_complete() {
        let resp: ListResponse<Space> = serde_json::from_str(
            r#"{"results": [{"id": "1", "key": "DEV", "name": "Development", "type": "global", "status": "current"}]}"#,
        )
        .unwrap();
        let page: ResultPage<Space> = resp.into();
        assert_eq!(page.len(), 1);
        assert!(!page.has_more());
    }

    #[test]
    fn new_requires_complete_config() {
        assert!(HttpClient::new(&CflConfig::default()).is_err());
    }
}
