use crate::domain::model::{Author, Comment, Employee, Post};
use crate::domain::ports::{ConfigProvider, DirectoryApi};
use crate::utils::error::{DirectoryError, Result};
use crate::utils::validation::validate_id;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Path template of one remote resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Employees,
    Employee(u64),
    EmployeePosts(u64),
    PostComments(u64),
}

impl Endpoint {
    fn path(&self) -> String {
        match self {
            Self::Employees => "users".to_string(),
            Self::Employee(id) => format!("users/{}", id),
            Self::EmployeePosts(_) => "posts".to_string(),
            Self::PostComments(_) => "comments".to_string(),
        }
    }

    fn query(&self) -> Option<(&'static str, u64)> {
        match self {
            Self::EmployeePosts(id) => Some(("userId", *id)),
            Self::PostComments(id) => Some(("postId", *id)),
            Self::Employees | Self::Employee(_) => None,
        }
    }

    pub fn url(&self, base: &Url) -> Result<Url> {
        let mut url = base.join(&self.path()).map_err(|e| DirectoryError::InvalidConfigValue {
            field: "api_base_url".to_string(),
            value: base.to_string(),
            reason: format!("Cannot build request URL: {}", e),
        })?;
        if let Some((key, id)) = self.query() {
            url.query_pairs_mut().append_pair(key, &id.to_string());
        }
        Ok(url)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Employees => write!(f, "employees"),
            Self::Employee(id) => write!(f, "employee {}", id),
            Self::EmployeePosts(id) => write!(f, "posts of employee {}", id),
            Self::PostComments(id) => write!(f, "comments of post {}", id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpDirectoryApi {
    client: Client,
    base_url: Url,
}

impl HttpDirectoryApi {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::with_timeout(
            config.api_base_url(),
            Duration::from_secs(config.timeout_seconds()),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET one endpoint and decode its JSON body into `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T> {
        match self.fetch(endpoint).await {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!("❌ Error fetching {}: {}", endpoint, e);
                Err(e)
            }
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T> {
        let url = endpoint.url(&self.base_url)?;
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(DirectoryError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| DirectoryError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url).map_err(|e| DirectoryError::InvalidConfigValue {
        field: "api_base_url".to_string(),
        value: base_url.to_string(),
        reason: format!("Invalid URL format: {}", e),
    })?;

    // join() replaces the last segment unless the base ends with '/'
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[async_trait]
impl DirectoryApi for HttpDirectoryApi {
    async fn get_employees(&self) -> Result<Vec<Employee>> {
        self.get_json(Endpoint::Employees).await
    }

    async fn get_employee(&self, employee_id: u64) -> Result<Author> {
        let id = validate_id("employee_id", employee_id)?;
        self.get_json(Endpoint::Employee(id)).await
    }

    async fn get_employee_posts(&self, employee_id: u64) -> Result<Vec<Post>> {
        let id = validate_id("employee_id", employee_id)?;
        self.get_json(Endpoint::EmployeePosts(id)).await
    }

    async fn get_post_comments(&self, post_id: u64) -> Result<Vec<Comment>> {
        let id = validate_id("post_id", post_id)?;
        self.get_json(Endpoint::PostComments(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_endpoint_urls() {
        let base = parse_base_url("https://jsonplaceholder.typicode.com").unwrap();
        assert_eq!(
            Endpoint::Employees.url(&base).unwrap().as_str(),
            "https://jsonplaceholder.typicode.com/users"
        );
        assert_eq!(
            Endpoint::Employee(3).url(&base).unwrap().as_str(),
            "https://jsonplaceholder.typicode.com/users/3"
        );
        assert_eq!(
            Endpoint::EmployeePosts(3).url(&base).unwrap().as_str(),
            "https://jsonplaceholder.typicode.com/posts?userId=3"
        );
        assert_eq!(
            Endpoint::PostComments(21).url(&base).unwrap().as_str(),
            "https://jsonplaceholder.typicode.com/comments?postId=21"
        );
    }

    #[test]
    fn test_base_url_with_path_prefix_keeps_prefix() {
        let base = parse_base_url("http://localhost:9000/api").unwrap();
        assert_eq!(
            Endpoint::Employees.url(&base).unwrap().as_str(),
            "http://localhost:9000/api/users"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = HttpDirectoryApi::new("not a url").unwrap_err();
        assert!(err.is_config_error());
    }

    #[tokio::test]
    async fn test_zero_id_is_rejected_without_request() {
        let server = MockServer::start();
        let any_mock = server.mock(|when, then| {
            when.method(GET);
            then.status(200).json_body(serde_json::json!([]));
        });

        let api = HttpDirectoryApi::new(&server.base_url()).unwrap();

        assert!(api.get_employee(0).await.unwrap_err().is_invalid_input());
        assert!(api.get_employee_posts(0).await.unwrap_err().is_invalid_input());
        assert!(api.get_post_comments(0).await.unwrap_err().is_invalid_input());
        any_mock.assert_hits(0);
    }

    #[tokio::test]
    async fn test_get_employees_decodes_records() {
        let server = MockServer::start();
        let users_mock = server.mock(|when, then| {
            when.method(GET).path("/users");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([
                    {"id": 1, "name": "Leanne Graham", "username": "Bret"},
                    {"id": 2, "name": "Ervin Howell"}
                ]));
        });

        let api = HttpDirectoryApi::new(&server.base_url()).unwrap();
        let employees = api.get_employees().await.unwrap();

        users_mock.assert();
        assert_eq!(employees.len(), 2);
        assert_eq!(employees[0].username, "Bret");
        assert_eq!(employees[1].name, "Ervin Howell");
    }

    #[tokio::test]
    async fn test_wrong_shape_is_decode_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/users/1");
            then.status(200).json_body(serde_json::json!({"id": 1}));
        });

        let api = HttpDirectoryApi::new(&server.base_url()).unwrap();
        let err = api.get_employee(1).await.unwrap_err();

        assert!(matches!(err, DirectoryError::Decode { .. }));
    }
}
