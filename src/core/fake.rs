//! In-memory [`DirectoryApi`] for unit tests.

use crate::domain::model::{Author, Comment, Company, Employee, Post};
use crate::domain::ports::DirectoryApi;
use crate::utils::error::{DirectoryError, Result};
use crate::utils::validation::validate_id;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Default)]
pub struct FakeApi {
    /// `None` answers the employee list with HTTP 500.
    pub employees: Option<Vec<Employee>>,
    pub authors: HashMap<u64, Author>,
    pub posts: HashMap<u64, Vec<Post>>,
    pub comments: HashMap<u64, Vec<Comment>>,
    pub failing_comments: HashSet<u64>,
    pub failing_posts: HashSet<u64>,
    pub author_delays: HashMap<u64, Duration>,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub author_calls: AtomicUsize,
}

fn status(code: u16, path: String) -> DirectoryError {
    DirectoryError::Status {
        status: code,
        url: format!("http://fake{}", path),
    }
}

pub fn employee(id: u64, name: &str) -> Employee {
    Employee {
        id,
        name: name.to_string(),
        username: String::new(),
        email: String::new(),
    }
}

pub fn author(id: u64, name: &str, company: &str, catch_phrase: &str) -> Author {
    Author {
        id,
        name: name.to_string(),
        company: Company {
            name: company.to_string(),
            catch_phrase: catch_phrase.to_string(),
            bs: String::new(),
        },
    }
}

pub fn post(id: u64, author_id: u64, title: &str) -> Post {
    Post {
        id,
        author_id,
        title: title.to_string(),
        body: format!("{} body", title),
    }
}

pub fn comment(post_id: u64, name: &str) -> Comment {
    Comment {
        id: None,
        post_id: Some(post_id),
        name: name.to_string(),
        email: format!("{}@example.com", name),
        body: format!("{} wrote this", name),
    }
}

impl FakeApi {
    /// Employee 1 ("A") with post 10, authored by "X" of "Y" / "Z".
    pub fn single_post() -> Self {
        let mut api = Self {
            employees: Some(vec![employee(1, "A")]),
            ..Self::default()
        };
        api.authors.insert(1, author(1, "X", "Y", "Z"));
        api.posts.insert(
            1,
            vec![Post {
                id: 10,
                author_id: 1,
                title: "T".to_string(),
                body: "B".to_string(),
            }],
        );
        api
    }
}

#[async_trait]
impl DirectoryApi for FakeApi {
    async fn get_employees(&self) -> Result<Vec<Employee>> {
        self.employees
            .clone()
            .ok_or_else(|| status(500, "/users".to_string()))
    }

    async fn get_employee(&self, employee_id: u64) -> Result<Author> {
        let id = validate_id("employee_id", employee_id)?;
        self.author_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self
            .author_delays
            .get(&id)
            .copied()
            .unwrap_or(Duration::from_millis(1));
        tokio::time::sleep(delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.authors
            .get(&id)
            .cloned()
            .ok_or_else(|| status(404, format!("/users/{}", id)))
    }

    async fn get_employee_posts(&self, employee_id: u64) -> Result<Vec<Post>> {
        let id = validate_id("employee_id", employee_id)?;
        if self.failing_posts.contains(&id) {
            return Err(status(503, format!("/posts?userId={}", id)));
        }
        Ok(self.posts.get(&id).cloned().unwrap_or_default())
    }

    async fn get_post_comments(&self, post_id: u64) -> Result<Vec<Comment>> {
        let id = validate_id("post_id", post_id)?;
        if self.failing_comments.contains(&id) {
            return Err(status(500, format!("/comments?postId={}", id)));
        }
        Ok(self.comments.get(&id).cloned().unwrap_or_default())
    }
}
