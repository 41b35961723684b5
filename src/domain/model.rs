use serde::{Deserialize, Serialize};

/// Entry of the employee selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    #[serde(rename = "userId")]
    pub author_id: u64,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(rename = "postId", default)]
    pub post_id: Option<u64>,
    pub name: String,
    pub email: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    #[serde(rename = "catchPhrase")]
    pub catch_phrase: String,
    #[serde(default)]
    pub bs: String,
}

/// Employee record as fetched per post, with the company used for the byline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: u64,
    pub name: String,
    pub company: Company,
}

impl Author {
    pub fn byline(&self) -> String {
        format!("Author: {} with {}", self.name, self.company.name)
    }
}

/// A post joined with everything needed to render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDetails {
    pub post: Post,
    pub author: Author,
    pub comments: Vec<Comment>,
}
