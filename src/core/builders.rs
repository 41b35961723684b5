//! Builders turn fetched records into new, detached nodes of a [`Document`].
//! They never touch the network and never attach anything to the page.

use crate::domain::model::{Comment, Employee, PostDetails};
use crate::page::document::{Document, NodeId};
use crate::utils::error::Result;
use crate::utils::validation::validate_id;

pub const SHOW_COMMENTS: &str = "Show Comments";
pub const HIDE_COMMENTS: &str = "Hide Comments";
pub const HIDDEN_CLASS: &str = "hide";
pub const POST_ID_KEY: &str = "post-id";
pub const DEFAULT_TEXT: &str = "Select an Employee to display their posts.";

pub fn create_elem_with_text(
    doc: &mut Document,
    tag_name: &str,
    text: &str,
    class_name: Option<&str>,
) -> Result<NodeId> {
    let element = doc.create_element(tag_name);
    doc.set_text_content(element, text)?;
    if let Some(class_name) = class_name.filter(|c| !c.is_empty()) {
        doc.set_attr(element, "class", class_name)?;
    }
    Ok(element)
}

/// One `<option>` per employee: value is the id, label is the name.
pub fn create_select_options(doc: &mut Document, employees: &[Employee]) -> Result<Vec<NodeId>> {
    let mut options = Vec::with_capacity(employees.len());
    for employee in employees {
        let option = create_elem_with_text(doc, "option", &employee.name, None)?;
        doc.set_attr(option, "value", &employee.id.to_string())?;
        options.push(option);
    }
    Ok(options)
}

/// Fragment holding one `<article>` per comment.
pub fn create_comments(doc: &mut Document, comments: &[Comment]) -> Result<NodeId> {
    let fragment = doc.create_fragment();
    for comment in comments {
        let article = doc.create_element("article");
        let h3 = create_elem_with_text(doc, "h3", &comment.name, None)?;
        let body = create_elem_with_text(doc, "p", &comment.body, None)?;
        let email = create_elem_with_text(doc, "p", &format!("From: {}", comment.email), None)?;
        doc.append(article, &[h3, body, email])?;
        doc.append_child(fragment, article)?;
    }
    Ok(fragment)
}

/// Hidden `<section class="comments hide">` tagged with the post id.
pub fn create_comment_section(
    doc: &mut Document,
    post_id: u64,
    comments: &[Comment],
) -> Result<NodeId> {
    let post_id = validate_id("post_id", post_id)?;
    let section = doc.create_element("section");
    doc.set_data(section, POST_ID_KEY, &post_id.to_string())?;
    doc.class_add(section, "comments")?;
    doc.class_add(section, HIDDEN_CLASS)?;
    let fragment = create_comments(doc, comments)?;
    doc.append_child(section, fragment)?;
    Ok(section)
}

pub fn create_post_article(doc: &mut Document, details: &PostDetails) -> Result<NodeId> {
    let post = &details.post;
    let author = &details.author;

    let article = doc.create_element("article");
    let h2 = create_elem_with_text(doc, "h2", &post.title, None)?;
    let body = create_elem_with_text(doc, "p", &post.body, None)?;
    let id = create_elem_with_text(doc, "p", &format!("Post ID: {}", post.id), None)?;
    let byline = create_elem_with_text(doc, "p", &author.byline(), None)?;
    let catch_phrase = create_elem_with_text(doc, "p", &author.company.catch_phrase, None)?;
    let button = create_elem_with_text(doc, "button", SHOW_COMMENTS, None)?;
    doc.set_data(button, POST_ID_KEY, &post.id.to_string())?;
    let section = create_comment_section(doc, post.id, &details.comments)?;

    doc.append(
        article,
        &[h2, body, id, byline, catch_phrase, button, section],
    )?;
    Ok(article)
}

pub fn create_default_text(doc: &mut Document) -> Result<NodeId> {
    create_elem_with_text(doc, "p", DEFAULT_TEXT, Some("default-text"))
}
