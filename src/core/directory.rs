use crate::core::builders::{
    create_default_text, create_post_article, create_select_options, HIDDEN_CLASS, HIDE_COMMENTS,
    POST_ID_KEY, SHOW_COMMENTS,
};
use crate::core::fanout::fetch_post_details;
use crate::domain::model::{Employee, Post};
use crate::domain::ports::DirectoryApi;
use crate::page::document::{Document, NodeId, SELECT_MENU_ID};
use crate::page::events::{Event, EventKind, Listener};
use crate::utils::error::{DirectoryError, Result};
use crate::utils::validation::validate_id;
use std::sync::Arc;

pub const DEFAULT_CONCURRENT_REQUESTS: usize = 5;

/// Employee shown when the selector holds no usable id.
const FALLBACK_EMPLOYEE_ID: u64 = 1;

/// Reads the leading decimal digits of a selector value, so `"3abc"` is 3.
fn leading_id(value: &str) -> Option<u64> {
    let value = value.trim_start();
    let value = value.strip_prefix('+').unwrap_or(value);
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value[..end].parse().ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSummary {
    pub listeners_removed: Vec<NodeId>,
    pub main: NodeId,
    pub rendered: Vec<NodeId>,
    pub listeners_bound: Vec<NodeId>,
}

/// What happened when an event was dispatched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub ran: usize,
    pub failed: usize,
}

impl DispatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.failed == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSummary {
    pub employee_id: u64,
    pub posts: Vec<Post>,
    pub refresh: RefreshSummary,
}

/// Drives one page: owns the document, fetches through the injected API and
/// rebuilds `<main>` whenever the employee selection changes.
pub struct Directory<A: DirectoryApi + ?Sized> {
    api: Arc<A>,
    document: Document,
    concurrent_requests: usize,
}

impl<A: DirectoryApi + ?Sized + 'static> Directory<A> {
    pub fn new(api: Arc<A>, document: Document) -> Self {
        Self {
            api,
            document,
            concurrent_requests: DEFAULT_CONCURRENT_REQUESTS,
        }
    }

    pub fn with_concurrency(mut self, concurrent_requests: usize) -> Self {
        self.concurrent_requests = concurrent_requests.max(1);
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn select_menu(&self) -> Result<NodeId> {
        self.document
            .get_element_by_id(SELECT_MENU_ID)
            .ok_or_else(|| DirectoryError::element_not_found(format!("#{}", SELECT_MENU_ID)))
    }

    pub fn main(&self) -> Result<NodeId> {
        self.document
            .first_by_tag("main")
            .ok_or_else(|| DirectoryError::element_not_found("main"))
    }

    /// Loads the page and binds the selector's change listener. The listener
    /// is bound even when the employee list could not be loaded.
    pub async fn init_app(&mut self) -> Result<Vec<Employee>> {
        let loaded = self.init_page().await;
        let select = self.select_menu()?;
        self.document
            .add_event_listener(select, EventKind::Change, Listener::SelectChange)?;
        loaded
    }

    pub async fn init_page(&mut self) -> Result<Vec<Employee>> {
        let employees = self.api.get_employees().await.inspect_err(|e| {
            tracing::error!("❌ Error initializing page: {}", e);
        })?;
        self.populate_select_menu(&employees)?;
        tracing::info!("📋 Loaded {} employees", employees.len());
        Ok(employees)
    }

    pub fn populate_select_menu(&mut self, employees: &[Employee]) -> Result<NodeId> {
        let select = self.select_menu()?;
        let options = create_select_options(&mut self.document, employees)?;
        self.document.append(select, &options)?;
        Ok(select)
    }

    /// Post articles for `posts`, collected in a fragment.
    pub async fn create_posts(&mut self, posts: &[Post]) -> Result<NodeId> {
        let details = fetch_post_details(Arc::clone(&self.api), posts, self.concurrent_requests)
            .await
            .inspect_err(|e| tracing::error!("❌ Error creating posts: {}", e))?;

        let fragment = self.document.create_fragment();
        for detail in &details {
            let article = create_post_article(&mut self.document, detail)?;
            self.document.append_child(fragment, article)?;
        }
        Ok(fragment)
    }

    /// Appends the posts (or the placeholder when there are none) to `<main>`
    /// and returns the inserted top-level elements.
    pub async fn display_posts(&mut self, posts: &[Post]) -> Result<Vec<NodeId>> {
        let main = self.main()?;

        if posts.is_empty() {
            let placeholder = create_default_text(&mut self.document)?;
            self.document.append_child(main, placeholder)?;
            return Ok(vec![placeholder]);
        }

        let fragment = self.create_posts(posts).await?;
        let inserted = self.document.element_children(fragment);
        self.document.append_child(main, fragment)?;
        Ok(inserted)
    }

    /// Tears `<main>` down and renders `posts` into it.
    pub async fn refresh_posts(&mut self, posts: &[Post]) -> Result<RefreshSummary> {
        let listeners_removed = self.remove_button_listeners()?;
        let main = self.main()?;
        self.document.delete_child_elements(main)?;
        let rendered = self.display_posts(posts).await.inspect_err(|e| {
            tracing::error!("❌ Error refreshing posts: {}", e);
        })?;
        let listeners_bound = self.add_button_listeners()?;

        Ok(RefreshSummary {
            listeners_removed,
            main,
            rendered,
            listeners_bound,
        })
    }

    fn main_buttons(&self) -> Result<Vec<NodeId>> {
        let main = self.main()?;
        Ok(self.document.descendants_by_tag(main, "button"))
    }

    fn post_id_of(&self, node: NodeId) -> Option<u64> {
        self.document
            .data(node, POST_ID_KEY)
            .and_then(|id| id.parse::<u64>().ok())
            .filter(|id| *id != 0)
    }

    /// Binds one toggle listener per post button under `<main>`.
    pub fn add_button_listeners(&mut self) -> Result<Vec<NodeId>> {
        let buttons = self.main_buttons()?;
        if buttons.is_empty() {
            tracing::warn!("No buttons found inside <main>.");
            return Ok(buttons);
        }

        for button in &buttons {
            if let Some(post_id) = self.post_id_of(*button) {
                self.document.add_event_listener(
                    *button,
                    EventKind::Click,
                    Listener::ToggleComments { post_id },
                )?;
            }
        }
        Ok(buttons)
    }

    pub fn remove_button_listeners(&mut self) -> Result<Vec<NodeId>> {
        let buttons = self.main_buttons()?;
        for button in &buttons {
            if let Some(post_id) = self.post_id_of(*button) {
                self.document.remove_event_listener(
                    *button,
                    EventKind::Click,
                    &Listener::ToggleComments { post_id },
                );
            }
        }
        Ok(buttons)
    }

    fn find_tagged(&self, tag_name: &str, post_id: u64) -> Result<NodeId> {
        let post_id = validate_id("post_id", post_id)?;
        self.document
            .find_by_data(tag_name, POST_ID_KEY, &post_id.to_string())
            .ok_or_else(|| {
                tracing::warn!("No {} found for postId: {}", tag_name, post_id);
                DirectoryError::element_not_found(format!(
                    "{}[data-{}=\"{}\"]",
                    tag_name, POST_ID_KEY, post_id
                ))
            })
    }

    pub fn toggle_comment_section(&mut self, post_id: u64) -> Result<NodeId> {
        let section = self.find_tagged("section", post_id)?;
        self.document.class_toggle(section, HIDDEN_CLASS)?;
        Ok(section)
    }

    pub fn toggle_comment_button(&mut self, post_id: u64) -> Result<NodeId> {
        let button = self.find_tagged("button", post_id)?;
        let label = if self.document.text_content(button) == SHOW_COMMENTS {
            HIDE_COMMENTS
        } else {
            SHOW_COMMENTS
        };
        self.document.set_text_content(button, label)?;
        Ok(button)
    }

    /// Click handler of a post's button: flips section and label together.
    pub fn toggle_comments(&mut self, event: &Event, post_id: u64) -> Result<(NodeId, NodeId)> {
        if !self.document.is_element(event.target) {
            return Err(DirectoryError::invalid_input(
                "event.target",
                "target is not an element",
            ));
        }
        let section = self.toggle_comment_section(post_id)?;
        let button = self.toggle_comment_button(post_id)?;
        Ok((section, button))
    }

    /// Change handler of the selector. The selector is disabled while the
    /// posts load and is enabled again on every exit path.
    pub async fn select_menu_change(&mut self, event: &Event) -> Result<SelectionSummary> {
        let select = event.target;
        if !self.document.is_element(select) {
            return Err(DirectoryError::invalid_input(
                "event.target",
                "target is not an element",
            ));
        }

        self.document.set_disabled(select, true)?;
        let outcome = self.load_selection(select).await;
        let enabled = self.document.set_disabled(select, false);

        if let Err(e) = &outcome {
            tracing::error!("❌ Error handling select menu change: {}", e);
        }
        enabled?;
        outcome
    }

    async fn load_selection(&mut self, select: NodeId) -> Result<SelectionSummary> {
        let employee_id = self
            .document
            .select_value(select)
            .and_then(|value| leading_id(&value))
            .filter(|id| *id != 0)
            .unwrap_or(FALLBACK_EMPLOYEE_ID);
        tracing::info!("👤 Loading posts for employee {}", employee_id);

        let posts = self.api.get_employee_posts(employee_id).await?;
        let refresh = self.refresh_posts(&posts).await?;
        tracing::info!("✅ Rendered {} posts", posts.len());

        Ok(SelectionSummary {
            employee_id,
            posts,
            refresh,
        })
    }

    /// Runs every listener bound on the target for the event. Handler
    /// failures are logged and counted, not returned.
    pub async fn dispatch(&mut self, event: Event) -> DispatchOutcome {
        let listeners = self.document.event_listeners(event.target, event.kind);
        let mut outcome = DispatchOutcome {
            ran: listeners.len(),
            failed: 0,
        };
        for listener in &listeners {
            let handled = match listener {
                Listener::SelectChange => self.select_menu_change(&event).await.map(|_| ()),
                Listener::ToggleComments { post_id } => {
                    self.toggle_comments(&event, *post_id).map(|_| ())
                }
            };
            if let Err(e) = handled {
                tracing::debug!("{} listener {:?} failed: {}", event.kind, listener, e);
                outcome.failed += 1;
            }
        }
        outcome
    }

    /// Picks `employee_id` in the selector and fires `change` at it.
    pub async fn select_employee(&mut self, employee_id: u64) -> Result<DispatchOutcome> {
        let employee_id = validate_id("employee_id", employee_id)?;
        let select = self.select_menu()?;
        if !self
            .document
            .set_select_value(select, &employee_id.to_string())?
        {
            return Err(DirectoryError::invalid_input(
                "employee_id",
                format!("employee {} is not in the selector", employee_id),
            ));
        }
        Ok(self.dispatch(Event::change(select)).await)
    }

    /// Fires `click` at the comment button of `post_id`.
    pub async fn click_toggle(&mut self, post_id: u64) -> Result<DispatchOutcome> {
        let button = self.find_tagged("button", post_id)?;
        Ok(self.dispatch(Event::click(button)).await)
    }
}
