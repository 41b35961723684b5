use crate::page::events::{EventKind, EventListeners, Listener};
use crate::utils::error::{DirectoryError, Result};

pub const SELECT_MENU_ID: &str = "selectMenu";

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeKind {
    Document,
    Fragment,
    Element(Element),
    Text(String),
    // released slot, waiting on the free list
    Free,
}

#[derive(Debug, Clone)]
struct Element {
    tag_name: String,
    // insertion order is kept so serialized markup is stable
    attrs: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// In-memory page. Nodes live in an arena and are addressed by [`NodeId`].
///
/// Subtrees discarded by [`Document::delete_child_elements`],
/// [`Document::set_text_content`] or an emptied fragment are released and
/// their slots are handed out again, so a [`NodeId`] into a discarded
/// subtree must not be kept.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    root: NodeId,
    listeners: EventListeners,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
            free: Vec::new(),
            root: NodeId(0),
            listeners: EventListeners::new(),
        }
    }

    /// Host page: a header with the employee selector and an empty `<main>`.
    pub fn with_layout() -> Self {
        let mut doc = Self::new();
        if let Err(e) = doc.build_layout() {
            tracing::error!("❌ Failed to build page layout: {}", e);
        }
        doc
    }

    fn build_layout(&mut self) -> Result<()> {
        let html = self.create_element("html");
        let head = self.create_element("head");
        let meta = self.create_element("meta");
        let title = self.create_element("title");
        let body = self.create_element("body");
        let header = self.create_element("header");
        let h1 = self.create_element("h1");
        let label = self.create_element("label");
        let select = self.create_element("select");
        let main = self.create_element("main");

        self.set_attr(html, "lang", "en")?;
        self.set_attr(meta, "charset", "utf-8")?;
        self.set_text_content(title, "Employee Directory")?;
        self.set_text_content(h1, "Employee Directory")?;
        self.set_attr(label, "for", SELECT_MENU_ID)?;
        self.set_text_content(label, "Employee:")?;
        self.set_attr(select, "id", SELECT_MENU_ID)?;
        self.set_attr(select, "name", SELECT_MENU_ID)?;
        self.append(head, &[meta, title])?;
        self.append(header, &[h1, label, select])?;
        self.append(body, &[header, main])?;
        self.append(html, &[head, body])?;
        self.append_child(self.root, html)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let node = Node {
            parent: None,
            children: Vec::new(),
            kind,
        };
        if let Some(id) = self.free.pop() {
            self.nodes[id.0] = node;
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Frees a detached subtree and the listeners bound inside it.
    /// Returns how many nodes were released.
    pub fn release(&mut self, node_id: NodeId) -> Result<usize> {
        self.node(node_id)?;
        if node_id == self.root || self.parent(node_id).is_some() {
            return Err(DirectoryError::invalid_input(
                "node",
                "only detached nodes can be released",
            ));
        }

        let mut pending = vec![node_id];
        let mut released = 0;
        while let Some(id) = pending.pop() {
            let node = &mut self.nodes[id.0];
            pending.append(&mut node.children);
            node.parent = None;
            node.kind = NodeKind::Free;
            self.listeners.clear(id);
            self.free.push(id);
            released += 1;
        }
        Ok(released)
    }

    /// Live nodes, the document node included.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Slots ever allocated; released slots are reused before this grows.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.alloc(NodeKind::Element(Element {
            tag_name: tag_name.to_ascii_lowercase(),
            attrs: Vec::new(),
        }))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Text(text.to_string()))
    }

    pub fn create_fragment(&mut self) -> NodeId {
        self.alloc(NodeKind::Fragment)
    }

    fn node(&self, node_id: NodeId) -> Result<&Node> {
        self.nodes
            .get(node_id.0)
            .filter(|node| !matches!(node.kind, NodeKind::Free))
            .ok_or_else(|| DirectoryError::dom(format!("unknown node {:?}", node_id)))
    }

    fn element(&self, node_id: NodeId) -> Result<&Element> {
        match &self.node(node_id)?.kind {
            NodeKind::Element(element) => Ok(element),
            _ => Err(DirectoryError::dom(format!(
                "node {:?} is not an element",
                node_id
            ))),
        }
    }

    fn element_mut(&mut self, node_id: NodeId) -> Result<&mut Element> {
        match self.nodes.get_mut(node_id.0).map(|n| &mut n.kind) {
            Some(NodeKind::Element(element)) => Ok(element),
            _ => Err(DirectoryError::dom(format!(
                "node {:?} is not an element",
                node_id
            ))),
        }
    }

    pub fn is_element(&self, node_id: NodeId) -> bool {
        self.element(node_id).is_ok()
    }

    pub fn is_fragment(&self, node_id: NodeId) -> bool {
        matches!(
            self.nodes.get(node_id.0).map(|n| &n.kind),
            Some(NodeKind::Fragment)
        )
    }

    pub fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).ok().map(|e| e.tag_name.as_str())
    }

    pub fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes.get(node_id.0).and_then(|n| n.parent)
    }

    pub fn children(&self, node_id: NodeId) -> &[NodeId] {
        self.nodes
            .get(node_id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn element_children(&self, node_id: NodeId) -> Vec<NodeId> {
        self.children(node_id)
            .iter()
            .copied()
            .filter(|child| self.is_element(*child))
            .collect()
    }

    /// Whether the node is reachable from the document root.
    pub fn is_connected(&self, node_id: NodeId) -> bool {
        let mut cursor = Some(node_id);
        while let Some(current) = cursor {
            if current == self.root {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    fn can_have_children(&self, node_id: NodeId) -> bool {
        match self.nodes.get(node_id.0).map(|n| &n.kind) {
            Some(NodeKind::Document) | Some(NodeKind::Fragment) => true,
            Some(NodeKind::Element(element)) => {
                !VOID_ELEMENTS.contains(&element.tag_name.as_str())
            }
            _ => false,
        }
    }

    /// Appends `child` under `parent`. A fragment is emptied into `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if !self.can_have_children(parent) {
            return Err(DirectoryError::dom("append target cannot have children"));
        }
        self.node(child)?;
        if child == self.root || child == parent {
            return Err(DirectoryError::dom("invalid node to append"));
        }

        if self.is_fragment(child) {
            let moved = std::mem::take(&mut self.nodes[child.0].children);
            for grandchild in moved {
                self.nodes[grandchild.0].parent = None;
                self.append_child(parent, grandchild)?;
            }
            self.release(child)?;
            return Ok(());
        }

        // parent must not sit inside child's subtree
        let mut cursor = Some(parent);
        while let Some(node) = cursor {
            if node == child {
                return Err(DirectoryError::dom("append would create a cycle"));
            }
            cursor = self.parent(node);
        }

        if let Some(old_parent) = self.parent(child) {
            self.nodes[old_parent.0].children.retain(|id| *id != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    pub fn append(&mut self, parent: NodeId, children: &[NodeId]) -> Result<()> {
        for child in children {
            self.append_child(parent, *child)?;
        }
        Ok(())
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if self.parent(child) != Some(parent) {
            return Err(DirectoryError::dom("node is not a direct child"));
        }
        self.nodes[parent.0].children.retain(|id| *id != child);
        self.nodes[child.0].parent = None;
        Ok(())
    }

    /// Removes and releases every child of `parent`, last first.
    pub fn delete_child_elements(&mut self, parent: NodeId) -> Result<NodeId> {
        if !self.is_element(parent) {
            return Err(DirectoryError::invalid_input(
                "parent",
                format!("node {:?} is not an element", parent),
            ));
        }
        while let Some(child) = self.children(parent).last().copied() {
            self.remove_child(parent, child)?;
            self.release(child)?;
        }
        Ok(parent)
    }

    pub fn text_content(&self, node_id: NodeId) -> String {
        match self.nodes.get(node_id.0).map(|n| &n.kind) {
            Some(NodeKind::Text(text)) => text.clone(),
            Some(_) => self
                .children(node_id)
                .iter()
                .map(|child| self.text_content(*child))
                .collect(),
            None => String::new(),
        }
    }

    pub fn set_text_content(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        self.element(node_id)?;
        let old = std::mem::take(&mut self.nodes[node_id.0].children);
        for child in old {
            self.nodes[child.0].parent = None;
            self.release(child)?;
        }
        if !value.is_empty() {
            let text = self.create_text(value);
            self.append_child(node_id, text)?;
        }
        Ok(())
    }

    pub fn attr(&self, node_id: NodeId, name: &str) -> Option<&str> {
        self.element(node_id).ok().and_then(|e| {
            e.attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        })
    }

    pub fn has_attr(&self, node_id: NodeId, name: &str) -> bool {
        self.attr(node_id, name).is_some()
    }

    pub fn set_attr(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let element = self.element_mut(node_id)?;
        let name = name.to_ascii_lowercase();
        match element.attrs.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => element.attrs.push((name, value.to_string())),
        }
        Ok(())
    }

    pub fn remove_attr(&mut self, node_id: NodeId, name: &str) -> Result<bool> {
        let element = self.element_mut(node_id)?;
        let before = element.attrs.len();
        element.attrs.retain(|(k, _)| k != name);
        Ok(element.attrs.len() < before)
    }

    /// `data-*` attribute, e.g. `data("post-id")`.
    pub fn data(&self, node_id: NodeId, key: &str) -> Option<&str> {
        self.attr(node_id, &format!("data-{}", key))
    }

    pub fn set_data(&mut self, node_id: NodeId, key: &str, value: &str) -> Result<()> {
        self.set_attr(node_id, &format!("data-{}", key), value)
    }

    fn class_tokens(&self, node_id: NodeId) -> Vec<String> {
        self.attr(node_id, "class")
            .map(|value| value.split_whitespace().map(ToOwned::to_owned).collect())
            .unwrap_or_default()
    }

    fn set_class_tokens(&mut self, node_id: NodeId, classes: &[String]) -> Result<()> {
        if classes.is_empty() {
            self.remove_attr(node_id, "class")?;
            Ok(())
        } else {
            self.set_attr(node_id, "class", &classes.join(" "))
        }
    }

    pub fn class_contains(&self, node_id: NodeId, class_name: &str) -> bool {
        self.class_tokens(node_id).iter().any(|c| c == class_name)
    }

    pub fn class_add(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        self.element(node_id)?;
        let mut classes = self.class_tokens(node_id);
        if !classes.iter().any(|c| c == class_name) {
            classes.push(class_name.to_string());
        }
        self.set_class_tokens(node_id, &classes)
    }

    pub fn class_remove(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        self.element(node_id)?;
        let mut classes = self.class_tokens(node_id);
        classes.retain(|c| c != class_name);
        self.set_class_tokens(node_id, &classes)
    }

    /// Returns whether the class is present afterwards.
    pub fn class_toggle(&mut self, node_id: NodeId, class_name: &str) -> Result<bool> {
        if self.class_contains(node_id, class_name) {
            self.class_remove(node_id, class_name)?;
            Ok(false)
        } else {
            self.class_add(node_id, class_name)?;
            Ok(true)
        }
    }

    fn collect_elements(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        for child in self.children(node_id) {
            if self.is_element(*child) {
                out.push(*child);
            }
            self.collect_elements(*child, out);
        }
    }

    /// Element descendants of `root` in document order.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_elements(root, &mut out);
        out
    }

    pub fn descendants_by_tag(&self, root: NodeId, tag_name: &str) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|node| self.tag_name(*node) == Some(tag_name))
            .collect()
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|node| self.attr(*node, "id") == Some(id))
    }

    pub fn first_by_tag(&self, tag_name: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|node| self.tag_name(*node) == Some(tag_name))
    }

    /// First connected `tag[data-key="value"]`.
    pub fn find_by_data(&self, tag_name: &str, key: &str, value: &str) -> Option<NodeId> {
        self.descendants(self.root).into_iter().find(|node| {
            self.tag_name(*node) == Some(tag_name) && self.data(*node, key) == Some(value)
        })
    }

    pub fn is_disabled(&self, node_id: NodeId) -> bool {
        self.has_attr(node_id, "disabled")
    }

    pub fn set_disabled(&mut self, node_id: NodeId, disabled: bool) -> Result<()> {
        if disabled {
            self.set_attr(node_id, "disabled", "")
        } else {
            self.remove_attr(node_id, "disabled").map(|_| ())
        }
    }

    /// Value of a `<select>`: the selected option, else the first one.
    pub fn select_value(&self, select: NodeId) -> Option<String> {
        let options = self.descendants_by_tag(select, "option");
        let chosen = options
            .iter()
            .find(|option| self.has_attr(**option, "selected"))
            .or_else(|| options.first())?;
        Some(
            self.attr(*chosen, "value")
                .map(ToOwned::to_owned)
                .unwrap_or_else(|| self.text_content(*chosen)),
        )
    }

    /// Marks the option with `value` as selected. Returns false if none matches.
    pub fn set_select_value(&mut self, select: NodeId, value: &str) -> Result<bool> {
        let options = self.descendants_by_tag(select, "option");
        let Some(target) = options
            .iter()
            .copied()
            .find(|option| self.attr(*option, "value") == Some(value))
        else {
            return Ok(false);
        };
        for option in options {
            self.remove_attr(option, "selected")?;
        }
        self.set_attr(target, "selected", "")?;
        Ok(true)
    }

    pub fn add_event_listener(
        &mut self,
        node_id: NodeId,
        kind: EventKind,
        listener: Listener,
    ) -> Result<bool> {
        self.element(node_id)?;
        Ok(self.listeners.add(node_id, kind, listener))
    }

    pub fn remove_event_listener(
        &mut self,
        node_id: NodeId,
        kind: EventKind,
        listener: &Listener,
    ) -> bool {
        self.listeners.remove(node_id, kind, listener)
    }

    pub fn event_listeners(&self, node_id: NodeId, kind: EventKind) -> Vec<Listener> {
        self.listeners.get(node_id, kind)
    }

    pub fn listeners(&self) -> &EventListeners {
        &self.listeners
    }

    pub fn outer_html(&self, node_id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node_id, &mut out);
        out
    }

    pub fn to_html(&self) -> String {
        let mut out = String::from("<!DOCTYPE html>\n");
        self.write_html(self.root, &mut out);
        out.push('\n');
        out
    }

    fn write_html(&self, node_id: NodeId, out: &mut String) {
        let Some(node) = self.nodes.get(node_id.0) else {
            return;
        };
        match &node.kind {
            NodeKind::Document | NodeKind::Fragment => {
                for child in &node.children {
                    self.write_html(*child, out);
                }
            }
            NodeKind::Text(text) => out.push_str(&escape_text(text)),
            NodeKind::Free => {}
            NodeKind::Element(element) => {
                out.push('<');
                out.push_str(&element.tag_name);
                for (k, v) in &element.attrs {
                    out.push(' ');
                    out.push_str(k);
                    if !v.is_empty() {
                        out.push_str("=\"");
                        out.push_str(&escape_attr(v));
                        out.push('"');
                    }
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&element.tag_name.as_str()) {
                    return;
                }
                for child in &node.children {
                    self.write_html(*child, out);
                }
                out.push_str("</");
                out.push_str(&element.tag_name);
                out.push('>');
            }
        }
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
