//! Live document tree
//!
//! An arena-backed DOM built from HTML with the scraper crate. Besides the
//! markup it keeps the live state of form controls (value, checkedness,
//! selectedness), value setter overrides installed by the host framework, and
//! per-node event listeners, so programmatic writes can be observed the way a
//! page would observe them.

use std::collections::HashMap;
use std::fmt;
use std::io;

use html5ever::serialize::{serialize, Serialize, SerializeOpts, Serializer, TraversalScope};
use html5ever::{LocalName, Namespace, QualName};
use scraper::Html;

/// Index of a node in the arena. Ids are assigned in tree order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Input types the HTML standard knows; anything else reads back as "text"
const INPUT_TYPES: &[&str] = &[
    "button",
    "checkbox",
    "color",
    "date",
    "datetime-local",
    "email",
    "file",
    "hidden",
    "image",
    "month",
    "number",
    "password",
    "radio",
    "range",
    "reset",
    "search",
    "submit",
    "tel",
    "text",
    "time",
    "url",
    "week",
];

/// Elements whose first newline right after the start tag is dropped by the parser
const LEADING_NEWLINE_ELEMENTS: &[&str] = &["pre", "listing", "textarea"];

#[derive(Debug, Clone)]
enum NodeData {
    Document,
    Doctype(String),
    Comment(String),
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// Element markup plus the live state of the control it may represent
#[derive(Debug, Clone)]
pub struct Element {
    name: QualName,
    attrs: Vec<(QualName, String)>,
    live: LiveState,
}

#[derive(Debug, Clone, Default)]
struct LiveState {
    value: String,
    checked: bool,
    selected: bool,
}

impl Element {
    fn from_source(source: &scraper::node::Element) -> Self {
        Self {
            name: source.name.clone(),
            attrs: source
                .attrs
                .iter()
                .map(|(name, value)| (name.clone(), value.to_string()))
                .collect(),
            live: LiveState::default(),
        }
    }

    /// Local tag name, lower case for HTML elements
    pub fn tag(&self) -> &str {
        &self.name.local
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| (*k.local).eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(k, _)| (*k.local).eq_ignore_ascii_case(name)) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attrs.push((attr_name(name), value.to_string())),
        }
    }
}

fn attr_name(local: &str) -> QualName {
    QualName::new(None, Namespace::from(""), LocalName::from(local))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Focus,
    Input,
    Change,
    Blur,
}

impl EventKind {
    /// Sequence a user edit produces: focus, type, commit, leave
    pub const CHANGE_SEQUENCE: [EventKind; 4] = [
        EventKind::Focus,
        EventKind::Input,
        EventKind::Change,
        EventKind::Blur,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Focus => "focus",
            EventKind::Input => "input",
            EventKind::Change => "change",
            EventKind::Blur => "blur",
        }
    }
}

/// Event as seen by a listener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub target: NodeId,
    pub current_target: NodeId,
    pub bubbles: bool,
}

type Listener = Box<dyn FnMut(&Event)>;

/// Host-installed interception of plain `value` assignment.
/// Returns whether the write should be kept.
type SetterOverride = Box<dyn FnMut(&str) -> bool>;

/// Base-level value storage of a form control, reachable without going
/// through any setter override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeValueWriter {
    Input,
    TextArea,
    Select,
}

impl NativeValueWriter {
    pub fn write(self, doc: &mut Document, id: NodeId, value: &str) {
        match self {
            NativeValueWriter::Input if doc.is_checkable(id) => {
                if let Some(el) = doc.element_mut(id) {
                    el.set_attr("value", value);
                }
            }
            NativeValueWriter::Input => {
                if let Some(el) = doc.element_mut(id) {
                    el.live.value = value.to_string();
                }
            }
            NativeValueWriter::TextArea => {
                if let Some(el) = doc.element_mut(id) {
                    el.live.value = normalize_newlines(value);
                }
            }
            NativeValueWriter::Select => doc.select_by_value(id, value),
        }
    }
}

/// A parsed document with live form state
pub struct Document {
    nodes: Vec<Node>,
    listeners: HashMap<(NodeId, EventKind), Vec<Listener>>,
    setter_overrides: HashMap<NodeId, SetterOverride>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("listeners", &self.listeners.len())
            .field("setter_overrides", &self.setter_overrides.len())
            .finish()
    }
}

impl Document {
    /// Parse an HTML document and seed form control state from its markup
    pub fn parse(html: &str) -> Self {
        let parsed = Html::parse_document(html);

        let mut doc = Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                data: NodeData::Document,
            }],
            listeners: HashMap::new(),
            setter_overrides: HashMap::new(),
        };

        doc.append_tree(&parsed);
        doc.seed_live_state();
        doc
    }

    fn push(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            data,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    // Iterative pre-order walk; ids come out in tree order
    fn append_tree(&mut self, parsed: &Html) {
        let root = self.root();
        let mut pending: Vec<_> = parsed
            .tree
            .root()
            .children()
            .rev()
            .map(|child| (root, child))
            .collect();

        while let Some((parent, source)) = pending.pop() {
            let data = match source.value() {
                scraper::Node::Element(el) => NodeData::Element(Element::from_source(el)),
                scraper::Node::Text(text) => {
                    let text: &str = text;
                    NodeData::Text(text.to_owned())
                }
                scraper::Node::Comment(comment) => {
                    let comment: &str = comment;
                    NodeData::Comment(comment.to_owned())
                }
                scraper::Node::Doctype(doctype) => NodeData::Doctype(doctype.name().to_owned()),
                _ => continue,
            };
            let id = self.push(parent, data);
            pending.extend(source.children().rev().map(|child| (id, child)));
        }
    }

    fn seed_live_state(&mut self) {
        for index in 0..self.nodes.len() {
            let id = NodeId(index);
            let seeded = match self.element(id) {
                Some(el) if el.tag() == "input" => Some(LiveState {
                    value: el.attr("value").unwrap_or_default().to_string(),
                    checked: el.has_attr("checked"),
                    selected: false,
                }),
                Some(el) if el.tag() == "option" => Some(LiveState {
                    selected: el.has_attr("selected"),
                    ..LiveState::default()
                }),
                Some(el) if el.tag() == "textarea" => Some(LiveState {
                    value: normalize_newlines(&self.text_content(id)),
                    ..LiveState::default()
                }),
                _ => None,
            };
            if let (Some(live), Some(el)) = (seeded, self.element_mut(id)) {
                el.live = live;
            }
        }

        let selects: Vec<NodeId> = self.elements().filter(|&id| self.is_tag(id, "select")).collect();
        for select in selects {
            self.normalize_selectedness(select);
        }
    }

    // A single-choice select always has exactly one selected option when it has any
    fn normalize_selectedness(&mut self, select: NodeId) {
        if self.attr(select, "multiple").is_some() {
            return;
        }

        let options = self.options(select);
        let selected: Vec<NodeId> = options
            .iter()
            .copied()
            .filter(|&o| self.is_selected(o))
            .collect();

        match selected.split_last() {
            Some((_, earlier)) => {
                for &option in earlier {
                    self.set_selected(option, false);
                }
            }
            None => {
                let first_enabled = options
                    .iter()
                    .copied()
                    .find(|&o| self.attr(o, "disabled").is_none());
                if let Some(option) = first_enabled {
                    self.set_selected(option, true);
                }
            }
        }
    }

    // ----- tree access -----

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes.get(id.0)?.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(id.0)?.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(Element::tag)
    }

    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        self.tag_name(id) == Some(tag)
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attr(name)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Every element in tree order
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len())
            .map(NodeId)
            .filter(move |&id| self.element(id).is_some())
    }

    /// Ancestors from the parent up to and including the document node
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&c| self.element(c).is_some())
    }

    /// Element siblings before `id`, nearest first
    pub fn preceding_element_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let siblings = self.parent(id).map(|p| self.children(p)).unwrap_or(&[]);
        let position = siblings.iter().position(|&s| s == id).unwrap_or(0);
        siblings[..position]
            .iter()
            .rev()
            .copied()
            .filter(move |&s| self.element(s).is_some())
    }

    /// Descendants of `id` in tree order, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Concatenated text of `id` and its descendants; comments are not text
    pub fn text_content(&self, id: NodeId) -> String {
        std::iter::once(id)
            .chain(self.descendants(id))
            .filter_map(|n| self.text(n))
            .collect()
    }

    fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes.get(id.0)?.data {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }

    /// First element in tree order carrying `id="<value>"`
    pub fn element_by_id(&self, value: &str) -> Option<NodeId> {
        self.elements().find(|&e| self.attr(e, "id") == Some(value))
    }

    // ----- form control properties -----

    /// Normalized type of an `input` element, `None` for anything else
    pub fn input_type(&self, id: NodeId) -> Option<&'static str> {
        if !self.is_tag(id, "input") {
            return None;
        }
        let declared = self.attr(id, "type").map(str::trim).unwrap_or("");
        Some(
            INPUT_TYPES
                .iter()
                .copied()
                .find(|t| t.eq_ignore_ascii_case(declared))
                .unwrap_or("text"),
        )
    }

    pub fn is_checkable(&self, id: NodeId) -> bool {
        matches!(self.input_type(id), Some("checkbox" | "radio"))
    }

    /// Current value the way a script would read `element.value`
    pub fn value(&self, id: NodeId) -> String {
        let Some(el) = self.element(id) else {
            return String::new();
        };
        match el.tag() {
            "input" if self.is_checkable(id) => el.attr("value").unwrap_or("on").to_string(),
            "select" => self
                .options(id)
                .into_iter()
                .find(|&o| self.is_selected(o))
                .map(|o| self.option_value(o))
                .unwrap_or_default(),
            "option" => self.option_value(id),
            _ => el.live.value.clone(),
        }
    }

    pub fn checked(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(|el| el.live.checked)
    }

    /// Every `option` under a select, including those inside optgroups
    pub fn options(&self, select: NodeId) -> Vec<NodeId> {
        self.descendants(select)
            .into_iter()
            .filter(|&d| self.is_tag(d, "option"))
            .collect()
    }

    pub fn option_value(&self, option: NodeId) -> String {
        match self.attr(option, "value") {
            Some(value) => value.to_string(),
            None => self.option_text(option),
        }
    }

    /// Option text with whitespace stripped and collapsed
    pub fn option_text(&self, option: NodeId) -> String {
        self.text_content(option)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_selected(&self, option: NodeId) -> bool {
        self.element(option).is_some_and(|el| el.live.selected)
    }

    fn set_selected(&mut self, option: NodeId, selected: bool) {
        if let Some(el) = self.element_mut(option) {
            el.live.selected = selected;
        }
    }

    fn select_by_value(&mut self, select: NodeId, value: &str) {
        let options = self.options(select);
        let chosen = options.iter().copied().find(|&o| self.option_value(o) == value);
        for option in options {
            self.set_selected(option, Some(option) == chosen);
        }
    }

    /// Nearest form ancestor, or the document when there is none
    pub fn form_owner(&self, id: NodeId) -> NodeId {
        self.ancestors(id)
            .find(|&a| self.is_tag(a, "form"))
            .unwrap_or(self.root())
    }

    // ----- writes -----

    /// Capability check: does this node expose base-level value storage?
    pub fn native_value_writer(&self, id: NodeId) -> Option<NativeValueWriter> {
        match self.tag_name(id)? {
            "input" => Some(NativeValueWriter::Input),
            "textarea" => Some(NativeValueWriter::TextArea),
            "select" => Some(NativeValueWriter::Select),
            _ => None,
        }
    }

    /// Plain `element.value = value`. Goes through a setter override when the
    /// host installed one; returns whether the write was kept.
    pub fn assign_value(&mut self, id: NodeId, value: &str) -> bool {
        if let Some(setter) = self.setter_overrides.get_mut(&id) {
            if !setter(value) {
                return false;
            }
        }
        match self.native_value_writer(id) {
            Some(writer) => writer.write(self, id, value),
            None => {
                if let Some(el) = self.element_mut(id) {
                    el.live.value = value.to_string();
                }
            }
        }
        true
    }

    /// Install a framework-level interception of plain value assignment
    pub fn override_value_setter(&mut self, id: NodeId, setter: impl FnMut(&str) -> bool + 'static) {
        self.setter_overrides.insert(id, Box::new(setter));
    }

    /// Set checkedness. Checking a named radio unchecks the rest of its group
    /// within the same form owner.
    pub fn set_checked(&mut self, id: NodeId, checked: bool) {
        let Some(el) = self.element_mut(id) else {
            return;
        };
        el.live.checked = checked;

        if !checked || self.input_type(id) != Some("radio") {
            return;
        }
        let Some(name) = self
            .attr(id, "name")
            .filter(|n| !n.is_empty())
            .map(str::to_owned)
        else {
            return;
        };

        let owner = self.form_owner(id);
        let others: Vec<NodeId> = self
            .elements()
            .filter(|&other| {
                other != id
                    && self.input_type(other) == Some("radio")
                    && self.attr(other, "name") == Some(name.as_str())
                    && self.form_owner(other) == owner
            })
            .collect();
        for other in others {
            if let Some(el) = self.element_mut(other) {
                el.live.checked = false;
            }
        }
    }

    // ----- events -----

    pub fn add_event_listener(
        &mut self,
        id: NodeId,
        kind: EventKind,
        listener: impl FnMut(&Event) + 'static,
    ) {
        self.listeners
            .entry((id, kind))
            .or_default()
            .push(Box::new(listener));
    }

    /// Run the target's listeners, then (when bubbling) every ancestor's.
    /// Returns how many listeners ran.
    pub fn dispatch_event(&mut self, target: NodeId, kind: EventKind, bubbles: bool) -> usize {
        let mut path = vec![target];
        if bubbles {
            path.extend(self.ancestors(target));
        }

        let mut invoked = 0;
        for current_target in path {
            let Some(listeners) = self.listeners.get_mut(&(current_target, kind)) else {
                continue;
            };
            let event = Event {
                kind,
                target,
                current_target,
                bubbles,
            };
            for listener in listeners.iter_mut() {
                listener(&event);
                invoked += 1;
            }
        }
        invoked
    }

    // ----- serialization -----

    /// Serialize back to HTML with live control state reflected into markup
    pub fn to_html(&self) -> String {
        let opts = SerializeOpts {
            scripting_enabled: true,
            traversal_scope: TraversalScope::ChildrenOnly(None),
            create_missing_parent: false,
        };
        let mut buf = Vec::new();
        if let Err(e) = serialize(&mut buf, self, opts) {
            log::error!("HTML serialization failed: {e}");
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn reflected_attrs(&self, id: NodeId, el: &Element) -> Vec<(QualName, String)> {
        let mut attrs = el.attrs.clone();
        match el.tag() {
            "input" if self.is_checkable(id) => {
                if el.has_attr("checked") != el.live.checked {
                    replace_attr(&mut attrs, "checked", el.live.checked.then(String::new));
                }
            }
            "option" => {
                if el.has_attr("selected") != el.live.selected {
                    replace_attr(&mut attrs, "selected", el.live.selected.then(String::new));
                }
            }
            "input" => {
                if el.attr("value").unwrap_or_default() != el.live.value {
                    replace_attr(&mut attrs, "value", Some(el.live.value.clone()));
                }
            }
            _ => {}
        }
        attrs
    }

    // The parser drops one newline right after these start tags, so content
    // that begins with a newline needs an extra one to survive a reparse
    fn swallowed_newline(&self, id: NodeId, el: &Element) -> Option<&'static str> {
        let text = if el.tag() == "textarea" {
            el.live.value.as_str()
        } else {
            self.children(id).first().and_then(|&c| self.text(c))?
        };
        let doubled = LEADING_NEWLINE_ELEMENTS.contains(&el.tag()) && text.starts_with('\n');
        doubled.then_some("\n")
    }
}

enum Step {
    Open(NodeId),
    Close(NodeId),
}

impl Serialize for Document {
    fn serialize<S: Serializer>(
        &self,
        serializer: &mut S,
        _traversal_scope: TraversalScope,
    ) -> io::Result<()> {
        let mut stack = vec![Step::Open(self.root())];

        while let Some(step) = stack.pop() {
            let id = match step {
                Step::Open(id) => id,
                Step::Close(id) => {
                    if let Some(el) = self.element(id) {
                        serializer.end_elem(el.name.clone())?;
                    }
                    continue;
                }
            };

            match &self.nodes[id.0].data {
                NodeData::Document => {}
                NodeData::Doctype(name) => serializer.write_doctype(name)?,
                NodeData::Comment(text) => serializer.write_comment(text)?,
                NodeData::Text(text) => serializer.write_text(text)?,
                NodeData::Element(el) => {
                    let attrs = self.reflected_attrs(id, el);
                    let attrs = attrs.iter().map(|(name, value)| (name, value.as_str()));
                    serializer.start_elem(el.name.clone(), attrs)?;
                    stack.push(Step::Close(id));

                    if let Some(newline) = self.swallowed_newline(id, el) {
                        serializer.write_text(newline)?;
                    }
                    if el.tag() == "textarea" {
                        serializer.write_text(&el.live.value)?;
                        continue;
                    }
                }
            }
            stack.extend(self.children(id).iter().rev().map(|&child| Step::Open(child)));
        }
        Ok(())
    }
}

fn replace_attr(attrs: &mut Vec<(QualName, String)>, name: &str, value: Option<String>) {
    attrs.retain(|(k, _)| &*k.local != name);
    if let Some(value) = value {
        attrs.push((attr_name(name), value));
    }
}

// Browsers store textarea values with LF newlines
fn normalize_newlines(s: &str) -> String {
    if !s.contains('\r') {
        return s.to_string();
    }
    s.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn by_id(doc: &Document, id: &str) -> NodeId {
        doc.element_by_id(id).unwrap()
    }

    #[test]
    fn test_seed_from_markup() {
        let html = r#"
        <form>
            <input id="a" value="hello">
            <input id="b" type="checkbox" checked>
            <input id="c" type="RADIO" value="x">
            <input id="d" type="fancy">
            <textarea id="e">line one</textarea>
        </form>
        "#;
        let doc = Document::parse(html);

        assert_eq!(doc.value(by_id(&doc, "a")), "hello");
        assert_eq!(doc.input_type(by_id(&doc, "a")), Some("text"));
        assert!(doc.checked(by_id(&doc, "b")));
        assert_eq!(doc.value(by_id(&doc, "b")), "on");
        assert_eq!(doc.input_type(by_id(&doc, "c")), Some("radio"));
        assert_eq!(doc.value(by_id(&doc, "c")), "x");
        assert_eq!(doc.input_type(by_id(&doc, "d")), Some("text"));
        assert_eq!(doc.value(by_id(&doc, "e")), "line one");
    }

    #[test]
    fn test_select_defaults_to_first_enabled_option() {
        let html = r#"
        <select id="crop">
            <option value="" disabled>Pick one</option>
            <option value="1">Wheat</option>
            <optgroup label="Grains"><option>  Brown
                Rice </option></optgroup>
        </select>
        "#;
        let doc = Document::parse(html);
        let select = by_id(&doc, "crop");

        assert_eq!(doc.value(select), "1");
        let options = doc.options(select);
        assert_eq!(options.len(), 3);
        assert_eq!(doc.option_text(options[2]), "Brown Rice");
        assert_eq!(doc.option_value(options[2]), "Brown Rice");
    }

    #[test]
    fn test_single_select_keeps_last_selected() {
        let html = r#"
        <select id="s">
            <option value="a" selected>A</option>
            <option value="b" selected>B</option>
        </select>
        "#;
        let doc = Document::parse(html);
        assert_eq!(doc.value(by_id(&doc, "s")), "b");
    }

    #[test]
    fn test_radio_exclusivity_is_scoped_to_form() {
        let html = r#"
        <form><input id="f1" type="radio" name="g" checked></form>
        <form>
            <input id="f2a" type="radio" name="g" checked>
            <input id="f2b" type="radio" name="g">
        </form>
        "#;
        let mut doc = Document::parse(html);
        let f2b = by_id(&doc, "f2b");
        doc.set_checked(f2b, true);

        assert!(doc.checked(by_id(&doc, "f1")));
        assert!(!doc.checked(by_id(&doc, "f2a")));
        assert!(doc.checked(f2b));
    }

    #[test]
    fn test_setter_override_is_bypassed_by_native_writer() {
        let mut doc = Document::parse(r#"<input id="name" value="old">"#);
        let input = by_id(&doc, "name");
        doc.override_value_setter(input, |_| false);

        assert!(!doc.assign_value(input, "ignored"));
        assert_eq!(doc.value(input), "old");

        let writer = doc.native_value_writer(input).unwrap();
        writer.write(&mut doc, input, "new");
        assert_eq!(doc.value(input), "new");
    }

    #[test]
    fn test_plain_assignment_on_non_control() {
        let mut doc = Document::parse(r#"<div id="box"></div>"#);
        let div = by_id(&doc, "box");
        assert!(doc.native_value_writer(div).is_none());
        assert!(doc.assign_value(div, "42"));
        assert_eq!(doc.value(div), "42");
    }

    #[test]
    fn test_events_bubble_to_ancestors() {
        let mut doc = Document::parse(r#"<form id="f"><div><input id="i"></div></form>"#);
        let form = by_id(&doc, "f");
        let input = by_id(&doc, "i");

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        doc.add_event_listener(form, EventKind::Change, move |event| {
            sink.borrow_mut().push((event.target, event.current_target));
        });

        assert_eq!(doc.dispatch_event(input, EventKind::Change, true), 1);
        assert_eq!(doc.dispatch_event(input, EventKind::Change, false), 0);
        assert_eq!(seen.borrow().as_slice(), &[(input, form)]);
    }

    #[test]
    fn test_section_navigation_helpers() {
        let doc = Document::parse(r#"<div><h2 id="h">Title</h2><p>x</p><span id="s"></span></div>"#);
        let span = by_id(&doc, "s");
        let preceding: Vec<_> = doc
            .preceding_element_siblings(span)
            .filter_map(|id| doc.tag_name(id).map(str::to_owned))
            .collect();
        assert_eq!(preceding, vec!["p", "h2"]);
        assert!(doc.ancestors(span).any(|a| a == doc.root()));
    }

    #[test]
    fn test_to_html_keeps_doctype_and_comments() {
        let html = r#"<!DOCTYPE html><html><head><!--[if IE]>x<![endif]--></head><body><input id="a"></body></html>"#;
        let mut doc = Document::parse(html);
        let a = by_id(&doc, "a");
        doc.assign_value(a, "v");

        assert_eq!(
            doc.to_html(),
            r#"<!DOCTYPE html><html><head><!--[if IE]>x<![endif]--></head><body><input id="a" value="v"></body></html>"#
        );
    }

    #[test]
    fn test_leading_newline_survives_reparse() {
        let mut doc = Document::parse("<textarea id=\"t\"></textarea><pre id=\"p\">\n\nindented</pre>");
        let t = by_id(&doc, "t");
        doc.assign_value(t, "\nline2");
        assert_eq!(doc.text_content(by_id(&doc, "p")), "\nindented");

        let reparsed = Document::parse(&doc.to_html());
        assert_eq!(reparsed.value(by_id(&reparsed, "t")), "\nline2");
        assert_eq!(reparsed.text_content(by_id(&reparsed, "p")), "\nindented");
    }

    #[test]
    fn test_deeply_nested_document() {
        let depth = 50_000;
        let html = format!(
            r#"{}<input id="x" name="deep">{}"#,
            "<div>".repeat(depth),
            "</div>".repeat(depth)
        );
        let mut doc = Document::parse(&html);
        let input = by_id(&doc, "x");
        // divs, body, html, document
        assert_eq!(doc.ancestors(input).count(), depth + 3);

        let manifest = crate::extractors::extract_fields(&doc);
        assert_eq!(manifest.field_count, 1);
        assert_eq!(manifest.fields[0].label, "deep");

        doc.assign_value(input, "v");
        let out = doc.to_html();
        assert_eq!(out.matches("<div>").count(), depth);
        assert!(out.contains(r#"<input id="x" name="deep" value="v">"#));
        assert_eq!(doc.text_content(doc.root()), "");
    }

    #[test]
    fn test_to_html_reflects_live_state() {
        let html = r#"<form><input id="t" value="a&amp;b"><input id="c" type="checkbox"><select id="s"><option value="1">One</option><option value="2">Two</option></select><textarea id="ta">old</textarea><script>if (a < b) {}</script></form>"#;
        let mut doc = Document::parse(html);
        let t = by_id(&doc, "t");
        let c = by_id(&doc, "c");
        let s = by_id(&doc, "s");
        let ta = by_id(&doc, "ta");

        doc.assign_value(t, "say \"hi\"");
        doc.set_checked(c, true);
        doc.assign_value(s, "2");
        doc.assign_value(ta, "x < y");

        let out = doc.to_html();
        assert!(out.contains(r#"<input id="t" value="say &quot;hi&quot;">"#));
        assert!(out.contains(r#"<input id="c" type="checkbox" checked="">"#));
        assert!(out.contains(r#"<option value="2" selected="">Two</option>"#));
        assert!(out.contains("<textarea id=\"ta\">x &lt; y</textarea>"));
        assert!(out.contains("<script>if (a < b) {}</script>"));

        let reparsed = Document::parse(&out);
        assert_eq!(reparsed.value(by_id(&reparsed, "s")), "2");
        assert!(reparsed.checked(by_id(&reparsed, "c")));
        assert_eq!(reparsed.value(by_id(&reparsed, "t")), "say \"hi\"");
    }
}
