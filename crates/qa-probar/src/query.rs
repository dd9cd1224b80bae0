//! Element queries: what a locator asks the page.
//!
//! A locator is compiled into an [`ElementQuery`], a chain of [`Step`]s plus a
//! single [`QueryOp`]. Drivers either evaluate it in the page through the
//! bundled resolver ([`ElementQuery::to_script`]) or, in unit tests, answer it
//! directly from the structured form.

use crate::selector::Selector;
use serde::{Deserialize, Serialize};

/// One link of a locator chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Step {
    /// Match a selector under every current root
    Select {
        /// The selector
        selector: Selector,
    },
    /// Keep only the element at `index` (negative counts from the end)
    Nth {
        /// Index into the current matches
        index: i64,
    },
    /// Keep elements whose text contains `text` (case-insensitive)
    HasText {
        /// Text to look for
        text: String,
    },
    /// Descend into each iframe's document
    Frame,
    /// Descend into each element's open shadow root
    Shadow,
}

impl Step {
    fn describe(&self) -> String {
        match self {
            Self::Select { selector } => selector.to_string(),
            Self::Nth { index } => format!("nth={index}"),
            Self::HasText { text } => format!("has-text=\"{text}\""),
            Self::Frame => "internal:control=enter-frame".to_string(),
            Self::Shadow => "internal:shadow-root".to_string(),
        }
    }
}

/// Render a chain for logs and error messages
#[must_use]
pub fn describe_steps(steps: &[Step]) -> String {
    steps
        .iter()
        .map(Step::describe)
        .collect::<Vec<_>>()
        .join(" >> ")
}

/// Operation performed on the resolved elements
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum QueryOp {
    /// Number of matches
    Count,
    /// Visibility, enabled state and viewport box of the single match
    Describe {
        /// Scroll the element into view first
        scroll: bool,
    },
    /// `textContent` of the single match
    TextContent,
    /// `innerText` of the single match
    InnerText,
    /// `innerText` of every match
    AllInnerTexts,
    /// Attribute value of the single match
    Attribute {
        /// Attribute name
        name: String,
    },
    /// Current `value` of an input-like element
    InputValue,
    /// Focus the single match
    Focus,
    /// Focus and select the editable content of the single match
    SelectText,
    /// Choose `<option>`s by value or label
    SelectOption {
        /// Values or labels to select
        values: Vec<String>,
    },
    /// Fire the HTML5 drag-and-drop sequence from the match onto `target`
    /// (a no-op for sources that are not natively draggable)
    DragTo {
        /// Chain resolving the drop target
        target: Vec<Step>,
    },
    /// Call a page function with the element and `arg`
    Evaluate {
        /// JavaScript function source `(element, arg) => ...`
        #[serde(skip)]
        function: String,
        /// Argument passed as the second parameter
        arg: serde_json::Value,
    },
    /// The element object itself (for protocol calls that take a node)
    Element,
}

impl QueryOp {
    /// Short name used in logs and mock call records
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Describe { .. } => "describe",
            Self::TextContent => "textContent",
            Self::InnerText => "innerText",
            Self::AllInnerTexts => "allInnerTexts",
            Self::Attribute { .. } => "attribute",
            Self::InputValue => "inputValue",
            Self::Focus => "focus",
            Self::SelectText => "selectText",
            Self::SelectOption { .. } => "selectOption",
            Self::DragTo { .. } => "dragTo",
            Self::Evaluate { .. } => "evaluate",
            Self::Element => "element",
        }
    }
}

/// A compiled locator plus the operation to run on it
#[derive(Debug, Clone, PartialEq)]
pub struct ElementQuery {
    /// Resolution chain
    pub steps: Vec<Step>,
    /// Operation on the matches
    pub op: QueryOp,
}

impl ElementQuery {
    /// Create a query
    #[must_use]
    pub fn new(steps: Vec<Step>, op: QueryOp) -> Self {
        Self { steps, op }
    }

    /// Human-readable chain
    #[must_use]
    pub fn description(&self) -> String {
        describe_steps(&self.steps)
    }

    /// Whether the query yields an element object rather than JSON
    #[must_use]
    pub const fn returns_element(&self) -> bool {
        matches!(self.op, QueryOp::Element)
    }

    /// JavaScript expression running this query in the page
    ///
    /// The expression is a promise; evaluate it with promise awaiting on.
    pub fn to_script(&self) -> serde_json::Result<String> {
        let steps = serde_json::to_string(&self.steps)?;
        let op = serde_json::to_string(&self.op)?;
        let function = match &self.op {
            QueryOp::Evaluate { function, .. } => function.as_str(),
            _ => "null",
        };
        Ok(format!("({RESOLVER})({steps}, {op}, {function})"))
    }
}

/// Viewport-relative box of an element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl BoundingBox {
    /// Center of the box
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A point in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// What the resolver sends back
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryReply {
    /// Number of elements the chain resolved to
    pub count: usize,
    /// Single match is rendered
    #[serde(default)]
    pub visible: bool,
    /// Single match is not disabled
    #[serde(default)]
    pub enabled: bool,
    /// Single match's box
    #[serde(default, rename = "box")]
    pub bounds: Option<BoundingBox>,
    /// Operation result
    #[serde(default)]
    pub value: serde_json::Value,
    /// Drop target matches (drag only)
    #[serde(default)]
    pub target_count: Option<usize>,
}

/// In-page resolver. Called as `(steps, op, fn)`.
///
/// Text matching normalizes whitespace; substring matches are
/// case-insensitive. XPath starting with `/` is evaluated relative to the
/// current scope. Boxes of elements inside iframes are offset by every
/// enclosing frame so they are valid top-level mouse coordinates.
pub const RESOLVER: &str = r#"async (steps, op, fn) => {
  const norm = (s) => (s || '').replace(/\s+/g, ' ').trim();
  const matchesText = (el, text, exact) => {
    const actual = norm(el.textContent);
    const wanted = norm(text);
    return exact ? actual === wanted : actual.toLowerCase().includes(wanted.toLowerCase());
  };
  const SKIP = new Set(['SCRIPT', 'STYLE', 'NOSCRIPT', 'HEAD', 'TEMPLATE', 'TITLE']);
  const byXPath = (root, expr) => {
    const doc = root.nodeType === 9 ? root : root.ownerDocument;
    const source = root.nodeType !== 9 && expr.startsWith('/') ? '.' + expr : expr;
    const snap = doc.evaluate(source, root, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null);
    const found = [];
    for (let i = 0; i < snap.snapshotLength; i++) {
      const node = snap.snapshotItem(i);
      if (node.nodeType === 1) found.push(node);
    }
    return found;
  };
  const byText = (root, text, exact) => {
    const scope = root.nodeType === 1 ? [root, ...root.querySelectorAll('*')] : [...root.querySelectorAll('*')];
    const hits = scope.filter((el) => !SKIP.has(el.tagName) && matchesText(el, text, exact));
    return hits.filter((el) => !hits.some((other) => other !== el && el.contains(other)));
  };
  const select = (root, s) => {
    switch (s.kind) {
      case 'css': return [...root.querySelectorAll(s.value)];
      case 'xpath': return byXPath(root, s.value);
      case 'text': return byText(root, s.text, s.exact);
      case 'cssWithText':
        return [...root.querySelectorAll(s.css)].filter((el) => matchesText(el, s.text, s.exact));
      default: throw new Error('unknown selector kind ' + s.kind);
    }
  };
  const resolve = (chain) => {
    let current = [document];
    for (const step of chain) {
      let next = [];
      switch (step.kind) {
        case 'select':
          for (const root of current) next.push(...select(root, step.selector));
          break;
        case 'nth': {
          const i = step.index < 0 ? current.length + step.index : step.index;
          if (i >= 0 && i < current.length) next.push(current[i]);
          break;
        }
        case 'hasText':
          next = current.filter((el) => el.nodeType === 1 && matchesText(el, step.text, false));
          break;
        case 'frame':
          for (const el of current) {
            let doc = null;
            try { doc = el.contentDocument; } catch (e) { doc = null; }
            if (doc) next.push(doc);
          }
          break;
        case 'shadow':
          for (const el of current) if (el.shadowRoot) next.push(el.shadowRoot);
          break;
        default: throw new Error('unknown step ' + step.kind);
      }
      current = [...new Set(next)];
    }
    return current.filter((node) => node.nodeType === 1);
  };
  const boxOf = (el) => {
    const rect = el.getBoundingClientRect();
    let x = rect.left;
    let y = rect.top;
    let view = el.ownerDocument.defaultView;
    while (view && view.frameElement) {
      const frame = view.frameElement;
      const outer = frame.getBoundingClientRect();
      const style = frame.ownerDocument.defaultView.getComputedStyle(frame);
      x += outer.left + (parseFloat(style.borderLeftWidth) || 0) + (parseFloat(style.paddingLeft) || 0);
      y += outer.top + (parseFloat(style.borderTopWidth) || 0) + (parseFloat(style.paddingTop) || 0);
      view = frame.ownerDocument.defaultView;
    }
    return { x, y, width: rect.width, height: rect.height };
  };
  const isVisible = (el) => {
    const rect = el.getBoundingClientRect();
    if (rect.width === 0 || rect.height === 0) return false;
    const style = el.ownerDocument.defaultView.getComputedStyle(el);
    return style.visibility !== 'hidden' && style.visibility !== 'collapse' && style.display !== 'none';
  };
  const reveal = (el) => {
    if (typeof el.scrollIntoViewIfNeeded === 'function') el.scrollIntoViewIfNeeded(true);
    else el.scrollIntoView({ block: 'center', inline: 'center' });
  };

  const found = resolve(steps);
  const count = found.length;
  switch (op.op) {
    case 'count': return { count };
    case 'allInnerTexts': return { count, value: found.map((el) => el.innerText) };
    case 'element': return count === 1 ? found[0] : null;
    default: break;
  }
  if (count !== 1) return { count };
  const el = found[0];
  switch (op.op) {
    case 'describe':
      if (op.scroll) reveal(el);
      return { count, visible: isVisible(el), enabled: !el.disabled, box: boxOf(el) };
    case 'textContent': return { count, value: el.textContent };
    case 'innerText': return { count, value: el.innerText };
    case 'attribute': return { count, value: el.getAttribute(op.name) };
    case 'inputValue': return { count, value: 'value' in el ? String(el.value) : null };
    case 'focus':
      el.focus();
      return { count };
    case 'selectText': {
      el.focus();
      if (typeof el.select === 'function') {
        try { el.select(); } catch (e) { /* not selectable */ }
      } else if (el.isContentEditable) {
        const range = el.ownerDocument.createRange();
        range.selectNodeContents(el);
        const selection = el.ownerDocument.defaultView.getSelection();
        selection.removeAllRanges();
        selection.addRange(range);
      }
      return { count };
    }
    case 'selectOption': {
      if (el.tagName !== 'SELECT') throw new Error('Element is not a <select> element');
      const options = [...el.options];
      const picked = options.filter((o) =>
        op.values.includes(o.value) || op.values.includes(norm(o.label)) || op.values.includes(norm(o.textContent)));
      if (picked.length === 0) return { count, value: [] };
      if (el.multiple) options.forEach((o) => { o.selected = picked.includes(o); });
      else el.value = picked[0].value;
      el.dispatchEvent(new Event('input', { bubbles: true }));
      el.dispatchEvent(new Event('change', { bubbles: true }));
      return { count, value: picked.map((o) => o.value) };
    }
    case 'dragTo': {
      const targets = resolve(op.target);
      if (targets.length !== 1) return { count, targetCount: targets.length };
      const target = targets[0];
      const source = el.closest('[draggable="true"]') || el.querySelector('[draggable="true"]') || (el.draggable ? el : null);
      if (!source) return { count, targetCount: 1 };
      const data = new DataTransfer();
      const fire = (node, type) => {
        const b = boxOf(node);
        node.dispatchEvent(new DragEvent(type, {
          bubbles: true, cancelable: true, composed: true, dataTransfer: data,
          clientX: b.x + b.width / 2, clientY: b.y + b.height / 2,
        }));
      };
      fire(source, 'dragstart');
      fire(target, 'dragenter');
      fire(target, 'dragover');
      fire(target, 'drop');
      fire(source, 'dragend');
      return { count, targetCount: 1 };
    }
    case 'evaluate': return { count, value: await fn(el, op.arg) };
    default: throw new Error('unknown op ' + op.op);
  }
}"#;
