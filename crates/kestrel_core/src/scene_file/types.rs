//! Element tree produced by the scene file reader.

/// One XML element with its attributes and child elements.
///
/// Character data between tags carries no meaning in scene files and is
/// dropped by the reader.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    /// Tag name
    pub name: String,

    /// Attributes in source order
    pub attributes: Vec<(String, String)>,

    /// Child elements in source order
    pub children: Vec<Element>,

    /// Line of the opening tag (1-based)
    pub line: usize,
}

impl Element {
    /// Create an element with no attributes or children.
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            line,
        }
    }

    /// Value of an attribute, if present.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Depth-first iterator over every element below this one.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// First descendant with the given tag name.
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.descendants().find(|e| e.name == tag)
    }

    /// First descendant property whose `name` attribute matches.
    ///
    /// Properties may sit directly under the element or inside a nested
    /// block such as `<film>`.
    pub fn property(&self, name: &str) -> Option<&Element> {
        self.descendants().find(|e| e.attr("name") == Some(name))
    }
}

/// Iterator returned by [`Element::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}
