//! Inline style declarations
//!
//! The parsed form of an element's `style` attribute. Only the pieces needed
//! to save, override and restore individual properties are modelled; values
//! are kept as opaque text.

/// A single `property: value [!important]` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDeclaration {
    pub name: String,
    pub value: String,
    pub important: bool,
}

/// Ordered list of inline declarations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<StyleDeclaration>,
}

impl InlineStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the text of a `style` attribute.
    ///
    /// Malformed declarations (no colon, empty name) are dropped, the same
    /// way a browser drops them. Semicolons inside parentheses or quoted
    /// strings belong to the value.
    pub fn parse(text: &str) -> Self {
        let mut style = Self::new();
        for chunk in split_declarations(text) {
            let Some((name, value)) = chunk.split_once(':') else {
                continue;
            };
            let name = name.trim().to_ascii_lowercase();
            if name.is_empty() {
                continue;
            }
            let mut value = value.trim();
            let mut important = false;
            if let Some(pos) = value.rfind('!') {
                if value[pos + 1..].trim().eq_ignore_ascii_case("important") {
                    important = true;
                    value = value[..pos].trim_end();
                }
            }
            style.set_property(&name, value, important);
        }
        style
    }

    /// Value of a property, if declared
    pub fn get_property_value(&self, name: &str) -> Option<&str> {
        self.find(name).map(|d| d.value.as_str())
    }

    /// Whether a property is declared `!important`
    pub fn get_property_priority(&self, name: &str) -> bool {
        self.find(name).is_some_and(|d| d.important)
    }

    /// Set (or replace) a property
    pub fn set_property(&mut self, name: &str, value: &str, important: bool) {
        let name = name.to_ascii_lowercase();
        if value.is_empty() {
            self.remove_property(&name);
            return;
        }
        match self.declarations.iter_mut().find(|d| d.name == name) {
            Some(decl) => {
                decl.value = value.to_string();
                decl.important = important;
            }
            None => self.declarations.push(StyleDeclaration {
                name,
                value: value.to_string(),
                important,
            }),
        }
    }

    /// Remove a property, returning its previous value
    pub fn remove_property(&mut self, name: &str) -> Option<String> {
        let pos = self
            .declarations
            .iter()
            .position(|d| d.name.eq_ignore_ascii_case(name))?;
        Some(self.declarations.remove(pos).value)
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StyleDeclaration> {
        self.declarations.iter()
    }

    /// Serialize back to `style` attribute text
    pub fn to_css_text(&self) -> String {
        let mut out = String::new();
        for decl in &self.declarations {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&decl.name);
            out.push_str(": ");
            out.push_str(&decl.value);
            if decl.important {
                out.push_str(" !important");
            }
            out.push(';');
        }
        out
    }

    fn find(&self, name: &str) -> Option<&StyleDeclaration> {
        self.declarations
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }
}

/// Split declaration text on top-level `;`
fn split_declarations(text: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut quote = None;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (c, quote) {
            ('\\', _) => escaped = true,
            (q, Some(open)) if q == open => quote = None,
            (_, Some(_)) => {}
            ('"' | '\'', None) => quote = Some(c),
            ('(' | '[', None) => depth += 1,
            (')' | ']', None) => depth = depth.saturating_sub(1),
            (';', None) if depth == 0 => {
                chunks.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    chunks.push(&text[start..]);
    chunks
}
