//! fOS CSS - selectors and stylesheets
//!
//! Selector parsing and matching against a `fos_dom` tree, CSSOM-style
//! escaping, and stylesheet parsing (via lightningcss) down to rule
//! selectors.

mod escape;
mod matching;
mod parser;
pub mod selectors;

pub use escape::{EscapeError, escape_identifier, escape_string};
pub use matching::{MatchContext, matches_selector, query_selector, query_selector_all, select};
pub use parser::CssParser;
pub use selectors::{SelectorError, SelectorList};

/// Parse a CSS stylesheet
pub fn parse_stylesheet(css: &str) -> Result<Stylesheet, CssError> {
    CssParser::new().parse(css)
}

/// Parsed stylesheet
#[derive(Debug, Default)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    /// Every rule selector, in source order
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().flat_map(|r| r.selectors.iter().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// CSS style rule, reduced to its selectors
#[derive(Debug, Clone)]
pub struct Rule {
    pub selectors: Vec<String>,
}

/// CSS parsing error
#[derive(Debug, thiserror::Error)]
pub enum CssError {
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: u32, message: String },
}
