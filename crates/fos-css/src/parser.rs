//! CSS Parser using lightningcss
//!
//! Only the selector side of the stylesheet is kept: each style rule becomes
//! a [`Rule`] holding its selectors re-serialized as text, in source order.
//! Rules nested in `@media` and `@supports` blocks are included.

use lightningcss::printer::PrinterOptions;
use lightningcss::rules::{CssRule, CssRuleList};
use lightningcss::stylesheet::{ParserOptions, StyleSheet};
use lightningcss::traits::ToCss;

use crate::{CssError, Rule, Stylesheet};

/// CSS Parser
#[derive(Debug, Default)]
pub struct CssParser;

impl CssParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a CSS stylesheet
    pub fn parse(&self, css: &str) -> Result<Stylesheet, CssError> {
        let stylesheet = StyleSheet::parse(css, ParserOptions::default()).map_err(|e| {
            CssError::ParseError {
                line: e.loc.as_ref().map_or(0, |loc| loc.line),
                message: e.kind.to_string(),
            }
        })?;

        let mut result = Stylesheet::default();
        let mut pending: Vec<std::slice::Iter<'_, CssRule>> = vec![stylesheet.rules.0.iter()];
        while let Some(rules) = pending.last_mut() {
            let Some(rule) = rules.next() else {
                pending.pop();
                continue;
            };
            match rule {
                CssRule::Style(style) => {
                    let selectors: Vec<String> = style
                        .selectors
                        .0
                        .iter()
                        .filter_map(|sel| sel.to_css_string(PrinterOptions::default()).ok())
                        .collect();
                    if !selectors.is_empty() {
                        result.rules.push(Rule { selectors });
                    }
                }
                CssRule::Media(media) => pending.push(nested(&media.rules)),
                CssRule::Supports(supports) => pending.push(nested(&supports.rules)),
                // keyframes, font-face, imports... carry no element selectors
                _ => {}
            }
        }

        tracing::trace!(rules = result.rules.len(), "parsed stylesheet");
        Ok(result)
    }
}

fn nested<'a, 'i>(rules: &'a CssRuleList<'i>) -> std::slice::Iter<'a, CssRule<'i>> {
    rules.0.iter()
}
