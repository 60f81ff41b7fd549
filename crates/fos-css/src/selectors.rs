//! CSS Selectors Module
//!
//! Selector syntax tree and the parser that produces it. Supported:
//! type/universal, `#id`, `.class`, attribute selectors with all six
//! operators and the `i`/`s` flags, the tree-structural pseudo-classes,
//! `:link`, `:scope`, `:not()`, `:is()`, `:where()` and the four
//! combinators. Pseudo-elements and namespaces are rejected.

/// Selector parse failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected end of selector")]
    UnexpectedEnd,
    #[error("unexpected {found:?} at offset {offset}")]
    Unexpected { offset: usize, found: char },
    #[error("unsupported pseudo-class :{0}")]
    UnsupportedPseudoClass(String),
    #[error("pseudo-elements cannot be matched against elements")]
    PseudoElement,
    #[error("invalid An+B expression {0:?}")]
    InvalidNth(String),
}

/// Comma-separated list of complex selectors
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
}

impl SelectorList {
    /// Parse selector text such as `div > p.note, #main`
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut parser = Parser::new(input);
        parser.skip_whitespace();
        let list = parser.selector_list()?;
        parser.skip_whitespace();
        match parser.peek() {
            None => Ok(list),
            Some(found) => Err(parser.unexpected(found)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComplexSelector> {
        self.selectors.iter()
    }

    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }
}

/// Compound selectors joined by combinators, left to right.
///
/// `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSelector {
    pub compounds: Vec<CompoundSelector>,
    pub combinators: Vec<Combinator>,
}

/// Simple selectors that all apply to the same element
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundSelector {
    pub components: Vec<SelectorComponent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `a b`
    Descendant,
    /// `a > b`
    Child,
    /// `a + b`
    NextSibling,
    /// `a ~ b`
    SubsequentSibling,
}

/// A component of a selector
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorComponent {
    /// Universal selector *
    Universal,
    /// Type selector (lower-cased tag name)
    Type(String),
    /// ID selector #id
    Id(String),
    /// Class selector .class
    Class(String),
    /// Attribute selector [attr], [attr=value], etc.
    Attribute(AttributeSelector),
    /// Pseudo-class :first-child, :nth-of-type(), etc.
    PseudoClass(PseudoClass),
}

/// Pseudo-class type
#[derive(Debug, Clone, PartialEq)]
pub enum PseudoClass {
    Link,
    Root,
    Scope,
    Empty,
    FirstChild,
    LastChild,
    OnlyChild,
    FirstOfType,
    LastOfType,
    OnlyOfType,
    NthChild(NthExpression),
    NthLastChild(NthExpression),
    NthOfType(NthExpression),
    NthLastOfType(NthExpression),
    Not(SelectorList),
    Is(SelectorList),
    Where(SelectorList),
}

/// An+B expression for :nth-* selectors
#[derive(Debug, Clone, PartialEq)]
pub struct NthExpression {
    /// Coefficient (A in An+B)
    pub a: i32,
    /// Offset (B in An+B)
    pub b: i32,
}

impl NthExpression {
    /// Create "odd" expression (2n+1)
    pub fn odd() -> Self {
        Self { a: 2, b: 1 }
    }

    /// Create "even" expression (2n)
    pub fn even() -> Self {
        Self { a: 2, b: 0 }
    }

    /// Create a simple index (0n+b)
    pub fn index(n: i32) -> Self {
        Self { a: 0, b: n }
    }

    /// Create An+B expression
    pub fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// Parse from string like "2n+1", "odd", "even", "3"
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();

        match s.as_str() {
            "odd" => return Some(Self::odd()),
            "even" => return Some(Self::even()),
            _ => {}
        }

        // Try to parse as simple number
        if let Ok(n) = s.parse::<i32>() {
            return Some(Self::index(n));
        }

        // Parse An+B format
        let s = s.replace(' ', "");

        let n_pos = s.find('n')?;
        let a_str = &s[..n_pos];
        let a = match a_str {
            "" | "+" => 1,
            "-" => -1,
            _ => a_str.parse().ok()?,
        };

        let rest = &s[n_pos + 1..];
        let b = if rest.is_empty() { 0 } else { rest.parse().ok()? };

        Some(Self::new(a, b))
    }

    /// Check if index n (1-based) matches this expression
    pub fn matches(&self, n: i32) -> bool {
        if self.a == 0 {
            return n == self.b;
        }

        let diff = n - self.b;
        if self.a > 0 {
            diff >= 0 && diff % self.a == 0
        } else {
            diff <= 0 && diff % self.a == 0
        }
    }
}

/// Attribute selector
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    /// Lower-cased attribute name
    pub name: String,
    pub matcher: Option<AttributeMatcher>,
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeMatcher {
    /// [attr=value] - exact match
    Exact(String),
    /// [attr~=value] - whitespace-separated list contains
    Contains(String),
    /// [attr|=value] - exact or prefix with hyphen
    DashMatch(String),
    /// [attr^=value] - starts with
    Prefix(String),
    /// [attr$=value] - ends with
    Suffix(String),
    /// [attr*=value] - contains substring
    Substring(String),
}

impl AttributeSelector {
    /// Check if an attribute value matches
    pub fn matches(&self, value: Option<&str>) -> bool {
        let Some(value) = value else {
            return false;
        };
        let Some(matcher) = &self.matcher else {
            return true;
        };
        let fold = |s: &str| {
            if self.case_insensitive {
                s.to_lowercase()
            } else {
                s.to_string()
            }
        };
        let val = fold(value);

        match matcher {
            AttributeMatcher::Exact(expected) => val == fold(expected),
            AttributeMatcher::Contains(expected) => {
                let expected = fold(expected);
                !expected.is_empty() && val.split_ascii_whitespace().any(|w| w == expected)
            }
            AttributeMatcher::DashMatch(expected) => {
                let expected = fold(expected);
                val == expected
                    || (val.starts_with(&expected) && val[expected.len()..].starts_with('-'))
            }
            AttributeMatcher::Prefix(expected) => {
                !expected.is_empty() && val.starts_with(&fold(expected))
            }
            AttributeMatcher::Suffix(expected) => {
                !expected.is_empty() && val.ends_with(&fold(expected))
            }
            AttributeMatcher::Substring(expected) => {
                !expected.is_empty() && val.contains(&fold(expected))
            }
        }
    }
}

// ============================================================================
// Parser
// ============================================================================

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.input[self.pos..].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), SelectorError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(found) => Err(self.unexpected(found)),
            None => Err(SelectorError::UnexpectedEnd),
        }
    }

    fn unexpected(&self, found: char) -> SelectorError {
        SelectorError::Unexpected { offset: self.pos, found }
    }

    /// Returns true if any whitespace was consumed
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while matches!(self.peek(), Some(' ' | '\t' | '\n' | '\r' | '\u{c}')) {
            self.pos += 1;
        }
        self.pos != start
    }

    fn selector_list(&mut self) -> Result<SelectorList, SelectorError> {
        let mut selectors = vec![self.complex()?];
        loop {
            self.skip_whitespace();
            if !self.eat(',') {
                break;
            }
            self.skip_whitespace();
            selectors.push(self.complex()?);
        }
        Ok(SelectorList { selectors })
    }

    fn complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();
        loop {
            let had_space = self.skip_whitespace();
            let combinator = match self.peek() {
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(',' | ')') | None => break,
                Some(_) if had_space => {
                    combinators.push(Combinator::Descendant);
                    compounds.push(self.compound()?);
                    continue;
                }
                Some(found) => return Err(self.unexpected(found)),
            };
            self.bump();
            self.skip_whitespace();
            combinators.push(combinator);
            compounds.push(self.compound()?);
        }
        Ok(ComplexSelector { compounds, combinators })
    }

    fn compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut components = Vec::new();

        if self.eat('*') {
            components.push(SelectorComponent::Universal);
        } else if self.at_identifier() {
            components.push(SelectorComponent::Type(self.identifier()?.to_ascii_lowercase()));
        }
        if self.peek() == Some('|') {
            return Err(self.unexpected('|'));
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    components.push(SelectorComponent::Id(self.identifier()?));
                }
                Some('.') => {
                    self.bump();
                    components.push(SelectorComponent::Class(self.identifier()?));
                }
                Some('[') => {
                    self.bump();
                    components.push(SelectorComponent::Attribute(self.attribute()?));
                }
                Some(':') => {
                    self.bump();
                    components.push(SelectorComponent::PseudoClass(self.pseudo_class()?));
                }
                _ => break,
            }
        }

        if components.is_empty() {
            return match self.peek() {
                Some(found) => Err(self.unexpected(found)),
                None => Err(SelectorError::Empty),
            };
        }
        Ok(CompoundSelector { components })
    }

    fn attribute(&mut self) -> Result<AttributeSelector, SelectorError> {
        self.skip_whitespace();
        let name = self.identifier()?.to_ascii_lowercase();
        self.skip_whitespace();
        if self.eat(']') {
            return Ok(AttributeSelector { name, matcher: None, case_insensitive: false });
        }

        let op = match self.bump() {
            Some('=') => None,
            Some(c @ ('~' | '|' | '^' | '$' | '*')) => {
                self.expect('=')?;
                Some(c)
            }
            Some(found) => {
                self.pos -= found.len_utf8();
                return Err(self.unexpected(found));
            }
            None => return Err(SelectorError::UnexpectedEnd),
        };
        self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                self.string(quote)?
            }
            _ => self.identifier()?,
        };
        self.skip_whitespace();

        let mut case_insensitive = false;
        if let Some(flag @ ('i' | 'I' | 's' | 'S')) = self.peek() {
            self.bump();
            case_insensitive = flag.eq_ignore_ascii_case(&'i');
            self.skip_whitespace();
        }
        self.expect(']')?;

        let matcher = match op {
            None => AttributeMatcher::Exact(value),
            Some('~') => AttributeMatcher::Contains(value),
            Some('|') => AttributeMatcher::DashMatch(value),
            Some('^') => AttributeMatcher::Prefix(value),
            Some('$') => AttributeMatcher::Suffix(value),
            Some(_) => AttributeMatcher::Substring(value),
        };
        Ok(AttributeSelector { name, matcher: Some(matcher), case_insensitive })
    }

    fn pseudo_class(&mut self) -> Result<PseudoClass, SelectorError> {
        if self.peek() == Some(':') {
            return Err(SelectorError::PseudoElement);
        }
        let name = self.identifier()?.to_ascii_lowercase();

        if !self.eat('(') {
            return match name.as_str() {
                "link" | "any-link" => Ok(PseudoClass::Link),
                "root" => Ok(PseudoClass::Root),
                "scope" => Ok(PseudoClass::Scope),
                "empty" => Ok(PseudoClass::Empty),
                "first-child" => Ok(PseudoClass::FirstChild),
                "last-child" => Ok(PseudoClass::LastChild),
                "only-child" => Ok(PseudoClass::OnlyChild),
                "first-of-type" => Ok(PseudoClass::FirstOfType),
                "last-of-type" => Ok(PseudoClass::LastOfType),
                "only-of-type" => Ok(PseudoClass::OnlyOfType),
                "before" | "after" | "first-line" | "first-letter" => {
                    Err(SelectorError::PseudoElement)
                }
                _ => Err(SelectorError::UnsupportedPseudoClass(name)),
            };
        }

        let pseudo = match name.as_str() {
            "nth-child" => PseudoClass::NthChild(self.nth_argument()?),
            "nth-last-child" => PseudoClass::NthLastChild(self.nth_argument()?),
            "nth-of-type" => PseudoClass::NthOfType(self.nth_argument()?),
            "nth-last-of-type" => PseudoClass::NthLastOfType(self.nth_argument()?),
            "not" | "is" | "matches" | "where" => {
                self.skip_whitespace();
                let list = self.selector_list()?;
                self.skip_whitespace();
                match name.as_str() {
                    "not" => PseudoClass::Not(list),
                    "where" => PseudoClass::Where(list),
                    _ => PseudoClass::Is(list),
                }
            }
            _ => return Err(SelectorError::UnsupportedPseudoClass(name)),
        };
        self.expect(')')?;
        Ok(pseudo)
    }

    fn nth_argument(&mut self) -> Result<NthExpression, SelectorError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == ')' {
                break;
            }
            self.bump();
        }
        let raw = &self.input[start..self.pos];
        NthExpression::parse(raw).ok_or_else(|| SelectorError::InvalidNth(raw.to_string()))
    }

    fn at_identifier(&self) -> bool {
        let is_start = |c: char| c.is_ascii_alphabetic() || c == '_' || c >= '\u{80}';
        match self.peek() {
            Some('\\') => true,
            Some('-') => match self.peek_second() {
                Some(c) => is_start(c) || c == '-' || c == '\\',
                None => false,
            },
            Some(c) => is_start(c),
            None => false,
        }
    }

    fn identifier(&mut self) -> Result<String, SelectorError> {
        if !self.at_identifier() {
            return match self.peek() {
                Some(found) => Err(self.unexpected(found)),
                None => Err(SelectorError::UnexpectedEnd),
            };
        }
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.bump();
                out.push(self.escape()?);
            } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c >= '\u{80}' {
                self.bump();
                out.push(c);
            } else {
                break;
            }
        }
        Ok(out)
    }

    fn string(&mut self, quote: char) -> Result<String, SelectorError> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(SelectorError::UnexpectedEnd),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.peek() {
                    None => return Err(SelectorError::UnexpectedEnd),
                    Some('\n') => {
                        self.bump();
                    }
                    Some(_) => out.push(self.escape()?),
                },
                Some(c) => out.push(c),
            }
        }
    }

    /// Decode the escape following a consumed backslash
    fn escape(&mut self) -> Result<char, SelectorError> {
        let start = self.pos;
        while self.pos - start < 6 && self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
            self.pos += 1;
        }
        if self.pos == start {
            return match self.bump() {
                Some('\n') | None => Err(SelectorError::UnexpectedEnd),
                Some(c) => Ok(c),
            };
        }
        let code = u32::from_str_radix(&self.input[start..self.pos], 16).unwrap_or(0);
        // a single whitespace terminates a hex escape
        if self.eat('\r') {
            self.eat('\n');
        } else if matches!(self.peek(), Some(' ' | '\t' | '\n' | '\u{c}')) {
            self.pos += 1;
        }
        Ok(match char::from_u32(code) {
            Some('\0') | None => '\u{fffd}',
            Some(c) => c,
        })
    }
}
