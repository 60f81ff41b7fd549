//! Selector matching against a [`DomTree`]
//!
//! Complex selectors are matched right to left: the rightmost compound is
//! tested on the candidate, then combinators walk towards ancestors or
//! preceding siblings.

use fos_dom::{DomTree, NodeId};

use crate::selectors::{
    Combinator, ComplexSelector, CompoundSelector, PseudoClass, SelectorComponent, SelectorError,
    SelectorList,
};

/// Matching state shared by one query
#[derive(Clone, Copy)]
pub struct MatchContext<'a> {
    tree: &'a DomTree,
    /// Scoping root for `:scope`
    scope: NodeId,
}

impl<'a> MatchContext<'a> {
    pub fn new(tree: &'a DomTree, scope: NodeId) -> Self {
        Self { tree, scope }
    }

    /// Whether `element` matches any selector of the list
    pub fn matches(&self, element: NodeId, list: &SelectorList) -> bool {
        self.tree.is_element(element) && list.iter().any(|s| self.matches_complex(element, s))
    }

    fn matches_complex(&self, element: NodeId, complex: &ComplexSelector) -> bool {
        match complex.compounds.len() {
            0 => false,
            n => self.matches_from(complex, n - 1, element),
        }
    }

    fn matches_from(&self, complex: &ComplexSelector, index: usize, element: NodeId) -> bool {
        if !self.matches_compound(element, &complex.compounds[index]) {
            return false;
        }
        if index == 0 {
            return true;
        }
        let next = index - 1;
        let tree = self.tree;
        match complex.combinators[next] {
            Combinator::Child => tree
                .parent_element(element)
                .is_some_and(|p| self.matches_from(complex, next, p)),
            Combinator::Descendant => {
                let mut current = tree.parent_element(element);
                while let Some(ancestor) = current {
                    if self.matches_from(complex, next, ancestor) {
                        return true;
                    }
                    current = tree.parent_element(ancestor);
                }
                false
            }
            Combinator::NextSibling => tree
                .previous_element_sibling(element)
                .is_some_and(|s| self.matches_from(complex, next, s)),
            Combinator::SubsequentSibling => {
                let mut current = tree.previous_element_sibling(element);
                while let Some(sibling) = current {
                    if self.matches_from(complex, next, sibling) {
                        return true;
                    }
                    current = tree.previous_element_sibling(sibling);
                }
                false
            }
        }
    }

    fn matches_compound(&self, element: NodeId, compound: &CompoundSelector) -> bool {
        compound
            .components
            .iter()
            .all(|c| self.matches_component(element, c))
    }

    fn matches_component(&self, element: NodeId, component: &SelectorComponent) -> bool {
        let Some(data) = self.tree.element(element) else {
            return false;
        };
        match component {
            SelectorComponent::Universal => true,
            SelectorComponent::Type(tag) => data.local_name == *tag,
            SelectorComponent::Id(id) => data.id() == Some(id.as_str()),
            SelectorComponent::Class(class) => data.has_class(class),
            SelectorComponent::Attribute(attr) => attr.matches(data.get_attr(&attr.name)),
            SelectorComponent::PseudoClass(pseudo) => self.matches_pseudo_class(element, pseudo),
        }
    }

    fn matches_pseudo_class(&self, element: NodeId, pseudo: &PseudoClass) -> bool {
        let tree = self.tree;
        match pseudo {
            PseudoClass::Link => {
                matches!(tree.local_name(element), Some("a" | "area"))
                    && tree.element(element).is_some_and(|e| e.get_attr("href").is_some())
            }
            PseudoClass::Root => self.is_root(element),
            PseudoClass::Scope => {
                if tree.is_element(self.scope) {
                    element == self.scope
                } else {
                    self.is_root(element)
                }
            }
            PseudoClass::Empty => tree.children(element).all(|c| match tree.get(c) {
                Some(node) if node.is_element() => false,
                Some(node) => node.as_text().is_none_or(str::is_empty),
                None => true,
            }),
            PseudoClass::FirstChild => tree.previous_element_sibling(element).is_none(),
            PseudoClass::LastChild => tree.next_element_sibling(element).is_none(),
            PseudoClass::OnlyChild => {
                tree.previous_element_sibling(element).is_none()
                    && tree.next_element_sibling(element).is_none()
            }
            PseudoClass::FirstOfType => self.type_index(element, false) == 1,
            PseudoClass::LastOfType => self.type_index(element, true) == 1,
            PseudoClass::OnlyOfType => {
                self.type_index(element, false) == 1 && self.type_index(element, true) == 1
            }
            PseudoClass::NthChild(expr) => expr.matches(self.child_index(element, false)),
            PseudoClass::NthLastChild(expr) => expr.matches(self.child_index(element, true)),
            PseudoClass::NthOfType(expr) => expr.matches(self.type_index(element, false)),
            PseudoClass::NthLastOfType(expr) => expr.matches(self.type_index(element, true)),
            PseudoClass::Not(list) => !list.iter().any(|s| self.matches_complex(element, s)),
            PseudoClass::Is(list) | PseudoClass::Where(list) => {
                list.iter().any(|s| self.matches_complex(element, s))
            }
        }
    }

    fn is_root(&self, element: NodeId) -> bool {
        self.tree.parent(element) == Some(self.tree.root())
    }

    /// 1-based position among element siblings
    fn child_index(&self, element: NodeId, from_end: bool) -> i32 {
        let step = |n: NodeId| {
            if from_end {
                self.tree.next_element_sibling(n)
            } else {
                self.tree.previous_element_sibling(n)
            }
        };
        let mut index = 1;
        let mut current = step(element);
        while let Some(sibling) = current {
            index += 1;
            current = step(sibling);
        }
        index
    }

    /// 1-based position among same-tag element siblings
    fn type_index(&self, element: NodeId, from_end: bool) -> i32 {
        let tag = self.tree.local_name(element);
        let step = |n: NodeId| {
            if from_end {
                self.tree.next_element_sibling(n)
            } else {
                self.tree.previous_element_sibling(n)
            }
        };
        let mut index = 1;
        let mut current = step(element);
        while let Some(sibling) = current {
            if self.tree.local_name(sibling) == tag {
                index += 1;
            }
            current = step(sibling);
        }
        index
    }
}

/// Whether `element` matches `list`, with the document as scoping root
pub fn matches_selector(tree: &DomTree, element: NodeId, list: &SelectorList) -> bool {
    MatchContext::new(tree, tree.root()).matches(element, list)
}

/// All elements below `scope` matching `list`, in document order
pub fn query_selector_all(tree: &DomTree, scope: NodeId, list: &SelectorList) -> Vec<NodeId> {
    let cx = MatchContext::new(tree, scope);
    tree.descendants(scope).filter(|&n| cx.matches(n, list)).collect()
}

/// First element below `scope` matching `list`
pub fn query_selector(tree: &DomTree, scope: NodeId, list: &SelectorList) -> Option<NodeId> {
    let cx = MatchContext::new(tree, scope);
    tree.descendants(scope).find(|&n| cx.matches(n, list))
}

/// Parse `selector` and run [`query_selector_all`]
pub fn select(tree: &DomTree, scope: NodeId, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
    let list = SelectorList::parse(selector)?;
    Ok(query_selector_all(tree, scope, &list))
}
