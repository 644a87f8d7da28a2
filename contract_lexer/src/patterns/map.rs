//! Pattern rule store: a trie over name segments

use super::error::PatternError;
use super::pattern::Pattern;
use crate::log_debug;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Node<R> {
    children: HashMap<String, Node<R>>,
    rule: Option<R>,
    /// The rule applies to this exact name only, not to descendants
    exact: bool,
}

impl<R> Default for Node<R> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            rule: None,
            exact: false,
        }
    }
}

impl<R> Node<R> {
    fn inherited_rule(&self) -> Option<&R> {
        if self.exact {
            None
        } else {
            self.rule.as_ref()
        }
    }

    fn has_rule_in_subtree(&self) -> bool {
        self.rule.is_some() || self.children.values().any(Node::has_rule_in_subtree)
    }

    fn count_rules(&self) -> usize {
        usize::from(self.rule.is_some())
            + self.children.values().map(Node::count_rules).sum::<usize>()
    }

    fn collect<'a>(&'a self, path: &mut Vec<String>, out: &mut Vec<(String, &'a R)>) {
        if let Some(rule) = &self.rule {
            let key = match (self.exact, path.is_empty()) {
                (true, _) => path.join("."),
                (false, true) => "*".to_string(),
                (false, false) => format!("{}.*", path.join(".")),
            };
            out.push((key, rule));
        }
        for (segment, child) in &self.children {
            path.push(segment.clone());
            child.collect(path, out);
            path.pop();
        }
    }
}

/// Maps exact and wildcard name patterns to rules, most specific first
///
/// A wildcard rule on `a.b.*` applies to `a.b` and everything below it
/// unless a deeper pattern says otherwise. An exact rule on `a.b` applies
/// to `a.b` only. Storing a rule equal to the one a name already inherits
/// is redundant and is not kept, so every stored rule differs from its
/// nearest wildcard ancestor.
///
/// The map is built with `&mut self` and then shared for lookups.
#[derive(Debug, Clone)]
pub struct PatternMap<R> {
    root: Node<R>,
}

impl<R> Default for PatternMap<R> {
    fn default() -> Self {
        Self {
            root: Node::default(),
        }
    }
}

impl<R: Clone + PartialEq> PatternMap<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from `(pattern, rule)` pairs
    ///
    /// Pairs are applied parents first, so the result does not depend on
    /// the iteration order of the input. Fails on the first invalid pattern.
    pub fn from_rules<I, K>(rules: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = (K, R)>,
        K: AsRef<str>,
    {
        let mut parsed = rules
            .into_iter()
            .map(|(pattern, rule)| -> Result<(Pattern, R), PatternError> {
                Ok((pattern.as_ref().parse()?, rule))
            })
            .collect::<Result<Vec<_>, _>>()?;
        // Wildcard before exact on the same node, so the exact rule wins
        parsed.sort_by(|(a, _), (b, _)| {
            a.segments()
                .cmp(b.segments())
                .then(b.is_wildcard().cmp(&a.is_wildcard()))
        });

        let mut map = Self::new();
        for (pattern, rule) in parsed {
            map.insert(&pattern, rule);
        }
        Ok(map)
    }

    /// Store `rule` for `pattern`
    pub fn put(&mut self, pattern: &str, rule: R) -> Result<(), PatternError> {
        let pattern: Pattern = pattern.parse()?;
        self.insert(&pattern, rule);
        Ok(())
    }

    /// Store `rule` for an already parsed pattern
    pub fn insert(&mut self, pattern: &Pattern, rule: R) {
        let mut inherited: Option<(usize, R)> = None;
        let mut node = &mut self.root;
        for (depth, segment) in pattern.segments().iter().enumerate() {
            if let Some(ancestor_rule) = node.inherited_rule() {
                inherited = Some((depth, ancestor_rule.clone()));
            }
            node = node.children.entry(segment.clone()).or_default();
        }

        let inherited_depth = match inherited {
            Some((depth, inherited_rule)) if inherited_rule == rule => depth,
            _ => {
                node.rule = Some(rule);
                node.exact = !pattern.is_wildcard();
                if pattern.is_wildcard() {
                    node.children.clear();
                }
                log_debug!("Rule stored", "pattern" => pattern);
                return;
            }
        };

        node.rule = None;
        node.exact = false;
        if pattern.is_wildcard() {
            node.children.clear();
        }
        self.prune(pattern.segments(), inherited_depth);
        log_debug!("Redundant rule dropped", "pattern" => pattern);
    }

    /// Detach the first node below the inherited one, along `segments`,
    /// whose subtree no longer holds any rule. At most one node goes.
    fn prune(&mut self, segments: &[String], inherited_depth: usize) {
        let mut node = &mut self.root;
        for segment in &segments[..inherited_depth] {
            match node.children.get_mut(segment) {
                Some(child) => node = child,
                None => return,
            }
        }

        for segment in &segments[inherited_depth..] {
            let dead = match node.children.get(segment) {
                Some(child) => !child.has_rule_in_subtree(),
                None => return,
            };
            if dead {
                node.children.remove(segment);
                return;
            }
            match node.children.get_mut(segment) {
                Some(child) => node = child,
                None => return,
            }
        }
    }

    /// Rule for a name: the deepest wildcard along its path, or an exact
    /// rule on the name itself, whichever is more specific
    pub fn get(&self, name: &str) -> Result<Option<&R>, PatternError> {
        let name = Pattern::name(name)?;
        Ok(self.lookup(&name))
    }

    /// Rule for an already parsed name
    pub fn lookup(&self, name: &Pattern) -> Option<&R> {
        let segments = name.segments();
        let mut node = &self.root;
        let mut best = node.inherited_rule();

        for (index, segment) in segments.iter().enumerate() {
            match node.children.get(segment) {
                Some(child) => node = child,
                None => break,
            }
            if let Some(rule) = &node.rule {
                if !node.exact || index + 1 == segments.len() {
                    best = Some(rule);
                }
            }
        }
        best
    }

    /// Whether a wildcard pattern has more specific patterns below it
    ///
    /// Always false for exact patterns.
    pub fn is_overridden(&self, pattern: &str) -> Result<bool, PatternError> {
        let pattern: Pattern = pattern.parse()?;
        if !pattern.is_wildcard() {
            return Ok(false);
        }

        let mut node = &self.root;
        for segment in pattern.segments() {
            match node.children.get(segment) {
                Some(child) => node = child,
                None => return Ok(false),
            }
        }
        Ok(!node.children.is_empty())
    }

    /// Number of stored rules
    pub fn len(&self) -> usize {
        self.root.count_rules()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored `(canonical pattern, rule)` pairs sorted by pattern
    pub fn entries(&self) -> Vec<(String, &R)> {
        let mut out = Vec::new();
        self.root.collect(&mut Vec::new(), &mut out);
        out.sort_by(|(a, _), (b, _)| a.cmp(b));
        out
    }

    /// Whether a node exists for the exact path of `pattern`
    pub fn contains_node(&self, pattern: &str) -> Result<bool, PatternError> {
        let pattern: Pattern = pattern.parse()?;
        let mut node = &self.root;
        for segment in pattern.segments() {
            match node.children.get(segment) {
                Some(child) => node = child,
                None => return Ok(false),
            }
        }
        Ok(true)
    }
}
