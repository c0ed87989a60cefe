//! Ordered node-name collections
//!
//! A `NodeSet` holds node (or plug) names in insertion order and can
//! render them in compressed ranged form, e.g. `node[1-3,5]`, the way
//! cluster tooling expects target lists to be written. The degenerate
//! case of a single bare name is supported everywhere.

use thiserror::Error;

/// Error type for node-set parsing
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NodeSetError {
    /// Unbalanced or misplaced brackets
    #[error("malformed bracket expression: {0}")]
    BadBrackets(String),

    /// A range endpoint was not a number
    #[error("invalid range: {0}")]
    BadRange(String),
}

/// An ordered set of node names.
///
/// Duplicates are ignored on insert. Iteration order is insertion
/// order; [`NodeSet::ranged`] sorts internally before compressing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeSet {
    names: Vec<String>,
}

impl NodeSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list with optional bracket ranges,
    /// e.g. `"n1,n5,rack[1-3,7]"`.
    pub fn parse(s: &str) -> Result<Self, NodeSetError> {
        let mut set = NodeSet::new();
        for token in split_outside_brackets(s) {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            match token.find('[') {
                None => {
                    if token.contains(']') {
                        return Err(NodeSetError::BadBrackets(token.to_string()));
                    }
                    set.push(token);
                }
                Some(open) => {
                    let close = token
                        .find(']')
                        .ok_or_else(|| NodeSetError::BadBrackets(token.to_string()))?;
                    if close < open || close != token.len() - 1 {
                        return Err(NodeSetError::BadBrackets(token.to_string()));
                    }
                    let prefix = &token[..open];
                    for part in token[open + 1..close].split(',') {
                        let (lo, hi) = match part.split_once('-') {
                            Some((a, b)) => (a, b),
                            None => (part, part),
                        };
                        let width = lo.len();
                        let lo: u64 = lo
                            .parse()
                            .map_err(|_| NodeSetError::BadRange(part.to_string()))?;
                        let hi: u64 = hi
                            .parse()
                            .map_err(|_| NodeSetError::BadRange(part.to_string()))?;
                        if hi < lo {
                            return Err(NodeSetError::BadRange(part.to_string()));
                        }
                        for n in lo..=hi {
                            set.push(&format!("{prefix}{n:0width$}"));
                        }
                    }
                }
            }
        }
        Ok(set)
    }

    /// Add a name; duplicates are ignored
    pub fn push(&mut self, name: &str) {
        if !self.contains(name) {
            self.names.push(name.to_string());
        }
    }

    /// True if the set contains `name` exactly
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Iterate names in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Render the set in sorted, range-compressed form.
    ///
    /// Names sharing a prefix and a trailing number are folded into
    /// bracket ranges (`n[1-3,5]`); a lone member of a group renders
    /// bare (`n7`). Zero-padding is preserved when uniform within a
    /// group.
    pub fn ranged(&self) -> String {
        let mut groups: Vec<(String, usize, Option<u64>)> = self
            .names
            .iter()
            .map(|n| {
                let split = n.len() - n.chars().rev().take_while(|c| c.is_ascii_digit()).count();
                let (prefix, digits) = n.split_at(split);
                match digits.parse::<u64>() {
                    Ok(v) => (prefix.to_string(), digits.len(), Some(v)),
                    Err(_) => (n.clone(), 0, None),
                }
            })
            .collect();
        groups.sort_by(|a, b| (&a.0, a.2).cmp(&(&b.0, b.2)));

        let mut out: Vec<String> = Vec::new();
        let mut i = 0;
        while i < groups.len() {
            let (prefix, width, num) = &groups[i];
            let Some(start) = num else {
                out.push(prefix.clone());
                i += 1;
                continue;
            };

            // gather all members of this (prefix, width) group
            let mut nums = vec![*start];
            let mut j = i + 1;
            while j < groups.len() && groups[j].0 == *prefix && groups[j].1 == *width {
                if let Some(v) = groups[j].2 {
                    nums.push(v);
                }
                j += 1;
            }

            if nums.len() == 1 {
                out.push(format!("{prefix}{:0w$}", nums[0], w = width));
            } else {
                let mut spans: Vec<String> = Vec::new();
                let mut lo = nums[0];
                let mut hi = nums[0];
                for &v in &nums[1..] {
                    if v == hi + 1 {
                        hi = v;
                    } else {
                        spans.push(span_string(lo, hi, *width));
                        lo = v;
                        hi = v;
                    }
                }
                spans.push(span_string(lo, hi, *width));
                out.push(format!("{prefix}[{}]", spans.join(",")));
            }
            i = j;
        }
        out.join(",")
    }
}

impl<S: AsRef<str>> FromIterator<S> for NodeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = NodeSet::new();
        for name in iter {
            set.push(name.as_ref());
        }
        set
    }
}

impl std::fmt::Display for NodeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.ranged())
    }
}

fn span_string(lo: u64, hi: u64, width: usize) -> String {
    if lo == hi {
        format!("{lo:0width$}")
    } else {
        format!("{lo:0width$}-{hi:0width$}")
    }
}

/// Split on commas that are not inside a bracket expression
fn split_outside_brackets(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                out.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(&s[start..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single() {
        let set = NodeSet::parse("n1").unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains("n1"));
    }

    #[test]
    fn test_parse_list_and_ranges() {
        let set = NodeSet::parse("a,n[1-3,7],b2").unwrap();
        let names: Vec<&str> = set.iter().collect();
        assert_eq!(names, vec!["a", "n1", "n2", "n3", "n7", "b2"]);
    }

    #[test]
    fn test_parse_padded_range() {
        let set = NodeSet::parse("node[01-03]").unwrap();
        let names: Vec<&str> = set.iter().collect();
        assert_eq!(names, vec!["node01", "node02", "node03"]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(NodeSet::parse("n[1-").is_err());
        assert!(NodeSet::parse("n1]").is_err());
        assert!(NodeSet::parse("n[3-1]").is_err());
        assert!(NodeSet::parse("n[x]").is_err());
    }

    #[test]
    fn test_push_dedup() {
        let mut set = NodeSet::new();
        set.push("n1");
        set.push("n1");
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_ranged_compression() {
        let set: NodeSet = ["n3", "n1", "n2", "n5"].into_iter().collect();
        assert_eq!(set.ranged(), "n[1-3,5]");
    }

    #[test]
    fn test_ranged_single_is_bare() {
        let set: NodeSet = ["n7"].into_iter().collect();
        assert_eq!(set.ranged(), "n7");
    }

    #[test]
    fn test_ranged_mixed_prefixes() {
        let set: NodeSet = ["b1", "a2", "a1", "plain"].into_iter().collect();
        assert_eq!(set.ranged(), "a[1-2],b1,plain");
    }

    #[test]
    fn test_ranged_preserves_padding() {
        let set: NodeSet = ["node02", "node01"].into_iter().collect();
        assert_eq!(set.ranged(), "node[01-02]");
    }

    #[test]
    fn test_roundtrip() {
        let set = NodeSet::parse("t[3-5]").unwrap();
        assert_eq!(set.ranged(), "t[3-5]");
    }
}
