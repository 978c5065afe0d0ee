use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;

use crate::tags::LINK_PREFIX;

/// Maximum length of a tag before it gets put onto a line on its own.
const MAX_INLINE_TAG_LEN: usize = 12;

/// Parsed contents of a Ledger comment, suitable for manipulation before being
/// (re)output.
///
/// Value tags serve as the metadata mapping of a transaction or posting, and
/// flag tags starting with `^` are link tokens.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Comment {
    /// Plain text lines in the comment.
    pub lines: Vec<String>,
    /// Tags that are present or not, e.g: `":TAG:"`.
    pub tags: HashSet<String>,
    /// Tags that have a string value, e.g: `"TAG: value"`.
    pub value_tags: HashMap<String, String>,
}

impl Comment {
    /// Creates an empty `Comment`.
    pub fn new() -> Self {
        Self {
            lines: Default::default(),
            tags: Default::default(),
            value_tags: Default::default(),
        }
    }

    /// Starts declarative creation of a `Comment`.
    #[cfg(test)]
    pub fn builder() -> CommentBuilder {
        CommentBuilder::new()
    }

    pub fn from_opt_string(comment: &Option<String>) -> Self {
        Self::from_opt_comment(comment.as_deref())
    }

    /// Parses the given string into a `Comment`.
    pub fn from_opt_comment(comment: Option<&str>) -> Self {
        lazy_static! {
            static ref VALUE_TAG_RX: Regex = Regex::new(r"^[ ]*([^: ]+):(?:[ ]+(.+))?$").unwrap();
        }
        lazy_static! {
            static ref FLAG_TAG_RX: Regex = Regex::new(r":((?:[^: ]+:)+)").unwrap();
        }

        let mut result = Comment::new();

        let comment: &str = match comment {
            Some(s) => s,
            None => return result,
        };

        for line in comment.split('\n') {
            // Value tags comprise an entire comment line.
            if let Some(kv_parts) = VALUE_TAG_RX.captures(line) {
                let key = kv_parts
                    .get(1)
                    .expect("should always have group 1")
                    .as_str();
                let value = kv_parts.get(2).map(|c| c.as_str()).unwrap_or("");
                result
                    .value_tags
                    .insert(key.to_string(), value.trim().to_string());
                continue;
            }

            // Flag tag groups can be mixed into a line with comment text.
            let mut leading_start: usize = 0;
            for flag_group in FLAG_TAG_RX.captures_iter(line) {
                let all = flag_group.get(0).expect("should always have group 0");
                let flags = flag_group.get(1).expect("should always have group 1");
                let text = line[leading_start..all.start()].trim();
                if !text.is_empty() {
                    result.lines.push(text.to_string());
                }
                leading_start = all.end();

                for flag in flags.as_str().trim_end_matches(':').split(':') {
                    result.tags.insert(flag.to_string());
                }
            }
            let text = line[leading_start..].trim();
            if !text.is_empty() {
                result.lines.push(text.to_string());
            }
        }
        result
    }

    /// Formats this `Comment` into a string.
    pub fn into_opt_comment(self) -> Option<String> {
        let mut out_lines = Vec::<String>::new();

        if !self.tags.is_empty() {
            let (mut short_tags, mut long_tags): (Vec<String>, Vec<String>) = self
                .tags
                .into_iter()
                .partition(|tag| tag.len() <= MAX_INLINE_TAG_LEN);

            if !short_tags.is_empty() {
                short_tags.sort();
                out_lines.push(format!(":{}:", short_tags.join(":")));
            }

            // Put any long tags (which includes most links) onto a line of
            // their own.
            long_tags.sort();
            out_lines.extend(long_tags.into_iter().map(|tag| format!(":{}:", tag)));
        }
        for (i, line) in self.lines.into_iter().enumerate() {
            if i == 0 && !out_lines.is_empty() {
                out_lines[0].push(' ');
                out_lines[0].push_str(line.trim());
            } else {
                out_lines.push(line.trim().to_string());
            }
        }

        let mut sorted_entries: Vec<(String, String)> = self.value_tags.into_iter().collect();
        sorted_entries.sort();
        for (k, v) in sorted_entries.into_iter() {
            out_lines.push(format!("{}: {}", k.trim(), v.trim()));
        }

        if !out_lines.is_empty() {
            Some(out_lines.join("\n"))
        } else {
            None
        }
    }

    /// Returns the link tokens (without their `^` marker) in sorted order, so
    /// that lookups that stop at the first hit are deterministic.
    pub fn links(&self) -> Vec<&str> {
        let mut links: Vec<&str> = self
            .tags
            .iter()
            .filter_map(|tag| tag.strip_prefix(LINK_PREFIX))
            .filter(|link| !link.is_empty())
            .collect();
        links.sort_unstable();
        links
    }

    /// Returns the value of the value tag `key`, treating an empty value as
    /// absent.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.value_tags
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Helper to declaratively define a `Comment`.
#[cfg(test)]
#[derive(Clone)]
pub struct CommentBuilder {
    comment: Comment,
}

#[cfg(test)]
impl CommentBuilder {
    fn new() -> Self {
        CommentBuilder {
            comment: Comment::new(),
        }
    }

    /// Builds the final `Comment`.
    pub fn build(self) -> Comment {
        self.comment
    }

    pub fn with_line<S: Into<String>>(mut self, line: S) -> Self {
        self.comment.lines.push(line.into());
        self
    }

    pub fn with_tag<K: Into<String>>(mut self, k: K) -> Self {
        self.comment.tags.insert(k.into());
        self
    }

    pub fn with_link<K: AsRef<str>>(mut self, link: K) -> Self {
        self.comment
            .tags
            .insert(format!("{}{}", LINK_PREFIX, link.as_ref()));
        self
    }

    pub fn with_value_tag<K: Into<String>, V: Into<String>>(mut self, k: K, v: V) -> Self {
        self.comment.value_tags.insert(k.into(), v.into());
        self
    }
}
