//--------------------------------------------------------------------------------------------------
// STRUCTS & ENUMS
//--------------------------------------------------------------------------------------------------
// | Name                    | Description                                       | Key Methods       |
// |-------------------------|---------------------------------------------------|------------------|
// | PatternToken            | One segment of a subscription pattern             | from_segment      |
// | TopicPattern            | Parsed subscription pattern                       | parse, tokens     |
//--------------------------------------------------------------------------------------------------
// FUNCTIONS
//--------------------------------------------------------------------------------------------------
// | Name                  | Description                               | Return Type             |
// |-----------------------|-------------------------------------------|------------------------|
// | split_topic           | Splits a topic into its words             | Vec<&str>              |
//--------------------------------------------------------------------------------------------------

use std::fmt;

/// Separator between topic segments
pub const TOPIC_SEPARATOR: char = '.';

/// Pattern segment matching exactly one topic segment
pub const SINGLE_WILDCARD: &str = "*";

/// Pattern segment matching zero or more topic segments
pub const MULTI_WILDCARD: &str = "#";

/// Splits an emitted topic into its words.
///
/// Every segment is a literal word, including empty ones produced by leading,
/// trailing or doubled separators, and words spelled `*` or `#`.
pub fn split_topic(topic: &str) -> Vec<&str> {
    topic.split(TOPIC_SEPARATOR).collect()
}

/// A single segment of a subscription pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternToken {
    /// Matches the identical topic word
    Literal(String),
    /// `*`: matches exactly one topic word
    Single,
    /// `#`: matches zero or more topic words
    Multi,
}

impl PatternToken {
    /// Classifies a raw pattern segment.
    pub fn from_segment(segment: &str) -> Self {
        match segment {
            SINGLE_WILDCARD => PatternToken::Single,
            MULTI_WILDCARD => PatternToken::Multi,
            word => PatternToken::Literal(word.to_string()),
        }
    }

    /// Returns true for `*` and `#`
    pub fn is_wildcard(&self) -> bool {
        !matches!(self, PatternToken::Literal(_))
    }
}

impl fmt::Display for PatternToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternToken::Literal(word) => f.write_str(word),
            PatternToken::Single => f.write_str(SINGLE_WILDCARD),
            PatternToken::Multi => f.write_str(MULTI_WILDCARD),
        }
    }
}

/// A parsed subscription pattern such as `metrics.*.changed` or `audit.#`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopicPattern {
    raw: String,
    tokens: Vec<PatternToken>,
}

impl TopicPattern {
    /// Parses a pattern. Any string is accepted.
    pub fn parse(pattern: &str) -> Self {
        let tokens = pattern
            .split(TOPIC_SEPARATOR)
            .map(PatternToken::from_segment)
            .collect();

        Self {
            raw: pattern.to_string(),
            tokens,
        }
    }

    /// Returns the pattern as it was written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the parsed segments in order
    pub fn tokens(&self) -> &[PatternToken] {
        &self.tokens
    }

    /// Returns true if any segment is `*` or `#`
    pub fn has_wildcards(&self) -> bool {
        self.tokens.iter().any(PatternToken::is_wildcard)
    }
}

impl fmt::Display for TopicPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for TopicPattern {
    fn from(pattern: &str) -> Self {
        Self::parse(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_topic_keeps_empty_words() {
        assert_eq!(split_topic("metrics.changed"), vec!["metrics", "changed"]);
        assert_eq!(split_topic("a..b"), vec!["a", "", "b"]);
        assert_eq!(split_topic(".a."), vec!["", "a", ""]);
        assert_eq!(split_topic(""), vec![""]);
    }

    #[test]
    fn test_split_topic_treats_wildcards_as_words() {
        assert_eq!(split_topic("a.*.#"), vec!["a", "*", "#"]);
    }

    #[test]
    fn test_parse_pattern() {
        let pattern = TopicPattern::parse("metrics.*.#");

        assert_eq!(
            pattern.tokens(),
            &[
                PatternToken::Literal("metrics".to_string()),
                PatternToken::Single,
                PatternToken::Multi,
            ]
        );
        assert!(pattern.has_wildcards());
        assert_eq!(pattern.to_string(), "metrics.*.#");
    }

    #[test]
    fn test_wildcard_only_inside_whole_segment() {
        let pattern = TopicPattern::parse("a*.#b");

        assert!(!pattern.has_wildcards());
        assert_eq!(pattern.tokens()[0], PatternToken::Literal("a*".to_string()));
    }
}
