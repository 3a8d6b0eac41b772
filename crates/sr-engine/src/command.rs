//! Chat-line parsing.
//!
//! Turns a raw line such as `?r heal b b 5 # aoe` into [`ParsedArgs`]. This is
//! the only place the `r=100,86` forced-roll syntax is recognised.

use regex::Regex;
use serde::Serialize;

use crate::engine::ActionRequest;
use crate::error::{EngineError, EngineResult};

/// A chat command split into its parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedArgs {
    /// Action word, lower-cased.
    pub action: String,
    /// First positional argument, unless it is a number.
    pub rank: Option<String>,
    /// Second positional argument, unless it is a number.
    pub weapon_rank: Option<String>,
    /// Every later token that parses as an integer.
    pub modifiers: Vec<i64>,
    /// Text after the first `#`, trimmed.
    pub comment: Option<String>,
    /// Values from an `r=…` override in the comment.
    pub forced_rolls: Vec<u32>,
}

impl ParsedArgs {
    /// Classify the words following an action: the first non-number is the
    /// mastery rank, a second non-number right after it is the weapon rank,
    /// and every integer is a modifier. Anything else is ignored.
    pub fn from_words<'a>(action: &str, words: impl IntoIterator<Item = &'a str>) -> Self {
        let mut args = Self {
            action: action.to_lowercase(),
            ..Self::default()
        };
        for (position, token) in words.into_iter().enumerate() {
            match token.parse::<i64>() {
                Ok(n) => args.modifiers.push(n),
                Err(_) if position == 0 => args.rank = Some(token.to_string()),
                Err(_) if position == 1 && args.rank.is_some() => {
                    args.weapon_rank = Some(token.to_string());
                }
                Err(_) => {}
            }
        }
        args
    }
}

impl From<ParsedArgs> for ActionRequest {
    fn from(args: ParsedArgs) -> Self {
        Self {
            action: args.action,
            rank: args.rank,
            weapon_rank: args.weapon_rank,
            modifiers: args.modifiers,
            comment: args.comment,
            forced_rolls: args.forced_rolls,
        }
    }
}

/// Parses chat lines that start with a configured prefix.
#[derive(Debug, Clone)]
pub struct CommandParser {
    prefix: String,
    forced: Regex,
}

impl CommandParser {
    /// A parser for lines starting with `prefix`.
    pub fn new(prefix: impl Into<String>) -> EngineResult<Self> {
        let prefix = prefix.into();
        if prefix.trim().is_empty() {
            return Err(EngineError::InvalidConfig(
                "command prefix must not be empty".to_string(),
            ));
        }
        let forced = Regex::new(r"(?i)\br\s*=\s*(\d{1,3}(?:\s*,\s*\d{1,3})*)")
            .map_err(|e| EngineError::InvalidConfig(format!("forced-roll pattern: {e}")))?;
        Ok(Self { prefix, forced })
    }

    /// The configured prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Parse `line`, or `None` if it is not a command.
    pub fn parse(&self, line: &str) -> Option<ParsedArgs> {
        let line = line.replace('\u{a0}', " ");
        let rest = line.trim_start().strip_prefix(self.prefix.as_str())?;

        let (head, comment) = match rest.split_once('#') {
            Some((head, comment)) => (head, Some(comment.trim())),
            None => (rest, None),
        };
        let comment = comment.filter(|c| !c.is_empty()).map(str::to_string);

        let mut tokens = head.split_whitespace().peekable();
        if tokens
            .peek()
            .is_some_and(|t| t.eq_ignore_ascii_case("r") || t.eq_ignore_ascii_case("roll"))
        {
            tokens.next();
        }
        let action = tokens.next()?;
        let mut args = ParsedArgs::from_words(action, tokens);

        if let Some(caps) = comment.as_deref().and_then(|c| self.forced.captures(c)) {
            args.forced_rolls = caps
                .get(1)
                .map_or("", |m| m.as_str())
                .split(',')
                .filter_map(|v| v.trim().parse().ok())
                .collect();
        }
        args.comment = comment;
        Some(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> CommandParser {
        CommandParser::new("?").unwrap()
    }

    #[test]
    fn full_command() {
        let args = parser().parse("?r heal b b 5 # aoe").unwrap();
        assert_eq!(
            args,
            ParsedArgs {
                action: "heal".to_string(),
                rank: Some("b".to_string()),
                weapon_rank: Some("b".to_string()),
                modifiers: vec![5],
                comment: Some("aoe".to_string()),
                forced_rolls: Vec::new(),
            }
        );
    }

    #[test]
    fn roll_word_is_optional() {
        let p = parser();
        assert_eq!(p.parse("?roll attack a s").unwrap().action, "attack");
        assert_eq!(p.parse("?Attack a s").unwrap().action, "attack");
    }

    #[test]
    fn not_a_command() {
        let p = parser();
        assert_eq!(p.parse("hello there"), None);
        assert_eq!(p.parse("?"), None);
        assert_eq!(p.parse("?r"), None);
        assert_eq!(p.parse("?r   # just a comment"), None);
    }

    #[test]
    fn non_breaking_spaces_are_normalised() {
        let args = parser().parse("?r\u{a0}heal\u{a0}b\u{a0}b").unwrap();
        assert_eq!(args.action, "heal");
        assert_eq!(args.weapon_rank.as_deref(), Some("b"));
    }

    #[test]
    fn modifiers_skip_non_integers() {
        let args = parser().parse("?r attack c d +5 -3 x 2.5 10").unwrap();
        assert_eq!(args.modifiers, vec![5, -3, 10]);
    }

    #[test]
    fn numbers_do_not_fill_rank_slots() {
        let args = parser().parse("?r 2d6 3").unwrap();
        assert_eq!(args.action, "2d6");
        assert_eq!(args.rank, None);
        assert_eq!(args.modifiers, vec![3]);

        let args = parser().parse("?r torment d 5").unwrap();
        assert_eq!(args.rank.as_deref(), Some("d"));
        assert_eq!(args.weapon_rank, None);
        assert_eq!(args.modifiers, vec![5]);
    }

    #[test]
    fn words_without_a_line() {
        let args = ParsedArgs::from_words("HEAL", ["b", "b", "5", "-2"]);
        assert_eq!(args.action, "heal");
        assert_eq!(args.weapon_rank.as_deref(), Some("b"));
        assert_eq!(args.modifiers, vec![5, -2]);
        assert_eq!(args.comment, None);
    }

    #[test]
    fn comment_splits_at_first_hash() {
        let args = parser().parse("?r cover # full cover # really").unwrap();
        assert_eq!(args.comment.as_deref(), Some("full cover # really"));
        let args = parser().parse("?r cover #   ").unwrap();
        assert_eq!(args.comment, None);
    }

    #[test]
    fn forced_rolls_from_comment() {
        let args = parser().parse("?r critical b b # r=100, 100 go").unwrap();
        assert_eq!(args.forced_rolls, vec![100, 100]);
        let args = parser().parse("?r critical b b # R = 7").unwrap();
        assert_eq!(args.forced_rolls, vec![7]);
        let args = parser().parse("?r critical b b # power=100").unwrap();
        assert!(args.forced_rolls.is_empty());
    }

    #[test]
    fn custom_prefix() {
        let p = CommandParser::new("!").unwrap();
        assert!(p.parse("?r heal b b").is_none());
        assert_eq!(p.parse("!r heal b b").unwrap().action, "heal");
        assert!(CommandParser::new("  ").is_err());
    }

    #[test]
    fn converts_into_request() {
        let request: ActionRequest = parser().parse("?r heal b b 5 # aoe").unwrap().into();
        assert_eq!(request.action, "heal");
        assert_eq!(request.modifiers, vec![5]);
        assert_eq!(request.comment.as_deref(), Some("aoe"));
    }
}
