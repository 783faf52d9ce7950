// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction options.

use serde::Deserialize;
use understory_input_observer::ObserverOptions;

use crate::{CachePolicy, CommitOptions, Error, MatchOptions, QueryMode, Result, Separator};

/// How eagerly a highlighted choice is written into the field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawSelectMode")]
pub enum SelectMode {
    /// Highlighting never touches the field.
    #[default]
    Off,
    /// Keyboard highlighting writes the choice, selecting the completed tail.
    Selection,
    /// Keyboard highlighting writes the choice with the caret at its end.
    Pick,
    /// Like [`SelectMode::Selection`], and the first choice is highlighted and
    /// written as soon as the list opens.
    TypeAhead,
}

impl SelectMode {
    /// `true` unless [`SelectMode::Off`].
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        !matches!(self, Self::Off)
    }

    /// `true` for [`SelectMode::TypeAhead`].
    #[must_use]
    pub const fn is_type_ahead(self) -> bool {
        matches!(self, Self::TypeAhead)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSelectMode {
    Flag(bool),
    Name(String),
}

impl TryFrom<RawSelectMode> for SelectMode {
    type Error = String;

    fn try_from(raw: RawSelectMode) -> core::result::Result<Self, Self::Error> {
        match raw {
            RawSelectMode::Flag(false) => Ok(Self::Off),
            RawSelectMode::Flag(true) => Ok(Self::Selection),
            RawSelectMode::Name(name) => match name.as_str() {
                "selection" => Ok(Self::Selection),
                "pick" => Ok(Self::Pick),
                "type-ahead" => Ok(Self::TypeAhead),
                other => Err(format!("unknown select mode {other:?}")),
            },
        }
    }
}

/// Autocompleter options.
///
/// Field names follow the camelCase attribute names when deserialized, and
/// every field is optional.
///
/// ```rust
/// use understory_autocomplete::{Options, SelectMode};
///
/// let options = Options::from_json(r#"{ "multiple": true, "selectMode": "pick" }"#).unwrap();
/// assert!(options.multiple);
/// assert_eq!(options.select_mode, SelectMode::Pick);
/// assert_eq!(options.max_choices, 10);
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Minimum query length, in chars, before fetching or showing.
    pub min_length: usize,
    /// Debounce interval in milliseconds.
    pub delay: u64,
    /// Poll the field on this period instead of observing input events.
    pub periodical: Option<u64>,
    /// Allow reusing the previous result set.
    pub cache: bool,
    /// Cap on shown choices; also the overflow viewport size.
    pub max_choices: usize,
    /// The field holds several separated values.
    pub multiple: bool,
    /// Text inserted between values.
    pub separator: String,
    /// Regular expression splitting values.
    pub separator_split: String,
    /// Drop empty values when the list closes.
    pub auto_trim: bool,
    /// Keep repeated values.
    pub allow_dupes: bool,
    /// Match case-sensitively.
    pub filter_case: bool,
    /// Match anywhere in a token, not just at its start.
    pub filter_subset: bool,
    /// Highlight the first choice when the list opens.
    pub select_first: bool,
    /// Revert the field to the last committed value when it closes uncommitted.
    pub force_select: bool,
    /// How highlighting writes into the field.
    pub select_mode: SelectMode,
    /// Scroll within `max_choices` rows instead of truncating.
    pub overflow: bool,
    /// Distance kept between a highlighted choice and the viewport edge.
    pub overflow_margin: f64,
    /// Mark the matched part of each choice label.
    pub mark_query: bool,
    /// Ask the host to submit its form after a keyboard commit.
    pub auto_submit: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            min_length: 1,
            delay: 400,
            periodical: None,
            cache: true,
            max_choices: 10,
            multiple: false,
            separator: Separator::DEFAULT_JOIN.to_owned(),
            separator_split: Separator::DEFAULT_SPLIT.to_owned(),
            auto_trim: false,
            allow_dupes: false,
            filter_case: false,
            filter_subset: false,
            select_first: false,
            force_select: false,
            select_mode: SelectMode::Off,
            overflow: false,
            overflow_margin: 25.0,
            mark_query: true,
            auto_submit: false,
        }
    }
}

impl Options {
    /// Parses options from a JSON object, filling in defaults, and validates them.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Checks value ranges that the type system does not.
    pub fn validate(&self) -> Result<()> {
        if self.max_choices == 0 {
            return Err(Error::InvalidOptions("maxChoices must be at least 1".into()));
        }
        if !self.overflow_margin.is_finite() || self.overflow_margin < 0.0 {
            return Err(Error::InvalidOptions(format!(
                "overflowMargin must be a non-negative number, got {}",
                self.overflow_margin
            )));
        }
        if self.periodical == Some(0) {
            return Err(Error::InvalidOptions("periodical must be positive".into()));
        }
        Ok(())
    }

    /// Settings for the change observer.
    #[must_use]
    pub fn observer_options(&self) -> ObserverOptions {
        ObserverOptions {
            delay: self.delay,
            periodical: self.periodical,
        }
    }

    /// Settings for the query matcher.
    #[must_use]
    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            case_sensitive: self.filter_case,
            subset: self.filter_subset,
        }
    }

    /// Settings for cache reuse.
    #[must_use]
    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy {
            enabled: self.cache,
            max_choices: self.max_choices,
            case_sensitive: self.filter_case,
        }
    }

    /// Builds the query mode, compiling the separator in multi-value mode.
    pub fn query_mode(&self) -> Result<QueryMode> {
        if self.multiple {
            Ok(QueryMode::Multiple(Separator::new(
                &self.separator_split,
                self.separator.as_str(),
            )?))
        } else {
            Ok(QueryMode::Single)
        }
    }

    /// Settings for writing values back.
    #[must_use]
    pub fn commit_options(&self) -> CommitOptions {
        CommitOptions {
            allow_dupes: self.allow_dupes,
            collapse: self.select_mode == SelectMode::Pick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let o = Options::default();
        assert_eq!(o.min_length, 1);
        assert_eq!(o.delay, 400);
        assert!(o.cache);
        assert_eq!(o.max_choices, 10);
        assert_eq!(o.separator, ", ");
        assert_eq!(o.overflow_margin, 25.0);
        assert!(o.mark_query);
        assert_eq!(o.select_mode, SelectMode::Off);
        assert_eq!(Options::from_json("{}").unwrap(), o);
    }

    #[test]
    fn select_mode_accepts_flags_and_names() {
        let parse = |v: &str| {
            Options::from_json(&format!(r#"{{ "selectMode": {v} }}"#)).map(|o| o.select_mode)
        };
        assert_eq!(parse("false").unwrap(), SelectMode::Off);
        assert_eq!(parse("true").unwrap(), SelectMode::Selection);
        assert_eq!(parse(r#""selection""#).unwrap(), SelectMode::Selection);
        assert_eq!(parse(r#""pick""#).unwrap(), SelectMode::Pick);
        assert_eq!(parse(r#""type-ahead""#).unwrap(), SelectMode::TypeAhead);
        assert!(matches!(parse(r#""eager""#), Err(Error::Options(_))));
    }

    #[test]
    fn invalid_ranges_are_rejected() {
        assert!(matches!(
            Options::from_json(r#"{ "maxChoices": 0 }"#),
            Err(Error::InvalidOptions(_))
        ));
        let o = Options {
            overflow_margin: -1.0,
            ..Options::default()
        };
        assert!(o.validate().is_err());
    }

    #[test]
    fn bad_separator_fails_when_building_query_mode() {
        let o = Options {
            multiple: true,
            separator_split: "(".into(),
            ..Options::default()
        };
        assert!(matches!(o.query_mode(), Err(Error::InvalidSeparator { .. })));
        assert!(matches!(Options::default().query_mode(), Ok(QueryMode::Single)));
    }

    #[test]
    fn pick_mode_collapses_commits() {
        let o = Options {
            select_mode: SelectMode::Pick,
            ..Options::default()
        };
        assert!(o.commit_options().collapse);
        assert!(!Options::default().commit_options().collapse);
    }
}
