// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Writing a chosen token back into the field text.
//!
//! Everything here is a pure function of the current text, the active
//! [`Query`], and the token; the controller applies the result to the field.

use core::ops::Range;

use hashbrown::HashSet;

use crate::util::floor_boundary;
use crate::{Query, QueryMode, Separator};

/// Options affecting how a commit rewrites the field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommitOptions {
    /// Keep repeated tokens when normalizing a multi-value field.
    pub allow_dupes: bool,
    /// Collapse the selection to its end even for provisional commits (`pick` mode).
    pub collapse: bool,
}

/// The field text and selection produced by a commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Committed {
    /// New field text.
    pub text: String,
    /// New selection, as byte offsets into `text`.
    pub selection: Range<usize>,
}

/// Commits `token` over the active `query` in `text`.
///
/// A provisional commit (`finish == false`, as used by type-ahead) selects the
/// completed tail of the token so further typing replaces it. A final commit
/// normalizes multi-value fields and places the caret at the end.
#[must_use]
pub fn commit(
    text: &str,
    query: &Query,
    token: &str,
    mode: &QueryMode,
    finish: bool,
    options: CommitOptions,
) -> Committed {
    let mut start = if shares_prefix(token, &query.value) {
        query.value.len()
    } else {
        0
    };
    let mut end = token.len();
    let value = match mode {
        QueryMode::Single => token.to_owned(),
        QueryMode::Multiple(sep) => {
            start += query.index;
            end += query.index;
            let spliced = splice(text, query.index, token, sep);
            if finish {
                let normalized = normalize(&spliced, sep, options.allow_dupes);
                end = normalized.len();
                normalized
            } else {
                spliced
            }
        }
    };
    if finish || options.collapse {
        start = end;
    }
    Committed {
        text: value,
        selection: start..end,
    }
}

/// Replaces the token starting at byte `index` of `text` with `token`.
///
/// The replaced span runs to the next separator, so a token that was already
/// provisionally completed is replaced as a whole.
#[must_use]
pub fn splice(text: &str, index: usize, token: &str, separator: &Separator) -> String {
    let index = floor_boundary(text, index);
    let old_len = separator.token_len_at(text, index);
    let mut out = String::with_capacity(text.len() + token.len());
    out.push_str(&text[..index]);
    out.push_str(token);
    out.push_str(&text[index + old_len..]);
    out
}

/// Rewrites a multi-value field into canonical form.
///
/// Tokens are trimmed, blank tokens dropped, repeated tokens removed (first
/// occurrence wins) unless `allow_dupes`, and the rest rejoined with a
/// trailing separator ready for the next token.
#[must_use]
pub fn normalize(text: &str, separator: &Separator, allow_dupes: bool) -> String {
    let mut seen: HashSet<&str> = HashSet::new();
    let tokens: Vec<&str> = separator
        .split(text)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter(|token| allow_dupes || seen.insert(*token))
        .collect();
    if tokens.is_empty() {
        return String::new();
    }
    let join = separator.join_str();
    let mut out = tokens.join(join);
    out.push_str(join);
    out
}

/// Drops empty tokens and rejoins, without a trailing separator.
#[must_use]
pub fn auto_trim(text: &str, separator: &Separator) -> String {
    separator
        .split(text)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(separator.join_str())
}

/// `true` if `token` starts with `query`, ignoring case.
fn shares_prefix(token: &str, query: &str) -> bool {
    token
        .get(..query.len())
        .is_some_and(|head| head.to_lowercase() == query.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract_query;

    fn sep() -> Separator {
        Separator::new(Separator::DEFAULT_SPLIT, ", ").unwrap()
    }

    fn q(value: &str, index: usize) -> Query {
        Query {
            value: value.to_string(),
            index,
        }
    }

    #[test]
    fn single_provisional_selects_completed_tail() {
        let c = commit(
            "gr",
            &q("gr", 0),
            "Green",
            &QueryMode::Single,
            false,
            CommitOptions::default(),
        );
        assert_eq!(c.text, "Green");
        assert_eq!(c.selection, 2..5);
    }

    #[test]
    fn non_prefix_token_selects_from_query_start() {
        let c = commit(
            "gr",
            &q("gr", 0),
            "olive",
            &QueryMode::Single,
            false,
            CommitOptions::default(),
        );
        assert_eq!(c.selection, 0..5);
    }

    #[test]
    fn multi_provisional_and_final() {
        let mode = QueryMode::Multiple(sep());
        let provisional = commit(
            "red, gr",
            &q("gr", 5),
            "green",
            &mode,
            false,
            CommitOptions::default(),
        );
        assert_eq!(provisional.text, "red, green");
        assert_eq!(provisional.selection, 7..10);

        let done = commit(
            "red, gr",
            &q("gr", 5),
            "green",
            &mode,
            true,
            CommitOptions::default(),
        );
        assert_eq!(done.text, "red, green, ");
        assert_eq!(done.selection, 12..12);
    }

    #[test]
    fn pick_mode_collapses_provisional_selection() {
        let c = commit(
            "gr",
            &q("gr", 0),
            "green",
            &QueryMode::Single,
            false,
            CommitOptions {
                allow_dupes: false,
                collapse: true,
            },
        );
        assert_eq!(c.selection, 5..5);
    }

    #[test]
    fn splice_replaces_provisionally_completed_token() {
        // "gr" was type-ahead completed to "green" before "grey" was chosen.
        assert_eq!(splice("red, green, blue", 5, "grey", &sep()), "red, grey, blue");
        assert_eq!(splice("", 0, "grey", &sep()), "grey");
    }

    #[test]
    fn committing_twice_matches_committing_once() {
        let mode = QueryMode::Multiple(sep());
        let once = commit(
            "red, gr",
            &q("gr", 5),
            "green",
            &mode,
            true,
            CommitOptions::default(),
        );

        for caret in [once.text.len(), 7] {
            let query = extract_query(&once.text, caret, &mode);
            let twice = commit(
                &once.text,
                &query,
                "green",
                &mode,
                true,
                CommitOptions::default(),
            );
            assert_eq!(twice.text, once.text, "caret {caret}");
        }

        let single = commit(
            "gre",
            &q("gre", 0),
            "green",
            &QueryMode::Single,
            true,
            CommitOptions::default(),
        );
        let again = commit(
            &single.text,
            &q(&single.text, 0),
            "green",
            &QueryMode::Single,
            true,
            CommitOptions::default(),
        );
        assert_eq!(again, single);
    }

    #[test]
    fn normalize_trims_and_dedupes() {
        assert_eq!(normalize(" red ,, green;red; ", &sep(), false), "red, green, ");
        assert_eq!(normalize("red, red", &sep(), true), "red, red, ");
        assert_eq!(normalize(" , ", &sep(), false), "");
    }

    #[test]
    fn auto_trim_drops_empty_tokens() {
        assert_eq!(auto_trim("red, , green, ", &sep()), "red, green");
    }
}
