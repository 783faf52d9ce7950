// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Narrowing a candidate set down to the tokens matching the active query.

use crate::{Matcher, Token};

/// Host-supplied replacement for [`filter_tokens`].
///
/// Receives the candidate set and the active query text.
pub type FilterFn = Box<dyn Fn(&[Token], &str) -> Vec<Token>>;

/// Returns the tokens whose value matches `matcher`, in their original order.
#[must_use]
pub fn filter_tokens(tokens: &[Token], matcher: &Matcher) -> Vec<Token> {
    tokens
        .iter()
        .filter(|token| matcher.is_match(&token.value))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MatchOptions, compile_query_matcher};

    #[test]
    fn keeps_matching_tokens_in_order() {
        let tokens: Vec<Token> = ["Apple", "banana", "apricot", "grape"]
            .into_iter()
            .map(Token::from)
            .collect();
        let matcher = compile_query_matcher("ap", MatchOptions::default()).unwrap();
        let values: Vec<_> = filter_tokens(&tokens, &matcher)
            .into_iter()
            .map(|t| t.value)
            .collect();
        assert_eq!(values, ["Apple", "apricot"]);
    }

    #[test]
    fn filters_on_value_not_display() {
        let tokens = [Token::new("fr").with_display("France")];
        let matcher = compile_query_matcher("fra", MatchOptions::default()).unwrap();
        assert!(filter_tokens(&tokens, &matcher).is_empty());
    }
}
