//! Session alias table and token substitution.

use std::collections::BTreeMap;

use crate::error::TokenizeError;
use crate::token::MAX_TOKENS;

/// Aliases defined with the `alias` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    aliases: BTreeMap<String, Vec<String>>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace an alias. Returns the previous expansion, if any.
    pub fn define(&mut self, name: impl Into<String>, replacement: Vec<String>) -> Option<Vec<String>> {
        self.aliases.insert(name.into(), replacement)
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.aliases.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Replace every token naming an alias with its expansion.
    ///
    /// A command starting with `alias` is left alone. Spliced tokens are not
    /// rescanned, so an alias that expands to itself cannot loop. On overflow
    /// the buffer is left untouched.
    pub fn substitute(&self, tokens: &mut Vec<String>) -> Result<usize, TokenizeError> {
        if self.aliases.is_empty() || tokens.first().is_some_and(|t| t == "alias") {
            return Ok(0);
        }

        let mut expanded = Vec::with_capacity(tokens.len());
        let mut substitutions = 0;
        for token in tokens.iter() {
            match self.aliases.get(token) {
                Some(replacement) => {
                    expanded.extend(replacement.iter().cloned());
                    substitutions += 1;
                }
                None => expanded.push(token.clone()),
            }
            if expanded.len() > MAX_TOKENS {
                return Err(TokenizeError::TooManyTokens { limit: MAX_TOKENS });
            }
        }

        if substitutions > 0 {
            tracing::trace!(substitutions, from = tokens.len(), to = expanded.len(), "alias substitution");
            *tokens = expanded;
        }
        Ok(substitutions)
    }
}
