//! Charset registry & expansion (C3).
//!
//! Named charsets are kept in a multi-map: each name (itself a codepoint,
//! since names are single characters like `l`, `d`, `1`..`9`) has an
//! insertion-ordered list of definitions. The *visible* definition is always
//! the last one, but earlier definitions remain reachable while expanding a
//! self-referential body — see [`Registry::resolve`].

use std::collections::HashMap;
use std::rc::Rc;

use crate::codepoint::{Codepoint, Mode};
use crate::error::{Error, Result};

const QUESTION_MARK: Codepoint = b'?' as Codepoint;

/// One element of a parsed (but not yet expanded) charset body: either a
/// literal codepoint or a `?`-reference to another name.
#[derive(Debug, Clone, Copy)]
pub enum Token {
    Literal(Codepoint),
    Ref(Codepoint),
}

/// `true` if `c` can appear in a charset name (every built-in and every
/// ephemeral name is alphanumeric; this is what lets `?` followed by
/// punctuation fall through to the literal-escape case below instead of an
/// "undefined charset" error).
pub(crate) fn is_name_char(c: Codepoint) -> bool {
    char::from_u32(c).is_some_and(|ch| ch.is_alphanumeric())
}

/// Parse a raw codepoint sequence into tokens, resolving `?`-escapes.
/// `?` followed by a name character (letter or digit) is a reference;
/// `?` followed by anything else — including another `?` — is a literal of
/// that following codepoint (`??` is the special case of this rule spelled
/// out in the specification). A trailing unescaped `?` is a literal `?`.
pub fn parse_tokens(body: &[Codepoint]) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(body.len());
    let mut i = 0;
    while i < body.len() {
        let c = body[i];
        if c == QUESTION_MARK {
            if i + 1 < body.len() {
                let next = body[i + 1];
                if is_name_char(next) {
                    tokens.push(Token::Ref(next));
                } else {
                    tokens.push(Token::Literal(next));
                }
                i += 2;
                continue;
            } else {
                // trailing unescaped '?' at end of input
                tokens.push(Token::Literal(QUESTION_MARK));
                i += 1;
                continue;
            }
        }
        tokens.push(Token::Literal(c));
        i += 1;
    }
    tokens
}

/// One definition of a named charset.
#[derive(Debug, Clone)]
struct NamedDef {
    tokens: Vec<Token>,
    /// Cached fully-expanded, deduplicated body, once resolved.
    resolved: Option<Rc<[Codepoint]>>,
}

impl NamedDef {
    fn final_literal(body: Vec<Codepoint>) -> Self {
        NamedDef { tokens: Vec::new(), resolved: Some(Rc::from(dedup(body))) }
    }

    fn from_raw(body: &[Codepoint]) -> Self {
        let tokens = parse_tokens(body);
        let resolved = if tokens.iter().all(|t| matches!(t, Token::Literal(_))) {
            Some(Rc::from(dedup(tokens
                .iter()
                .map(|t| match t {
                    Token::Literal(c) => *c,
                    Token::Ref(_) => unreachable!(),
                })
                .collect::<Vec<_>>())))
        } else {
            None
        };
        NamedDef { tokens, resolved }
    }
}

fn dedup(codepoints: Vec<Codepoint>) -> Vec<Codepoint> {
    let mut seen = std::collections::HashSet::with_capacity(codepoints.len());
    codepoints.into_iter().filter(|c| seen.insert(*c)).collect()
}

/// A multi-map from name to its insertion-ordered list of definitions.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    defs: HashMap<Codepoint, Vec<NamedDef>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry { defs: HashMap::new() }
    }

    /// A registry pre-populated with the builtin charsets for `mode`.
    pub fn with_builtins(mode: Mode) -> Self {
        let mut reg = Registry::new();
        reg.define_literal('l' as Codepoint, ('a'..='z').map(|c| c as Codepoint).collect());
        reg.define_literal('u' as Codepoint, ('A'..='Z').map(|c| c as Codepoint).collect());
        reg.define_literal('d' as Codepoint, ('0'..='9').map(|c| c as Codepoint).collect());
        reg.define_literal(
            's' as Codepoint,
            r##" !"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##.chars().map(|c| c as Codepoint).collect(),
        );
        reg.define_literal(
            'h' as Codepoint,
            ('0'..='9').chain('a'..='f').map(|c| c as Codepoint).collect(),
        );
        reg.define_literal(
            'H' as Codepoint,
            ('0'..='9').chain('A'..='F').map(|c| c as Codepoint).collect(),
        );
        reg.define_literal('n' as Codepoint, vec![b'\n' as Codepoint]);
        reg.define_literal('r' as Codepoint, vec![b'\r' as Codepoint]);
        if mode == Mode::Byte {
            reg.define_literal('b' as Codepoint, (0u32..=255).collect());
        }
        // `a = ?l?u?d?s`, requires expansion.
        reg.define_raw('a' as Codepoint, &[
            QUESTION_MARK, 'l' as Codepoint,
            QUESTION_MARK, 'u' as Codepoint,
            QUESTION_MARK, 'd' as Codepoint,
            QUESTION_MARK, 's' as Codepoint,
        ]);
        reg
    }

    fn define_literal(&mut self, name: Codepoint, body: Vec<Codepoint>) {
        self.defs.entry(name).or_default().push(NamedDef::final_literal(body));
    }

    /// Register a new definition for `name` from a raw (un-expanded)
    /// codepoint sequence, possibly containing `?`-references. This is how
    /// `-1..-4`, `-c K:VAL`, and mask-line leading tokens extend the
    /// registry; the new definition is appended, shadowing but not erasing
    /// earlier ones.
    pub fn define_raw(&mut self, name: Codepoint, body: &[Codepoint]) {
        self.defs.entry(name).or_default().push(NamedDef::from_raw(body));
    }

    /// Resolve `name` to its fully-expanded, deduplicated body, using the
    /// most recent definition. Implements the cycle-safe expansion
    /// algorithm from §4.3: the most recent definition is considered
    /// "already used" on the substitution path it is about to be walked
    /// through, so a self-reference inside it resolves to the *previous*
    /// definition, and so on back through history.
    pub fn resolve(&mut self, name: Codepoint) -> Result<Rc<[Codepoint]>> {
        let count = match self.defs.get(&name) {
            Some(v) if !v.is_empty() => v.len(),
            _ => return Err(Error::parse(None, format!("undefined charset reference '?{}'", codepoint_label(name)))),
        };
        if let Some(cached) = &self.defs[&name][count - 1].resolved {
            return Ok(Rc::clone(cached));
        }
        let tokens = self.defs[&name][count - 1].tokens.clone();
        let history = vec![name];
        let expanded = self.expand_tokens(&tokens, &history)?;
        let body: Rc<[Codepoint]> = Rc::from(dedup(expanded));
        self.defs.get_mut(&name).unwrap()[count - 1].resolved = Some(Rc::clone(&body));
        Ok(body)
    }

    fn expand_tokens(&mut self, tokens: &[Token], history: &[Codepoint]) -> Result<Vec<Codepoint>> {
        let mut result = Vec::with_capacity(tokens.len());
        for tok in tokens {
            match *tok {
                Token::Literal(c) => result.push(c),
                Token::Ref(name) => {
                    let total = match self.defs.get(&name) {
                        Some(v) if !v.is_empty() => v.len(),
                        _ => return Err(Error::parse(None, format!("undefined charset reference '?{}'", codepoint_label(name)))),
                    };
                    let used = history.iter().filter(|&&n| n == name).count();
                    if used >= total {
                        return Err(Error::parse(
                            None,
                            format!("charset '?{}' has no further prior definition to self-reference", codepoint_label(name)),
                        ));
                    }
                    let idx = total - 1 - used;
                    let def = self.defs[&name][idx].clone();
                    if let Some(body) = &def.resolved {
                        result.extend(body.iter().copied());
                    } else {
                        let mut new_history = history.to_vec();
                        new_history.push(name);
                        let expanded = self.expand_tokens(&def.tokens, &new_history)?;
                        if idx == total - 1 {
                            // Cache only when this is the visible (most recent)
                            // definition; historical ones are transient views.
                            let body: Rc<[Codepoint]> = Rc::from(dedup(expanded.clone()));
                            self.defs.get_mut(&name).unwrap()[idx].resolved = Some(body);
                        }
                        result.extend(expanded);
                    }
                }
            }
        }
        Ok(result)
    }
}

fn codepoint_label(c: Codepoint) -> String {
    char::from_u32(c).map(|ch| ch.to_string()).unwrap_or_else(|| format!("U+{c:04X}"))
}
