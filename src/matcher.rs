//! Glob-style matching used for actions and resources.

use crate::policy::ValueList;

/// Matches `candidate` against a glob `pattern`.
///
/// `*` matches any run of characters (including none), `?` matches exactly
/// one character. Everything else is compared literally and case-sensitively,
/// and the whole candidate must be consumed.
pub fn wildcard_match(pattern: &str, candidate: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let candidate: Vec<char> = candidate.chars().collect();

    let (mut p, mut c) = (0, 0);
    // position of the last `*` seen and the candidate index it was tried at.
    let mut backtrack: Option<(usize, usize)> = None;

    while c < candidate.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, c));
                p += 1;
            }
            Some('?') => {
                p += 1;
                c += 1;
            }
            Some(&literal) if literal == candidate[c] => {
                p += 1;
                c += 1;
            }
            _ => match backtrack {
                // let the last star swallow one more character.
                Some((star, consumed)) => {
                    p = star + 1;
                    c = consumed + 1;
                    backtrack = Some((star, consumed + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&ch| ch == '*')
}

/// One pattern or a list of them, as accepted by
/// [`PolicyEngine::action_matches`](crate::PolicyEngine::action_matches) and
/// [`PolicyEngine::resource_matches`](crate::PolicyEngine::resource_matches).
pub trait Patterns<'a> {
    fn patterns(self) -> Vec<&'a str>;
}

impl<'a> Patterns<'a> for &'a str {
    fn patterns(self) -> Vec<&'a str> {
        vec![self]
    }
}

impl<'a> Patterns<'a> for &'a String {
    fn patterns(self) -> Vec<&'a str> {
        vec![self.as_str()]
    }
}

impl<'a, const N: usize> Patterns<'a> for [&'a str; N] {
    fn patterns(self) -> Vec<&'a str> {
        self.to_vec()
    }
}

impl<'a, S, const N: usize> Patterns<'a> for &'a [S; N]
where
    S: AsRef<str>,
{
    fn patterns(self) -> Vec<&'a str> {
        self.iter().map(AsRef::as_ref).collect()
    }
}

impl<'a, S> Patterns<'a> for &'a [S]
where
    S: AsRef<str>,
{
    fn patterns(self) -> Vec<&'a str> {
        self.iter().map(AsRef::as_ref).collect()
    }
}

impl<'a, S> Patterns<'a> for &'a Vec<S>
where
    S: AsRef<str>,
{
    fn patterns(self) -> Vec<&'a str> {
        self.iter().map(AsRef::as_ref).collect()
    }
}

impl<'a> Patterns<'a> for &'a ValueList {
    fn patterns(self) -> Vec<&'a str> {
        self.iter().map(String::as_str).collect()
    }
}

pub trait ResourceMatcher {
    fn do_match(&self, resource: &str, pattern: &str) -> bool;
}

/// Matches whole ARN strings with [`wildcard_match`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultResourceMatcher;

impl ResourceMatcher for DefaultResourceMatcher {
    fn do_match(&self, resource: &str, pattern: &str) -> bool {
        wildcard_match(pattern, resource)
    }
}

/// Exact, wildcard-free resource comparison.
#[derive(Debug, Default, Clone, Copy)]
pub struct Exact;

impl ResourceMatcher for Exact {
    fn do_match(&self, resource: &str, pattern: &str) -> bool {
        resource == pattern
    }
}
