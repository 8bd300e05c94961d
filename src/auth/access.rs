//! Page access rules.
//!
//! A rule is a comma separated list of capability codes, for example
//! `pages.view, !guest.only`. A token prefixed with `!` grants access when the
//! capability is *not* held. An empty rule is public.
//!
//! Evaluation starts out denied and walks the tokens left to right only while
//! access is still denied, so the first token that grants access wins and the
//! remaining tokens are never consulted. A rule such as `a, !a` therefore
//! always grants access.

/// Anything that can answer "does the current actor hold this capability?".
pub trait CapabilityCheck {
    fn has_capability(&self, code: &str) -> bool;
}

/// Decide whether an actor with `caps` may see a page carrying `rule`.
pub fn can_access(rule: &str, caps: &impl CapabilityCheck) -> bool {
    if rule.trim().is_empty() {
        return true;
    }

    let mut allowed = false;
    for token in rule.split(',') {
        if allowed {
            break;
        }
        allowed = if token.contains('!') {
            let code = token.replace('!', "");
            !caps.has_capability(code.trim())
        } else {
            caps.has_capability(token.trim())
        };
    }
    allowed
}
