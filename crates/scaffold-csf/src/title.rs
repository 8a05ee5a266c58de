//! Title resolution
//!
//! A [`TitleResolver`] receives the title declared in the meta (if any) and
//! returns the title every label and id is computed from.

/// Remaps a module's declared title
pub trait TitleResolver {
    /// Resolve the effective title; `None` leaves the module untitled
    fn resolve(&self, user_title: Option<&str>) -> Option<String>;
}

impl<F> TitleResolver for F
where
    F: Fn(Option<&str>) -> Option<String>,
{
    fn resolve(&self, user_title: Option<&str>) -> Option<String> {
        self(user_title)
    }
}

/// Keeps the declared title unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTitle;

impl TitleResolver for IdentityTitle {
    #[inline]
    fn resolve(&self, user_title: Option<&str>) -> Option<String> {
        user_title.map(str::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_keeps_title() {
        assert_eq!(IdentityTitle.resolve(Some("foo/bar")), Some("foo/bar".into()));
        assert_eq!(IdentityTitle.resolve(None), None);
    }

    #[test]
    fn closures_resolve() {
        let prefixed = |title: Option<&str>| title.map(|t| format!("Example/{t}"));
        assert_eq!(prefixed.resolve(Some("foo")), Some("Example/foo".into()));
    }
}
