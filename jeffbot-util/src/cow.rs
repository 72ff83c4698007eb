use std::borrow::Cow;

pub trait CowUtils<'s> {
    /// Lowercase ascii letters, only allocating if something changes.
    fn cow_to_ascii_lowercase(self) -> Cow<'s, str>;

    /// Unicode-aware lowercasing, only allocating if something changes.
    fn cow_to_lowercase(self) -> Cow<'s, str>;
}

impl<'s> CowUtils<'s> for &'s str {
    #[inline]
    fn cow_to_ascii_lowercase(self) -> Cow<'s, str> {
        if self.bytes().any(|b| b.is_ascii_uppercase()) {
            Cow::Owned(self.to_ascii_lowercase())
        } else {
            Cow::Borrowed(self)
        }
    }

    #[inline]
    fn cow_to_lowercase(self) -> Cow<'s, str> {
        if self.chars().any(|c| c.to_lowercase().ne(Some(c))) {
            Cow::Owned(self.to_lowercase())
        } else {
            Cow::Borrowed(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::CowUtils;

    #[test]
    fn borrows_when_already_lowercase() {
        assert!(matches!("tokyo".cow_to_ascii_lowercase(), Cow::Borrowed("tokyo")));
        assert!(matches!("ピカチュウ".cow_to_lowercase(), Cow::Borrowed(_)));
    }

    #[test]
    fn lowercases_unicode() {
        assert_eq!("ÉVOLI".cow_to_lowercase(), "évoli");
        assert_eq!("ÉVOLI".cow_to_ascii_lowercase(), "Évoli");
    }
}
