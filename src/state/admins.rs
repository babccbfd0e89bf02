//! Usernames promoted to admin on first contact.

use std::collections::HashSet;

/// Usernames granted the admin flag when their user row is first created.
#[derive(Debug, Clone, Default)]
pub struct AdminList {
    usernames: HashSet<String>,
}

impl AdminList {
    /// Build the list, ignoring blank entries.
    pub fn new<I, S>(usernames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let usernames = usernames
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| !name.is_empty())
            .collect();
        Self { usernames }
    }

    /// Exact match; a sender without a username is never an admin.
    pub fn contains(&self, username: Option<&str>) -> bool {
        username.is_some_and(|name| self.usernames.contains(name))
    }

    /// Number of listed usernames.
    pub fn len(&self) -> usize {
        self.usernames.len()
    }

    /// Whether nobody is an admin.
    pub fn is_empty(&self) -> bool {
        self.usernames.is_empty()
    }
}
