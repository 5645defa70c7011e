//! Filter predicates for listed collections.
//!
//! Query modules list a whole collection and then narrow it by at most one
//! axis (ids, names, owners, ...). Axes are mutually exclusive: the first
//! axis with any values decides membership, matching the precedence the
//! caller declared them in. An empty selector accepts everything.

/// Ordered filter axes applied to a listed collection.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    axes: Vec<(&'static str, Vec<String>)>,
}

impl Selector {
    /// Creates an empty selector that matches every record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a filter axis. Declaration order sets precedence.
    #[must_use]
    pub fn axis(mut self, name: &'static str, values: Vec<String>) -> Self {
        self.axes.push((name, values));
        self
    }

    /// The first axis with any values, if one exists.
    pub fn active_axis(&self) -> Option<(&'static str, &[String])> {
        self.axes
            .iter()
            .find(|(_, values)| !values.is_empty())
            .map(|(name, values)| (*name, values.as_slice()))
    }

    /// Whether a record matches, given an extractor that reads the record's
    /// value for the named axis. Records lacking a value for the active
    /// axis do not match.
    pub fn matches(&self, extract: impl Fn(&str) -> Option<String>) -> bool {
        match self.active_axis() {
            None => true,
            Some((axis, accepted)) => match extract(axis) {
                Some(value) => accepted.contains(&value),
                None => false,
            },
        }
    }
}
