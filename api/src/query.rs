//! Ordered query-parameter lists.
//!
//! The backend reads repeated `key[]` parameters, so a query is a list of
//! pairs rather than a map. Callers append groups in a fixed order and the
//! builder never reorders them, which keeps identical filter states mapping
//! to byte-identical query strings.

pub const PARAMETERS: &str = "parameters[]";
pub const TECHNIQUES: &str = "techniques[]";
pub const CYCLES: &str = "cycles[]";
pub const DAYS: &str = "days";
pub const PAGE: &str = "page";
pub const PER_PAGE: &str = "per_page";
pub const FORMAT: &str = "format";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(&'static str, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one `key=code` pair per code, in iteration order.
    pub fn codes<I, S>(mut self, key: &'static str, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.pairs
            .extend(codes.into_iter().map(|code| (key, code.as_ref().to_string())));
        self
    }

    /// `days` is omitted entirely when unset.
    pub fn days(mut self, days: Option<u32>) -> Self {
        if let Some(days) = days {
            self.pairs.push((DAYS, days.to_string()));
        }
        self
    }

    pub fn page(mut self, page: u32, per_page: u32) -> Self {
        self.pairs.push((PAGE, page.to_string()));
        self.pairs.push((PER_PAGE, per_page.to_string()));
        self
    }

    pub fn format(mut self, format: &str) -> Self {
        self.pairs.push((FORMAT, format.to_string()));
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.pairs.push((PER_PAGE, per_page.to_string()));
        self
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.pairs.iter().map(|(key, _)| *key)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
