/// Categories seeded into a fresh ledger.
pub const DEFAULT_CATEGORIES: [&str; 8] = [
    "Misc.",
    "Rent",
    "Utility",
    "Clothing",
    "Food",
    "Loan",
    "Insurance",
    "Internet/phone",
];

/// Ordered, duplicate-free list of category names.
///
/// Empty names never make it into the list. Change notification is handled by
/// the owning [`Ledger`](super::Ledger), which wraps every mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryList {
    names: Vec<String>,
}

impl CategoryList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        Self::from_names(DEFAULT_CATEGORIES)
    }

    /// Builds a list, dropping empty names and later duplicates.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::new();
        list.replace(names);
        list
    }

    /// Appends `name` unless it is empty or already present. Returns whether
    /// the list changed.
    pub fn add(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if name.is_empty() || self.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.names.len();
        self.names.retain(|existing| existing != name);
        self.names.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|existing| existing == name)
    }

    pub fn replace<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.clear();
        for name in names {
            self.add(name);
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.names.clone()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
