use indexmap::IndexSet;
use serde::Serialize;

/// 样本客户编号集合 (去重，构建后只读)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SampleKeySet {
    keys: IndexSet<String>,
}

impl SampleKeySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, key: impl Into<String>) -> bool {
        self.keys.insert(key.into())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// 键在集合中的位置，用于追踪哪些样本客户已经找到
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.keys.get_index_of(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for SampleKeySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for key in iter {
            set.insert(key);
        }
        set
    }
}

/// 样本客户关联的发票编号集合，由发票过滤阶段产出
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InvoiceKeySet {
    keys: IndexSet<String>,
}

impl InvoiceKeySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, key: impl Into<String>) -> bool {
        self.keys.insert(key.into())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for InvoiceKeySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for key in iter {
            set.insert(key);
        }
        set
    }
}
