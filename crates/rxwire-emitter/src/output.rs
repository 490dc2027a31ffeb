//! Output sink boundary.
//!
//! The host build pipeline supplies a sink that accepts named generated
//! source files; names are deterministic so the host can diff and cache
//! files across incremental runs.

use indexmap::IndexMap;

/// One generated source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedFile {
    pub name: String,
    pub text: String,
}

/// Receiver for generated source files.
pub trait OutputSink {
    /// Accept one named generated file. Names within a pass are unique.
    fn add_source(&mut self, name: &str, text: String);
}

/// In-memory sink, used by tests and the CLI.
#[derive(Debug, Default)]
pub struct MemoryOutputSink {
    files: IndexMap<String, String>,
}

impl MemoryOutputSink {
    pub fn new() -> Self {
        MemoryOutputSink::default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }

    /// Files in the order they were sunk.
    pub fn files(&self) -> impl Iterator<Item = GeneratedFile> + '_ {
        self.files.iter().map(|(name, text)| GeneratedFile {
            name: name.clone(),
            text: text.clone(),
        })
    }

    pub fn names(&self) -> Vec<&str> {
        self.files.keys().map(String::as_str).collect()
    }
}

impl OutputSink for MemoryOutputSink {
    fn add_source(&mut self, name: &str, text: String) {
        self.files.insert(name.to_string(), text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_preserves_order() {
        let mut sink = MemoryOutputSink::new();
        sink.add_source("b.g.rs", "b".to_string());
        sink.add_source("a.g.rs", "a".to_string());
        assert_eq!(sink.names(), vec!["b.g.rs", "a.g.rs"]);
        assert_eq!(sink.get("a.g.rs"), Some("a"));
        assert_eq!(sink.len(), 2);
    }
}
