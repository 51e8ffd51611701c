use std::{
    collections::{BTreeMap, BTreeSet},
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

///
/// ArtifactError
///

#[derive(Debug, ThisError)]
pub enum ArtifactError {
    #[error("artifact `{0}` already exists in this pass")]
    AlreadyExists(String),

    #[error("failed to write artifact `{name}`: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
}

///
/// ArtifactSink
/// destination for generated source files
///

pub trait ArtifactSink {
    /// Create the artifact at `name` (a relative path) with `text`.
    fn create(&mut self, name: &str, text: &str) -> Result<(), ArtifactError>;
}

///
/// DirSink
///
/// Writes artifacts under a root directory. Files left over from an earlier
/// build are overwritten; creating the same name twice within one sink is
/// refused.
///

#[derive(Debug)]
pub struct DirSink {
    root: PathBuf,
    created: BTreeSet<String>,
}

impl DirSink {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            created: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtifactSink for DirSink {
    fn create(&mut self, name: &str, text: &str) -> Result<(), ArtifactError> {
        if self.created.contains(name) {
            return Err(ArtifactError::AlreadyExists(name.to_string()));
        }

        let path = self.root.join(name);
        let io_err = |source| ArtifactError::Io {
            name: name.to_string(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(&path, text).map_err(io_err)?;

        self.created.insert(name.to_string());

        Ok(())
    }
}

///
/// MemorySink
/// keeps artifacts in memory, keyed by name
///

#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    pub artifacts: BTreeMap<String, String>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.artifacts.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.artifacts.keys().map(String::as_str).collect()
    }
}

impl ArtifactSink for MemorySink {
    fn create(&mut self, name: &str, text: &str) -> Result<(), ArtifactError> {
        if self.artifacts.contains_key(name) {
            return Err(ArtifactError::AlreadyExists(name.to_string()));
        }
        self.artifacts.insert(name.to_string(), text.to_string());

        Ok(())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("viewbind-sink-{tag}-{}", std::process::id()))
    }

    #[test]
    fn dir_sink_writes_nested_artifacts() {
        let root = scratch_dir("nested");
        let mut sink = DirSink::new(&root);

        sink.create("viewbind/app__Home__Bind.rs", "struct A;")
            .expect("first write succeeds");

        let written = fs::read_to_string(root.join("viewbind/app__Home__Bind.rs"))
            .expect("artifact on disk");
        assert_eq!(written, "struct A;");

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn dir_sink_refuses_duplicates_within_a_pass_but_not_across_passes() {
        let root = scratch_dir("dupes");

        let mut first = DirSink::new(&root);
        first.create("a.rs", "1").expect("first write succeeds");
        assert!(matches!(
            first.create("a.rs", "2"),
            Err(ArtifactError::AlreadyExists(name)) if name == "a.rs"
        ));

        let mut second = DirSink::new(&root);
        second.create("a.rs", "3").expect("a fresh pass overwrites");
        assert_eq!(fs::read_to_string(root.join("a.rs")).ok().as_deref(), Some("3"));

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn memory_sink_keeps_sorted_names() {
        let mut sink = MemorySink::new();
        sink.create("b.rs", "b").expect("write b");
        sink.create("a.rs", "a").expect("write a");

        assert_eq!(sink.names(), vec!["a.rs", "b.rs"]);
        assert_eq!(sink.get("a.rs"), Some("a"));
        assert!(sink.create("a.rs", "again").is_err());
    }
}
