use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::arena::{NodeId, Root};
use crate::config::Settings;
use crate::errors::{TreeError, TreeResult};
use crate::util::path::{ensure_branchable, ensure_no_empty_segment};

/// Populates a [`Root`] from path lists: one dotted path per line.
pub struct TreeBuilder {
    root: Root,
    strict_segments: bool,
    comment_prefix: String,
    extensions: Vec<String>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::with_settings(&Settings::default())
    }

    pub fn with_settings(settings: &Settings) -> Self {
        Self {
            root: Root::new(),
            strict_segments: settings.strict_segments,
            comment_prefix: settings.comment_prefix.clone(),
            extensions: settings.extensions.clone(),
        }
    }

    /// Validates and resolves one line of input.
    ///
    /// Blank lines and comments yield `Ok(None)`. Nothing is created when
    /// validation fails.
    #[instrument(level = "trace", skip(self))]
    pub fn add_path(&mut self, raw: &str) -> TreeResult<Option<NodeId>> {
        let path = raw.trim();
        if path.is_empty() || self.is_comment(path) {
            return Ok(None);
        }

        ensure_branchable(path)?;
        if self.strict_segments {
            ensure_no_empty_segment(path)?;
        }

        Ok(Some(self.root.branch(path)))
    }

    fn is_comment(&self, line: &str) -> bool {
        !self.comment_prefix.is_empty() && line.starts_with(&self.comment_prefix)
    }

    /// Reads every line of `reader`; `origin` names the input in errors.
    ///
    /// Returns the number of paths resolved. Stops at the first invalid
    /// line; paths from earlier lines stay loaded in the tree.
    #[instrument(level = "debug", skip(self, reader))]
    pub fn add_reader<R: BufRead>(&mut self, reader: R, origin: &str) -> TreeResult<usize> {
        let mut resolved = 0;
        for (number, line) in reader.lines().enumerate() {
            let line = line.map_err(TreeError::FileReadError)?;
            match self.add_path(&line) {
                Ok(Some(_)) => resolved += 1,
                Ok(None) => {}
                Err(e) => {
                    return Err(TreeError::InvalidPath {
                        origin: origin.to_string(),
                        line: number + 1,
                        path: line.trim().to_string(),
                        reason: e.to_string(),
                    })
                }
            }
        }
        debug!("{} paths from {}", resolved, origin);
        Ok(resolved)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn add_file(&mut self, path: &Path) -> TreeResult<usize> {
        let file = File::open(path).map_err(TreeError::FileReadError)?;
        self.add_reader(BufReader::new(file), &path.display().to_string())
    }

    /// Loads every file below `directory_path` with a configured extension,
    /// in file name order.
    #[instrument(level = "debug", skip(self))]
    pub fn add_directory(&mut self, directory_path: &Path) -> TreeResult<usize> {
        if !directory_path.is_dir() {
            return Err(TreeError::PathResolution {
                path: directory_path.to_path_buf(),
                reason: "Not a directory".to_string(),
            });
        }

        let mut resolved = 0;
        for entry in WalkDir::new(directory_path).sort_by_file_name() {
            let entry = entry.map_err(|e| TreeError::PathResolution {
                path: directory_path.to_path_buf(),
                reason: e.to_string(),
            })?;

            if entry.file_type().is_file() && self.has_known_extension(entry.path()) {
                resolved += self.add_file(entry.path())?;
            }
        }
        Ok(resolved)
    }

    fn has_known_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|known| known == ext))
    }

    /// Dispatches to [`TreeBuilder::add_file`] or [`TreeBuilder::add_directory`].
    pub fn add_input(&mut self, path: &Path) -> TreeResult<usize> {
        if !path.exists() {
            return Err(TreeError::FileNotFound(path.to_path_buf()));
        }
        if path.is_dir() {
            self.add_directory(path)
        } else {
            self.add_file(path)
        }
    }

    pub fn root(&self) -> &Root {
        &self.root
    }

    pub fn build(self) -> Root {
        self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_add_reader_skips_blanks_and_comments() {
        let input = "# ecs fields\nclient.as.organization.name\n\n  client.ip  \n";
        let mut builder = TreeBuilder::new();
        let resolved = builder.add_reader(Cursor::new(input), "inline").unwrap();

        assert_eq!(resolved, 2);
        let root = builder.build();
        assert_eq!(root.len(), 5);
        assert!(root.contains("client.ip"));
    }

    #[test]
    fn test_strict_rejects_empty_segment_without_creating_nodes() {
        let settings = Settings {
            strict_segments: true,
            ..Settings::default()
        };
        let mut builder = TreeBuilder::with_settings(&settings);

        assert!(matches!(
            builder.add_path("a..b"),
            Err(TreeError::EmptySegment(_))
        ));
        assert!(builder.root().is_empty());
    }

    #[test]
    fn test_leading_separator_is_rejected() {
        let mut builder = TreeBuilder::new();
        let err = builder
            .add_reader(Cursor::new("a.b\n.c\n"), "inline")
            .unwrap_err();

        match err {
            TreeError::InvalidPath { origin, line, path, .. } => {
                assert_eq!(origin, "inline");
                assert_eq!(line, 2);
                assert_eq!(path, ".c");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_line_keeps_earlier_paths() {
        let mut builder = TreeBuilder::new();
        let result = builder.add_reader(Cursor::new("a.b\n.c\nd.e\n"), "inline");

        assert!(matches!(result, Err(TreeError::InvalidPath { line: 2, .. })));
        assert!(builder.root().contains("a.b"));
        assert!(!builder.root().contains("d"));
        assert_eq!(builder.root().len(), 2);
    }
}
