use crate::arena::SEPARATOR;
use crate::errors::{TreeError, TreeResult};

pub trait DottedPathExt {
    fn segments(&self) -> std::str::Split<'_, char>;
    fn has_empty_segment(&self) -> bool;
    fn parent_path(&self) -> Option<&str>;
}

impl DottedPathExt for str {
    fn segments(&self) -> std::str::Split<'_, char> {
        self.split(SEPARATOR)
    }

    fn has_empty_segment(&self) -> bool {
        self.segments().any(str::is_empty)
    }

    fn parent_path(&self) -> Option<&str> {
        self.rsplit_once(SEPARATOR).map(|(parent, _)| parent)
    }
}

/// Rejects input that `Root::branch` would refuse: an empty path or an
/// empty first segment.
pub fn ensure_branchable(path: &str) -> TreeResult<()> {
    match path.segments().next() {
        Some(head) if !head.is_empty() => Ok(()),
        _ => Err(TreeError::EmptySegment(path.to_string())),
    }
}

pub fn ensure_no_empty_segment(path: &str) -> TreeResult<()> {
    if path.has_empty_segment() {
        Err(TreeError::EmptySegment(path.to_string()))
    } else {
        Ok(())
    }
}
