//! `.lt` files: one segment per line

use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use super::LTree;
use crate::segment::Segment;
use crate::{Result, LT_EXTENSION};

impl<V> LTree<V> {
    /// Parse text holding one segment per line, reading values with
    /// `parser`; blank lines are skipped
    pub fn parse_with<F, E>(text: &str, parser: F) -> Result<Self>
    where
        F: Fn(&str) -> std::result::Result<V, E>,
        E: fmt::Display,
    {
        text.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| Segment::parse_with(line, &parser))
            .collect()
    }

    /// Read an LTree from `path` (`.lt` is appended when missing)
    pub fn read_file(path: impl AsRef<Path>) -> Result<Self>
    where
        V: FromStr,
        V::Err: fmt::Display,
    {
        Self::read_file_with(path, str::parse::<V>)
    }

    /// Read an LTree from `path`, parsing values with `parser`
    pub fn read_file_with<F, E>(path: impl AsRef<Path>, parser: F) -> Result<Self>
    where
        F: Fn(&str) -> std::result::Result<V, E>,
        E: fmt::Display,
    {
        let path = lt_path(path.as_ref());
        let text = fs::read_to_string(&path)?;
        let lt = Self::parse_with(&text, parser)?;
        debug!(path = %path.display(), segments = lt.len(), "read linearized tree");
        Ok(lt)
    }

    /// Write to `path` (`.lt` is appended when missing), returning the
    /// path actually written
    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<PathBuf>
    where
        V: fmt::Display,
    {
        let path = lt_path(path.as_ref());
        fs::write(&path, format!("{}\n", self))?;
        debug!(path = %path.display(), segments = self.len(), "wrote linearized tree");
        Ok(path)
    }
}

fn lt_path(path: &Path) -> PathBuf {
    if path.extension() == Some(OsStr::new(LT_EXTENSION)) {
        return path.to_path_buf();
    }
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(LT_EXTENSION);
    PathBuf::from(name)
}
