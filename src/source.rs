// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Loading raw feature text.
//!
//! Every loader returns text with `\r\n` and `\r` line endings replaced by
//! `\n`, ending with a newline.

use std::{
    fs,
    io::{self, BufRead as _, BufReader, Read},
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};

/// Raw text of a feature, ready to be parsed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeatureSource {
    text: String,
    path: Option<PathBuf>,
}

impl FeatureSource {
    /// Reads the feature file at the given `path`.
    ///
    /// # Errors
    ///
    /// With [`Error::Io`] if the file can't be read or isn't UTF-8.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: Some(path.to_path_buf()),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded feature");
        Ok(Self {
            text: normalize(&text),
            path: Some(path.to_path_buf()),
        })
    }

    /// Reads a feature from the given `reader` line by line.
    ///
    /// # Errors
    ///
    /// With [`Error::Io`] if reading fails or the stream isn't UTF-8.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let mut text = String::new();
        for line in BufReader::new(reader).lines() {
            let line = line.map_err(|source| Error::Io { path: None, source })?;
            text.push_str(&line);
            text.push('\n');
        }
        Ok(Self {
            text: normalize(&text),
            path: None,
        })
    }

    /// Wraps an in-memory feature `text`.
    #[allow(clippy::should_implement_trait)] // infallible, unlike `FromStr`
    #[must_use]
    pub fn from_str(text: &str) -> Self {
        Self {
            text: normalize(text),
            path: None,
        }
    }

    /// Normalized feature text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Path the text was read from, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Unwraps the normalized feature text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}

/// Directory of `.feature` files bundled with the tests.
#[derive(Clone, Debug)]
pub struct Assets {
    root: PathBuf,
}

impl Assets {
    /// Creates [`Assets`] rooted at the given directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of these [`Assets`].
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loads the feature at the `relative` path inside the root.
    ///
    /// # Errors
    ///
    /// With [`Error::Io`] if the file can't be read.
    pub fn load(&self, relative: impl AsRef<Path>) -> Result<FeatureSource> {
        FeatureSource::from_path(self.root.join(relative))
    }

    /// Lists every `.feature` file below the root, relative to it and sorted.
    ///
    /// # Errors
    ///
    /// With [`Error::Io`] if the directory can't be walked.
    pub fn features(&self) -> Result<Vec<PathBuf>> {
        let io_err = |source: io::Error| Error::Io {
            path: Some(self.root.clone()),
            source,
        };

        let walker = globwalk::GlobWalkerBuilder::new(&self.root, "*.feature")
            .case_insensitive(true)
            .build()
            .map_err(|e| io_err(io::Error::new(io::ErrorKind::InvalidInput, e)))?;

        let mut paths = walker
            .map(|entry| {
                let entry = entry.map_err(|e| io_err(e.into()))?;
                Ok(entry
                    .path()
                    .strip_prefix(&self.root)
                    .unwrap_or_else(|_| entry.path())
                    .to_path_buf())
            })
            .collect::<Result<Vec<_>>>()?;
        paths.sort();
        Ok(paths)
    }
}

/// Replaces `\r\n` and `\r` with `\n`, appending a final newline if missing.
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut out = text.replace("\r\n", "\n").replace('\r', "\n");
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
