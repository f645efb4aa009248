use std::fs;
use std::path::{Path, PathBuf};
use std::fmt::Debug;

use crate::error::{Result, Chainable};

/// Something text can be written to, replacing what was there.
pub trait Sink: Debug {
    fn write(&self, contents: &str) -> Result<()>;
}

impl Sink for &Path {
    fn write(&self, contents: &str) -> Result<()> {
        fs::write(self, contents).chain(error! {
            "failed to open/create file for writing",
            "file path" => self.display()
        })
    }
}

impl Sink for PathBuf {
    fn write(&self, contents: &str) -> Result<()> {
        <&Path as Sink>::write(&self.as_path(), contents)
    }
}

impl<T: Sink> Sink for &T {
    fn write(&self, contents: &str) -> Result<()> {
        <T as Sink>::write(self, contents)
    }
}
