use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{ErrorDetail, Result, Chainable};
use crate::value::Source;

/// A serde data format whose documents are read whole.
pub trait Format: Sized {
    /// The data format's error type.
    type Error: serde::de::Error + ErrorDetail + 'static;

    /// Parses `string` as the data format `Self` as a `T` or returns an error
    /// if the `string` is an invalid `T`. Prefer [`Format::read()`], which
    /// attaches the source's path to failures.
    fn from_str<T: DeserializeOwned>(string: &str) -> Result<T, Self::Error>;

    fn read<I: Source, T: DeserializeOwned>(input: I) -> Result<T> {
        let path = input.path().map(|p| p.display().to_string());
        let input = input.read()?;
        Self::from_str(&input).chain_with(|| error! {
            "failed to parse data file",
            "format" => std::any::type_name::<Self>().rsplit("::").next().unwrap_or_default(),
            if path.is_some() => "path" => path.as_deref().unwrap_or_default(),
        })
    }
}

macro_rules! impl_format {
    ($name:ident : $func:expr, $E:ty) => (
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl Format for $name {
            type Error = $E;

            fn from_str<T: DeserializeOwned>(s: &str) -> Result<T, $E> {
                $func(s)
            }
        }
    );
}

impl_format!(Toml: toml::from_str, toml::de::Error);
impl_format!(Json: serde_json::from_str, serde_json::error::Error);

/// Comma-delimited records with a header row naming the fields.
///
/// Records are deserialized by header name, so column order is free and extra
/// columns are ignored. A row that fails to deserialize fails the whole read.
#[derive(Debug, Clone, Copy, Default)]
pub struct Csv {
    skip: usize,
}

impl Csv {
    /// Discards the first `n` records after the header.
    pub fn skip(mut self, n: usize) -> Self {
        self.skip = n;
        self
    }

    pub fn records<I: Source, T: DeserializeOwned>(&self, input: I) -> Result<Vec<T>> {
        let path = input.path().map(Path::to_path_buf);
        let text = input.read()?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());

        reader.deserialize::<T>()
            .skip(self.skip)
            .map(|record| record.chain_with(|| error! {
                "malformed record in delimited data",
                if path.is_some() => "path" => path.as_ref().map(|p| p.display().to_string()).unwrap_or_default(),
            }))
            .collect()
    }
}
