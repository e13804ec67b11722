use std::{collections::HashMap, fs, path::Path};

use rivet_di::PropertySource;

use crate::errors::PropertiesError;

/// In-memory key → string source
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    entries: HashMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one entry, for chained composition
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<HashMap<String, String>> for MapSource {
    fn from(entries: HashMap<String, String>) -> Self {
        MapSource { entries }
    }
}

impl FromIterator<(String, String)> for MapSource {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        MapSource {
            entries: iter.into_iter().collect(),
        }
    }
}

impl PropertySource for MapSource {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }
}

/// Loader for `key=value` properties files
///
/// Blank lines and lines starting with `#` or `!` are skipped; `=` and `:`
/// both separate key from value; a line without a separator is a key with an
/// empty value. Unicode escapes and line continuations are not supported.
pub struct PropertiesFile;

impl PropertiesFile {
    pub fn load(path: impl AsRef<Path>) -> Result<MapSource, PropertiesError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| PropertiesError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let source = Self::parse(&text);
        tracing::debug!(
            "loaded {} properties from '{}'",
            source.len(),
            path.display()
        );
        Ok(source)
    }

    pub fn parse(text: &str) -> MapSource {
        let mut entries = HashMap::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let (key, value) = match line.find(['=', ':']) {
                Some(at) => (line[..at].trim_end(), line[at + 1..].trim_start()),
                None => (line, ""),
            };
            entries.insert(key.to_string(), value.to_string());
        }

        MapSource { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_splits_on_equals_and_colon() {
        let source = PropertiesFile::parse("host=localhost\nport: 8080");
        assert_eq!(source.get("host").as_deref(), Some("localhost"));
        assert_eq!(source.get("port").as_deref(), Some("8080"));
    }

    #[test]
    fn parse_skips_comments_and_blank_lines() {
        let source = PropertiesFile::parse("# a comment\n! another\n\nkey=value\n");
        assert_eq!(source.len(), 1);
        assert_eq!(source.get("key").as_deref(), Some("value"));
    }

    #[test]
    fn parse_trims_around_the_separator() {
        let source = PropertiesFile::parse("  app.name  =  demo  ");
        assert_eq!(source.get("app.name").as_deref(), Some("demo"));
    }

    #[test]
    fn bare_key_maps_to_empty_value() {
        let source = PropertiesFile::parse("flag");
        assert_eq!(source.get("flag").as_deref(), Some(""));
    }

    #[test]
    fn absent_key_is_none() {
        let source = PropertiesFile::parse("key=value");
        assert_eq!(source.get("ghost"), None);
    }

    #[test]
    fn load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "greeting=hello").unwrap();

        let source = PropertiesFile::load(file.path()).unwrap();
        assert_eq!(source.get("greeting").as_deref(), Some("hello"));
    }

    #[test]
    fn load_surfaces_io_errors() {
        let err = PropertiesFile::load("/definitely/not/there.properties").unwrap_err();
        assert!(matches!(err, PropertiesError::Io { .. }));
    }

    #[test]
    fn map_source_builds_by_chaining() {
        let source = MapSource::new().with("a", "1").with("b", "2");
        assert_eq!(source.get("a").as_deref(), Some("1"));
        assert_eq!(source.get("b").as_deref(), Some("2"));
    }
}
