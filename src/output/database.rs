use super::{shell, Content, Entry, Format, OutputError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// JSON shape of an entry, both forms of the command line accepted
#[derive(Debug, Serialize, Deserialize)]
struct JsonEntry {
    file: PathBuf,
    directory: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    output: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    arguments: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    command: Option<String>,
}

impl JsonEntry {
    fn from_entry(entry: &Entry, format: &Format) -> Self {
        let (arguments, command) = if format.command_as_array {
            (Some(entry.arguments.clone()), None)
        } else {
            (None, Some(shell::join(&entry.arguments)))
        };
        Self {
            file: entry.file.clone(),
            directory: entry.directory.clone(),
            output: if format.drop_output_field {
                None
            } else {
                entry.output.clone()
            },
            arguments,
            command,
        }
    }

    fn into_entry(self) -> Result<Entry, OutputError> {
        let arguments = match (self.arguments, self.command) {
            (Some(arguments), _) => arguments,
            (None, Some(command)) => shell::split(&command)?,
            (None, None) => {
                return Err(OutputError::Validation(
                    "key 'command' or 'arguments' not found".to_string(),
                ))
            }
        };
        let entry = Entry {
            file: self.file,
            directory: self.directory,
            output: self.output,
            arguments,
        };
        entry.validate()?;
        Ok(entry)
    }
}

/// Reads and writes `compile_commands.json` files
#[derive(Debug, Clone, Default)]
pub struct CompilationDatabase {
    format: Format,
    content: Content,
}

impl CompilationDatabase {
    pub fn new(format: Format, content: Content) -> Self {
        Self { format, content }
    }

    /// Writes the entries accepted by the content filter, returns how many were written
    pub fn to_json(&self, path: &Path, entries: &[Entry]) -> Result<usize, OutputError> {
        let file = File::create(path).map_err(|source| OutputError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        let count = self.to_writer(&mut writer, entries)?;
        writer.flush().map_err(|source| OutputError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(count)
    }

    pub fn to_writer<W: Write>(&self, mut writer: W, entries: &[Entry]) -> Result<usize, OutputError> {
        let json: Vec<JsonEntry> = entries
            .iter()
            .filter(|entry| self.content.accepts(entry))
            .map(|entry| JsonEntry::from_entry(entry, &self.format))
            .collect();

        serde_json::to_writer_pretty(&mut writer, &json)?;
        writeln!(writer).map_err(OutputError::Write)?;
        Ok(json.len())
    }

    pub fn from_json(&self, path: &Path) -> Result<Vec<Entry>, OutputError> {
        let file = File::open(path).map_err(|source| OutputError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(&self, reader: R) -> Result<Vec<Entry>, OutputError> {
        let json: Vec<JsonEntry> = serde_json::from_reader(reader)?;
        json.into_iter().map(JsonEntry::into_entry).collect()
    }
}

/// Union of two databases, keeping the first of equivalent entries
///
/// Entries are compared by source and output when every entry on both sides
/// has an output. Otherwise by source, directory and the arguments after
/// the compiler.
pub fn merge(lhs: &[Entry], rhs: &[Entry]) -> Vec<Entry> {
    let all_have_output = lhs.iter().chain(rhs).all(|entry| entry.output.is_some());
    let same = |a: &Entry, b: &Entry| {
        if all_have_output {
            a.file == b.file && a.output == b.output
        } else {
            a.file == b.file
                && a.directory == b.directory
                && a.arguments.get(1..) == b.arguments.get(1..)
        }
    };

    let mut result: Vec<Entry> = Vec::with_capacity(lhs.len() + rhs.len());
    for entry in lhs.iter().chain(rhs) {
        if !result.iter().any(|existing| same(existing, entry)) {
            result.push(entry.clone());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(file: &str, output: Option<&str>, arguments: &[&str]) -> Entry {
        Entry {
            file: PathBuf::from(file),
            directory: PathBuf::from("/src"),
            output: output.map(PathBuf::from),
            arguments: arguments.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn written(database: &CompilationDatabase, entries: &[Entry]) -> serde_json::Value {
        let mut buffer = Vec::new();
        database.to_writer(&mut buffer, entries).unwrap();
        serde_json::from_slice(&buffer).unwrap()
    }

    #[test]
    fn test_write_arguments_form() {
        let database = CompilationDatabase::default();
        let json = written(
            &database,
            &[entry("/src/a.c", Some("/src/a.o"), &["cc", "-c", "/src/a.c"])],
        );

        assert_eq!(
            json,
            serde_json::json!([{
                "file": "/src/a.c",
                "directory": "/src",
                "output": "/src/a.o",
                "arguments": ["cc", "-c", "/src/a.c"]
            }])
        );
    }

    #[test]
    fn test_write_command_form_without_output() {
        let database = CompilationDatabase::new(
            Format {
                command_as_array: false,
                drop_output_field: true,
            },
            Content::default(),
        );
        let json = written(
            &database,
            &[entry("/src/a b.c", Some("/src/a.o"), &["cc", "-c", "/src/a b.c"])],
        );

        assert_eq!(
            json,
            serde_json::json!([{
                "file": "/src/a b.c",
                "directory": "/src",
                "command": "cc -c '/src/a b.c'"
            }])
        );
    }

    #[test]
    fn test_write_is_pretty_with_trailing_newline() {
        let mut buffer = Vec::new();
        let count = CompilationDatabase::default()
            .to_writer(&mut buffer, &[entry("/src/a.c", None, &["cc"])])
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert_eq!(count, 1);
        assert!(text.starts_with("[\n  {"));
        assert!(text.ends_with("]\n"));
    }

    #[test]
    fn test_write_counts_only_accepted_entries() {
        let database = CompilationDatabase::new(
            Format::default(),
            Content {
                include_only_existing_source: true,
                ..Default::default()
            },
        );
        let mut buffer = Vec::new();
        let count = database
            .to_writer(&mut buffer, &[entry("/nonexistent/a.c", None, &["cc"])])
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("compile_commands.json");
        let database = CompilationDatabase::new(
            Format {
                command_as_array: false,
                drop_output_field: false,
            },
            Content::default(),
        );
        let entries = vec![
            entry("/src/a.c", Some("/src/a.o"), &["cc", "-DX=\"y z\"", "-c", "/src/a.c"]),
            entry("/src/b.c", Some("/src/b.o"), &["cc", "-c", "/src/b.c"]),
        ];

        assert_eq!(database.to_json(&path, &entries).unwrap(), 2);
        assert_eq!(database.from_json(&path).unwrap(), entries);
    }

    #[test]
    fn test_read_rejects_invalid_entries() {
        let database = CompilationDatabase::default();

        let missing_command = r#"[{ "file": "a.c", "directory": "/src" }]"#;
        assert!(matches!(
            database.from_reader(missing_command.as_bytes()),
            Err(OutputError::Validation(_))
        ));

        let empty_arguments = r#"[{ "file": "a.c", "directory": "/src", "arguments": [] }]"#;
        assert!(database.from_reader(empty_arguments.as_bytes()).is_err());

        let not_json = "[{";
        assert!(matches!(
            database.from_reader(not_json.as_bytes()),
            Err(OutputError::Json(_))
        ));
    }

    #[test]
    fn test_read_missing_file() {
        let err = CompilationDatabase::default()
            .from_json(Path::new("/nonexistent/compile_commands.json"))
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/compile_commands.json"));
    }

    #[test]
    fn test_merge_by_output() {
        let lhs = vec![
            entry("/src/a.c", Some("/src/a.o"), &["cc", "-O0"]),
            entry("/src/b.c", Some("/src/b.o"), &["cc"]),
        ];
        let rhs = vec![
            entry("/src/a.c", Some("/src/a.o"), &["cc", "-O2"]),
            entry("/src/a.c", Some("/src/a32.o"), &["cc", "-m32"]),
        ];

        let merged = merge(&lhs, &rhs);
        assert_eq!(merged, vec![lhs[0].clone(), lhs[1].clone(), rhs[1].clone()]);
    }

    #[test]
    fn test_merge_by_arguments_when_output_missing() {
        let lhs = vec![entry("/src/a.c", None, &["gcc", "-c", "a.c"])];
        let rhs = vec![
            entry("/src/a.c", Some("/src/a.o"), &["cc", "-c", "a.c"]),
            entry("/src/a.c", None, &["cc", "-O2", "-c", "a.c"]),
        ];

        let merged = merge(&lhs, &rhs);
        assert_eq!(merged, vec![lhs[0].clone(), rhs[1].clone()]);
    }

    #[test]
    fn test_merge_with_empty() {
        let entries = vec![entry("/src/a.c", None, &["cc"])];
        assert_eq!(merge(&entries, &[]), entries);
        assert_eq!(merge(&[], &entries), entries);
    }
}
