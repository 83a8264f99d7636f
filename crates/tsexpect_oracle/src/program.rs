//! The file set handed to a checker.

use std::path::Path;
use tsexpect_options::CompilerOptions;

/// One source file of a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub file_name: String,
    pub text: String,
}

impl SourceFile {
    pub fn new(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            text: text.into(),
        }
    }

    /// Whether this is a declaration file (`.d.ts`, `.d.mts`, `.d.cts`).
    pub fn is_declaration_file(&self) -> bool {
        let name = self.file_name.as_str();
        name.ends_with(".d.ts") || name.ends_with(".d.mts") || name.ends_with(".d.cts")
    }
}

/// An ordered set of source files plus the options to check them with.
///
/// The same program is given to every checker version.
#[derive(Debug, Clone, Default)]
pub struct Program {
    files: Vec<SourceFile>,
    options: CompilerOptions,
}

impl Program {
    pub fn new(options: CompilerOptions) -> Self {
        Self {
            files: Vec::new(),
            options,
        }
    }

    /// Add a source file. A file with the same name is replaced in place.
    pub fn add_source(&mut self, file_name: impl Into<String>, text: impl Into<String>) {
        let file = SourceFile::new(file_name, text);
        match self.files.iter_mut().find(|f| f.file_name == file.file_name) {
            Some(existing) => *existing = file,
            None => self.files.push(file),
        }
    }

    /// Builder form of [`Program::add_source`].
    pub fn with_source(mut self, file_name: impl Into<String>, text: impl Into<String>) -> Self {
        self.add_source(file_name, text);
        self
    }

    /// Read `file_names` from `root`, keyed by the name as given.
    pub fn load_files<S: AsRef<str>>(
        &mut self,
        root: &Path,
        file_names: &[S],
    ) -> Result<(), std::io::Error> {
        for name in file_names {
            let name = name.as_ref();
            let text = std::fs::read_to_string(root.join(name))?;
            self.add_source(name, text);
        }
        Ok(())
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn file(&self, file_name: &str) -> Option<&SourceFile> {
        self.files.iter().find(|f| f.file_name == file_name)
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_source_replaces_same_name() {
        let program = Program::default()
            .with_source("a.ts", "1")
            .with_source("b.ts", "2")
            .with_source("a.ts", "3");
        let names: Vec<_> = program.files().iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.ts", "b.ts"]);
        assert_eq!(program.file("a.ts").unwrap().text, "3");
        assert!(program.file("c.ts").is_none());
    }

    #[test]
    fn test_declaration_files() {
        assert!(SourceFile::new("index.d.ts", "").is_declaration_file());
        assert!(SourceFile::new("mod.d.mts", "").is_declaration_file());
        assert!(!SourceFile::new("index.ts", "").is_declaration_file());
        assert!(!SourceFile::new("types.tsx", "").is_declaration_file());
    }

    #[test]
    fn test_load_files_keys_by_name() {
        let dir = std::env::temp_dir().join(format!("tsexpect-program-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("index.d.ts"), "export {};").unwrap();
        std::fs::write(dir.join("index-tests.ts"), "x;").unwrap();

        let mut program = Program::default();
        program.load_files(&dir, &["index.d.ts", "index-tests.ts"]).unwrap();
        let names: Vec<_> = program.files().iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["index.d.ts", "index-tests.ts"]);
        assert_eq!(program.file("index-tests.ts").unwrap().text, "x;");

        let err = program.load_files(&dir, &["missing.ts"]).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
        assert_eq!(program.files().len(), 2);
    }
}
