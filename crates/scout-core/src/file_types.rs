//! File type detection and categorization.
//!
//! Classification is pure: extension and well-known file names only, no
//! content sniffing. That keeps it usable during incremental cache updates
//! where the file may not even be read.

use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::Display;

/// Broad category of a file, used for per-scan statistics.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Code,
    Config,
    Documentation,
    Build,
    Test,
    Asset,
    Binary,
    Unknown,
}

/// Source language, used to pick a dependency parser.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Rust,
    Go,
    Java,
    C,
    Cpp,
    Shell,
    Json,
    Yaml,
    Toml,
    Html,
    Css,
    Markdown,
    Sql,
    Unknown,
}

/// Detect the language of a file by extension.
pub fn detect_language(path: &Path) -> Language {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "py" | "pyx" | "pyi" => Language::Python,
        "js" | "jsx" | "mjs" | "cjs" => Language::JavaScript,
        "ts" | "tsx" => Language::TypeScript,
        "rs" => Language::Rust,
        "go" => Language::Go,
        "java" => Language::Java,
        "c" | "h" => Language::C,
        "cpp" | "cc" | "cxx" | "hpp" => Language::Cpp,
        "sh" | "bash" | "zsh" | "fish" => Language::Shell,
        "json" => Language::Json,
        "yaml" | "yml" => Language::Yaml,
        "toml" => Language::Toml,
        "html" | "htm" => Language::Html,
        "css" | "scss" | "sass" | "less" => Language::Css,
        "md" | "markdown" | "rst" => Language::Markdown,
        "sql" => Language::Sql,
        _ => Language::Unknown,
    }
}

/// Categorize a file by extension and well-known file names.
///
/// Test naming conventions win over the language extension so `test_x.py`
/// lands in [`FileCategory::Test`], matching how people read trees.
pub fn detect_category(path: &Path) -> FileCategory {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if is_build_file(&name) {
        return FileCategory::Build;
    }
    if is_test_file(&name) {
        return FileCategory::Test;
    }

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "py" | "pyx" | "pyi" | "js" | "jsx" | "mjs" | "cjs" | "ts" | "tsx" | "rs" | "go"
        | "java" | "c" | "h" | "cpp" | "cc" | "cxx" | "hpp" | "sh" | "bash" | "zsh" | "sql"
        | "html" | "htm" | "css" | "scss" | "sass" | "less" => FileCategory::Code,
        "json" | "yaml" | "yml" | "toml" | "ini" | "cfg" | "conf" | "xml" | "env"
        | "properties" => FileCategory::Config,
        "md" | "markdown" | "rst" | "txt" | "pdf" | "doc" | "docx" | "rtf" => {
            FileCategory::Documentation
        }
        "png" | "jpg" | "jpeg" | "gif" | "svg" | "ico" | "woff" | "woff2" | "ttf" | "mp3"
        | "mp4" | "wav" | "zip" | "tar" | "gz" | "7z" => FileCategory::Asset,
        "exe" | "dll" | "so" | "dylib" | "o" | "class" | "jar" | "wasm" => FileCategory::Binary,
        _ => {
            if name.starts_with('.') {
                // Dotfiles without a recognized extension are almost always config.
                FileCategory::Config
            } else {
                FileCategory::Unknown
            }
        }
    }
}

fn is_build_file(name: &str) -> bool {
    matches!(
        name,
        "package.json"
            | "package-lock.json"
            | "yarn.lock"
            | "pnpm-lock.yaml"
            | "requirements.txt"
            | "pipfile"
            | "poetry.lock"
            | "setup.py"
            | "pyproject.toml"
            | "cargo.toml"
            | "cargo.lock"
            | "go.mod"
            | "go.sum"
            | "pom.xml"
            | "build.gradle"
            | "makefile"
            | "dockerfile"
            | "gemfile"
            | "gemfile.lock"
    )
}

fn is_test_file(name: &str) -> bool {
    name.starts_with("test_")
        || name.ends_with("_test.py")
        || name.ends_with("_test.go")
        || name.contains(".test.")
        || name.contains(".spec.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_language_detection() {
        assert_eq!(detect_language(Path::new("main.py")), Language::Python);
        assert_eq!(detect_language(Path::new("lib.rs")), Language::Rust);
        assert_eq!(detect_language(Path::new("app.tsx")), Language::TypeScript);
        assert_eq!(detect_language(Path::new("README")), Language::Unknown);
    }

    #[test]
    fn test_category_detection() {
        assert_eq!(detect_category(Path::new("src/main.py")), FileCategory::Code);
        assert_eq!(detect_category(Path::new("config.yaml")), FileCategory::Config);
        assert_eq!(detect_category(Path::new("README.md")), FileCategory::Documentation);
        assert_eq!(detect_category(Path::new("logo.png")), FileCategory::Asset);
        assert_eq!(detect_category(Path::new("thing.bin")), FileCategory::Unknown);
    }

    #[test]
    fn test_build_files_by_name() {
        assert_eq!(detect_category(Path::new("Cargo.toml")), FileCategory::Build);
        assert_eq!(detect_category(Path::new("package.json")), FileCategory::Build);
        assert_eq!(detect_category(Path::new("deps/go.mod")), FileCategory::Build);
    }

    #[test]
    fn test_test_naming_wins_over_extension() {
        assert_eq!(
            detect_category(&PathBuf::from("tests/test_scanner.py")),
            FileCategory::Test
        );
        assert_eq!(
            detect_category(Path::new("ui/button.spec.ts")),
            FileCategory::Test
        );
    }
}
