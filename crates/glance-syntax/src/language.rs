use std::fmt;
use std::path::Path;

/// Languages the minimap knows how to colorize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    PlainText,
    Rust,
    C,
    CHeader,
    Cpp,
    CppHeader,
    Go,
    Python,
    JavaScript,
    Json,
    Css,
    Toml,
    Markdown,
    Makefile,
}

impl Language {
    /// Human friendly label.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::PlainText => "Plain Text",
            Self::Rust => "Rust",
            Self::C => "C",
            Self::CHeader => "C Header",
            Self::Cpp => "C++",
            Self::CppHeader => "C++ Header",
            Self::Go => "Go",
            Self::Python => "Python",
            Self::JavaScript => "JavaScript",
            Self::Json => "JSON",
            Self::Css => "CSS",
            Self::Toml => "TOML",
            Self::Markdown => "Markdown",
            Self::Makefile => "Makefile",
        }
    }

    /// Guess the language from a file name, falling back to plain text.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
            if name.eq_ignore_ascii_case("makefile") || name.eq_ignore_ascii_case("gnumakefile") {
                return Self::Makefile;
            }
        }

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
        {
            Some(ext) => match ext.as_str() {
                "rs" => Self::Rust,
                "c" => Self::C,
                "h" => Self::CHeader,
                "hh" | "hpp" | "hxx" | "h++" => Self::CppHeader,
                "cpp" | "cc" | "cxx" | "c++" => Self::Cpp,
                "go" => Self::Go,
                "py" | "pyi" => Self::Python,
                "js" | "mjs" | "cjs" => Self::JavaScript,
                "json" => Self::Json,
                "css" => Self::Css,
                "toml" => Self::Toml,
                "md" | "markdown" => Self::Markdown,
                _ => Self::PlainText,
            },
            None => Self::PlainText,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_by_extension() {
        let cases = [
            ("src/main.rs", Language::Rust),
            ("lib/util.C", Language::C),
            ("include/api.h", Language::CHeader),
            ("include/api.hpp", Language::CppHeader),
            ("engine.cc", Language::Cpp),
            ("cmd/server.go", Language::Go),
            ("script.py", Language::Python),
            ("app.mjs", Language::JavaScript),
            ("package.json", Language::Json),
            ("style.css", Language::Css),
            ("Cargo.toml", Language::Toml),
            ("README.md", Language::Markdown),
            ("notes.txt", Language::PlainText),
            ("LICENSE", Language::PlainText),
        ];

        for (path, expected) in cases {
            assert_eq!(Language::from_path(path), expected, "{path}");
        }
    }

    #[test]
    fn detects_special_file_names() {
        assert_eq!(Language::from_path("Makefile"), Language::Makefile);
        assert_eq!(Language::from_path("build/GNUmakefile"), Language::Makefile);
    }

    #[test]
    fn display_formatting() {
        assert_eq!(format!("{}", Language::Cpp), "C++");
        assert_eq!(Language::default().to_string(), "Plain Text");
    }
}
