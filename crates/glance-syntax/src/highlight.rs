use std::fmt;
use std::sync::OnceLock;

use glance_render::{Rgba, TokenSpan};
use tree_sitter::Language as TsLanguage;
use tree_sitter_highlight::{HighlightConfiguration, HighlightEvent, Highlighter};

use crate::language::Language;

/// Turns document text into the colored span stream the minimap consumes.
pub struct SyntaxSystem {
    theme: SyntaxTheme,
    registry: LanguageRegistry,
}

impl fmt::Debug for SyntaxSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxSystem").finish()
    }
}

impl Default for SyntaxSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxSystem {
    pub fn new() -> Self {
        Self {
            theme: SyntaxTheme::default(),
            registry: LanguageRegistry::default(),
        }
    }

    /// Color used for text no highlight query claims.
    pub fn default_foreground(&self) -> Rgba {
        self.theme.color(PaletteIndex::TEXT)
    }

    pub fn supports(&self, language: Language) -> bool {
        self.registry.resolve(language, &self.theme).is_some()
    }

    /// Ordered, non-overlapping spans covering all of `text`.
    ///
    /// Falls back to a single default colored span when the language has no
    /// grammar or the highlighter gives up.
    pub fn spans(&self, text: &str, language: Language) -> Vec<TokenSpan> {
        let Some(config) = self.registry.resolve(language, &self.theme) else {
            return plain_spans(text, self.default_foreground());
        };

        match highlight_document(text, config, &self.theme) {
            Ok(spans) => spans,
            Err(err) => {
                tracing::debug!("{} highlighting failed, using plain text: {}", language, err);
                plain_spans(text, self.default_foreground())
            }
        }
    }
}

/// One span in `color` covering all of `text`.
pub fn plain_spans(text: &str, color: Rgba) -> Vec<TokenSpan> {
    if text.is_empty() {
        return Vec::new();
    }
    vec![TokenSpan::new(0..text.len(), color)]
}

struct LanguageConfig {
    configuration: HighlightConfiguration,
    palette_map: Vec<usize>,
}

impl LanguageConfig {
    fn highlight_id_to_palette(&self, id: usize) -> usize {
        self.palette_map
            .get(id)
            .copied()
            .unwrap_or(PaletteIndex::TEXT)
    }
}

/// Grammar configurations are built the first time a language is seen.
#[derive(Default)]
struct LanguageRegistry {
    rust: OnceLock<Option<LanguageConfig>>,
    c: OnceLock<Option<LanguageConfig>>,
    cpp: OnceLock<Option<LanguageConfig>>,
    go: OnceLock<Option<LanguageConfig>>,
    python: OnceLock<Option<LanguageConfig>>,
    javascript: OnceLock<Option<LanguageConfig>>,
    json: OnceLock<Option<LanguageConfig>>,
    css: OnceLock<Option<LanguageConfig>>,
}

impl LanguageRegistry {
    fn resolve(&self, language: Language, theme: &SyntaxTheme) -> Option<&LanguageConfig> {
        match language {
            Language::Rust => self
                .rust
                .get_or_init(|| {
                    build_config(
                        tree_sitter_rust::LANGUAGE.into(),
                        "rust",
                        tree_sitter_rust::HIGHLIGHTS_QUERY,
                        Some(tree_sitter_rust::INJECTIONS_QUERY),
                        theme,
                    )
                })
                .as_ref(),
            Language::C | Language::CHeader => self
                .c
                .get_or_init(|| {
                    build_config(
                        tree_sitter_c::LANGUAGE.into(),
                        "c",
                        tree_sitter_c::HIGHLIGHT_QUERY,
                        None,
                        theme,
                    )
                })
                .as_ref(),
            Language::Cpp | Language::CppHeader => self
                .cpp
                .get_or_init(|| {
                    build_config(
                        tree_sitter_cpp::LANGUAGE.into(),
                        "cpp",
                        tree_sitter_cpp::HIGHLIGHT_QUERY,
                        None,
                        theme,
                    )
                })
                .as_ref(),
            Language::Go => self
                .go
                .get_or_init(|| {
                    build_config(
                        tree_sitter_go::LANGUAGE.into(),
                        "go",
                        tree_sitter_go::HIGHLIGHTS_QUERY,
                        None,
                        theme,
                    )
                })
                .as_ref(),
            Language::Python => self
                .python
                .get_or_init(|| {
                    build_config(
                        tree_sitter_python::LANGUAGE.into(),
                        "python",
                        tree_sitter_python::HIGHLIGHTS_QUERY,
                        None,
                        theme,
                    )
                })
                .as_ref(),
            Language::JavaScript => self
                .javascript
                .get_or_init(|| {
                    build_config(
                        tree_sitter_javascript::LANGUAGE.into(),
                        "javascript",
                        tree_sitter_javascript::HIGHLIGHT_QUERY,
                        Some(tree_sitter_javascript::INJECTIONS_QUERY),
                        theme,
                    )
                })
                .as_ref(),
            Language::Json => self
                .json
                .get_or_init(|| {
                    build_config(
                        tree_sitter_json::LANGUAGE.into(),
                        "json",
                        tree_sitter_json::HIGHLIGHTS_QUERY,
                        None,
                        theme,
                    )
                })
                .as_ref(),
            Language::Css => self
                .css
                .get_or_init(|| {
                    build_config(
                        tree_sitter_css::LANGUAGE.into(),
                        "css",
                        tree_sitter_css::HIGHLIGHTS_QUERY,
                        None,
                        theme,
                    )
                })
                .as_ref(),
            Language::PlainText | Language::Toml | Language::Markdown | Language::Makefile => None,
        }
    }
}

fn build_config(
    language: TsLanguage,
    name: &str,
    highlights: &'static str,
    injections: Option<&'static str>,
    theme: &SyntaxTheme,
) -> Option<LanguageConfig> {
    let mut configuration = match HighlightConfiguration::new(
        language,
        format!("codeglance::{name}"),
        highlights,
        injections.unwrap_or(""),
        "",
    ) {
        Ok(configuration) => configuration,
        Err(err) => {
            tracing::warn!("failed to load {} highlight query: {}", name, err);
            return None;
        }
    };

    configuration.configure(HIGHLIGHT_NAMES);

    let palette_map = HIGHLIGHT_NAMES
        .iter()
        .map(|name| theme.palette_index(name))
        .collect();

    Some(LanguageConfig {
        configuration,
        palette_map,
    })
}

const HIGHLIGHT_NAMES: &[&str] = &[
    "attribute",
    "boolean",
    "comment",
    "comment.documentation",
    "constant",
    "constant.builtin",
    "constant.numeric",
    "constructor",
    "escape",
    "function",
    "function.builtin",
    "function.macro",
    "function.method",
    "keyword",
    "label",
    "module",
    "number",
    "operator",
    "property",
    "punctuation",
    "punctuation.bracket",
    "punctuation.delimiter",
    "string",
    "string.special",
    "tag",
    "type",
    "type.builtin",
    "variable",
    "variable.builtin",
    "variable.parameter",
];

/// Foreground palette. The minimap only shows hue and rough shape, so a
/// handful of classes is plenty.
struct SyntaxTheme {
    palette: [Rgba; PaletteIndex::TOTAL],
}

impl Default for SyntaxTheme {
    fn default() -> Self {
        let mut palette = [Rgba::from_rgb8(171, 178, 191); PaletteIndex::TOTAL];
        palette[PaletteIndex::COMMENT] = Rgba::from_rgb8(117, 113, 94);
        palette[PaletteIndex::KEYWORD] = Rgba::from_rgb8(197, 134, 192);
        palette[PaletteIndex::FUNCTION] = Rgba::from_rgb8(130, 170, 255);
        palette[PaletteIndex::TYPE] = Rgba::from_rgb8(224, 109, 117);
        palette[PaletteIndex::STRING] = Rgba::from_rgb8(152, 195, 121);
        palette[PaletteIndex::NUMBER] = Rgba::from_rgb8(209, 154, 102);
        palette[PaletteIndex::OPERATOR] = Rgba::from_rgb8(86, 182, 194);
        palette[PaletteIndex::PROPERTY] = Rgba::from_rgb8(224, 175, 104);
        palette[PaletteIndex::CONSTANT] = Rgba::from_rgb8(198, 120, 221);
        palette[PaletteIndex::SPECIAL] = Rgba::from_rgb8(97, 175, 239);
        Self { palette }
    }
}

impl SyntaxTheme {
    fn palette_index(&self, name: &str) -> usize {
        if name == "variable.parameter" {
            return PaletteIndex::PROPERTY;
        }

        let base = name.split('.').next().unwrap_or(name);
        match base {
            "comment" => PaletteIndex::COMMENT,
            "keyword" => PaletteIndex::KEYWORD,
            "function" | "constructor" => PaletteIndex::FUNCTION,
            "type" => PaletteIndex::TYPE,
            "string" => PaletteIndex::STRING,
            "number" => PaletteIndex::NUMBER,
            "operator" => PaletteIndex::OPERATOR,
            "property" | "attribute" => PaletteIndex::PROPERTY,
            "constant" | "boolean" => PaletteIndex::CONSTANT,
            "escape" | "punctuation" | "module" | "label" | "tag" => PaletteIndex::SPECIAL,
            _ => PaletteIndex::TEXT,
        }
    }

    fn color(&self, index: usize) -> Rgba {
        self.palette
            .get(index)
            .copied()
            .unwrap_or(self.palette[PaletteIndex::TEXT])
    }
}

struct PaletteIndex;

impl PaletteIndex {
    const TEXT: usize = 0;
    const COMMENT: usize = 1;
    const KEYWORD: usize = 2;
    const FUNCTION: usize = 3;
    const TYPE: usize = 4;
    const STRING: usize = 5;
    const NUMBER: usize = 6;
    const OPERATOR: usize = 7;
    const PROPERTY: usize = 8;
    const CONSTANT: usize = 9;
    const SPECIAL: usize = 10;
    const TOTAL: usize = 11;
}

fn highlight_document(
    text: &str,
    config: &LanguageConfig,
    theme: &SyntaxTheme,
) -> Result<Vec<TokenSpan>, tree_sitter_highlight::Error> {
    let mut highlighter = Highlighter::new();
    let mut stack: Vec<usize> = Vec::new();
    let mut spans = SpanBuilder::new(theme.color(PaletteIndex::TEXT));

    for event in highlighter.highlight(&config.configuration, text.as_bytes(), None, |_| None)? {
        match event? {
            HighlightEvent::HighlightStart(id) => {
                stack.push(config.highlight_id_to_palette(id.0));
            }
            HighlightEvent::HighlightEnd => {
                stack.pop();
            }
            HighlightEvent::Source { start, end } => {
                let palette = stack.last().copied().unwrap_or(PaletteIndex::TEXT);
                spans.push(start, end.min(text.len()), theme.color(palette));
            }
        }
    }

    Ok(spans.finish(text.len()))
}

/// Accumulates highlighter output into a gap-free span list, merging
/// neighbours of the same color.
struct SpanBuilder {
    default: Rgba,
    spans: Vec<TokenSpan>,
    cursor: usize,
}

impl SpanBuilder {
    fn new(default: Rgba) -> Self {
        Self {
            default,
            spans: Vec::new(),
            cursor: 0,
        }
    }

    fn push(&mut self, start: usize, end: usize, color: Rgba) {
        let start = start.max(self.cursor);
        if start >= end {
            return;
        }
        if start > self.cursor {
            self.append(self.cursor, start, self.default);
        }
        self.append(start, end, color);
    }

    fn append(&mut self, start: usize, end: usize, color: Rgba) {
        if let Some(last) = self.spans.last_mut() {
            if last.color == color && last.end() == start {
                last.range.end = end;
                self.cursor = end;
                return;
            }
        }
        self.spans.push(TokenSpan::new(start..end, color));
        self.cursor = end;
    }

    fn finish(mut self, len: usize) -> Vec<TokenSpan> {
        if self.cursor < len {
            self.append(self.cursor, len, self.default);
        }
        self.spans
    }
}
