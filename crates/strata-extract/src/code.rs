//! Line-oriented source code reader.
//!
//! Declarations are recognised line by line with per-language regex tables
//! (see [`crate::patterns`]); bodies are delimited by brace counting.
//! Fields and variants are expected one per line (or comma separated for
//! variants). This is a heuristic reader, not a parser: braces inside string
//! literals are counted too.

use std::fs;
use std::path::Path;

use regex::Regex;
use strata_core::{
    CodeInfo, Descriptor, EnumInfo, FieldInfo, FunctionInfo, Span, StructInfo, VariantInfo,
};
use strum::{Display, EnumString, IntoStaticStr};
use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::patterns::{self, LanguagePatterns};

/// Source language, inferred from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    Rust,
    Go,
    C,
    Cpp,
    Java,
    CSharp,
    Swift,
    JavaScript,
    TypeScript,
    Python,
    Unknown,
}

impl Language {
    /// Infer the language from a path's extension.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "rs" => Language::Rust,
            "go" => Language::Go,
            "c" | "h" => Language::C,
            "cc" | "cpp" | "cxx" | "hpp" | "hh" => Language::Cpp,
            "java" => Language::Java,
            "cs" => Language::CSharp,
            "swift" => Language::Swift,
            "js" | "mjs" | "cjs" | "jsx" => Language::JavaScript,
            "ts" | "tsx" => Language::TypeScript,
            "py" => Language::Python,
            _ => Language::Unknown,
        }
    }

    fn patterns(self) -> &'static LanguagePatterns {
        match self {
            Language::Rust => &patterns::RUST,
            Language::Go => &patterns::GO,
            Language::C => &patterns::C,
            Language::Cpp => &patterns::CPP,
            Language::Java => &patterns::JAVA,
            Language::CSharp => &patterns::CSHARP,
            Language::Swift => &patterns::SWIFT,
            Language::JavaScript => &patterns::JAVASCRIPT,
            Language::TypeScript => &patterns::TYPESCRIPT,
            Language::Python => &patterns::PYTHON,
            Language::Unknown => &patterns::UNKNOWN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclKind {
    Struct,
    Enum,
    Function,
}

impl DeclKind {
    fn as_str(self) -> &'static str {
        match self {
            DeclKind::Struct => "struct",
            DeclKind::Enum => "enum",
            DeclKind::Function => "fn",
        }
    }
}

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(err) => {
            warn!(pattern, error = %err, "skipping invalid pattern");
            None
        }
    }
}

/// Compiled patterns for one language.
struct Matchers {
    declarations: Vec<(DeclKind, Regex)>,
    field: Option<Regex>,
    variant: Option<Regex>,
    typedef_alias: Option<Regex>,
}

impl Matchers {
    fn new(language: Language) -> Self {
        let table = language.patterns();
        let mut declarations = Vec::new();
        for (kind, sources) in [
            (DeclKind::Struct, table.structs),
            (DeclKind::Enum, table.enums),
            (DeclKind::Function, table.functions),
        ] {
            declarations.extend(sources.iter().filter_map(|s| compile(s)).map(|r| (kind, r)));
        }

        Self {
            declarations,
            field: table.field.and_then(compile),
            variant: compile(patterns::VARIANT),
            typedef_alias: compile(patterns::TYPEDEF_ALIAS),
        }
    }

    /// Recognise a declaration on a single line. The name is `None` for an
    /// anonymous typedef, whose alias follows the closing brace.
    fn declaration(&self, line: &str) -> Option<(DeclKind, Option<String>)> {
        let code = code_part(line);
        for (kind, regex) in &self.declarations {
            let Some(caps) = regex.captures(code) else {
                continue;
            };
            let Some(name) = caps.name("name") else {
                return Some((*kind, None));
            };
            let prefix = &code[..name.start()];
            if *kind == DeclKind::Function && !is_function_name(prefix, name.as_str()) {
                continue;
            }
            return Some((*kind, Some(name.as_str().to_string())));
        }
        None
    }

    /// `} Name;` closing an anonymous typedef.
    fn typedef_name(&self, line: &str) -> Option<String> {
        let caps = self.typedef_alias.as_ref()?.captures(code_part(line))?;
        caps.name("name").map(|m| m.as_str().to_string())
    }

    fn field(&self, text: &str, parent: &str, line: u32) -> Option<FieldInfo> {
        let text = text.trim().trim_end_matches([',', ';']).trim();
        if is_noise(text) {
            return None;
        }
        let caps = self.field.as_ref()?.captures(text)?;
        let name = caps.name("name")?.as_str().to_string();
        let type_name = caps
            .name("type")
            .map(|m| m.as_str().trim().to_string())
            .filter(|t| !t.is_empty());

        Some(FieldInfo {
            path: format!("{parent}::{name}"),
            name,
            type_name,
            line,
        })
    }

    fn variant(&self, text: &str, line: u32) -> Option<(String, Option<String>, u32)> {
        let text = text.trim_end_matches([',', ';']).trim();
        if is_noise(text) {
            return None;
        }
        let caps = self.variant.as_ref()?.captures(text)?;
        let name = caps.name("name")?.as_str().to_string();
        let value = caps
            .name("value")
            .map(|m| m.as_str().trim_start_matches('=').trim().to_string())
            .filter(|v| !v.is_empty());
        Some((name, value, line))
    }
}

/// Reject control flow that the return-type function pattern also matches,
/// e.g. `else if (x) {` or `return make(a,`.
fn is_function_name(prefix: &str, name: &str) -> bool {
    !patterns::NON_FUNCTION_KEYWORDS.contains(&name)
        && !prefix
            .split_whitespace()
            .any(|w| patterns::NON_FUNCTION_KEYWORDS.contains(&w.trim_matches(['*', '&'])))
}

/// Read all declarations in a source file.
pub fn read_code(path: impl AsRef<Path>) -> Result<CodeInfo, ExtractError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|e| ExtractError::io(path, e))?;
    let info = parse_code(path, &source);
    debug!(
        path = %path.display(),
        language = %info.language,
        declarations = info.declaration_count(),
        "code read"
    );
    Ok(info)
}

/// Read the struct declarations in a source file.
pub fn read_structs(path: impl AsRef<Path>) -> Result<Vec<StructInfo>, ExtractError> {
    read_code(path).map(|info| info.structs)
}

/// Read the enum declarations in a source file.
pub fn read_enums(path: impl AsRef<Path>) -> Result<Vec<EnumInfo>, ExtractError> {
    read_code(path).map(|info| info.enums)
}

/// Extract declarations from source text.
pub fn parse_code(path: &Path, source: &str) -> CodeInfo {
    let language = Language::from_path(path);
    let file = path.to_string_lossy().into_owned();
    let lines: Vec<&str> = source.lines().collect();

    let mut info = CodeInfo {
        path: file.clone(),
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.clone()),
        language: language.to_string(),
        line_count: lines.len() as u64,
        structs: Vec::new(),
        enums: Vec::new(),
        functions: Vec::new(),
    };

    let matchers = Matchers::new(language);
    for (index, line) in lines.iter().enumerate() {
        let Some((kind, name)) = matchers.declaration(line) else {
            continue;
        };
        let end = block_end(&lines, index);
        let Some(name) = name.or_else(|| matchers.typedef_name(lines[end])) else {
            continue;
        };
        let span = Span::new(index as u32 + 1, end as u32 + 1);
        let lang = language.to_string();

        match kind {
            DeclKind::Struct => {
                let path = format!("{file}::{name}");
                let fields = body_items(&lines, index, end)
                    .into_iter()
                    .filter_map(|(line, text)| matchers.field(text, &path, line))
                    .collect();
                info.structs.push(StructInfo {
                    descriptor: Descriptor::new(kind.as_str(), name, path, lang, span),
                    fields,
                });
            }
            DeclKind::Enum => {
                let path = format!("{file}::{name}");
                let matchers = &matchers;
                let variants = body_items(&lines, index, end)
                    .into_iter()
                    .flat_map(|(line, text)| {
                        split_top_level(text)
                            .into_iter()
                            .filter_map(move |part| matchers.variant(part, line))
                    })
                    .map(|(name, value, line)| VariantInfo {
                        path: format!("{path}::{name}"),
                        name,
                        value,
                        line,
                    })
                    .collect();
                info.enums.push(EnumInfo {
                    descriptor: Descriptor::new(kind.as_str(), name, path, lang, span),
                    variants,
                });
            }
            DeclKind::Function => {
                let path = format!("{file}::{name}#L{}", span.start_line);
                let signature = line.trim().trim_end_matches('{').trim_end().to_string();
                info.functions.push(FunctionInfo {
                    descriptor: Descriptor::new(kind.as_str(), name, path, lang, span),
                    signature,
                });
            }
        }
    }

    info
}

/// Strip a trailing `//` comment.
fn code_part(line: &str) -> &str {
    line.split_once("//").map_or(line, |(code, _)| code)
}

/// Index of the line closing the declaration starting at `start`.
///
/// A declaration ending in `;` before any `{` ends on that line. Python
/// bodies end at the first non-blank line indented no deeper than the
/// declaration.
fn block_end(lines: &[&str], start: usize) -> usize {
    let first = lines[start];
    if first.trim_end().ends_with(':') && !first.contains('{') {
        let indent = first.len() - first.trim_start().len();
        let mut end = start;
        for (offset, line) in lines[start + 1..].iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            if line.len() - line.trim_start().len() <= indent {
                break;
            }
            end = start + 1 + offset;
        }
        return end;
    }

    let mut depth = 0usize;
    let mut opened = false;
    for (index, line) in lines.iter().copied().enumerate().skip(start) {
        let code = code_part(line);
        for c in code.chars() {
            match c {
                '{' => {
                    depth += 1;
                    opened = true;
                }
                '}' => depth = depth.saturating_sub(1),
                _ => {}
            }
            if opened && depth == 0 {
                return index;
            }
        }
        if !opened && code.trim_end().ends_with(';') {
            return index;
        }
    }
    lines.len().saturating_sub(1).max(start)
}

/// Lines directly inside the body (brace depth 1), with their 1-based line
/// numbers. A body written on the declaration line is returned as one item.
fn body_items<'a>(lines: &[&'a str], start: usize, end: usize) -> Vec<(u32, &'a str)> {
    if start == end {
        let code = code_part(lines[start]);
        return match (code.find('{'), code.rfind('}')) {
            (Some(open), Some(close)) if open < close => {
                vec![(start as u32 + 1, &code[open + 1..close])]
            }
            _ => Vec::new(),
        };
    }

    let mut items = Vec::new();
    let mut depth = 0usize;
    for (index, line) in lines.iter().copied().enumerate().take(end + 1).skip(start) {
        let code = code_part(line);
        if index > start && depth == 1 {
            // A nested block opening here keeps only its header.
            let text = code.trim();
            let text = text.strip_suffix('{').unwrap_or(text).trim_end();
            if !text.is_empty() && !text.starts_with('}') {
                items.push((index as u32 + 1, text));
            }
        }
        for c in code.chars() {
            match c {
                '{' => depth += 1,
                '}' => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
    }
    items
}

fn is_noise(text: &str) -> bool {
    text.is_empty()
        || ["#", "/*", "*", "@", "}"]
            .iter()
            .any(|prefix| text.starts_with(prefix))
}

/// Split on commas outside of parentheses, brackets and angle brackets.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '(' | '[' | '<' | '{' => depth += 1,
            ')' | ']' | '>' | '}' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts.into_iter().map(str::trim).filter(|p| !p.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUST: &str = r#"use std::fmt;

/// A point.
#[derive(Debug)]
pub struct Point {
    pub x: f64,
    y: f64, // private
}

pub(crate) struct Unit;

pub enum Shape {
    Circle(f64),
    Rect { w: f64, h: f64 },
    Empty = 3,
}

enum Flag { On, Off }

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

pub async fn run() -> Result<(), Error> {
    Ok(())
}
"#;

    #[test]
    fn test_language_from_path() {
        assert_eq!(Language::from_path(Path::new("a/b.rs")), Language::Rust);
        assert_eq!(Language::from_path(Path::new("x.HPP")), Language::Cpp);
        assert_eq!(Language::from_path(Path::new("Makefile")), Language::Unknown);
        assert_eq!(Language::CSharp.to_string(), "csharp");
    }

    #[test]
    fn test_all_patterns_compile() {
        use std::str::FromStr;

        for name in [
            "rust", "go", "c", "cpp", "java", "csharp", "swift", "javascript", "typescript",
            "python", "unknown",
        ] {
            let language = Language::from_str(name).unwrap();
            let table = language.patterns();
            let matchers = Matchers::new(language);
            let expected = table.structs.len() + table.enums.len() + table.functions.len();
            assert_eq!(matchers.declarations.len(), expected, "{name}");
            assert_eq!(matchers.field.is_some(), table.field.is_some(), "{name}");
            assert!(matchers.variant.is_some());
            assert!(matchers.typedef_alias.is_some());
        }
    }

    #[test]
    fn test_rust_structs() {
        let info = parse_code(Path::new("src/geo.rs"), RUST);
        assert_eq!(info.language, "rust");

        let names: Vec<_> = info.structs.iter().map(|s| s.descriptor.name.as_str()).collect();
        assert_eq!(names, vec!["Point", "Unit"]);

        let point = &info.structs[0];
        assert_eq!(point.descriptor.path, "src/geo.rs::Point");
        assert_eq!(point.descriptor.span, Span::new(5, 8));
        let fields: Vec<_> = point
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.type_name.as_deref()))
            .collect();
        assert_eq!(fields, vec![("x", Some("f64")), ("y", Some("f64"))]);
        assert_eq!(point.fields[1].path, "src/geo.rs::Point::y");
        assert_eq!(point.fields[1].line, 7);

        let unit = &info.structs[1];
        assert_eq!(unit.descriptor.span, Span::new(10, 10));
        assert!(unit.fields.is_empty());
    }

    #[test]
    fn test_rust_enums() {
        let info = parse_code(Path::new("src/geo.rs"), RUST);
        assert_eq!(info.enums.len(), 2);

        let shape = &info.enums[0];
        let variants: Vec<_> = shape
            .variants
            .iter()
            .map(|v| (v.name.as_str(), v.value.as_deref()))
            .collect();
        assert_eq!(
            variants,
            vec![
                ("Circle", Some("(f64)")),
                ("Rect", Some("{ w: f64, h: f64 }")),
                ("Empty", Some("3")),
            ]
        );

        let flag = &info.enums[1];
        let names: Vec<_> = flag.variants.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["On", "Off"]);
        assert_eq!(flag.descriptor.span.len(), 1);
    }

    #[test]
    fn test_rust_functions() {
        let info = parse_code(Path::new("src/geo.rs"), RUST);
        let functions: Vec<_> = info
            .functions
            .iter()
            .map(|f| (f.descriptor.name.as_str(), f.descriptor.span))
            .collect();
        assert_eq!(
            functions,
            vec![("new", Span::new(21, 23)), ("run", Span::new(26, 28))]
        );
        assert_eq!(
            info.functions[0].signature,
            "pub fn new(x: f64, y: f64) -> Self"
        );
        assert_eq!(info.functions[0].descriptor.path, "src/geo.rs::new#L21");
    }

    #[test]
    fn test_go_declarations() {
        let source = "package main\n\ntype Server struct {\n\tAddr string `json:\"addr\"`\n\tBase\n}\n\nfunc (s *Server) Start() error {\n\treturn nil\n}\n";
        let info = parse_code(Path::new("main.go"), source);

        assert_eq!(info.structs.len(), 1);
        let server = &info.structs[0];
        assert_eq!(server.descriptor.name, "Server");
        assert_eq!(server.fields.len(), 2);
        assert_eq!(server.fields[0].type_name.as_deref(), Some("string"));
        assert_eq!(server.fields[1].name, "Base");
        assert!(server.fields[1].type_name.is_none());

        assert_eq!(info.functions.len(), 1);
        assert_eq!(info.functions[0].descriptor.name, "Start");
    }

    #[test]
    fn test_c_declarations() {
        let source = "struct point {\n    int x;\n    unsigned int *y;\n};\n\nenum color { RED = 1, GREEN };\n\nstruct point origin;\n";
        let info = parse_code(Path::new("geo.c"), source);

        assert_eq!(info.structs.len(), 1);
        let fields: Vec<_> = info.structs[0]
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.type_name.as_deref()))
            .collect();
        assert_eq!(fields, vec![("x", Some("int")), ("y", Some("unsigned int"))]);

        let variants: Vec<_> = info.enums[0]
            .variants
            .iter()
            .map(|v| (v.name.as_str(), v.value.as_deref()))
            .collect();
        assert_eq!(variants, vec![("RED", Some("1")), ("GREEN", None)]);
    }

    #[test]
    fn test_unknown_language_finds_nothing() {
        let info = parse_code(Path::new("notes.txt"), "struct Foo {\n}\n");
        assert_eq!(info.declaration_count(), 0);
        assert_eq!(info.line_count, 2);
    }

    #[test]
    fn test_swift_final_class_and_cases() {
        let source = "public final class Session {\n    var id: Int\n    private let name: String = \"x\"\n    func start() {\n    }\n}\nenum Direction {\n    case north, south\n    case east\n}\n";
        let info = parse_code(Path::new("Session.swift"), source);

        assert_eq!(info.structs.len(), 1);
        let session = &info.structs[0];
        assert_eq!(session.descriptor.name, "Session");
        assert_eq!(session.descriptor.span, Span::new(1, 6));
        let fields: Vec<_> = session
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.type_name.as_deref()))
            .collect();
        assert_eq!(fields, vec![("id", Some("Int")), ("name", Some("String"))]);

        assert_eq!(info.functions.len(), 1);
        assert_eq!(info.functions[0].descriptor.name, "start");
        assert_eq!(info.functions[0].descriptor.span, Span::new(4, 5));

        let cases: Vec<_> = info.enums[0].variants.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(cases, vec!["north", "south", "east"]);
    }

    #[test]
    fn test_c_anonymous_typedefs() {
        let source = "typedef struct {\n    int id;\n    char *label;\n} Record;\ntypedef enum { LOW, HIGH } Level;\n";
        let info = parse_code(Path::new("record.h"), source);

        assert_eq!(info.structs.len(), 1);
        let record = &info.structs[0];
        assert_eq!(record.descriptor.name, "Record");
        assert_eq!(record.descriptor.path, "record.h::Record");
        assert_eq!(record.descriptor.span, Span::new(1, 4));
        let fields: Vec<_> = record
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.type_name.as_deref()))
            .collect();
        assert_eq!(fields, vec![("id", Some("int")), ("label", Some("char"))]);

        assert_eq!(info.enums.len(), 1);
        assert_eq!(info.enums[0].descriptor.name, "Level");
        let names: Vec<_> = info.enums[0].variants.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["LOW", "HIGH"]);
        assert!(info.functions.is_empty());
    }

    #[test]
    fn test_java_class_fields_and_methods() {
        let source = "public class Counter {\n    private int count = 0;\n    public void increment() {\n        if (count > 9) {\n            return;\n        }\n        count++;\n    }\n}\n";
        let info = parse_code(Path::new("Counter.java"), source);

        assert_eq!(info.structs.len(), 1);
        let counter = &info.structs[0];
        assert_eq!(counter.descriptor.name, "Counter");
        assert_eq!(counter.fields.len(), 1);
        assert_eq!(counter.fields[0].name, "count");
        assert_eq!(counter.fields[0].type_name.as_deref(), Some("int"));

        let functions: Vec<_> = info
            .functions
            .iter()
            .map(|f| (f.descriptor.name.as_str(), f.descriptor.span))
            .collect();
        assert_eq!(functions, vec![("increment", Span::new(3, 8))]);
        assert_eq!(info.functions[0].signature, "public void increment()");
    }

    #[test]
    fn test_python_indented_blocks() {
        let source = "class Greeter:\n    def greet(self, name):\n        return name\n\nasync def main():\n    pass\n";
        let info = parse_code(Path::new("app.py"), source);

        assert_eq!(info.structs.len(), 1);
        assert_eq!(info.structs[0].descriptor.span, Span::new(1, 3));
        let functions: Vec<_> = info
            .functions
            .iter()
            .map(|f| (f.descriptor.name.as_str(), f.descriptor.span))
            .collect();
        assert_eq!(
            functions,
            vec![("greet", Span::new(2, 3)), ("main", Span::new(5, 6))]
        );
    }
}
