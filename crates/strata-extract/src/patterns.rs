//! Regex patterns for declaration extraction.
//!
//! Declaration patterns are matched against a single line with trailing `//`
//! comments removed. Each captures the declared name as `name`; a pattern
//! without a `name` group (anonymous `typedef struct {`) takes the name from
//! the line closing the block.

/// Words that may precede a declaration keyword.
macro_rules! modifiers {
    () => {
        r#"(?:(?:pub(?:\([^)]*\))?|export|default|public|private|protected|internal|open|fileprivate|override|mutating|indirect|static|async|const|unsafe|extern(?:\s+"[^"]*")?|typedef|final|abstract|inline|virtual|sealed|partial|readonly|declare)\s+)*"#
    };
}

/// Patterns for one language.
pub struct LanguagePatterns {
    pub structs: &'static [&'static str],
    pub enums: &'static [&'static str],
    pub functions: &'static [&'static str],
    /// Field inside a struct body, capturing `name` and optionally `type`.
    pub field: Option<&'static str>,
}

/// Return-type style function: `int main(void) {`, `public void run() {`.
const C_FUNCTION: &str = concat!(
    r"^\s*",
    modifiers!(),
    r"(?:[\w:<>,\*&\[\]]+\s+)+[\*&]*(?P<name>\w+)\s*\([^;]*$"
);

/// `name: Type`, as in Rust and TypeScript.
const COLON_FIELD: &str = r"^(?:(?:pub(?:\([^)]*\))?|public|private|protected|readonly|static|declare)\s+)*(?P<name>\w+)\??\s*:\s*(?P<type>[^=]+?)\s*(?:=.*)?$";

/// `Type name`, `Type *name[4]`, `private int count = 0`.
const C_FIELD: &str = r"^(?:(?:public|private|protected|internal|static|final|readonly|transient|volatile|mutable)\s+)*(?P<type>.*?[\w>\]&])(?:\s+\**|\s*\*+\s*)(?P<name>\w+)\s*(?:\[[^\]]*\])*\s*(?:=.*)?$";

const C_TYPEDEF_STRUCT: &str = r"^\s*typedef\s+struct(?:\s+\w+)?\s*\{";
const C_TYPEDEF_ENUM: &str = r"^\s*typedef\s+enum(?:\s+\w+)?\s*\{";

/// An enum variant: `Red`, `Red = 1`, `Circle(f64)`, `Rect { w: f64 }`, `case red`.
pub const VARIANT: &str = r"^(?:case\s+)?(?P<name>\w+)\s*(?P<value>=.*|\(.*\)|\{.*\})?$";

/// The alias closing an anonymous typedef: `} Name;`.
pub const TYPEDEF_ALIAS: &str = r"\}\s*(?P<name>\w+)\s*;\s*$";

/// Keywords that look like a call or declaration name but are not one.
pub const NON_FUNCTION_KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "match", "return", "new", "delete", "throw", "else", "case",
    "goto", "sizeof", "catch", "do",
];

pub const RUST: LanguagePatterns = LanguagePatterns {
    structs: &[concat!(r"^\s*", modifiers!(), r"struct\s+(?P<name>\w+)")],
    enums: &[concat!(r"^\s*", modifiers!(), r"enum\s+(?P<name>\w+)")],
    functions: &[concat!(r"^\s*", modifiers!(), r"fn\s+(?P<name>\w+)")],
    field: Some(COLON_FIELD),
};

pub const GO: LanguagePatterns = LanguagePatterns {
    structs: &[r"^\s*type\s+(?P<name>\w+)\s+struct\b"],
    enums: &[],
    functions: &[r"^\s*func\s+(?:\([^)]*\)\s*)?(?P<name>\w+)"],
    field: Some(r"^(?P<name>\w+)(?:\s+(?P<type>[^\s`]+))?"),
};

pub const C: LanguagePatterns = LanguagePatterns {
    structs: &[
        concat!(r"^\s*", modifiers!(), r"struct\s+(?P<name>\w+)\s*(?:\{.*)?$"),
        C_TYPEDEF_STRUCT,
    ],
    enums: &[
        concat!(r"^\s*", modifiers!(), r"enum\s+(?P<name>\w+)\s*(?:\{.*)?$"),
        C_TYPEDEF_ENUM,
    ],
    functions: &[C_FUNCTION],
    field: Some(C_FIELD),
};

pub const CPP: LanguagePatterns = LanguagePatterns {
    structs: &[
        concat!(
            r"^\s*",
            modifiers!(),
            r"(?:struct|class)\s+(?P<name>\w+)(?:\s+final)?(?:\s*:\s*[^{;]*)?\s*(?:\{.*)?$"
        ),
        C_TYPEDEF_STRUCT,
    ],
    enums: &[
        concat!(
            r"^\s*",
            modifiers!(),
            r"enum(?:\s+(?:class|struct))?\s+(?P<name>\w+)(?:\s*:\s*[\w:]+)?\s*(?:\{.*)?$"
        ),
        C_TYPEDEF_ENUM,
    ],
    functions: &[C_FUNCTION],
    field: Some(C_FIELD),
};

pub const JAVA: LanguagePatterns = LanguagePatterns {
    structs: &[concat!(r"^\s*", modifiers!(), r"(?:class|record)\s+(?P<name>\w+)")],
    enums: &[concat!(r"^\s*", modifiers!(), r"enum\s+(?P<name>\w+)")],
    functions: &[C_FUNCTION],
    field: Some(C_FIELD),
};

pub const CSHARP: LanguagePatterns = LanguagePatterns {
    structs: &[concat!(
        r"^\s*",
        modifiers!(),
        r"(?:class|struct|record)\s+(?P<name>\w+)"
    )],
    enums: &[concat!(r"^\s*", modifiers!(), r"enum\s+(?P<name>\w+)")],
    functions: &[C_FUNCTION],
    field: Some(C_FIELD),
};

pub const SWIFT: LanguagePatterns = LanguagePatterns {
    structs: &[concat!(r"^\s*", modifiers!(), r"(?:struct|class)\s+(?P<name>\w+)")],
    enums: &[concat!(r"^\s*", modifiers!(), r"enum\s+(?P<name>\w+)")],
    functions: &[concat!(r"^\s*", modifiers!(), r"func\s+(?P<name>\w+)")],
    field: Some(
        r"^(?:(?:public|private|fileprivate|internal|open|static|final|lazy|weak)\s+)*(?:var|let)\s+(?P<name>\w+)\s*(?::\s*(?P<type>[^=]+?))?\s*(?:=.*)?$",
    ),
};

pub const JAVASCRIPT: LanguagePatterns = LanguagePatterns {
    structs: &[concat!(r"^\s*", modifiers!(), r"class\s+(?P<name>\w+)")],
    enums: &[],
    functions: &[concat!(r"^\s*", modifiers!(), r"function\*?\s+(?P<name>\w+)")],
    field: None,
};

pub const TYPESCRIPT: LanguagePatterns = LanguagePatterns {
    structs: &[concat!(r"^\s*", modifiers!(), r"class\s+(?P<name>\w+)")],
    enums: &[concat!(r"^\s*", modifiers!(), r"enum\s+(?P<name>\w+)")],
    functions: &[concat!(r"^\s*", modifiers!(), r"function\*?\s+(?P<name>\w+)")],
    field: Some(COLON_FIELD),
};

pub const PYTHON: LanguagePatterns = LanguagePatterns {
    structs: &[r"^\s*class\s+(?P<name>\w+)"],
    enums: &[],
    functions: &[r"^\s*(?:async\s+)?def\s+(?P<name>\w+)"],
    field: None,
};

pub const UNKNOWN: LanguagePatterns = LanguagePatterns {
    structs: &[],
    enums: &[],
    functions: &[],
    field: None,
};
