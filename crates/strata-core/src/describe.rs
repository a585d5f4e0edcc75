//! Graph descriptions of the IR types.

use strata_graph::{GraphSource, PropertyValue, Record, Shape};

use crate::code::{
    CodeInfo, Descriptor, EnumInfo, FieldInfo, FunctionInfo, Span, StructInfo, VariantInfo,
};
use crate::entry::{EntryKind, FileEntry};
use crate::env::EnvSnapshot;
use crate::text::{KeywordFrequency, ReadabilityScores, TextAnalysis};

/// Content up to this many bytes is stored verbatim on the node.
pub const CONTENT_LIMIT: usize = 1024;

const TRUNCATION_MARKER: &str = "... (truncated)";

/// Property key and value for file content, truncating long content.
fn content_property(content: &str) -> (&'static str, String) {
    if content.len() <= CONTENT_LIMIT {
        return ("Content", content.to_string());
    }
    let mut end = CONTENT_LIMIT;
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    ("ContentSummary", format!("{}{TRUNCATION_MARKER}", &content[..end]))
}

impl GraphSource for FileEntry {
    fn describe(&self) -> Shape<'_> {
        let mut record = Record::new("FileEntry")
            .label(self.kind.as_str())
            .property("Name", self.name.as_str())
            .path(&self.path)
            .property("AbsolutePath", self.absolute_path.to_string_lossy().into_owned())
            .property("Type", self.kind.as_str())
            .property("Size", self.size)
            .property("Mode", self.mode.as_str())
            .property("Owner", self.owner.as_str())
            .property("Group", self.group.as_str())
            .maybe("ModTime", self.modified)
            .maybe("CreateTime", self.created);

        record = match &self.kind {
            EntryKind::File { extension } => record.maybe("Extension", extension.as_deref()),
            EntryKind::Directory { git } => record
                .property("IsGitRepo", git.is_repo)
                .maybe(
                    "GitRemotes",
                    PropertyValue::map(git.remotes.iter().map(|(k, v)| (k, v.as_str()))),
                )
                .maybe("GitBranch", git.branch.as_deref()),
            EntryKind::Symlink { target } => record.property("SymlinkTarget", target.as_str()),
            EntryKind::Other => record,
        };

        record = record.maybe("Error", self.error.as_deref());
        if let Some(content) = &self.content {
            let (key, value) = content_property(content);
            record = record.property(key, value);
        }

        Shape::Record(
            record
                .relation("Children", &self.children)
                .relation("TextAnalysis", &self.text_analysis),
        )
    }
}

impl GraphSource for TextAnalysis {
    fn describe(&self) -> Shape<'_> {
        Shape::Record(
            Record::new("TextAnalysis")
                .property("LineCount", self.line_count)
                .property("WordCount", self.word_count)
                .property("CharCount", self.char_count)
                .property("SentenceCount", self.sentence_count)
                .property("IsBinary", self.is_binary)
                .property("AverageWordLength", self.average_word_length)
                .property("AverageSentenceLength", self.average_sentence_length)
                .maybe("DetectedLanguage", self.detected_language.as_deref())
                .relation("Keywords", &self.keywords)
                .relation("Readability", &self.readability),
        )
    }
}

impl GraphSource for KeywordFrequency {
    fn describe(&self) -> Shape<'_> {
        Shape::Record(
            Record::new("KeywordFrequency")
                .property("Keyword", self.keyword.as_str())
                .property("Count", self.count),
        )
    }
}

impl GraphSource for ReadabilityScores {
    fn describe(&self) -> Shape<'_> {
        Shape::Record(
            Record::new("ReadabilityScores")
                .property("FleschKincaidGrade", self.flesch_kincaid_grade)
                .property("GunningFog", self.gunning_fog),
        )
    }
}

fn span_record(span: &Span) -> Record<'static> {
    Record::new("Span")
        .property("StartLine", span.start_line)
        .property("EndLine", span.end_line)
}

fn descriptor_record(descriptor: &Descriptor) -> Record<'static> {
    Record::new("Descriptor")
        .property("ID", descriptor.id.as_str())
        .property("Name", descriptor.name.as_str())
        .property("Path", descriptor.path.as_str())
        .property("Language", descriptor.language.as_str())
        .embed("Span", span_record(&descriptor.span))
}

impl GraphSource for StructInfo {
    fn describe(&self) -> Shape<'_> {
        Shape::Record(
            Record::new("StructInfo")
                .label("struct")
                .embed("Descriptor", descriptor_record(&self.descriptor))
                .property("FieldCount", self.fields.len())
                .relation("Fields", &self.fields),
        )
    }
}

impl GraphSource for FieldInfo {
    fn describe(&self) -> Shape<'_> {
        Shape::Record(
            Record::new("FieldInfo")
                .property("Name", self.name.as_str())
                .property("Path", self.path.as_str())
                .maybe("Type", self.type_name.as_deref())
                .property("Line", self.line),
        )
    }
}

impl GraphSource for EnumInfo {
    fn describe(&self) -> Shape<'_> {
        Shape::Record(
            Record::new("EnumInfo")
                .label("enum")
                .embed("Descriptor", descriptor_record(&self.descriptor))
                .property("VariantCount", self.variants.len())
                .relation("Variants", &self.variants),
        )
    }
}

impl GraphSource for VariantInfo {
    fn describe(&self) -> Shape<'_> {
        Shape::Record(
            Record::new("VariantInfo")
                .property("Name", self.name.as_str())
                .property("Path", self.path.as_str())
                .maybe("Value", self.value.as_deref())
                .property("Line", self.line),
        )
    }
}

impl GraphSource for FunctionInfo {
    fn describe(&self) -> Shape<'_> {
        Shape::Record(
            Record::new("FunctionInfo")
                .label("function")
                .embed("Descriptor", descriptor_record(&self.descriptor))
                .property("Signature", self.signature.as_str()),
        )
    }
}

impl GraphSource for CodeInfo {
    fn describe(&self) -> Shape<'_> {
        Shape::Record(
            Record::new("CodeInfo")
                .label("code")
                .property("Path", self.path.as_str())
                .property("Name", self.name.as_str())
                .property("Language", self.language.as_str())
                .property("LineCount", self.line_count)
                .relation("Structs", &self.structs)
                .relation("Enums", &self.enums)
                .relation("Functions", &self.functions),
        )
    }
}

impl GraphSource for EnvSnapshot {
    fn describe(&self) -> Shape<'_> {
        Shape::Record(
            Record::new("EnvSnapshot")
                .label("env")
                .property("Name", self.name.as_str())
                .maybe(
                    "Variables",
                    PropertyValue::map(self.variables.iter().map(|(k, v)| (k, v.as_str()))),
                ),
        )
    }
}
