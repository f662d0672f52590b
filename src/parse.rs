//! Parsing of `javap -public` output into per-class entries.
//!
//! javap prints one block per class:
//!
//! ```text
//! Compiled from "Foo.java"
//! public class com.example.Foo extends java.lang.Object {
//!   public com.example.Foo();
//! }
//! ```
//!
//! The `Compiled from ` prefix separates blocks. What remains of that line is
//! the header, the next line is the declaration and the rest is the body.
//! Classes compiled without a SourceFile attribute have no marker line, so
//! an unindented declaration after a closing `}` also opens a block, one
//! without a header. The entry source is the declaration plus the body.

const BLOCK_MARKER: &str = "Compiled from ";

const MODIFIERS: &[&str] = &[
    "protected",
    "private",
    "class",
    "interface",
    "abstract",
    "final",
    "static",
    "strictfp",
    "sealed",
    "non-sealed",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    source: String,
    package: String,
    file_name: String,
}

impl Entry {
    pub fn new(
        package: impl Into<String>,
        file_name: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            package: package.into(),
            file_name: file_name.into(),
        }
    }

    /// Declaration line and body, exactly as javap printed them.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Dotted package name; empty for the default package.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// `<SimpleName>.java`, with `$` kept for named nested classes.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

/// One class block of javap output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Rest of the `Compiled from ` line. javap omits that line for classes
    /// without a SourceFile attribute.
    pub header: Option<String>,
    /// Declaration line and body.
    pub source: String,
}

fn is_top_level_declaration(line: &str) -> bool {
    let line = line.trim_end();
    !line.starts_with(char::is_whitespace) && line.ends_with('{')
}

/// Splits raw javap output into blocks, one per class. A block starts at a
/// `Compiled from ` line, or at an unindented declaration line once the
/// previous class body has been closed. Text before the first block is
/// dropped.
pub fn split_chunks(raw: &str) -> Vec<Chunk> {
    let normalized = raw.replace("\r\n", "\n");

    let mut starts: Vec<(usize, bool)> = Vec::new();
    let mut in_class = false;
    let mut offset = 0usize;
    for line in normalized.split_inclusive('\n') {
        if line.starts_with(BLOCK_MARKER) {
            starts.push((offset, true));
            in_class = true;
        } else if !in_class && is_top_level_declaration(line) {
            starts.push((offset, false));
            in_class = true;
        } else if line.trim_end() == "}" {
            in_class = false;
        }
        offset += line.len();
    }

    let mut chunks = Vec::with_capacity(starts.len());
    for (idx, (start, marked)) in starts.iter().enumerate() {
        let end = starts
            .get(idx + 1)
            .map(|(next, _)| *next)
            .unwrap_or(normalized.len());
        let block = &normalized[*start..end];
        let chunk = if *marked {
            let rest = &block[BLOCK_MARKER.len()..];
            let (header, source) = rest.split_once('\n').unwrap_or((rest, ""));
            Chunk {
                header: Some(header.to_string()),
                source: source.to_string(),
            }
        } else {
            Chunk {
                header: None,
                source: block.to_string(),
            }
        };
        chunks.push(chunk);
    }
    chunks
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclToken<'a> {
    Public,
    Modifier,
    Name(&'a str),
}

fn classify(token: &str) -> DeclToken<'_> {
    if token == "public" {
        DeclToken::Public
    } else if MODIFIERS.contains(&token) {
        DeclToken::Modifier
    } else {
        DeclToken::Name(token)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Declaration<'a> {
    pub package: &'a str,
    pub simple_name: &'a str,
}

/// Reads the declared type from a declaration line. Returns `None` unless
/// the line carries a `public` token.
pub fn parse_declaration(line: &str) -> Option<Declaration<'_>> {
    let tokens: Vec<DeclToken<'_>> = line.split_whitespace().map(classify).collect();
    if !tokens.contains(&DeclToken::Public) {
        return None;
    }

    let qualified = tokens.iter().find_map(|t| match t {
        DeclToken::Name(name) => Some(*name),
        _ => None,
    })?;
    let qualified = qualified.split('<').next().unwrap_or(qualified);

    let (package, simple_name) = qualified.rsplit_once('.').unwrap_or(("", qualified));
    if simple_name.is_empty() || simple_name.starts_with('{') {
        return None;
    }

    Some(Declaration {
        package,
        simple_name,
    })
}

/// Anonymous and compiler-generated classes have a purely numeric `$`
/// segment, e.g. `Outer$1` or `Outer$Inner$2`.
pub fn is_synthetic(simple_name: &str) -> bool {
    simple_name
        .split('$')
        .any(|seg| !seg.is_empty() && seg.bytes().all(|b| b.is_ascii_digit()))
}

/// Turns a declaration line plus body into an entry, or `None` when the
/// class is not public, synthetic or not recognizable.
pub fn parse_source(source: &str) -> Option<Entry> {
    let declaration = source.lines().next()?;
    let decl = parse_declaration(declaration)?;
    if is_synthetic(decl.simple_name) {
        return None;
    }

    Some(Entry::new(
        decl.package,
        format!("{}.java", decl.simple_name),
        source,
    ))
}

/// Parses a marker block whose first line is the header, as it reads after
/// the `Compiled from ` prefix has been cut off.
pub fn parse_entry(chunk: &str) -> Option<Entry> {
    let (_header, source) = chunk.split_once('\n')?;
    parse_source(source)
}

pub fn parse_output(raw: &str) -> Vec<Entry> {
    split_chunks(raw)
        .iter()
        .filter_map(|chunk| parse_source(&chunk.source))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_entry_reads_package_and_file_name() {
        let chunk =
            "\"Foo.java\"\npublic class com.example.Foo extends Object {\n  public com.example.Foo();\n}\n";
        let entry = parse_entry(chunk).unwrap();
        assert_eq!(entry.package(), "com.example");
        assert_eq!(entry.file_name(), "Foo.java");
        assert_eq!(
            entry.source(),
            "public class com.example.Foo extends Object {\n  public com.example.Foo();\n}\n"
        );
    }

    #[test]
    fn parse_entry_skips_non_public_declarations() {
        let chunk = "\"Hidden.java\"\nclass com.example.Hidden {\n}\n";
        assert!(parse_entry(chunk).is_none());
    }

    #[test]
    fn public_must_be_a_whole_token() {
        assert!(parse_declaration("final class com.publicity.Ad {").is_none());
    }

    #[test]
    fn public_check_ignores_the_header_line() {
        let chunk = "\"public.java\"\nclass com.example.Hidden {\n}\n";
        assert!(parse_entry(chunk).is_none());
    }

    #[test]
    fn parse_entry_filters_anonymous_classes() {
        let anonymous = "\"Outer.java\"\npublic class com.example.Outer$1 {\n}\n";
        assert!(parse_entry(anonymous).is_none());

        let nested = "\"Outer.java\"\npublic class com.example.Outer$Inner$2 {\n}\n";
        assert!(parse_entry(nested).is_none());

        let named = "\"Outer.java\"\npublic static class com.example.Outer$Inner {\n}\n";
        assert_eq!(parse_entry(named).unwrap().file_name(), "Outer$Inner.java");
    }

    #[test]
    fn parse_declaration_strips_generics_and_modifiers() {
        let decl = parse_declaration(
            "public abstract class com.example.Box<T extends java.lang.Comparable<T>> implements java.io.Serializable {",
        )
        .unwrap();
        assert_eq!(decl.package, "com.example");
        assert_eq!(decl.simple_name, "Box");

        let iface = parse_declaration("public interface com.example.Api<K, V> {").unwrap();
        assert_eq!(iface.simple_name, "Api");

        let sealed = parse_declaration(
            "public abstract sealed class com.example.Shape permits com.example.Circle {",
        )
        .unwrap();
        assert_eq!(sealed.simple_name, "Shape");
    }

    #[test]
    fn default_package_has_empty_name() {
        let decl = parse_declaration("public class Main {").unwrap();
        assert_eq!(decl.package, "");
        assert_eq!(decl.simple_name, "Main");
    }

    #[test]
    fn chunk_without_body_is_skipped() {
        assert!(parse_entry("\"Foo.java\"").is_none());
        assert!(parse_entry("").is_none());
    }

    #[test]
    fn split_chunks_drops_preamble_and_normalizes_newlines() {
        let raw = concat!(
            "Warning: something\r\n",
            "Compiled from \"A.java\"\r\n",
            "public class a.A {\r\n",
            "}\r\n",
            "Compiled from \"B.java\"\r\n",
            "public class a.B {\r\n",
            "}\r\n",
        );
        let chunks = split_chunks(raw);
        assert_eq!(
            chunks,
            vec![
                Chunk {
                    header: Some("\"A.java\"".to_string()),
                    source: "public class a.A {\n}\n".to_string(),
                },
                Chunk {
                    header: Some("\"B.java\"".to_string()),
                    source: "public class a.B {\n}\n".to_string(),
                },
            ]
        );
    }

    #[test]
    fn class_without_marker_after_marked_class_gets_its_own_block() {
        let raw = concat!(
            "Compiled from \"A.java\"\n",
            "public class p.A {\n",
            "  public p.A();\n",
            "}\n",
            "public class p.B {\n",
            "  public p.B();\n",
            "}\n",
        );
        let chunks = split_chunks(raw);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].header, None);

        let entries = parse_output(raw);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].file_name(), "A.java");
        assert_eq!(entries[0].source(), "public class p.A {\n  public p.A();\n}\n");
        assert_eq!(entries[1].file_name(), "B.java");
        assert_eq!(entries[1].source(), "public class p.B {\n  public p.B();\n}\n");
    }

    #[test]
    fn class_without_marker_first_in_output_is_kept() {
        let raw = concat!(
            "public class p.B {\n",
            "  public p.B();\n",
            "}\n",
            "Compiled from \"A.java\"\n",
            "public class p.A {\n",
            "  public p.A();\n",
            "}\n",
        );
        let entries = parse_output(raw);
        let files: Vec<&str> = entries.iter().map(Entry::file_name).collect();
        assert_eq!(files, vec!["B.java", "A.java"]);
        assert_eq!(entries[0].source(), "public class p.B {\n  public p.B();\n}\n");
        assert_eq!(entries[1].source(), "public class p.A {\n  public p.A();\n}\n");
    }

    #[test]
    fn indented_braces_do_not_open_blocks() {
        let raw = concat!(
            "public class p.A {\n",
            "  static {};\n",
            "  public p.A();\n",
            "}\n",
        );
        assert_eq!(split_chunks(raw).len(), 1);
    }

    #[test]
    fn marker_inside_a_line_does_not_split() {
        let raw = concat!(
            "Compiled from \"A.java\"\n",
            "public class a.A {\n",
            "  public static final java.lang.String S = \"Compiled from \";\n",
            "}\n",
        );
        assert_eq!(split_chunks(raw).len(), 1);
    }

    #[test]
    fn parse_output_keeps_order_and_skips_filtered_blocks() {
        let raw = concat!(
            "Compiled from \"A.java\"\n",
            "public class p.A {\n",
            "}\n",
            "Compiled from \"A.java\"\n",
            "class p.A$1 {\n",
            "}\n",
            "Compiled from \"B.java\"\n",
            "public final class q.B {\n",
            "}\n",
        );
        let entries = parse_output(raw);
        let names: Vec<_> = entries
            .iter()
            .map(|e| format!("{}.{}", e.package(), e.file_name()))
            .collect();
        assert_eq!(names, vec!["p.A.java", "q.B.java"]);
    }
}
