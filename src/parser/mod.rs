//! Line-oriented parsing of OBJ-style geometry text
//!
//! The parser understands three directives:
//!
//! - `v x y z` appends a vertex (extra tokens such as `w` or vertex colors are ignored)
//! - `g name` / `o name` switches the current group; the name is the rest of the line
//! - `f a b c ...` appends a face built from 1-based vertex references
//!
//! Comments, blank lines and directives the converter has no use for
//! (`vn`, `vt`, `vp`, `s`, `usemtl`, `mtllib`, `l`, `p`) are skipped silently.
//! Anything else that cannot be interpreted becomes a
//! [`GeometryWarning`](crate::error::GeometryWarning) and is skipped. The only
//! fatal condition is a source that cannot be read at all.

mod face;

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{GeometryWarning, ParseError};
use crate::model::{DEFAULT_GROUP, Face, Group, ParsedGeometry, Vertex};

use face::{RejectedReference, resolve_face};

/// Pseudo-path reported when parsing from an anonymous reader
const READER_SOURCE: &str = "<reader>";

/// Directives that are valid OBJ but carry nothing the converter uses
const IGNORED_DIRECTIVES: &[&str] = &["vn", "vt", "vp", "s", "usemtl", "mtllib", "l", "p"];

/// Parse a geometry file from disk
///
/// # Errors
///
/// Returns [`ParseError::Unreadable`] if the file cannot be opened or read.
/// Malformed content is never an error.
///
/// # Example
///
/// ```no_run
/// use roomglb::parser::parse_file;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let parsed = parse_file("house.obj")?;
/// println!("{} vertices in {} groups", parsed.vertex_count(), parsed.groups.len());
/// # Ok(())
/// # }
/// ```
pub fn parse_file(path: impl AsRef<Path>) -> Result<ParsedGeometry, ParseError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ParseError::unreadable(path, e))?;
    parse_lines(BufReader::new(file), path)
}

/// Parse geometry from any buffered reader
///
/// # Errors
///
/// Returns [`ParseError::Unreadable`] if reading from `reader` fails.
pub fn parse_reader<R: BufRead>(reader: R) -> Result<ParsedGeometry, ParseError> {
    parse_lines(reader, Path::new(READER_SOURCE))
}

/// Parse geometry held in memory
///
/// In-memory text can always be read, so this never fails.
///
/// # Example
///
/// ```
/// use roomglb::parser::parse_str;
///
/// let parsed = parse_str("v 0 0 0\nv 1 0 0\nv 0 1 0\ng Kitchen\nf 1 2 3\n");
/// assert_eq!(parsed.vertex_count(), 3);
/// assert_eq!(parsed.group("Kitchen").unwrap().faces.len(), 1);
/// ```
pub fn parse_str(source: &str) -> ParsedGeometry {
    let mut state = ParserState::new();
    for (i, line) in source.lines().enumerate() {
        state.feed_line(i + 1, line);
    }
    state.finish()
}

fn parse_lines<R: BufRead>(mut reader: R, path: &Path) -> Result<ParsedGeometry, ParseError> {
    let mut state = ParserState::new();
    let mut buf = Vec::new();
    let mut line_no = 0;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| ParseError::unreadable(path, e))?;
        if read == 0 {
            break;
        }
        line_no += 1;
        let line = String::from_utf8_lossy(&buf);
        state.feed_line(line_no, &line);
    }

    let parsed = state.finish();
    tracing::debug!(
        "Parsed '{}': {} vertices, {} faces, {} groups, {} warnings",
        path.display(),
        parsed.vertex_count(),
        parsed.face_count(),
        parsed.groups.len(),
        parsed.warnings.len()
    );
    Ok(parsed)
}

/// Accumulates parse results line by line
///
/// The current group is part of this state rather than anything global, so
/// independent parses never observe each other.
struct ParserState {
    geometry: ParsedGeometry,
    current_group: usize,
    group_lookup: HashMap<String, usize>,
}

impl ParserState {
    fn new() -> Self {
        let geometry = ParsedGeometry::new();
        let mut group_lookup = HashMap::new();
        group_lookup.insert(DEFAULT_GROUP.to_string(), 0);
        Self {
            geometry,
            current_group: 0,
            group_lookup,
        }
    }

    fn feed_line(&mut self, line_no: usize, raw: &str) {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            return;
        }

        let (directive, rest) = match line.split_once(char::is_whitespace) {
            Some((directive, rest)) => (directive, rest.trim()),
            None => (line, ""),
        };

        match directive {
            "v" => self.vertex(line_no, rest),
            "g" | "o" => self.group(line_no, directive, rest),
            "f" => self.face(line_no, rest),
            d if IGNORED_DIRECTIVES.contains(&d) => {}
            other => {
                tracing::debug!("line {}: ignoring unknown directive '{}'", line_no, other);
            }
        }
    }

    fn vertex(&mut self, line_no: usize, rest: &str) {
        let tokens: Vec<&str> = rest.split_whitespace().collect();
        if tokens.len() < 3 {
            self.warn(GeometryWarning::MalformedLine {
                line: line_no,
                reason: format!("vertex needs 3 coordinates, found {}", tokens.len()),
            });
            return;
        }

        let mut coords = [0.0f64; 3];
        for (slot, token) in coords.iter_mut().zip(&tokens) {
            match token.parse::<f64>() {
                Ok(value) if value.is_finite() => *slot = value,
                _ => {
                    self.warn(GeometryWarning::MalformedLine {
                        line: line_no,
                        reason: format!("invalid vertex coordinate '{}'", token),
                    });
                    return;
                }
            }
        }

        let [x, y, z] = coords;
        self.geometry.vertices.push(Vertex::new(x, y, z));
    }

    fn group(&mut self, line_no: usize, directive: &str, name: &str) {
        if name.is_empty() {
            self.warn(GeometryWarning::MalformedLine {
                line: line_no,
                reason: format!("'{}' directive without a name", directive),
            });
            return;
        }

        self.current_group = match self.group_lookup.get(name) {
            Some(&index) => index,
            None => {
                let index = self.geometry.groups.len();
                self.geometry.groups.push(Group::new(name));
                self.group_lookup.insert(name.to_string(), index);
                index
            }
        };
    }

    fn face(&mut self, line_no: usize, rest: &str) {
        let vertex_count = self.geometry.vertices.len();
        let (indices, rejected) = resolve_face(rest.split_whitespace(), vertex_count);

        for reference in &rejected {
            match reference {
                RejectedReference::NotAnIndex(token) => tracing::debug!(
                    "line {}: dropping non-numeric face reference '{}'",
                    line_no,
                    token
                ),
                RejectedReference::OutOfRange(index) => tracing::debug!(
                    "line {}: dropping face reference {} ({} vertices defined)",
                    line_no,
                    index,
                    vertex_count
                ),
            }
        }

        let valid_indices = indices.len();
        match Face::new(indices) {
            Some(face) => {
                self.geometry.faces.push(face.clone());
                self.geometry.groups[self.current_group].faces.push(face);
            }
            None => self.warn(GeometryWarning::DegenerateFace {
                line: line_no,
                valid_indices,
            }),
        }
    }

    fn warn(&mut self, warning: GeometryWarning) {
        tracing::warn!("{}", warning);
        self.geometry.warnings.push(warning);
    }

    fn finish(self) -> ParsedGeometry {
        self.geometry
    }
}
