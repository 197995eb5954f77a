//! Wavefront OBJ subset loader.
//!
//! Only `v x y z` vertex lines and `f a b c` triangle lines are read;
//! indices are converted from the format's 1-based counting to 0-based.
//! Every other leading token (`vt`, `vn`, `#`, `o`, ...) is skipped.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Mesh data pulled from an OBJ file: a flat xyz position array and
/// 0-based triangle indices. Index bounds are not validated here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjData {
    pub vertices: Vec<f32>,
    pub indices: Vec<i32>,
}

#[derive(Debug, Error)]
pub enum ObjError {
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: malformed entry {text:?}")]
    Malformed { line: usize, text: String },
}

/// Parses OBJ source text. A recognized `v`/`f` line with missing or
/// unparseable tokens is an error, as is a face index below 1; extra
/// trailing tokens are ignored.
pub fn parse_obj(src: &str) -> Result<ObjData, ObjError> {
    let mut data = ObjData::default();

    for (n, line) in src.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                for _ in 0..3 {
                    let value = tokens
                        .next()
                        .and_then(|t| t.parse::<f32>().ok())
                        .ok_or_else(|| ObjError::Malformed {
                            line: n + 1,
                            text: line.to_string(),
                        })?;
                    data.vertices.push(value);
                }
            }
            Some("f") => {
                for _ in 0..3 {
                    // Indices are 1-based in the format, so anything
                    // below 1 can never name a vertex.
                    let value = tokens
                        .next()
                        .and_then(|t| t.parse::<i32>().ok())
                        .filter(|&v| v >= 1)
                        .ok_or_else(|| ObjError::Malformed {
                            line: n + 1,
                            text: line.to_string(),
                        })?;
                    data.indices.push(value - 1);
                }
            }
            _ => {}
        }
    }

    Ok(data)
}

/// Reads and parses an OBJ file from disk.
pub fn load_obj(path: impl AsRef<Path>) -> Result<ObjData, ObjError> {
    let path = path.as_ref();
    let src = fs::read_to_string(path).map_err(|source| ObjError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_obj(&src)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_vertices_and_faces() {
        let src = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
f 1 2 3
f 1 3 4
";
        let data = parse_obj(src).unwrap();
        assert_eq!(data.vertices.len(), 12);
        assert_eq!(data.vertices[3..6], [1.0, 0.0, 0.0]);
        assert_eq!(data.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn skips_other_prefixes() {
        let src = "\
# comment
o cube
vt 0.5 0.5
vn 0.0 1.0 0.0
v 1.0 2.0 3.0
s off
f 1 1 1
";
        let data = parse_obj(src).unwrap();
        assert_eq!(data.vertices, vec![1.0, 2.0, 3.0]);
        assert_eq!(data.indices, vec![0, 0, 0]);
    }

    #[test]
    fn short_vertex_line_is_malformed() {
        let err = parse_obj("v 1.0 2.0").unwrap_err();
        match err {
            ObjError::Malformed { line, .. } => assert_eq!(line, 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_face_is_malformed() {
        let err = parse_obj("v 0 0 0\nf 1/1 2/2 3/3").unwrap_err();
        match err {
            ObjError::Malformed { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn nonpositive_face_index_is_malformed() {
        for src in ["f 0 1 2", "f 1 -3 2", "f -2147483648 1 1"] {
            match parse_obj(src).unwrap_err() {
                ObjError::Malformed { line, .. } => assert_eq!(line, 1),
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn extra_tokens_are_ignored() {
        let data = parse_obj("v 1.0 2.0 3.0 1.0").unwrap();
        assert_eq!(data.vertices, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn empty_input_is_empty_mesh() {
        let data = parse_obj("").unwrap();
        assert!(data.vertices.is_empty());
        assert!(data.indices.is_empty());
    }

    #[test]
    fn missing_file_reports_io_error() {
        let err = load_obj("does/not/exist.obj").unwrap_err();
        assert!(matches!(err, ObjError::Io { .. }));
    }

    #[test]
    fn bundled_cube_is_a_closed_mesh() {
        let data = load_obj("assets/meshes/cube.obj").unwrap();
        assert_eq!(data.vertices.len(), 8 * 3);
        assert_eq!(data.indices.len(), 12 * 3);
        assert!(data.indices.iter().all(|&i| (0..8).contains(&i)));
    }
}
