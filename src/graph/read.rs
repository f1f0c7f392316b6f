//! Graph file readers.
//!
//! Two plain-text formats are supported:
//!
//! - **Adjacency list**: the first line holds the node count `N`, then one
//!   line per node `node : n1 n2 …` (the colon is optional).
//! - **Edge list**: optional `c` comment lines, a `p edge N M` header and
//!   `e u v` lines with 0-based node ids.
//!
//! [`read`] treats a file as an edge list when any line starts with a `p`
//! token, so leading `c` comments are allowed.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::problem_data::ProblemData;
use super::types::Node;
use crate::error::{CnpError, Result};

/// Reads a graph file, detecting its format.
///
/// # Errors
///
/// [`CnpError::Io`] if the file cannot be opened or read,
/// [`CnpError::Parse`] if its content is malformed. Both carry the path.
pub fn read(path: impl AsRef<Path>) -> Result<ProblemData> {
    let path = path.as_ref();
    let lines = read_lines(path)?;
    if is_edge_list(&lines) {
        parse_edge_list_lines(&lines, path)
    } else {
        parse_adjacency_list_lines(&lines, path)
    }
}

/// Reads an adjacency-list file.
pub fn read_adjacency_list(path: impl AsRef<Path>) -> Result<ProblemData> {
    let path = path.as_ref();
    parse_adjacency_list_lines(&read_lines(path)?, path)
}

/// Reads an edge-list file.
pub fn read_edge_list(path: impl AsRef<Path>) -> Result<ProblemData> {
    let path = path.as_ref();
    parse_edge_list_lines(&read_lines(path)?, path)
}

/// Parses adjacency-list content; `source` is only used in errors.
pub fn parse_adjacency_list<R: BufRead>(reader: R, source: &Path) -> Result<ProblemData> {
    parse_adjacency_list_lines(&collect_lines(reader, source)?, source)
}

/// Parses edge-list content; `source` is only used in errors.
pub fn parse_edge_list<R: BufRead>(reader: R, source: &Path) -> Result<ProblemData> {
    parse_edge_list_lines(&collect_lines(reader, source)?, source)
}

fn is_edge_list(lines: &[String]) -> bool {
    lines.iter().any(|l| l.split_whitespace().next() == Some("p"))
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|source| CnpError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    collect_lines(BufReader::new(file), path)
}

fn collect_lines<R: BufRead>(reader: R, source: &Path) -> Result<Vec<String>> {
    reader
        .lines()
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| CnpError::Io {
            path: source.to_path_buf(),
            source: e,
        })
}

fn parse_error(source: &Path, line: usize, message: impl Into<String>) -> CnpError {
    CnpError::Parse {
        path: source.to_path_buf(),
        line,
        message: message.into(),
    }
}

fn parse_node(token: &str, source: &Path, line: usize) -> Result<Node> {
    token
        .parse::<Node>()
        .map_err(|_| parse_error(source, line, format!("expected a node id, found '{token}'")))
}

fn check_range(node: Node, num_nodes: usize, source: &Path, line: usize) -> Result<Node> {
    if node < num_nodes {
        Ok(node)
    } else {
        Err(parse_error(
            source,
            line,
            format!("node {node} out of range for {num_nodes} nodes"),
        ))
    }
}

fn parse_adjacency_list_lines(lines: &[String], source: &Path) -> Result<ProblemData> {
    let mut numbered = lines
        .iter()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    let (header_line, header) = numbered
        .next()
        .ok_or_else(|| parse_error(source, 1, "empty file"))?;
    let num_nodes = header
        .split_whitespace()
        .next()
        .map(|t| parse_node(t, source, header_line))
        .transpose()?
        .unwrap_or(0);

    let mut data = ProblemData::with_nodes(num_nodes);
    for (line_no, line) in numbered {
        let mut tokens = line.split(|c: char| c.is_whitespace() || c == ':').filter(|t| !t.is_empty());
        let Some(first) = tokens.next() else {
            continue;
        };
        let node = check_range(parse_node(first, source, line_no)?, num_nodes, source, line_no)?;
        for token in tokens {
            let neighbor = check_range(parse_node(token, source, line_no)?, num_nodes, source, line_no)?;
            data.add_edge(node, neighbor);
        }
    }
    Ok(data)
}

fn parse_edge_list_lines(lines: &[String], source: &Path) -> Result<ProblemData> {
    let mut data: Option<ProblemData> = None;
    let mut num_nodes = 0;

    for (i, raw) in lines.iter().enumerate() {
        let line_no = i + 1;
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        match tokens.first().copied() {
            None | Some("c") => continue,
            Some("p") => {
                // p edge N M
                let count = tokens
                    .get(2)
                    .ok_or_else(|| parse_error(source, line_no, "header must be 'p edge N M'"))?;
                num_nodes = parse_node(count, source, line_no)?;
                data = Some(ProblemData::with_nodes(num_nodes));
            }
            Some("e") => {
                let graph = data
                    .as_mut()
                    .ok_or_else(|| parse_error(source, line_no, "edge before 'p' header"))?;
                if tokens.len() < 3 {
                    return Err(parse_error(source, line_no, "edge line must be 'e u v'"));
                }
                let u = check_range(parse_node(tokens[1], source, line_no)?, num_nodes, source, line_no)?;
                let v = check_range(parse_node(tokens[2], source, line_no)?, num_nodes, source, line_no)?;
                graph.add_edge(u, v);
            }
            Some(other) => {
                return Err(parse_error(
                    source,
                    line_no,
                    format!("unexpected line tag '{other}'"),
                ));
            }
        }
    }
    data.ok_or_else(|| parse_error(source, lines.len().max(1), "missing 'p edge N M' header"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn src() -> PathBuf {
        PathBuf::from("inline.txt")
    }

    #[test]
    fn test_adjacency_list() {
        let text = "4\n0 : 1 2\n1 : 0\n2: 0 3\n3 : 2\n";
        let data = parse_adjacency_list(Cursor::new(text), &src()).unwrap();
        assert_eq!(data.num_nodes(), 4);
        assert_eq!(data.num_edges(), 3);
    }

    #[test]
    fn test_adjacency_list_without_colon() {
        let text = "3\n0 1\n1 0 2\n2 1\n";
        let data = parse_adjacency_list(Cursor::new(text), &src()).unwrap();
        assert_eq!(data.num_edges(), 2);
    }

    #[test]
    fn test_edge_list() {
        let text = "c tiny\np edge 3 2\ne 0 1\ne 1 2\n";
        let data = parse_edge_list(Cursor::new(text), &src()).unwrap();
        assert_eq!(data.num_nodes(), 3);
        assert_eq!(data.num_edges(), 2);
    }

    #[test]
    fn test_edge_list_out_of_range() {
        let text = "p edge 2 1\ne 0 5\n";
        let err = parse_edge_list(Cursor::new(text), &src()).unwrap_err();
        match err {
            CnpError::Parse { line, path, .. } => {
                assert_eq!(line, 2);
                assert_eq!(path, src());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_token() {
        let text = "2\n0 : x\n";
        assert!(matches!(
            parse_adjacency_list(Cursor::new(text), &src()),
            Err(CnpError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_missing_file_keeps_path() {
        let err = read("definitely/not/here.graph").unwrap_err();
        assert!(err.to_string().contains("definitely/not/here.graph"));
    }

    #[test]
    fn test_read_detects_format() {
        let dir = std::env::temp_dir();
        let edge = dir.join("u_cnp_read_edge.txt");
        let adj = dir.join("u_cnp_read_adj.txt");
        std::fs::write(&edge, "p edge 3 1\ne 0 2\n").unwrap();
        std::fs::write(&adj, "3\n0 : 1\n1 : 0 2\n2 : 1\n").unwrap();

        assert_eq!(read(&edge).unwrap().num_edges(), 1);
        assert_eq!(read(&adj).unwrap().num_edges(), 2);

        std::fs::remove_file(edge).ok();
        std::fs::remove_file(adj).ok();
    }

    #[test]
    fn test_read_edge_list_with_leading_comments() {
        let path = std::env::temp_dir().join("u_cnp_read_commented.txt");
        std::fs::write(&path, "c generated\n\nc two edges\np edge 3 2\ne 0 1\ne 1 2\n").unwrap();
        let data = read(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(data.num_nodes(), 3);
        assert_eq!(data.num_edges(), 2);
    }

    #[test]
    fn test_is_edge_list() {
        let lines = |text: &str| text.lines().map(String::from).collect::<Vec<_>>();
        assert!(is_edge_list(&lines("c note\np edge 2 1\ne 0 1")));
        assert!(!is_edge_list(&lines("3\n0 : 1\n1 : 0 2\n2 : 1")));
        assert!(!is_edge_list(&lines("c p edge 2 1")));
    }
}
