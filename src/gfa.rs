//! GFA v1/v2 tokenizer and v1 emitter — the external collaborator spec.md §1
//! and §6 keep deliberately thin: it only has to produce `(sequence, length)`
//! node records and `(from_id, from_side, to_id, to_side, overlap)` edge
//! records for the core, and consume the same shape back.
//!
//! Grounded on `original_source/src/main.cpp`'s `read_gfa`/`write_to_file`,
//! restyled after the pack's closest GFA reader
//! (`examples/other_examples/.../sebschmi-bidirected-adjacency-array/.../gfa1.rs`):
//! a `thiserror` error enum, `log::warn!` for recoverable oddities, line
//! splitting on whitespace instead of the original's `ifstream >> token`
//! extraction.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{Result, StarkError};
use crate::graph::{Graph, Side};

/// A link/edge record whose endpoints weren't both known yet when it was
/// encountered; the GFA spec allows L/E records to appear before the S
/// records they reference, so every such record is queued and resolved in
/// a second pass once the whole file has been read (spec.md §6).
struct LateEdge {
    from_name: String,
    from_side: Side,
    to_name: String,
    to_side: Side,
    overlap: i64,
}

/// Read a GFA v1 or v2 file into a fresh [`Graph`]. Returns the graph plus
/// the overlap length's implied `k = overlap + 1`; fails with
/// [`StarkError::InconsistentK`] the moment two edge records disagree on
/// the overlap length (spec.md §7's hard-abort redesign), and with
/// [`StarkError::UndeterminedK`] if the file contains no edges at all.
pub fn read_gfa(path: &Path) -> Result<(Graph, i64)> {
    log::debug!("reading gfa file: {}", path.display());
    let file = File::open(path).map_err(|source| StarkError::Io { path: path.to_path_buf(), source })?;
    let reader = BufReader::new(file);

    let mut graph = Graph::new();
    let mut node_ids: HashMap<String, i64> = HashMap::new();
    let mut late_edges: Vec<LateEdge> = Vec::new();
    let mut version = 1u32;
    let mut k: Option<i64> = None;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| StarkError::Io { path: path.to_path_buf(), source })?;
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let command = match fields.next() {
            Some(tok) => tok,
            None => continue,
        };

        match command {
            "H" => {
                if let Some(vn) = fields.next() {
                    if let Some(version_field) = vn.strip_prefix("VN:Z:") {
                        if let Some(major) = version_field.split('.').next() {
                            if let Ok(parsed) = major.parse::<u32>() {
                                version = parsed;
                            }
                        }
                    } else {
                        log::warn!("{}:{}: unrecognized header field {vn}", path.display(), line_no + 1);
                    }
                }
            }

            "S" => {
                parse_s_line(&mut graph, &mut node_ids, &mut version, &line, path, line_no)?;
            }

            "L" | "E" => {
                let rest: Vec<&str> = fields.collect();
                let edge = if command == "E" {
                    parse_e_fields(&rest, path, line_no)?
                } else {
                    parse_l_fields(&rest, path, line_no)?
                };
                let overlap = edge.overlap;
                match k {
                    None => k = Some(overlap + 1),
                    Some(expected) if expected != overlap + 1 => {
                        return Err(StarkError::InconsistentK { expected, found: overlap + 1 });
                    }
                    _ => {}
                }

                match (node_ids.get(&edge.from_name), node_ids.get(&edge.to_name)) {
                    (Some(&from_id), Some(&to_id)) => {
                        graph.add_edge(from_id, edge.from_side, to_id, edge.to_side);
                    }
                    _ => late_edges.push(edge),
                }
            }

            other => {
                log::warn!("{}:{}: line not supported: {other} {line}", path.display(), line_no + 1);
            }
        }
    }

    for edge in late_edges {
        match (node_ids.get(&edge.from_name), node_ids.get(&edge.to_name)) {
            (Some(&from_id), Some(&to_id)) => {
                graph.add_edge(from_id, edge.from_side, to_id, edge.to_side);
            }
            _ => {
                log::warn!("undefined node: {} -> {}", edge.from_name, edge.to_name);
            }
        }
    }

    log::debug!("read completed!");
    let k = k.ok_or(StarkError::UndeterminedK)?;
    Ok((graph, k))
}

fn parse_s_line(
    graph: &mut Graph,
    node_ids: &mut HashMap<String, i64>,
    version: &mut u32,
    line: &str,
    path: &Path,
    line_no: usize,
) -> Result<()> {
    let mut fields = line.split_whitespace();
    fields.next(); // "S"
    let name = fields
        .next()
        .ok_or_else(|| StarkError::MalformedGfa { path: path.to_path_buf(), line: line_no + 1, message: "S line missing name".into() })?;
    let second = fields
        .next()
        .ok_or_else(|| StarkError::MalformedGfa { path: path.to_path_buf(), line: line_no + 1, message: "S line missing sequence".into() })?;

    let is_v2_length = *version == 2 || second.chars().next().is_some_and(|c| c.is_ascii_digit());
    let seq = if is_v2_length {
        *version = 2;
        fields
            .next()
            .ok_or_else(|| StarkError::MalformedGfa { path: path.to_path_buf(), line: line_no + 1, message: "v2 S line missing sequence".into() })?
    } else {
        second
    };

    let id = graph.add_node(seq.as_bytes(), 0, 0);
    node_ids.insert(name.to_string(), id);
    Ok(())
}

fn parse_sign(sign: &str, path: &Path, line_no: usize) -> Result<char> {
    match sign {
        "+" | "-" => Ok(sign.chars().next().unwrap()),
        other => Err(StarkError::MalformedGfa {
            path: path.to_path_buf(),
            line: line_no + 1,
            message: format!("unrecognized orientation sign '{other}'"),
        }),
    }
}

/// `from_sign == '+'` touches the `from` node's right side; `to_sign ==
/// '-'` touches the `to` node's right side. See §3's asymmetric
/// left/right convention and `node.cpp`'s `Node::add_edge`.
fn sides_from_signs(from_sign: char, to_sign: char) -> (Side, Side) {
    let from_side = if from_sign == '+' { Side::Right } else { Side::Left };
    let to_side = if to_sign == '-' { Side::Right } else { Side::Left };
    (from_side, to_side)
}

/// Parse the integer overlap length out of a GFA CIGAR-ish field (e.g.
/// `"12M"`), ignoring anything after the leading digit run.
fn parse_overlap(field: &str, path: &Path, line_no: usize) -> Result<i64> {
    let digits: String = field.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<i64>().map_err(|_| StarkError::MalformedGfa {
        path: path.to_path_buf(),
        line: line_no + 1,
        message: format!("could not parse overlap length from '{field}'"),
    })
}

fn parse_l_fields(fields: &[&str], path: &Path, line_no: usize) -> Result<LateEdge> {
    let malformed = || StarkError::MalformedGfa { path: path.to_path_buf(), line: line_no + 1, message: "L line has too few fields".into() };
    let from_name = *fields.first().ok_or_else(malformed)?;
    let from_sign = parse_sign(fields.get(1).ok_or_else(malformed)?, path, line_no)?;
    let to_name = *fields.get(2).ok_or_else(malformed)?;
    let to_sign = parse_sign(fields.get(3).ok_or_else(malformed)?, path, line_no)?;
    let overlap = parse_overlap(fields.get(4).ok_or_else(malformed)?, path, line_no)?;
    let (from_side, to_side) = sides_from_signs(from_sign, to_sign);
    Ok(LateEdge { from_name: from_name.to_string(), from_side, to_name: to_name.to_string(), to_side, overlap })
}

/// GFA2 `E` records carry orientation as a trailing `+`/`-` suffix on each
/// segment id (e.g. `12+`) rather than as a separate field; the alignment
/// (overlap) is always the last field, with position fields in between
/// ignored (spec.md §6: "`E <eid> <from±> <to±> <...> <...> <overlap>`").
fn parse_e_fields(fields: &[&str], path: &Path, line_no: usize) -> Result<LateEdge> {
    let malformed = || StarkError::MalformedGfa { path: path.to_path_buf(), line: line_no + 1, message: "E line has too few fields".into() };
    // fields[0] is the eid, already skipped by the caller having consumed "E"; here
    // fields is everything after "E", so fields[0] = eid.
    let sid1 = *fields.get(1).ok_or_else(malformed)?;
    let sid2 = *fields.get(2).ok_or_else(malformed)?;
    let overlap_field = *fields.last().ok_or_else(malformed)?;

    let (from_name, from_sign) = split_signed_segment(sid1, path, line_no)?;
    let (to_name, to_sign) = split_signed_segment(sid2, path, line_no)?;
    let overlap = parse_overlap(overlap_field, path, line_no)?;
    let (from_side, to_side) = sides_from_signs(from_sign, to_sign);
    Ok(LateEdge { from_name, from_side, to_name, to_side, overlap })
}

fn split_signed_segment(segment: &str, path: &Path, line_no: usize) -> Result<(String, char)> {
    let mut chars = segment.chars();
    let sign = chars.next_back().ok_or_else(|| StarkError::MalformedGfa {
        path: path.to_path_buf(),
        line: line_no + 1,
        message: "empty segment id in E line".into(),
    })?;
    if sign != '+' && sign != '-' {
        return Err(StarkError::MalformedGfa {
            path: path.to_path_buf(),
            line: line_no + 1,
            message: format!("segment id '{segment}' missing an orientation suffix"),
        });
    }
    Ok((chars.as_str().to_string(), sign))
}

/// Write the bluntified graph out as GFA v1, per spec.md §6: one `S` line
/// per live node (numeric ids, no name preservation), then for every node
/// one `L` line per left-edge entry (source side `-`) and one per
/// right-edge entry (source side `+`); all overlaps emitted as literal
/// `0M` since bluntification removed every implicit overlap.
pub fn write_gfa(graph: &Graph, path: &Path) -> Result<()> {
    log::debug!("writing results to {}", path.display());
    let file = File::create(path).map_err(|source| StarkError::Io { path: path.to_path_buf(), source })?;
    let mut writer = BufWriter::new(file);

    for node in graph.nodes.values() {
        writer
            .write_all(format!("S\t{}\t", node.id).as_bytes())
            .and_then(|_| writer.write_all(graph.arena.slice(node.seq)))
            .and_then(|_| writer.write_all(b"\n"))
            .map_err(|source| StarkError::Io { path: path.to_path_buf(), source })?;
    }

    for node in graph.nodes.values() {
        for &left_neighbour_id in node.left_edges.iter() {
            let sign = if left_neighbour_id < 0 { '+' } else { '-' };
            writeln!(writer, "L\t{}\t-\t{}\t{}\t0M", node.id, left_neighbour_id.abs(), sign)
                .map_err(|source| StarkError::Io { path: path.to_path_buf(), source })?;
        }
        for &right_neighbour_id in node.right_edges.iter() {
            let sign = if right_neighbour_id < 0 { '+' } else { '-' };
            writeln!(writer, "L\t{}\t+\t{}\t{}\t0M", node.id, right_neighbour_id.abs(), sign)
                .map_err(|source| StarkError::Io { path: path.to_path_buf(), source })?;
        }
    }

    log::debug!("write completed!");
    Ok(())
}
