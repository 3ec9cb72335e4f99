//! GFA 1 loader.
//!
//! Segments (`S`), links (`L`) and paths (`P`) are read; header (`H`) lines
//! and `#` comments are ignored. Containments (`C`), walks (`W`) and unknown
//! record types are skipped unless [`LoadOptions::strict`] is set. Records may
//! appear in any order: the file is parsed completely before the graph is
//! assembled.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::types::{GraphError, Handle, NodeId, Result};

use super::builder::GraphBuilder;
use super::graph::Graph;
use super::options::LoadOptions;

struct Segment {
    line: usize,
    id: NodeId,
    sequence: Vec<u8>,
}

struct Link {
    line: usize,
    from: Handle,
    to: Handle,
}

struct PathLine {
    line: usize,
    name: String,
    steps: Vec<Handle>,
}

#[derive(Default)]
struct Records {
    segments: Vec<Segment>,
    links: Vec<Link>,
    paths: Vec<PathLine>,
}

/// Loads a GFA file from disk.
pub fn load_gfa(path: impl AsRef<Path>, opts: &LoadOptions) -> Result<Graph> {
    let path = path.as_ref();
    let started = Instant::now();
    let file = File::open(path).map_err(|source| GraphError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let graph = read_gfa(BufReader::new(file), opts).map_err(|err| match err {
        GraphError::Io { source, .. } => GraphError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        paths = graph.path_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "loaded graph"
    );
    Ok(graph)
}

/// Parses GFA text from any buffered reader.
pub fn read_gfa<R: BufRead>(reader: R, opts: &LoadOptions) -> Result<Graph> {
    let records = parse_records(reader, opts)?;
    assemble(records, opts)
}

fn parse_records<R: BufRead>(reader: R, opts: &LoadOptions) -> Result<Records> {
    let mut records = Records::default();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| GraphError::Io {
            path: Default::default(),
            source,
        })?;
        let line = line.trim_end_matches('\r');
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        match fields[0] {
            "S" => records.segments.push(parse_segment(line_no, &fields)?),
            "L" => records.links.push(parse_link(line_no, &fields)?),
            "P" => records.paths.push(parse_path(line_no, &fields)?),
            "H" => {}
            other if opts.strict => {
                return Err(parse_error(
                    line_no,
                    format!("unsupported record type '{other}'"),
                ));
            }
            other => debug!(line = line_no, record = other, "skipping GFA record"),
        }
    }
    Ok(records)
}

fn assemble(records: Records, opts: &LoadOptions) -> Result<Graph> {
    let mut builder = GraphBuilder::with_options(opts.clone());
    for seg in records.segments {
        builder
            .add_node(seg.id, seg.sequence)
            .map_err(|err| at_line(seg.line, err))?;
    }
    for link in records.links {
        builder
            .add_edge(link.from, link.to)
            .map_err(|err| at_line(link.line, err))?;
    }
    for path in records.paths {
        builder
            .add_path(&path.name, &path.steps)
            .map_err(|err| at_line(path.line, err))?;
    }
    Ok(builder.build())
}

fn parse_error(line: usize, message: impl Into<String>) -> GraphError {
    GraphError::Parse {
        line,
        message: message.into(),
    }
}

fn at_line(line: usize, err: GraphError) -> GraphError {
    parse_error(line, err.to_string())
}

fn field<'a>(fields: &[&'a str], idx: usize, line: usize, what: &str) -> Result<&'a str> {
    fields
        .get(idx)
        .copied()
        .filter(|f| !f.is_empty())
        .ok_or_else(|| parse_error(line, format!("missing {what}")))
}

fn parse_node_id(raw: &str, line: usize) -> Result<NodeId> {
    match raw.parse::<u64>() {
        Ok(id) if NodeId(id).is_valid() => Ok(NodeId(id)),
        Ok(id) if id > 0 => Err(parse_error(
            line,
            format!("segment name '{raw}' exceeds the largest node id {}", NodeId::MAX),
        )),
        _ => Err(parse_error(
            line,
            format!("segment name '{raw}' is not a positive integer"),
        )),
    }
}

fn parse_orientation(raw: &str, line: usize) -> Result<bool> {
    match raw {
        "+" => Ok(false),
        "-" => Ok(true),
        other => Err(parse_error(line, format!("invalid orientation '{other}'"))),
    }
}

fn check_overlap(raw: Option<&&str>, line: usize) {
    if let Some(overlap) = raw {
        if !matches!(*overlap, "*" | "0M" | "") {
            warn!(line, overlap = *overlap, "ignoring non-empty overlap");
        }
    }
}

fn parse_segment(line: usize, fields: &[&str]) -> Result<Segment> {
    let id = parse_node_id(field(fields, 1, line, "segment name")?, line)?;
    let raw_seq = field(fields, 2, line, "segment sequence")?;
    let sequence = if raw_seq == "*" {
        Vec::new()
    } else {
        raw_seq.as_bytes().to_vec()
    };
    Ok(Segment { line, id, sequence })
}

fn parse_link(line: usize, fields: &[&str]) -> Result<Link> {
    let from_id = parse_node_id(field(fields, 1, line, "link source")?, line)?;
    let from_rev = parse_orientation(field(fields, 2, line, "link source orientation")?, line)?;
    let to_id = parse_node_id(field(fields, 3, line, "link target")?, line)?;
    let to_rev = parse_orientation(field(fields, 4, line, "link target orientation")?, line)?;
    check_overlap(fields.get(5), line);
    Ok(Link {
        line,
        from: Handle::new(from_id, from_rev),
        to: Handle::new(to_id, to_rev),
    })
}

fn parse_path(line: usize, fields: &[&str]) -> Result<PathLine> {
    let name = field(fields, 1, line, "path name")?.to_string();
    let raw_steps = field(fields, 2, line, "path steps")?;
    let mut steps = Vec::new();
    for step in raw_steps.split(',') {
        let Some(orient) = step.chars().last() else {
            return Err(parse_error(line, "empty path step"));
        };
        let id_part = &step[..step.len() - orient.len_utf8()];
        let is_reverse = parse_orientation(&orient.to_string(), line)?;
        steps.push(Handle::new(parse_node_id(id_part, line)?, is_reverse));
    }
    check_overlap(fields.get(3), line);
    Ok(PathLine { line, name, steps })
}
