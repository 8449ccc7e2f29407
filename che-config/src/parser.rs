//! Sandboxed Chefile interpreter.
//!
//! A Chefile is a sequence of assignment statements mutating exactly two
//! bindings, `che` and `workspace`; nothing else of the host environment
//! is reachable from the script. The interpreter walks a whitelist of
//! field paths, so a configuration file can never touch the process,
//! filesystem or network.
//!
//! Grammar, per line (statements may also be chained with `;`):
//!
//! ```text
//! # comment
//! workspace.name = "myws"
//! workspace.commands[0].name = "build"; workspace.commands[0].commandLine = "mvn package"
//! che.server.port = 9000
//! ```
//!
//! Array indexes auto-vivify placeholder slots (bounded by
//! [`MAX_SLOTS`]); entries that never receive their identifying field
//! are pruned afterwards by [`WorkspaceConfig::compact`].

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::model::{ServerConfig, ServerType, WorkspaceConfig};
use che_core::error::{CheError, Result};

/// Upper bound on index-assignments, mirroring the fixed scratch-array
/// capacity of the original configuration tree.
pub const MAX_SLOTS: usize = 255;

/// Interpreter error carrying the source position of the offending
/// statement.
#[derive(Debug, PartialEq, Eq)]
pub struct ScriptError {
    pub line: usize,
    pub column: Option<usize>,
    pub message: String,
}

impl ScriptError {
    fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column: Some(column),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Literal {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl Literal {
    fn type_name(&self) -> &'static str {
        match self {
            Literal::Str(_) => "string",
            Literal::Int(_) => "number",
            Literal::Bool(_) => "boolean",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Field(String),
    Index(usize),
}

/// Parses the Chefile at `path` into the two configuration bindings.
///
/// A missing file keeps the defaults silently. Interpreter errors are
/// re-attributed to the file, line and column per the original error
/// contract; I/O errors propagate unchanged.
pub fn parse_chefile(
    path: &Path,
    server: &mut ServerConfig,
    workspace: &mut WorkspaceConfig,
) -> Result<()> {
    if !path.exists() {
        debug!("No Chefile defined, using default settings");
        return Ok(());
    }

    let source = fs::read_to_string(path)?;
    evaluate(&source, server, workspace).map_err(|e| {
        let position = match e.column {
            Some(col) => format!("at line {} and column {}", e.line, col),
            None => format!("at line {}", e.line),
        };
        CheError::Config(format!(
            "Error while parsing the file '{}' {}. The error is: {}",
            path.display(),
            position,
            e.message
        ))
    })?;

    workspace.compact();

    debug!("Chefile server config: {:?}", server);
    debug!("Chefile workspace config: {:?}", workspace);
    Ok(())
}

/// Evaluates Chefile source against the two bindings.
pub(crate) fn evaluate(
    source: &str,
    server: &mut ServerConfig,
    workspace: &mut WorkspaceConfig,
) -> std::result::Result<(), ScriptError> {
    for (line_idx, raw_line) in source.lines().enumerate() {
        let line_no = line_idx + 1;
        for (column, statement) in split_statements(raw_line) {
            apply_statement(statement, line_no, column, server, workspace)?;
        }
    }
    Ok(())
}

/// Splits one source line into `(column, statement)` pairs, dropping
/// `#` comments. Separators and comment markers inside quoted strings
/// are left alone.
fn split_statements(line: &str) -> Vec<(usize, &str)> {
    let mut statements = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0usize;
    let mut start_col = 1usize;
    let mut col = 0usize;
    let mut comment = false;

    for (byte_idx, ch) in line.char_indices() {
        col += 1;
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                '#' => {
                    comment = true;
                    push_statement(&mut statements, line, start, byte_idx, start_col);
                    break;
                }
                ';' => {
                    push_statement(&mut statements, line, start, byte_idx, start_col);
                    start = byte_idx + 1;
                    start_col = col + 1;
                }
                _ => {}
            },
        }
    }

    if !comment {
        push_statement(&mut statements, line, start, line.len(), start_col);
    }
    statements
}

fn push_statement<'a>(
    out: &mut Vec<(usize, &'a str)>,
    line: &'a str,
    start: usize,
    end: usize,
    start_col: usize,
) {
    let raw = &line[start..end];
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return;
    }
    let leading = raw.chars().take_while(|c| c.is_whitespace()).count();
    out.push((start_col + leading, trimmed));
}

fn apply_statement(
    statement: &str,
    line: usize,
    column: usize,
    server: &mut ServerConfig,
    workspace: &mut WorkspaceConfig,
) -> std::result::Result<(), ScriptError> {
    let eq = find_unquoted_eq(statement).ok_or_else(|| {
        ScriptError::new(line, column, format!("expected an assignment, got '{statement}'"))
    })?;

    let target = statement[..eq].trim();
    let value_src = statement[eq + 1..].trim();
    let value_column = column + statement[..eq + 1].chars().count()
        + statement[eq + 1..]
            .chars()
            .take_while(|c| c.is_whitespace())
            .count();

    let segments = parse_path(target, line, column)?;
    let value = parse_literal(value_src, line, value_column)?;

    match &segments[0] {
        Segment::Field(root) if root == "che" => {
            apply_server(server, &segments[1..], value, target, line, column, value_column)
        }
        Segment::Field(root) if root == "workspace" => {
            apply_workspace(workspace, &segments[1..], value, target, line, column, value_column)
        }
        Segment::Field(root) => Err(ScriptError::new(
            line,
            column,
            format!("'{root}' is not defined (only 'che' and 'workspace' are available)"),
        )),
        Segment::Index(_) => Err(ScriptError::new(
            line,
            column,
            "assignment target must start with 'che' or 'workspace'",
        )),
    }
}

fn find_unquoted_eq(statement: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (idx, ch) in statement.char_indices() {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                '=' => return Some(idx),
                _ => {}
            },
        }
    }
    None
}

fn parse_path(
    target: &str,
    line: usize,
    column: usize,
) -> std::result::Result<Vec<Segment>, ScriptError> {
    if target.is_empty() {
        return Err(ScriptError::new(line, column, "empty assignment target"));
    }

    let mut segments = Vec::new();
    let mut chars = target.chars().peekable();
    let mut current = String::new();

    let flush = |current: &mut String, segments: &mut Vec<Segment>| {
        if !current.is_empty() {
            segments.push(Segment::Field(std::mem::take(current)));
        }
    };

    while let Some(ch) = chars.next() {
        match ch {
            '.' => {
                if current.is_empty() {
                    return Err(ScriptError::new(
                        line,
                        column,
                        format!("malformed assignment target '{target}'"),
                    ));
                }
                flush(&mut current, &mut segments);
            }
            '[' => {
                flush(&mut current, &mut segments);
                let mut digits = String::new();
                for digit in chars.by_ref() {
                    if digit == ']' {
                        break;
                    }
                    digits.push(digit);
                }
                let index: usize = digits.trim().parse().map_err(|_| {
                    ScriptError::new(
                        line,
                        column,
                        format!("invalid array index '[{digits}]' in '{target}'"),
                    )
                })?;
                segments.push(Segment::Index(index));
                // swallow a field separator right after the bracket
                if chars.peek() == Some(&'.') {
                    chars.next();
                }
            }
            c if c.is_alphanumeric() || c == '_' || c == '-' => current.push(c),
            c => {
                return Err(ScriptError::new(
                    line,
                    column,
                    format!("unexpected character '{c}' in assignment target '{target}'"),
                ));
            }
        }
    }
    flush(&mut current, &mut segments);

    if segments.is_empty() {
        return Err(ScriptError::new(line, column, "empty assignment target"));
    }
    Ok(segments)
}

fn parse_literal(
    source: &str,
    line: usize,
    column: usize,
) -> std::result::Result<Literal, ScriptError> {
    if source.is_empty() {
        return Err(ScriptError::new(line, column, "missing value after '='"));
    }

    let mut chars = source.chars();
    let first = chars.next().unwrap_or_default();

    if first == '"' || first == '\'' {
        let mut out = String::new();
        let mut escaped = false;
        for ch in chars {
            if escaped {
                match ch {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    other => out.push(other),
                }
                escaped = false;
            } else if ch == '\\' && first == '"' {
                escaped = true;
            } else if ch == first {
                return Ok(Literal::Str(out));
            } else {
                out.push(ch);
            }
        }
        return Err(ScriptError::new(
            line,
            column,
            format!("unterminated string {source}"),
        ));
    }

    if source == "true" || source == "false" {
        return Ok(Literal::Bool(source == "true"));
    }

    if let Ok(n) = source.parse::<i64>() {
        return Ok(Literal::Int(n));
    }

    Err(ScriptError::new(
        line,
        column,
        format!("invalid value '{source}' (expected a quoted string, number or boolean)"),
    ))
}

fn expect_str(
    value: Literal,
    target: &str,
    line: usize,
    column: usize,
) -> std::result::Result<String, ScriptError> {
    match value {
        Literal::Str(s) => Ok(s),
        other => Err(ScriptError::new(
            line,
            column,
            format!("'{target}' expects a string, got a {}", other.type_name()),
        )),
    }
}

fn expect_number(
    value: Literal,
    target: &str,
    line: usize,
    column: usize,
) -> std::result::Result<i64, ScriptError> {
    match value {
        Literal::Int(n) => Ok(n),
        Literal::Str(s) => s.parse().map_err(|_| {
            ScriptError::new(
                line,
                column,
                format!("'{target}' expects a number, got '{s}'"),
            )
        }),
        other => Err(ScriptError::new(
            line,
            column,
            format!("'{target}' expects a number, got a {}", other.type_name()),
        )),
    }
}

fn ensure_slot<'a, T: Default>(
    items: &'a mut Vec<T>,
    index: usize,
    target: &str,
    line: usize,
    column: usize,
) -> std::result::Result<&'a mut T, ScriptError> {
    if index >= MAX_SLOTS {
        return Err(ScriptError::new(
            line,
            column,
            format!("index {index} in '{target}' is out of range (maximum {MAX_SLOTS} entries)"),
        ));
    }
    while items.len() <= index {
        items.push(T::default());
    }
    Ok(&mut items[index])
}

fn unknown_field(target: &str, line: usize, column: usize) -> ScriptError {
    ScriptError::new(line, column, format!("unknown configuration field '{target}'"))
}

#[allow(clippy::too_many_arguments)]
fn apply_server(
    server: &mut ServerConfig,
    segments: &[Segment],
    value: Literal,
    target: &str,
    line: usize,
    column: usize,
    value_column: usize,
) -> std::result::Result<(), ScriptError> {
    match segments {
        [Segment::Field(s), Segment::Field(field)] if s == "server" => match field.as_str() {
            "type" => {
                let v = expect_str(value, target, line, value_column)?;
                server.server_type = match v.as_str() {
                    "local" => ServerType::Local,
                    "remote" => ServerType::Remote,
                    other => {
                        return Err(ScriptError::new(
                            line,
                            value_column,
                            format!("unknown server type '{other}' (expected 'local' or 'remote')"),
                        ));
                    }
                };
                Ok(())
            }
            "ip" => {
                server.ip = expect_str(value, target, line, value_column)?;
                Ok(())
            }
            "port" => {
                let port = expect_number(value, target, line, value_column)?;
                server.port = u16::try_from(port).map_err(|_| {
                    ScriptError::new(line, value_column, format!("invalid port number {port}"))
                })?;
                Ok(())
            }
            "user" => {
                server.user = expect_str(value, target, line, value_column)?;
                Ok(())
            }
            "pass" => {
                server.pass = expect_str(value, target, line, value_column)?;
                Ok(())
            }
            _ => Err(unknown_field(target, line, column)),
        },
        [Segment::Field(s), Segment::Field(props), Segment::Field(key)]
            if s == "server" && props == "properties" =>
        {
            let v = expect_str(value, target, line, value_column)?;
            server.properties.insert(key.clone(), v);
            Ok(())
        }
        _ => Err(unknown_field(target, line, column)),
    }
}

#[allow(clippy::too_many_arguments)]
fn apply_workspace(
    workspace: &mut WorkspaceConfig,
    segments: &[Segment],
    value: Literal,
    target: &str,
    line: usize,
    column: usize,
    value_column: usize,
) -> std::result::Result<(), ScriptError> {
    match segments {
        [Segment::Field(f)] if f == "name" => {
            workspace.name = expect_str(value, target, line, value_column)?;
            Ok(())
        }
        [Segment::Field(f)] if f == "ram" => {
            let ram = expect_number(value, target, line, value_column)?;
            workspace.ram = u32::try_from(ram).map_err(|_| {
                ScriptError::new(line, value_column, format!("invalid ram value {ram}"))
            })?;
            Ok(())
        }
        [Segment::Field(f), Segment::Index(i), rest @ ..] if f == "commands" => {
            let command = ensure_slot(&mut workspace.commands, *i, target, line, column)?;
            let v = expect_str(value, target, line, value_column)?;
            match rest {
                [Segment::Field(field)] => match field.as_str() {
                    "name" => command.name = v,
                    "type" => command.command_type = v,
                    "commandLine" => command.command_line = v,
                    "previewUrl" => command.preview_url = v,
                    _ => return Err(unknown_field(target, line, column)),
                },
                [Segment::Field(attrs), Segment::Field(field)]
                    if attrs == "attributes" && field == "previewUrl" =>
                {
                    command.preview_url = v;
                }
                _ => return Err(unknown_field(target, line, column)),
            }
            Ok(())
        }
        [Segment::Field(f), Segment::Field(actions), Segment::Index(i), Segment::Field(field)]
            if f == "postload" && actions == "actions" =>
        {
            let action = ensure_slot(&mut workspace.postload, *i, target, line, column)?;
            let v = expect_str(value, target, line, value_column)?;
            match field.as_str() {
                "command" => action.command = Some(v),
                "script" => action.script = Some(v),
                _ => return Err(unknown_field(target, line, column)),
            }
            Ok(())
        }
        [Segment::Field(f), Segment::Field(field)] if f == "runtime" => {
            let v = expect_str(value, target, line, value_column)?;
            match field.as_str() {
                "image" => workspace.runtime.image = v,
                "content" => workspace.runtime.content = v,
                "dockerfile" => workspace.runtime.dockerfile = v,
                "composefile" => workspace.runtime.composefile = v,
                "location" => workspace.runtime.location = v,
                _ => return Err(unknown_field(target, line, column)),
            }
            Ok(())
        }
        [Segment::Field(f), Segment::Index(i), rest @ ..] if f == "projects" => {
            let project = ensure_slot(&mut workspace.projects, *i, target, line, column)?;
            let v = expect_str(value, target, line, value_column)?;
            match rest {
                [Segment::Field(field)] => match field.as_str() {
                    "name" => project.name = v,
                    "type" => project.project_type = v,
                    _ => return Err(unknown_field(target, line, column)),
                },
                [Segment::Field(source), Segment::Field(field)] if source == "source" => {
                    match field.as_str() {
                        "location" => project.source.location = v,
                        "type" => project.source.source_type = v,
                        _ => return Err(unknown_field(target, line, column)),
                    }
                }
                [Segment::Field(source), Segment::Field(attrs), Segment::Field(key)]
                    if source == "source" && attrs == "attributes" =>
                {
                    project.source.attributes.insert(key.clone(), v);
                }
                _ => return Err(unknown_field(target, line, column)),
            }
            Ok(())
        }
        _ => Err(unknown_field(target, line, column)),
    }
}
