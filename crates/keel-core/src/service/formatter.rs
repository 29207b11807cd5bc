//! Log formatters
//!
//! Templates use `%(key)s` placeholders (`%(lineno)d`, `%(name)-8s` are accepted;
//! width and flags are ignored). `JsonFormatter` turns the placeholders into JSON
//! keys; `TextFormatter` substitutes them into the line.

use serde_json::{Map, Value};

use crate::domain::LogRecord;

/// Console line layout used by logger registries
pub const DEFAULT_CONSOLE_FORMAT: &str = "[%(levelname)s] %(message)s";

/// Timestamp layout for `asctime`
const ASCTIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Keys that structured fields may not overwrite
const RESERVED_KEYS: &[&str] = &[
    "asctime",
    "level",
    "logger_name",
    "module",
    "message",
    "exception",
    "exception_type",
    "traceback",
];

/// Turns a record into one output line (without trailing newline). Never fails.
pub trait Formatter: Send + Sync {
    fn format(&self, record: &LogRecord) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Key(String),
}

/// Parsed `%(key)s` template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(template: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = template;

        while let Some(pos) = rest.find('%') {
            literal.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];

            if let Some(stripped) = after.strip_prefix('%') {
                literal.push('%');
                rest = stripped;
                continue;
            }

            let parsed = after.strip_prefix('(').and_then(|inner| {
                let close = inner.find(')')?;
                let key = &inner[..close];
                let tail = &inner[close + 1..];
                let flags = tail
                    .find(|c: char| !matches!(c, '-' | '+' | '#' | ' ' | '.' | '0'..='9'))
                    .unwrap_or(tail.len());
                let conversion = tail[flags..].chars().next().filter(|c| c.is_ascii_alphabetic())?;
                let consumed = 1 + close + 1 + flags + conversion.len_utf8();
                Some((key.to_string(), consumed))
            });

            match parsed {
                Some((key, consumed)) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Key(key));
                    rest = &after[consumed..];
                }
                None => {
                    literal.push('%');
                    rest = after;
                }
            }
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self { segments }
    }

    /// Placeholder keys in template order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Key(k) => Some(k.as_str()),
            Segment::Literal(_) => None,
        })
    }
}

/// Resolve a placeholder against a record. Unknown keys fall back to the
/// structured fields, then to `null`.
fn attribute(record: &LogRecord, key: &str) -> Value {
    match key {
        "asctime" => Value::String(record.timestamp.format(ASCTIME_FORMAT).to_string()),
        "created" => {
            let micros = record.timestamp.timestamp_micros();
            serde_json::json!(micros as f64 / 1_000_000.0)
        }
        "name" => Value::String(record.logger_name.clone()),
        "levelname" => Value::String(record.level.as_str().to_string()),
        "levelno" => Value::from(record.level.as_number()),
        "message" => Value::String(record.message.clone()),
        "module" => Value::String(record.module.clone()),
        "filename" => Value::String(
            std::path::Path::new(&record.file)
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_default(),
        ),
        "pathname" => Value::String(record.file.clone()),
        "lineno" => Value::from(record.line),
        "process" => Value::from(record.process),
        "thread" => record
            .thread
            .clone()
            .map(Value::String)
            .unwrap_or(Value::Null),
        other => record.fields.get(other).cloned().unwrap_or(Value::Null),
    }
}

/// One JSON object per line
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    template: Template,
}

impl JsonFormatter {
    pub fn new(template: &str) -> Self {
        Self {
            template: Template::parse(template),
        }
    }

    /// Build the JSON object for a record
    pub fn to_map(&self, record: &LogRecord) -> Map<String, Value> {
        let mut out = Map::new();

        for key in self.template.keys() {
            if !out.contains_key(key) {
                out.insert(key.to_string(), attribute(record, key));
            }
        }

        for (key, value) in record.fields.iter() {
            match out.get(key) {
                // Template placeholder already resolved from this field
                Some(existing) if existing == value => {}
                Some(_) => {
                    out.insert(format!("extra.{key}"), value.clone());
                }
                None if RESERVED_KEYS.contains(&key.as_str()) => {
                    out.insert(format!("extra.{key}"), value.clone());
                }
                None => {
                    out.insert(key.clone(), value.clone());
                }
            }
        }

        if !out.contains_key("asctime") {
            out.insert("asctime".to_string(), attribute(record, "asctime"));
        }
        if !out.contains_key("message") {
            out.insert("message".to_string(), attribute(record, "message"));
        }
        out.insert(
            "level".to_string(),
            Value::String(record.level.as_str().to_string()),
        );
        out.insert(
            "logger_name".to_string(),
            Value::String(record.logger_name.clone()),
        );
        out.insert("module".to_string(), Value::String(record.module.clone()));

        if let Some(exception) = &record.exception {
            out.insert(
                "exception".to_string(),
                Value::String(exception.message.clone()),
            );
            out.insert(
                "exception_type".to_string(),
                Value::String(exception.exception_type.clone()),
            );
            out.insert(
                "traceback".to_string(),
                Value::String(exception.traceback.clone()),
            );
        }

        out
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, record: &LogRecord) -> String {
        let map = self.to_map(record);
        serde_json::to_string(&map).unwrap_or_else(|_| record.message.clone())
    }
}

/// Plain text line from a template; appends the traceback when an exception is attached
#[derive(Debug, Clone)]
pub struct TextFormatter {
    template: Template,
}

impl TextFormatter {
    pub fn new(template: &str) -> Self {
        Self {
            template: Template::parse(template),
        }
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_CONSOLE_FORMAT)
    }
}

impl Formatter for TextFormatter {
    fn format(&self, record: &LogRecord) -> String {
        let mut line = String::new();
        for segment in &self.template.segments {
            match segment {
                Segment::Literal(text) => line.push_str(text),
                Segment::Key(key) => match attribute(record, key) {
                    Value::String(s) => line.push_str(&s),
                    Value::Null => {}
                    other => line.push_str(&other.to_string()),
                },
            }
        }

        if let Some(exception) = &record.exception {
            line.push('\n');
            line.push_str(&exception.traceback);
        }

        line
    }
}
