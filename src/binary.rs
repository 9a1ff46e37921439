//! Schema-driven reader for fixed-layout binary records.
//!
//! A [`Schema`] is an immutable, ordered list of field descriptors built with
//! [`SchemaBuilder`]. Parsing scans the input once, left to right, and never
//! backtracks: each descriptor consumes the bytes it declares and the cursor
//! only moves forward.
//!
//! Short input is not an error. A fixed-width field at the end of the input
//! reads whatever bytes remain, and an array stops early once the input is
//! used up.
//!
//! ```
//! use aamva_canonicalize::binary::Schema;
//!
//! let schema = Schema::builder()
//!     .string("tag", 2)
//!     .int("count", 2)
//!     .array("items", "count", Schema::builder().string("item", 1).build())
//!     .build();
//!
//! let (record, consumed) = schema.parse(b"XY03abc").unwrap();
//! assert_eq!(record.string("tag"), Some("XY"));
//! assert_eq!(record.array("items").map(<[_]>::len), Some(3));
//! assert_eq!(consumed, 7);
//! ```
use std::fmt;

/// Stop condition of a terminated byte run.
///
/// Called with each candidate byte and the current parsing [`Context`], so the
/// terminator can depend on values parsed earlier in the same record or in an
/// enclosing one.
pub type StopPredicate = fn(u8, &Context<'_>) -> bool;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("array length field `{0}` is missing or not an integer")]
    MissingCount(&'static str),
}

/// Number of elements of an array field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Count {
    /// Literal element count.
    Fixed(usize),

    /// Element count read from a previously parsed integer field of the same
    /// record.
    Field(&'static str),
}

impl From<usize> for Count {
    fn from(value: usize) -> Self {
        Self::Fixed(value)
    }
}

impl From<&'static str> for Count {
    fn from(value: &'static str) -> Self {
        Self::Field(value)
    }
}

#[derive(Clone)]
enum FieldKind {
    /// `length` bytes decoded as text.
    String { length: usize },

    /// `length` bytes kept as they are.
    Raw { length: usize },

    /// `length` ASCII digits. Anything that is not a valid decimal
    /// number reads as `0`.
    Int { length: usize },

    /// Bytes up to the first one matching `until`. The terminator is consumed
    /// but not part of the value.
    Bytes { until: StopPredicate },

    /// `count` consecutive records following `schema`.
    Array { count: Count, schema: Schema },
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String { length } => f.debug_struct("String").field("length", length).finish(),
            Self::Raw { length } => f.debug_struct("Raw").field("length", length).finish(),
            Self::Int { length } => f.debug_struct("Int").field("length", length).finish(),
            Self::Bytes { .. } => f.debug_struct("Bytes").finish_non_exhaustive(),
            Self::Array { count, schema } => f
                .debug_struct("Array")
                .field("count", count)
                .field("schema", schema)
                .finish(),
        }
    }
}

#[derive(Debug, Clone)]
struct Field {
    name: &'static str,
    kind: FieldKind,
}

/// Ordered list of field descriptors.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Parses a top-level record, returning it with the number of bytes
    /// consumed.
    pub fn parse(&self, input: &[u8]) -> Result<(Record, usize), Error> {
        self.parse_in(input, None)
    }

    /// Parses a record nested in `parent`.
    ///
    /// Stop predicates of this record see `parent` through
    /// [`Context::parent`].
    pub fn parse_in(
        &self,
        input: &[u8],
        parent: Option<&Context<'_>>,
    ) -> Result<(Record, usize), Error> {
        let mut cursor = Cursor::new(input);
        let mut record = Record::default();

        for field in &self.fields {
            let value = match &field.kind {
                FieldKind::String { length } => {
                    Value::String(String::from_utf8_lossy(cursor.take(*length)).into_owned())
                }
                FieldKind::Raw { length } => Value::Raw(cursor.take(*length).to_vec()),
                FieldKind::Int { length } => Value::Int(parse_ascii_int(cursor.take(*length))),
                FieldKind::Bytes { until } => {
                    let context = Context::new(&record, parent);
                    Value::Bytes(cursor.take_until(|b| until(b, &context)))
                }
                FieldKind::Array { count, schema } => {
                    let count = match *count {
                        Count::Fixed(n) => n,
                        Count::Field(name) => record
                            .int(name)
                            .and_then(|n| usize::try_from(n).ok())
                            .ok_or(Error::MissingCount(name))?,
                    };

                    let mut items = Vec::new();
                    for _ in 0..count {
                        if cursor.remaining().is_empty() {
                            break;
                        }

                        let context = Context::new(&record, parent);
                        let (item, consumed) =
                            schema.parse_in(cursor.remaining(), Some(&context))?;
                        cursor.advance(consumed);
                        items.push(item);
                    }

                    Value::Array(items)
                }
            };

            record.insert(field.name, value);
        }

        Ok((record, cursor.position()))
    }
}

/// Fluent constructor for [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<Field>,
}

impl SchemaBuilder {
    fn push(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(Field { name, kind });
        self
    }

    /// Fixed-length text field.
    ///
    /// # Panics
    ///
    /// Panics if `length` is zero.
    pub fn string(self, name: &'static str, length: usize) -> Self {
        assert!(length > 0, "field `{name}` must consume at least one byte");
        self.push(name, FieldKind::String { length })
    }

    /// Fixed-length field kept as raw bytes.
    ///
    /// # Panics
    ///
    /// Panics if `length` is zero.
    pub fn raw(self, name: &'static str, length: usize) -> Self {
        assert!(length > 0, "field `{name}` must consume at least one byte");
        self.push(name, FieldKind::Raw { length })
    }

    /// Fixed-length ASCII decimal field.
    ///
    /// # Panics
    ///
    /// Panics if `length` is zero.
    pub fn int(self, name: &'static str, length: usize) -> Self {
        assert!(length > 0, "field `{name}` must consume at least one byte");
        self.push(name, FieldKind::Int { length })
    }

    /// Byte run ended by the first byte matching `until`.
    pub fn bytes_until(self, name: &'static str, until: StopPredicate) -> Self {
        self.push(name, FieldKind::Bytes { until })
    }

    /// Array of `count` records following `schema`.
    pub fn array(self, name: &'static str, count: impl Into<Count>, schema: Schema) -> Self {
        self.push(
            name,
            FieldKind::Array {
                count: count.into(),
                schema,
            },
        )
    }

    pub fn build(self) -> Schema {
        Schema {
            fields: self.fields,
        }
    }
}

/// Terminated byte run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteRun {
    pub data: Vec<u8>,

    /// Whether the terminator was found. When it is not, `data` extends to the
    /// end of the input.
    pub terminated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Raw(Vec<u8>),
    Int(u64),
    Bytes(ByteRun),
    Array(Vec<Record>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&[u8]> {
        match self {
            Self::Raw(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<u64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&ByteRun> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Record]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }
}

/// Parsed record: field values in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(&'static str, Value)>,
}

impl Record {
    fn insert(&mut self, name: &'static str, value: Value) {
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn raw(&self, name: &str) -> Option<&[u8]> {
        self.get(name).and_then(Value::as_raw)
    }

    pub fn int(&self, name: &str) -> Option<u64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn bytes(&self, name: &str) -> Option<&ByteRun> {
        self.get(name).and_then(Value::as_bytes)
    }

    pub fn array(&self, name: &str) -> Option<&[Record]> {
        self.get(name).and_then(Value::as_array)
    }

    /// Removes a field from the record, returning its value.
    pub fn take(&mut self, name: &str) -> Option<Value> {
        let i = self.fields.iter().position(|(n, _)| *n == name)?;
        Some(self.fields.remove(i).1)
    }
}

/// View over the fields parsed so far, given to stop predicates and nested
/// records.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    record: &'a Record,
    parent: Option<&'a Context<'a>>,
}

impl<'a> Context<'a> {
    fn new(record: &'a Record, parent: Option<&'a Context<'a>>) -> Self {
        Self { record, parent }
    }

    /// Context of the enclosing record, if any.
    pub fn parent(&self) -> Option<&'a Context<'a>> {
        self.parent
    }

    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.record.get(name)
    }

    /// Looks `name` up in the current record, then in each enclosing record.
    pub fn lookup(&self, name: &str) -> Option<&'a Value> {
        self.get(name)
            .or_else(|| self.parent.and_then(|p| p.lookup(name)))
    }
}

struct Cursor<'a> {
    input: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self { input, offset: 0 }
    }

    fn position(&self) -> usize {
        self.offset
    }

    fn remaining(&self) -> &'a [u8] {
        &self.input[self.offset..]
    }

    fn advance(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.input.len());
    }

    /// Up to `n` bytes; fewer at the end of the input.
    fn take(&mut self, n: usize) -> &'a [u8] {
        let start = self.offset;
        let end = start.saturating_add(n).min(self.input.len());
        self.offset = end;
        &self.input[start..end]
    }

    fn take_until(&mut self, mut stop: impl FnMut(u8) -> bool) -> ByteRun {
        let rest = self.remaining();
        match rest.iter().position(|&b| stop(b)) {
            Some(i) => {
                self.offset += i + 1;
                ByteRun {
                    data: rest[..i].to_vec(),
                    terminated: true,
                }
            }
            None => {
                self.offset = self.input.len();
                ByteRun {
                    data: rest.to_vec(),
                    terminated: false,
                }
            }
        }
    }
}

fn parse_ascii_int(bytes: &[u8]) -> u64 {
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}
