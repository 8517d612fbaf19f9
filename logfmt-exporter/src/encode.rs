//! Logfmt token rendering.
//!
//! Values are written straight into any [`fmt::Write`]; [`LineWriter`] composes
//! `key=value` tokens separated by single spaces and ends the line.

use std::fmt::{self, Display, Write};

use logfmt_common::{Array, AttributeValue, Identifier, KeyValue};

/// Write a string in double quotes, backslash-escaping `"` and `\`.
///
/// Line breaks and tabs are escaped too so a record never spans lines.
pub fn write_quoted<W: Write>(out: &mut W, s: &str) -> fmt::Result {
    out.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            c => {
                if !write_control(&mut *out, c)? {
                    out.write_char(c)?;
                }
            }
        }
    }
    out.write_char('"')
}

/// Write `[a,b,c]`, rendering each element with `item`.
pub fn write_seq<W, T, F>(out: &mut W, items: &[T], mut item: F) -> fmt::Result
where
    W: Write,
    F: FnMut(&mut W, &T) -> fmt::Result,
{
    out.write_char('[')?;
    for (i, v) in items.iter().enumerate() {
        if i > 0 {
            out.write_char(',')?;
        }
        item(&mut *out, v)?;
    }
    out.write_char(']')
}

pub(crate) fn write_display<W: Write, T: Display>(out: &mut W, v: &T) -> fmt::Result {
    write!(out, "{v}")
}

fn write_bool<W: Write>(out: &mut W, v: &bool) -> fmt::Result {
    out.write_str(if *v { "true" } else { "false" })
}

fn write_string_item<W: Write>(out: &mut W, v: &String) -> fmt::Result {
    write_quoted(out, v)
}

/// Write one attribute value in its canonical logfmt form.
///
/// Only strings are quoted. Floats use the shortest representation that
/// round-trips (`0`, `42`, `0.1`).
pub fn write_value<W: Write>(out: &mut W, value: &AttributeValue) -> fmt::Result {
    match value {
        AttributeValue::Bool(v) => write_bool(out, v),
        AttributeValue::I64(v) => write_display(out, v),
        AttributeValue::U64(v) => write_display(out, v),
        AttributeValue::F64(v) => write_display(out, v),
        AttributeValue::String(v) => write_quoted(out, v),
        AttributeValue::Array(array) => write_array(out, array),
    }
}

/// Write a homogeneous array.
pub fn write_array<W: Write>(out: &mut W, array: &Array) -> fmt::Result {
    match array {
        Array::Bool(v) => write_seq(out, v, write_bool),
        Array::I64(v) => write_seq(out, v, write_display),
        Array::U64(v) => write_seq(out, v, write_display),
        Array::F64(v) => write_seq(out, v, write_display),
        Array::String(v) => write_seq(out, v, write_string_item),
    }
}

/// Write an identifier as `2 * N` lowercase hex digits.
pub fn write_identifier<W: Write, const N: usize>(out: &mut W, id: &Identifier<N>) -> fmt::Result {
    out.write_str(&id.to_hex())
}

/// Render a single value to a new string.
pub fn value_to_string(value: &AttributeValue) -> String {
    let mut s = String::new();
    // Writing into a String cannot fail.
    let _ = write_value(&mut s, value);
    s
}

/// Escape `c` if it would break a line. Returns `false` for ordinary characters.
fn write_control<W: Write>(out: &mut W, c: char) -> Result<bool, fmt::Error> {
    match c {
        '\n' => out.write_str("\\n")?,
        '\r' => out.write_str("\\r")?,
        '\t' => out.write_str("\\t")?,
        _ => return Ok(false),
    }
    Ok(true)
}

/// Writer for unquoted tokens: line breaks and tabs are escaped, everything
/// else passes through.
struct Unquoted<'a, W: Write>(&'a mut W);

impl<W: Write> Write for Unquoted<'_, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if !write_control(&mut *self.0, c)? {
                self.0.write_char(c)?;
            }
        }
        Ok(())
    }
}

/// Composes one logfmt line.
///
/// Each method appends one `key=value` token, inserting the separating space
/// itself. [`LineWriter::finish`] terminates the line.
pub struct LineWriter<'a, W: Write> {
    out: &'a mut W,
    first: bool,
}

impl<'a, W: Write> LineWriter<'a, W> {
    pub fn new(out: &'a mut W) -> Self {
        Self { out, first: true }
    }

    fn key(&mut self, key: &str) -> fmt::Result {
        if !self.first {
            self.out.write_char(' ')?;
        }
        self.first = false;
        Unquoted(&mut *self.out).write_str(key)?;
        self.out.write_char('=')
    }

    /// `key=value` with the value unquoted. Line breaks and tabs are still
    /// escaped.
    pub fn raw(&mut self, key: &str, value: impl Display) -> fmt::Result {
        self.key(key)?;
        write!(Unquoted(&mut *self.out), "{value}")
    }

    /// `key="value"`.
    pub fn quoted(&mut self, key: &str, value: &str) -> fmt::Result {
        self.key(key)?;
        write_quoted(&mut *self.out, value)
    }

    /// `key=<serialized attribute value>`.
    pub fn value(&mut self, key: &str, value: &AttributeValue) -> fmt::Result {
        self.key(key)?;
        write_value(&mut *self.out, value)
    }

    /// `key=[...]` for an arbitrary slice.
    pub fn seq<T, F>(&mut self, key: &str, items: &[T], item: F) -> fmt::Result
    where
        F: FnMut(&mut W, &T) -> fmt::Result,
    {
        self.key(key)?;
        write_seq(&mut *self.out, items, item)
    }

    /// `key=<hex>`, omitted entirely when the identifier is invalid.
    pub fn identifier<const N: usize>(&mut self, key: &str, id: &Identifier<N>) -> fmt::Result {
        if !id.is_valid() {
            return Ok(());
        }
        self.key(key)?;
        write_identifier(&mut *self.out, id)
    }

    /// One token per attribute, in order.
    pub fn attributes(&mut self, attributes: &[KeyValue]) -> fmt::Result {
        for kv in attributes {
            self.value(&kv.key, &kv.value)?;
        }
        Ok(())
    }

    /// Terminate the line.
    pub fn finish(self) -> fmt::Result {
        self.out.write_char('\n')
    }
}
