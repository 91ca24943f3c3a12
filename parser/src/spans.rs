//! Types related to spanning parsed code.

use core::ops::Range;

use crate::Error;

/// Code span.
pub type InputSpan<'a> = nom_locate::LocatedSpan<&'a str, ()>;
/// Parsing outcome generalized by the type returned on success.
pub type NomResult<'a, T> = nom::IResult<InputSpan<'a>, T, Error>;

/// Location of a code fragment within the parsed source.
///
/// Unlike [`InputSpan`], a location does not borrow the source, so errors carrying it
/// may outlive the parsed string. This is what allows [`Formula`](crate::Formula)s and parsing
/// errors to be stored independently of the user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    offset: usize,
    line: u32,
    column: usize,
    len: usize,
}

impl Location {
    pub(crate) fn new(span: &InputSpan<'_>) -> Self {
        Self {
            offset: span.location_offset(),
            line: span.location_line(),
            column: span.get_column(),
            len: span.fragment().len(),
        }
    }

    /// The offset represents the position of the fragment relatively to the input of the parser.
    /// It starts at offset 0.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The line number of the fragment relatively to the input of the parser. It starts at line 1.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// The column of the fragment start. It starts at column 1.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Length of the fragment in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks whether the fragment is empty (e.g., an error at the end of input).
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte range of the fragment in the parsed source.
    pub fn range(&self) -> Range<usize> {
        self.offset..(self.offset + self.len)
    }
}
