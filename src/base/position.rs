/// Position tracking for tokens and edits
///
/// Rows and columns are 0-indexed; columns count bytes, so a point can be
/// produced without decoding the source.
use text_size::TextSize;

/// A position in source code (0-indexed row, byte column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Point {
    pub row: u32,
    pub column: u32,
}

impl Point {
    pub fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Advance this point over `bytes`.
    pub fn advance(self, bytes: &[u8]) -> Self {
        let mut point = self;
        let mut iter = bytes.iter().peekable();
        while let Some(&b) = iter.next() {
            match b {
                b'\n' => {
                    point.row += 1;
                    point.column = 0;
                }
                b'\r' => {
                    // "\r\n" is a single line break
                    if iter.peek() == Some(&&b'\n') {
                        iter.next();
                    }
                    point.row += 1;
                    point.column = 0;
                }
                _ => point.column += 1,
            }
        }
        point
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.row + 1, self.column + 1)
    }
}

/// Maps byte offsets to [`Point`]s
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the first byte of every line
    line_starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &[u8]) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        let mut i = 0;
        while i < text.len() {
            match text[i] {
                b'\n' => line_starts.push(TextSize::new(i as u32 + 1)),
                b'\r' => {
                    if text.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    line_starts.push(TextSize::new(i as u32 + 1));
                }
                _ => {}
            }
            i += 1;
        }
        Self {
            line_starts,
            len: TextSize::new(text.len() as u32),
        }
    }

    /// Number of lines (a trailing line terminator opens an empty last line)
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a byte offset to a point; offsets past the end clamp to it.
    pub fn point(&self, offset: TextSize) -> Point {
        let offset = offset.min(self.len);
        let row = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let column = offset - self.line_starts[row];
        Point::new(row as u32, column.into())
    }

    /// Byte offset of the start of `row`, if the row exists
    pub fn line_start(&self, row: u32) -> Option<TextSize> {
        self.line_starts.get(row as usize).copied()
    }
}
