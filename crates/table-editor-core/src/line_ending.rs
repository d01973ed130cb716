//! Line terminators of a host document.
//!
//! Rows written back by the engine carry no terminator; the host joins them with the document's
//! own line ending so a CRLF file stays CRLF after a table is reformatted.

/// Newline sequence used between lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// `"\n"`
    #[default]
    Lf,
    /// `"\r\n"`
    Crlf,
}

impl LineEnding {
    /// Line ending of the first line break in `text`, or [`LineEnding::Lf`] if there is none.
    pub fn detect(text: &str) -> Self {
        match text.find('\n') {
            Some(index) if text[..index].ends_with('\r') => Self::Crlf,
            _ => Self::Lf,
        }
    }

    /// The newline sequence.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }

    /// Join `lines` with this line ending.
    pub fn join<S: AsRef<str>>(self, lines: &[S]) -> String {
        let mut out = String::new();
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                out.push_str(self.as_str());
            }
            out.push_str(line.as_ref());
        }
        out
    }
}
