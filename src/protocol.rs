use crate::engine::index_of;
use std::error::Error;
use std::fmt;
use std::io::{self, BufRead};
use std::ops::Deref;

pub const NEW_MATCH: &str = "+nuova_partita";
pub const INSERT_BEGIN: &str = "+inserisci_inizio";
pub const INSERT_END: &str = "+inserisci_fine";
pub const PRINT_FILTERED: &str = "+stampa_filtrate";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    NewMatch,
    InsertBegin,
    InsertEnd,
    PrintFiltered,
}

/// A validated word: session word length, every byte in the alphabet.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Word(Box<[u8]>);

impl Word {
    pub fn into_bytes(self) -> Box<[u8]> {
        self.0
    }
}

impl Deref for Word {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Safe because the alphabet is a subset of ASCII.
        f.write_str(std::str::from_utf8(&self.0).unwrap())
    }
}

/// Parses a line into a word of exactly `word_len` alphabet characters.
pub fn parse_word(line: &str, word_len: usize) -> Option<Word> {
    let bytes = line.as_bytes();
    if bytes.len() != word_len {
        return None;
    }
    if bytes.iter().all(|&b| index_of(b).is_some()) {
        Some(Word(bytes.into()))
    } else {
        None
    }
}

pub fn parse_command(line: &str) -> Option<Command> {
    match line {
        NEW_MATCH => Some(Command::NewMatch),
        INSERT_BEGIN => Some(Command::InsertBegin),
        INSERT_END => Some(Command::InsertEnd),
        PRINT_FILTERED => Some(Command::PrintFiltered),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ProtocolError {
    Io(io::Error),
    UnexpectedEof { expected: &'static str },
    BadWordSize { line: u64, found: String },
    BadGuessCount { line: u64, found: String },
    BadWord { line: u64, found: String },
    BadCommand { line: u64, found: String },
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Io(e) => write!(f, "input failed: {e}"),
            ProtocolError::UnexpectedEof { expected } => {
                write!(f, "input ended early: expected {expected}")
            }
            ProtocolError::BadWordSize { line, found } => {
                write!(f, "line {line}: word size must be 1-255, got '{found}'")
            }
            ProtocolError::BadGuessCount { line, found } => {
                write!(f, "line {line}: guess count must be a positive integer, got '{found}'")
            }
            ProtocolError::BadWord { line, found } => {
                write!(f, "line {line}: '{found}' is not a word of the session length")
            }
            ProtocolError::BadCommand { line, found } => {
                write!(f, "line {line}: unexpected command '{found}'")
            }
        }
    }
}

impl Error for ProtocolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ProtocolError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ProtocolError {
    fn from(e: io::Error) -> Self {
        ProtocolError::Io(e)
    }
}

/// Line-oriented reader over the session input, tracking the current line
/// number for error reporting.
pub struct LineReader<R> {
    inner: R,
    line: u64,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        LineReader { inner, line: 0 }
    }

    /// 1-based number of the last line handed out.
    pub fn line_number(&self) -> u64 {
        self.line
    }

    /// Next line without its terminator; `None` at end of input.
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = String::new();
        let n = self.inner.read_line(&mut buf)?;
        if n == 0 {
            return Ok(None);
        }
        self.line += 1;
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        Ok(Some(buf))
    }

    pub fn bad_word(&self, found: &str) -> ProtocolError {
        ProtocolError::BadWord {
            line: self.line,
            found: found.to_string(),
        }
    }

    pub fn bad_command(&self, found: &str) -> ProtocolError {
        ProtocolError::BadCommand {
            line: self.line,
            found: found.to_string(),
        }
    }
}
