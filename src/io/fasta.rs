//! Strict FASTA-style genome loader.
//!
//! A library file is a sequence of records, each a `>name` header followed by
//! one or more sequence lines. Loading is all-or-nothing: any malformed line
//! rejects the whole input.

use std::io::BufRead;
use std::path::Path;

use thiserror::Error;

use crate::genome::Genome;
use crate::util::dna;

/// Widest sequence line accepted.
pub const MAX_LINE_WIDTH: usize = 80;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: blank line")]
    BlankLine { line: usize },
    #[error("line {line}: header has no name")]
    EmptyName { line: usize },
    #[error("record '{name}' has no sequence lines")]
    MissingSequence { name: String },
    #[error("line {line}: sequence data before the first header")]
    SequenceBeforeHeader { line: usize },
    #[error("line {line}: sequence line is {width} characters wide (max {max})", max = MAX_LINE_WIDTH)]
    LineTooLong { line: usize, width: usize },
    #[error("line {line}: invalid base {base:?}")]
    InvalidBase { line: usize, base: char },
}

pub struct FastaReader<R: BufRead> {
    reader: R,
    buf: String,
    line_no: usize,
    done: bool,
    peek_header: Option<String>,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            line_no: 0,
            done: false,
            peek_header: None,
        }
    }

    pub fn next_record(&mut self) -> Result<Option<Genome>, LoadError> {
        let name = match self.peek_header.take() {
            Some(h) => h,
            None => {
                if self.done {
                    return Ok(None);
                }
                match self.next_line()? {
                    None => return Ok(None),
                    Some(line) => match line.strip_prefix('>') {
                        Some(rest) => self.header_name(rest)?,
                        None => return Err(LoadError::SequenceBeforeHeader { line: self.line_no }),
                    },
                }
            }
        };

        // Read sequence lines
        let mut bases: Vec<u8> = Vec::new();
        while let Some(line) = self.next_line()? {
            if let Some(rest) = line.strip_prefix('>') {
                self.peek_header = Some(self.header_name(rest)?);
                break;
            }
            self.push_sequence_line(&line, &mut bases)?;
        }

        if bases.is_empty() {
            return Err(LoadError::MissingSequence { name });
        }
        Ok(Some(Genome::new(name, bases)))
    }

    /// Next line without its terminator; `None` at EOF. Blank lines are an error.
    fn next_line(&mut self) -> Result<Option<String>, LoadError> {
        if self.done {
            return Ok(None);
        }
        self.buf.clear();
        let n = self.reader.read_line(&mut self.buf)?;
        if n == 0 {
            self.done = true;
            return Ok(None);
        }
        self.line_no += 1;

        let mut line = self.buf.as_str();
        line = line.strip_suffix('\n').unwrap_or(line);
        line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            return Err(LoadError::BlankLine { line: self.line_no });
        }
        Ok(Some(line.to_string()))
    }

    fn header_name(&self, rest: &str) -> Result<String, LoadError> {
        if rest.is_empty() {
            return Err(LoadError::EmptyName { line: self.line_no });
        }
        Ok(rest.to_string())
    }

    fn push_sequence_line(&self, line: &str, bases: &mut Vec<u8>) -> Result<(), LoadError> {
        if line.len() > MAX_LINE_WIDTH {
            return Err(LoadError::LineTooLong { line: self.line_no, width: line.len() });
        }
        let norm = dna::normalize_seq(line.as_bytes()).map_err(|(_, b)| LoadError::InvalidBase {
            line: self.line_no,
            base: char::from(b),
        })?;
        bases.extend_from_slice(&norm);
        Ok(())
    }
}

/// Load every record from `reader`, failing on the first malformed line.
pub fn load_genomes<R: BufRead>(reader: R) -> Result<Vec<Genome>, LoadError> {
    let mut r = FastaReader::new(reader);
    let mut genomes = Vec::new();
    while let Some(g) = r.next_record()? {
        genomes.push(g);
    }
    Ok(genomes)
}

pub fn load_genomes_from_path(path: impl AsRef<Path>) -> Result<Vec<Genome>, LoadError> {
    let fh = std::fs::File::open(path)?;
    load_genomes(std::io::BufReader::new(fh))
}
