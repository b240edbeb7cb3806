//! Splitting assembled documents into smaller chunks
//!
//! Chunk sizes are measured in characters, not bytes, so multi-byte text is
//! never cut inside a code point.

use crate::config::{ChunkStrategy, ChunkerConfig};
use crate::error::ExtractorError;
use quarry_domain::TextSplitter;

const PARAGRAPH_BREAK: &str = "\n\n";

/// Splits text according to a [`ChunkStrategy`]
#[derive(Debug, Clone)]
pub struct TextChunker {
    strategy: ChunkStrategy,
    max_chars: usize,
}

impl TextChunker {
    /// Create a chunker; a zero size is raised to one character
    pub fn new(strategy: ChunkStrategy, max_chars: usize) -> Self {
        Self {
            strategy,
            max_chars: max_chars.max(1),
        }
    }

    /// Create a chunker from a validated configuration
    pub fn from_config(config: &ChunkerConfig) -> Result<Self, ExtractorError> {
        config.validate()?;
        Ok(Self::new(config.strategy, config.max_chunk_size))
    }

    /// Split `text` into chunks of at most the configured size
    pub fn chunk(&self, text: &str) -> Vec<String> {
        if char_len(text) <= self.max_chars {
            return vec![text.to_string()];
        }

        match self.strategy {
            ChunkStrategy::ByParagraph => self.pack(text.split(PARAGRAPH_BREAK)),
            ChunkStrategy::BySection => {
                let sections = sections(text);
                if sections.len() > 1 {
                    self.pack(sections.iter().map(String::as_str))
                } else {
                    self.pack(text.split(PARAGRAPH_BREAK))
                }
            }
            ChunkStrategy::ByTokenCount => self.pack_sentences(text),
        }
    }

    /// Greedily join pieces with a paragraph break while they fit
    fn pack<'t>(&self, pieces: impl Iterator<Item = &'t str>) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();

        for piece in pieces.map(str::trim).filter(|p| !p.is_empty()) {
            let needed = if current.is_empty() {
                char_len(piece)
            } else {
                char_len(&current) + PARAGRAPH_BREAK.len() + char_len(piece)
            };

            if needed <= self.max_chars {
                if !current.is_empty() {
                    current.push_str(PARAGRAPH_BREAK);
                }
                current.push_str(piece);
                continue;
            }

            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            if char_len(piece) > self.max_chars {
                chunks.extend(hard_split(piece, self.max_chars));
            } else {
                current.push_str(piece);
            }
        }

        if !current.is_empty() {
            chunks.push(current);
        }
        chunks
    }

    /// Join sentences with a space while they fit
    fn pack_sentences(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();

        for sentence in sentences(text) {
            let needed = if current.is_empty() {
                char_len(sentence)
            } else {
                char_len(&current) + 1 + char_len(sentence)
            };

            if needed <= self.max_chars {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(sentence);
                continue;
            }

            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            if char_len(sentence) > self.max_chars {
                chunks.extend(hard_split(sentence, self.max_chars));
            } else {
                current.push_str(sentence);
            }
        }

        if !current.is_empty() {
            chunks.push(current);
        }
        chunks
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        let config = ChunkerConfig::default();
        Self::new(config.strategy, config.max_chunk_size)
    }
}

impl TextSplitter for TextChunker {
    fn split_text(&self, text: &str) -> Vec<String> {
        self.chunk(text)
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Lines starting a markdown header (`# Title`) or a numbered section (`2. Title`)
fn is_section_header(line: &str) -> bool {
    let line = line.trim_start();
    if line.starts_with('#') {
        return true;
    }
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && line[digits..].starts_with('.')
}

fn sections(text: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if is_section_header(line) && !current.trim().is_empty() {
            sections.push(current.trim().to_string());
            current.clear();
        }
        current.push_str(line);
        current.push('\n');
    }
    if !current.trim().is_empty() {
        sections.push(current.trim().to_string());
    }
    sections
}

/// Sentences with their terminating punctuation kept
fn sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Cut `text` into pieces of `max_chars` characters
fn hard_split(text: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_chars)
        .map(|piece| piece.iter().collect())
        .collect()
}
