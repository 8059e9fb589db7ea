//! Lazy splitting of a response into speakable chunks.

use nova_types::speech::SpeechChunk;

/// Marks that end a chunk. The mark stays attached to its chunk.
pub const CHUNK_TERMINATORS: [char; 4] = ['.', '?', '!', ','];

/// Iterator over the speech chunks of a text. See [`chunks`].
#[derive(Debug, Clone)]
pub struct SpeechChunks<'a> {
    rest: &'a str,
}

/// Split `text` at `. ? ! ,`, keeping each mark on the chunk it ends.
///
/// A trailing remainder without a mark is its own final chunk and
/// whitespace-only chunks are skipped. Leading whitespace is preserved.
pub fn chunks(text: &str) -> SpeechChunks<'_> {
    SpeechChunks { rest: text }
}

impl Iterator for SpeechChunks<'_> {
    type Item = SpeechChunk;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.rest.is_empty() {
            let (piece, terminator) = match self.rest.char_indices().find(|(_, c)| CHUNK_TERMINATORS.contains(c)) {
                Some((idx, mark)) => {
                    let end = idx + mark.len_utf8();
                    let piece = &self.rest[..end];
                    self.rest = &self.rest[end..];
                    (piece, Some(mark))
                }
                None => {
                    let piece = self.rest;
                    self.rest = "";
                    (piece, None)
                }
            };

            if piece.trim().is_empty() {
                continue;
            }
            return Some(SpeechChunk {
                text: piece.to_string(),
                terminator,
            });
        }
        None
    }
}
