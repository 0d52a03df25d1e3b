//! Word-boundary-preserving text chunker.
//!
//! The size check counts only the characters of the words already in the
//! running chunk, not the separators between them, so actual chunk lengths can
//! drift slightly above the limit. That quirk is kept on purpose so chunk
//! boundaries stay stable across versions.

/// Split `text` into chunks of at most `chunk_size` word characters.
///
/// Words are never split across chunks; each chunk is its words joined by
/// single spaces. The word that overflows the limit starts the next chunk, so
/// a single word longer than the limit still forms its own chunk, untruncated.
/// Empty input yields no chunks.
pub fn split_into_chunks(text: &str, chunk_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    // Sum of word lengths only; separators are not counted.
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if !current.is_empty() && current_len + word_len > chunk_size {
            chunks.push(current.join(" "));
            current.clear();
            current_len = 0;
        }
        current_len += word_len;
        current.push(word);
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    chunks
}
