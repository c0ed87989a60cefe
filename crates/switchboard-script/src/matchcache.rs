//! Regex match cache
//!
//! Expect statements match against the entire inbound buffer; later
//! `setplugstate`/`setresult` statements refer back to the capture
//! groups of the most recent successful match. The cache retains a
//! copy of the matched text and the capture spans so those
//! back-references stay valid after the buffer has been consumed.
//!
//! Matching operates on raw bytes (`regex::bytes`), so embedded NUL
//! bytes are ordinary matchable content. The C lineage of this design
//! substituted NUL with a sentinel before handing the buffer to libc
//! regex; a byte-native engine makes that transcode unnecessary.

use regex::bytes::Regex;

/// Highest capture position a script may reference
pub const MAX_MATCH_POS: usize = 20;

/// Cached result of the most recent expect match
#[derive(Debug, Default)]
pub struct MatchCache {
    haystack: Vec<u8>,
    /// Byte spans of capture groups 0..=n within `haystack`
    spans: Vec<Option<(usize, usize)>>,
    matched: bool,
}

impl MatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the previous match; called before every expect attempt
    pub fn recycle(&mut self) {
        self.haystack.clear();
        self.spans.clear();
        self.matched = false;
    }

    /// Run `re` against `buf` (the entire currently-buffered inbound
    /// bytes). On success, cache the capture spans and return the byte
    /// offset one past the end of the overall match: the caller must
    /// consume exactly that many bytes from the head of its buffer.
    /// On failure return `None` and leave the buffer untouched.
    pub fn exec(&mut self, re: &Regex, buf: &[u8]) -> Option<usize> {
        let caps = re.captures(buf)?;
        let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
        self.haystack = buf.to_vec();
        self.spans = (0..caps.len())
            .map(|i| caps.get(i).map(|m| (m.start(), m.end())))
            .collect();
        self.matched = true;
        Some(end)
    }

    /// True if the cache holds a successful match
    pub fn matched(&self) -> bool {
        self.matched
    }

    /// The full text of the overall match
    pub fn overall(&self) -> Option<&[u8]> {
        self.sub_bytes(0)
    }

    /// Capture group `pos` of the most recent match
    pub fn sub_bytes(&self, pos: usize) -> Option<&[u8]> {
        if !self.matched {
            return None;
        }
        let (start, end) = (*self.spans.get(pos)?)?;
        Some(&self.haystack[start..end])
    }

    /// Capture group `pos` as a lossily-decoded string
    pub fn sub_string(&self, pos: usize) -> Option<String> {
        self.sub_bytes(pos)
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_match_returns_none() {
        let mut cache = MatchCache::new();
        let re = Regex::new("OK\r\n").unwrap();
        assert_eq!(cache.exec(&re, b"partial"), None);
        assert!(!cache.matched());
        assert_eq!(cache.sub_bytes(0), None);
    }

    #[test]
    fn test_match_end_offset() {
        // consumption runs from the buffer head through the end of the
        // match, even when the match does not start at offset zero
        let mut cache = MatchCache::new();
        let re = Regex::new("OK\n").unwrap();
        let end = cache.exec(&re, b"noise OK\ntrailing").unwrap();
        assert_eq!(end, 9);
        assert_eq!(cache.overall().unwrap(), b"OK\n");
    }

    #[test]
    fn test_capture_extraction() {
        let mut cache = MatchCache::new();
        let re = Regex::new(r"plug (\w+): (ON|OFF)\r\n").unwrap();
        assert!(cache.exec(&re, b"plug node42: ON\r\n").is_some());
        assert_eq!(cache.sub_string(1).as_deref(), Some("node42"));
        assert_eq!(cache.sub_string(2).as_deref(), Some("ON"));
        assert_eq!(cache.sub_bytes(3), None);
    }

    #[test]
    fn test_unparticipating_group() {
        let mut cache = MatchCache::new();
        let re = Regex::new(r"a(x)?b").unwrap();
        assert!(cache.exec(&re, b"ab").is_some());
        assert_eq!(cache.sub_bytes(1), None);
    }

    #[test]
    fn test_recycle_clears_previous_match() {
        let mut cache = MatchCache::new();
        let re = Regex::new("ready").unwrap();
        assert!(cache.exec(&re, b"ready").is_some());
        cache.recycle();
        assert!(!cache.matched());
        assert_eq!(cache.sub_bytes(0), None);
    }

    #[test]
    fn test_embedded_nul_is_matchable() {
        let mut cache = MatchCache::new();
        let re = Regex::new(r"(?-u)a\x00b").unwrap();
        let end = cache.exec(&re, b"a\x00b rest").unwrap();
        assert_eq!(end, 3);
    }
}
