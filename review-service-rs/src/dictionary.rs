//! Dictionary Resource
//!
//! The spell-check stage queries a process-wide dictionary built from a
//! frequency-ordered word list fetched over HTTP. The list order defines
//! suggestion priority: when several candidate corrections are known words,
//! the one appearing earliest in the list wins, which keeps suggestions
//! deterministic for a fixed list.
//!
//! Construction happens at most once per process: `DictionaryHandle` wraps a
//! `tokio::sync::OnceCell` so concurrent first-time requests await the same
//! in-flight fetch instead of duplicating it. The handle is injected through
//! application state rather than read from a global, so pipeline components
//! stay testable with preloaded dictionaries.

use std::collections::HashMap;
use std::sync::Arc;

use content_sdk::error::ServiceError;
use log::{debug, info};
use tokio::sync::OnceCell;

/// Default word list: English, ordered most-frequent first.
pub const DEFAULT_WORD_LIST_URL: &str =
    "https://raw.githubusercontent.com/hermitdave/FrequencyWords/master/content/2018/en/en_50k.txt";

// Candidate generation explores the word-list alphabet plus the two
// intra-word marks the tokenizer admits.
const EDIT_ALPHABET: &[char] = &[
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r',
    's', 't', 'u', 'v', 'w', 'x', 'y', 'z', '\'', '-',
];

// A distance-2 pass on long words generates candidate sets in the millions;
// beyond this length only distance-1 suggestions are attempted.
const MAX_DISTANCE_2_LEN: usize = 12;

/// Immutable word-correctness and suggestion store
#[derive(Debug, Default)]
pub struct Dictionary {
    /// Known words mapped to their rank in the source list (0 = most frequent)
    ranks: HashMap<String, usize>,
}

impl Dictionary {
    /// Build a dictionary from word-list text.
    ///
    /// Each line contributes its first whitespace-separated field; later
    /// duplicates keep their original (better) rank.
    pub fn from_word_list(text: &str) -> Self {
        let mut ranks = HashMap::new();

        for line in text.lines() {
            if let Some(word) = line.split_whitespace().next() {
                let word = word.to_lowercase();
                let next_rank = ranks.len();
                ranks.entry(word).or_insert(next_rank);
            }
        }

        Self { ranks }
    }

    /// Number of known words
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Whether the dictionary knows no words
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Whether a word is spelled correctly (case-insensitive)
    pub fn check(&self, word: &str) -> bool {
        self.ranks.contains_key(&word.to_lowercase())
    }

    /// The first suggestion for a misspelled word, or None when no known
    /// word lies within edit distance 2.
    pub fn suggest(&self, word: &str) -> Option<String> {
        let lower = word.to_lowercase();

        let first = edits1(&lower);
        if let Some(best) = self.best_ranked(first.iter()) {
            return Some(best);
        }

        if lower.chars().count() > MAX_DISTANCE_2_LEN {
            return None;
        }

        let mut second = Vec::new();
        for candidate in &first {
            second.extend(edits1(candidate));
        }
        self.best_ranked(second.iter())
    }

    fn best_ranked<'a>(&self, candidates: impl Iterator<Item = &'a String>) -> Option<String> {
        let mut best: Option<(usize, &str)> = None;

        for candidate in candidates {
            if let Some(&rank) = self.ranks.get(candidate.as_str()) {
                let better = match best {
                    Some((best_rank, _)) => rank < best_rank,
                    None => true,
                };
                if better {
                    best = Some((rank, candidate.as_str()));
                }
            }
        }

        best.map(|(_, word)| word.to_string())
    }
}

/// All strings one edit (delete, transpose, replace, insert) away from `word`.
fn edits1(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut edits = Vec::new();

    // Deletes
    for i in 0..chars.len() {
        let mut candidate = chars.clone();
        candidate.remove(i);
        edits.push(candidate.iter().collect());
    }

    // Transposes
    for i in 0..chars.len().saturating_sub(1) {
        let mut candidate = chars.clone();
        candidate.swap(i, i + 1);
        edits.push(candidate.iter().collect());
    }

    // Replaces
    for i in 0..chars.len() {
        for &letter in EDIT_ALPHABET {
            if letter != chars[i] {
                let mut candidate = chars.clone();
                candidate[i] = letter;
                edits.push(candidate.iter().collect());
            }
        }
    }

    // Inserts
    for i in 0..=chars.len() {
        for &letter in EDIT_ALPHABET {
            let mut candidate = chars.clone();
            candidate.insert(i, letter);
            edits.push(candidate.iter().collect());
        }
    }

    edits
}

/// Fetch and build the dictionary from a word-list provider
pub async fn fetch_dictionary(url: &str) -> Result<Dictionary, ServiceError> {
    debug!("Fetching word list from {}", url);

    let client = reqwest::Client::builder().build().map_err(|e| {
        ServiceError::configuration(format!("Failed to build word-list HTTP client: {}", e))
    })?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ServiceError::from_transport("word-list", e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ServiceError::service(format!(
            "Word-list provider returned HTTP {}",
            status.as_u16()
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| ServiceError::parsing(format!("Failed to read word list: {}", e)))?;

    let dictionary = Dictionary::from_word_list(&body);
    if dictionary.is_empty() {
        return Err(ServiceError::parsing("Word list contained no words"));
    }

    info!("Dictionary ready: {} words", dictionary.len());
    Ok(dictionary)
}

/// Process-wide lazily-initialized dictionary.
///
/// Failures are not memoized: a failed fetch leaves the cell empty so a
/// later request retries construction.
#[derive(Debug)]
pub struct DictionaryHandle {
    url: String,
    cell: OnceCell<Arc<Dictionary>>,
}

impl DictionaryHandle {
    /// Create a handle that will fetch from `url` on first use
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            cell: OnceCell::new(),
        }
    }

    /// Create an already-initialized handle (for tests and tooling)
    pub fn preloaded(dictionary: Dictionary) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(Arc::new(dictionary));
        Self {
            url: String::new(),
            cell,
        }
    }

    /// Get the shared dictionary, constructing it on first call
    pub async fn get(&self) -> Result<Arc<Dictionary>, ServiceError> {
        self.cell
            .get_or_try_init(|| async {
                let dictionary = fetch_dictionary(&self.url).await?;
                Ok(Arc::new(dictionary))
            })
            .await
            .cloned()
    }
}
