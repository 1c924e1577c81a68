use serde::{Deserialize, Serialize};

/// Method-name substrings that mark a call as reading a file
pub const READ_PATTERNS: &[&str] = &["read", "load"];

/// Method-name substrings that mark a call as writing a file
pub const WRITE_PATTERNS: &[&str] = &[
    "write",
    "save",
    "to_csv",
    "to_excel",
    "to_parquet",
    "to_hdf",
    "savefig",
];

/// Builtin whose calls are classified by their mode argument
pub const OPEN_FUNCTION: &str = "open";

/// Mode characters that make `open()` a write
pub const OPEN_WRITE_MODE_CHARS: &[char] = &['w', 'a'];

/// How a call touches the file named by its first argument
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Access {
    pub read: bool,
    pub write: bool,
}

/// Read and write indicator substrings, matched case-insensitively
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPatterns {
    #[serde(default)]
    pub read: Vec<String>,
    #[serde(default)]
    pub write: Vec<String>,
}

impl Default for AccessPatterns {
    fn default() -> Self {
        Self {
            read: READ_PATTERNS.iter().map(|p| p.to_string()).collect(),
            write: WRITE_PATTERNS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl AccessPatterns {
    /// Add read indicators, skipping ones already present
    pub fn extend_read<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::extend_list(&mut self.read, patterns);
    }

    /// Add write indicators, skipping ones already present
    pub fn extend_write<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::extend_list(&mut self.write, patterns);
    }

    fn extend_list<I, S>(list: &mut Vec<String>, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            let pattern = pattern.as_ref().to_lowercase();
            if !pattern.is_empty() && !list.contains(&pattern) {
                list.push(pattern);
            }
        }
    }

    /// Classify an attribute call by its method name
    pub fn classify_method(&self, method: &str) -> Access {
        let method = method.to_lowercase();
        Access {
            read: self.read.iter().any(|p| method.contains(p.as_str())),
            write: self.write.iter().any(|p| method.contains(p.as_str())),
        }
    }
}

/// Whether an `open()` mode string means writing. No mode means read.
pub fn is_write_mode(mode: Option<&str>) -> bool {
    mode.is_some_and(|m| m.contains(OPEN_WRITE_MODE_CHARS))
}
