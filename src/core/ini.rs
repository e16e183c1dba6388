use once_cell::sync::Lazy;
use regex::Regex;

static SETTING_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([^\s=;#\[][^=]*?)\s*=(.*)$").expect("valid regex"));

#[derive(Clone, Debug, PartialEq)]
struct Line {
    text: String,
    eol: &'static str,
}

/// A settings file held as lines, so unknown content survives a rewrite.
/// Only `key=value` lines are interpreted; sections and comments pass through.
#[derive(Clone, Debug, PartialEq)]
pub struct IniDocument {
    lines: Vec<Line>,
    newline: &'static str,
}

/// Splits a line into trimmed key and value, if it is a setting.
pub fn parse_setting(line: &str) -> Option<(&str, &str)> {
    SETTING_LINE.captures(line).and_then(|caps| {
        let key = caps.get(1)?.as_str();
        let value = caps.get(2)?.as_str().trim();
        Some((key, value))
    })
}

impl IniDocument {
    pub fn parse(content: &str) -> Self {
        let newline = if content.contains("\r\n") { "\r\n" } else { "\n" };

        let lines = content
            .split_inclusive('\n')
            .map(|raw| {
                if let Some(text) = raw.strip_suffix("\r\n") {
                    Line { text: text.to_string(), eol: "\r\n" }
                } else if let Some(text) = raw.strip_suffix('\n') {
                    Line { text: text.to_string(), eol: "\n" }
                } else {
                    Line { text: raw.to_string(), eol: "" }
                }
            })
            .collect();

        Self { lines, newline }
    }

    pub fn render(&self) -> String {
        self.lines
            .iter()
            .map(|l| format!("{}{}", l.text, l.eol))
            .collect()
    }

    /// Settings in file order, including duplicates.
    pub fn settings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.lines.iter().filter_map(|l| parse_setting(&l.text))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.settings().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    fn key_at(&self, idx: usize) -> Option<&str> {
        parse_setting(&self.lines[idx].text).map(|(k, _)| k)
    }

    fn positions(&self, key: &str) -> Vec<usize> {
        (0..self.lines.len())
            .filter(|&i| self.key_at(i) == Some(key))
            .collect()
    }

    /// Rewrites the first occurrence of `key` in place and drops any later
    /// duplicates. Returns false, changing nothing, if the key is absent.
    pub fn set_existing(&mut self, key: &str, value: &str) -> bool {
        let positions = self.positions(key);
        let Some(&first) = positions.first() else {
            return false;
        };

        self.lines[first].text = format!("{key}={value}");
        for &idx in positions[1..].iter().rev() {
            self.lines.remove(idx);
        }
        true
    }

    /// Deletes every line holding `key`. Returns how many were removed.
    pub fn remove(&mut self, key: &str) -> usize {
        let before = self.lines.len();
        self.lines.retain(|l| parse_setting(&l.text).map(|(k, _)| k) != Some(key));
        before - self.lines.len()
    }

    /// Index of the last setting line whose key starts with `prefix`.
    pub fn last_index_with_prefix(&self, prefix: &str) -> Option<usize> {
        (0..self.lines.len())
            .rev()
            .find(|&i| self.key_at(i).is_some_and(|k| k.starts_with(prefix)))
    }

    /// Index of the first setting line for `key`.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        (0..self.lines.len()).find(|&i| self.key_at(i) == Some(key))
    }

    /// Inserts `key=value` right after line `idx`.
    pub fn insert_after(&mut self, idx: usize, key: &str, value: &str) {
        // The anchor may be the unterminated last line.
        if self.lines[idx].eol.is_empty() {
            self.lines[idx].eol = self.newline;
        }
        self.lines.insert(
            idx + 1,
            Line {
                text: format!("{key}={value}"),
                eol: self.newline,
            },
        );
    }

    pub fn append(&mut self, key: &str, value: &str) {
        match self.lines.len() {
            0 => self.lines.push(Line {
                text: format!("{key}={value}"),
                eol: self.newline,
            }),
            n => self.insert_after(n - 1, key, value),
        }
    }
}
