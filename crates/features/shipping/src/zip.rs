//! ZIP / postal code patterns of rate records.
//!
//! A pattern is a comma separated list of alternatives, compared case-insensitively after
//! trimming:
//!
//! | Alternative   | Matches                                      |
//! |---------------|----------------------------------------------|
//! | `11111`       | exactly `11111`                              |
//! | `S4? ???`     | `?` stands for exactly one character         |
//! | `S4*`         | anything starting with `S4`                  |
//! | `10000:30000` | numeric codes in the inclusive range         |

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Alternative {
    /// Character mask; `None` is a `?` slot. Open masks accept any tail.
    Mask { slots: Vec<Option<char>>, open: bool },
    Range { from: u64, to: u64 },
}

impl Alternative {
    fn parse(raw: &str) -> Self {
        if let Some((from, to)) = raw.split_once(':')
            && let (Ok(from), Ok(to)) = (from.trim().parse(), to.trim().parse())
        {
            return Self::Range { from, to };
        }

        let (body, open) = raw.strip_suffix('*').map_or((raw, false), |body| (body, true));
        let slots = body.chars().map(|c| (c != '?').then_some(c)).collect();
        Self::Mask { slots, open }
    }

    fn matches(&self, zip: &str) -> bool {
        match self {
            Self::Range { from, to } => zip.parse::<u64>().is_ok_and(|code| (*from..=*to).contains(&code)),
            Self::Mask { slots, open } => {
                let chars: Vec<char> = zip.chars().collect();
                let fits = if *open { chars.len() >= slots.len() } else { chars.len() == slots.len() };
                fits && slots.iter().zip(&chars).all(|(slot, c)| slot.is_none_or(|s| s == *c))
            },
        }
    }
}

/// A compiled ZIP pattern. The empty pattern has no alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ZipPattern {
    source: String,
    alternatives: Vec<Alternative>,
}

impl ZipPattern {
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let source = normalize(pattern);
        let alternatives = source
            .split(',')
            .map(str::trim)
            .filter(|alt| !alt.is_empty())
            .map(Alternative::parse)
            .collect();
        Self { source, alternatives }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    /// Whether `zip` satisfies any alternative. An empty pattern only matches an empty code.
    #[must_use]
    pub fn matches(&self, zip: &str) -> bool {
        let zip = normalize(zip);
        if self.is_empty() {
            return zip.is_empty();
        }
        !zip.is_empty() && self.alternatives.iter().any(|alt| alt.matches(&zip))
    }
}

impl FromStr for ZipPattern {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl fmt::Display for ZipPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn normalize(raw: &str) -> String {
    raw.trim().to_uppercase()
}
