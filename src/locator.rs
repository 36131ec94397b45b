use crate::config::LabelDictionary;
use crate::schema::{DerivedRow, LineItem, StatementLine};
use crate::utils::fold_label;
use log::{debug, warn};

/// Anything carrying a statement label.
pub trait Labeled {
    fn label(&self) -> &str;
}

impl Labeled for LineItem {
    fn label(&self) -> &str {
        &self.label
    }
}

impl Labeled for DerivedRow {
    fn label(&self) -> &str {
        &self.label
    }
}

/// Resolves canonical statement lines to row indices.
pub struct LineLocator {
    folded: LabelDictionary,
}

impl LineLocator {
    pub fn new(labels: &LabelDictionary) -> Self {
        let mut folded = labels.clone();
        for line in StatementLine::ALL {
            let aliases = folded.aliases_mut(line);
            *aliases = aliases
                .iter()
                .map(|a| fold_label(a))
                .filter(|a| !a.is_empty())
                .collect();
        }

        Self { folded }
    }

    pub fn is_match(&self, line: StatementLine, label: &str) -> bool {
        let folded = fold_label(label);
        self.folded
            .aliases(line)
            .iter()
            .any(|alias| folded.contains(alias.as_str()))
    }

    /// True when `label` matches `line` only through a "non" prefix,
    /// e.g. "Non-current assets" against the "current assets" alias.
    pub fn is_negated_match(&self, line: StatementLine, label: &str) -> bool {
        let folded = fold_label(label);
        let mut hits = self
            .folded
            .aliases(line)
            .iter()
            .flat_map(|alias| folded.match_indices(alias.as_str()))
            .map(|(idx, _)| &folded[..idx])
            .peekable();

        hits.peek().is_some()
            && hits.all(|prefix| {
                let prefix = prefix.trim_end_matches(['-', ' ']);
                prefix == "non" || prefix.ends_with(" non")
            })
    }

    /// Indices of every row matching `line`, in input order.
    pub fn find_all<T: Labeled>(&self, line: StatementLine, rows: &[T]) -> Vec<usize> {
        rows.iter()
            .enumerate()
            .filter(|(_, row)| self.is_match(line, row.label()))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Index of the first row matching `line`.
    pub fn find_first<T: Labeled>(&self, line: StatementLine, rows: &[T]) -> Option<usize> {
        let found = rows.iter().position(|row| self.is_match(line, row.label()));
        debug!("Lookup for '{}' resolved to {:?}", line, found);

        if let Some(idx) = found {
            if self.is_negated_match(line, rows[idx].label()) {
                warn!(
                    "'{}' resolved to '{}', which looks like its negation; add a more specific alias",
                    line,
                    rows[idx].label()
                );
            }
        }

        found
    }
}
