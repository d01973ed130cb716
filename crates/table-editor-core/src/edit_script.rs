//! Line-level edit scripts
//!
//! Computes the smallest set of whole-line replace/insert/delete operations turning one line
//! sequence into another, so hosts can update a table without replacing the whole range
//! (which would reset folds, markers and undo granularity on unchanged lines).
//!
//! Row indices in a [`LineEdit`] refer to the **old** line sequence. [`apply_edit_script`] keeps a
//! running shift so each operation lands on the right document row after earlier inserts and
//! deletes.

use tracing::trace;

use crate::error::EditorError;
use crate::text_editor::TextEditor;

/// A single line-level edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEdit {
    /// Replace `lines.len()` old lines starting at `row` with `lines`.
    Replace {
        /// First replaced old row.
        row: usize,
        /// Replacement lines, one per replaced row.
        lines: Vec<String>,
    },
    /// Insert `line` before old row `row`.
    Insert {
        /// Old row the line is inserted before (`old.len()` appends).
        row: usize,
        /// Inserted line.
        line: String,
    },
    /// Delete old row `row`.
    Delete {
        /// Deleted old row.
        row: usize,
    },
}

/// An ordered list of [`LineEdit`]s.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditScript {
    edits: Vec<LineEdit>,
    distance: usize,
}

impl EditScript {
    /// The edits, ordered by old row.
    pub fn edits(&self) -> &[LineEdit] {
        &self.edits
    }

    /// Number of single-line operations (a replace run of `k` lines counts `k`).
    pub fn distance(&self) -> usize {
        self.distance
    }

    /// Returns `true` if the script changes nothing.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Replay the script against an in-memory copy of the old lines.
    pub fn apply_to<S: AsRef<str>>(&self, old: &[S]) -> Vec<String> {
        let mut lines: Vec<String> = old.iter().map(|line| line.as_ref().to_string()).collect();
        let mut shift = 0isize;
        for edit in &self.edits {
            match edit {
                LineEdit::Replace { row, lines: new } => {
                    let at = shifted(*row, shift);
                    lines.splice(at..at + new.len(), new.iter().cloned());
                }
                LineEdit::Insert { row, line } => {
                    lines.insert(shifted(*row, shift), line.clone());
                    shift += 1;
                }
                LineEdit::Delete { row } => {
                    lines.remove(shifted(*row, shift));
                    shift -= 1;
                }
            }
        }
        lines
    }
}

fn shifted(row: usize, shift: isize) -> usize {
    row.saturating_add_signed(shift)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Keep,
    Replace,
    Delete,
    Insert,
}

/// Compute a minimal edit script, or `None` if more than `max_distance` operations are needed.
///
/// Uses a banded edit-distance table (only cells with `|i - j| <= max_distance` are computed).
/// When several alignments have the same cost, diagonal steps win, which yields contiguous
/// replace runs instead of interleaved insert/delete pairs.
pub fn shortest_edit_script<S, T>(old: &[S], new: &[T], max_distance: usize) -> Option<EditScript>
where
    S: AsRef<str>,
    T: AsRef<str>,
{
    let n = old.len();
    let m = new.len();
    if n.abs_diff(m) > max_distance {
        return None;
    }

    let band = max_distance.min(n.max(m));
    let width = 2 * band + 1;
    let index = |i: usize, j: usize| -> Option<usize> {
        let k = (j + band).checked_sub(i)?;
        (k < width).then_some(i * width + k)
    };

    let mut dist = vec![usize::MAX; (n + 1) * width];
    let get = |dist: &[usize], i: usize, j: usize| index(i, j).map_or(usize::MAX, |idx| dist[idx]);
    let same = |i: usize, j: usize| old[i].as_ref() == new[j].as_ref();

    for i in 0..=n {
        for j in i.saturating_sub(band)..=(i + band).min(m) {
            let value = if i == 0 && j == 0 {
                0
            } else {
                let diagonal = if i > 0 && j > 0 {
                    get(&dist, i - 1, j - 1).saturating_add(usize::from(!same(i - 1, j - 1)))
                } else {
                    usize::MAX
                };
                let delete = if i > 0 {
                    get(&dist, i - 1, j).saturating_add(1)
                } else {
                    usize::MAX
                };
                let insert = if j > 0 {
                    get(&dist, i, j - 1).saturating_add(1)
                } else {
                    usize::MAX
                };
                diagonal.min(delete).min(insert)
            };
            if let Some(idx) = index(i, j) {
                dist[idx] = value;
            }
        }
    }

    let distance = get(&dist, n, m);
    if distance > max_distance {
        return None;
    }

    // Walk back from (n, m), preferring diagonal steps on ties.
    let mut steps = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (n, m);
    while i > 0 || j > 0 {
        let here = get(&dist, i, j);
        if i > 0 && j > 0 {
            let keep = same(i - 1, j - 1);
            let cost = usize::from(!keep);
            if get(&dist, i - 1, j - 1).saturating_add(cost) == here {
                steps.push(if keep { Step::Keep } else { Step::Replace });
                i -= 1;
                j -= 1;
                continue;
            }
        }
        if i > 0 && get(&dist, i - 1, j).saturating_add(1) == here {
            steps.push(Step::Delete);
            i -= 1;
        } else {
            steps.push(Step::Insert);
            j -= 1;
        }
    }
    steps.reverse();

    let mut edits: Vec<LineEdit> = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);
    for step in steps {
        match step {
            Step::Keep => {
                i += 1;
                j += 1;
            }
            Step::Replace => {
                let line = new[j].as_ref().to_string();
                match edits.last_mut() {
                    Some(LineEdit::Replace { row, lines }) if *row + lines.len() == i => {
                        lines.push(line);
                    }
                    _ => edits.push(LineEdit::Replace {
                        row: i,
                        lines: vec![line],
                    }),
                }
                i += 1;
                j += 1;
            }
            Step::Delete => {
                edits.push(LineEdit::Delete { row: i });
                i += 1;
            }
            Step::Insert => {
                edits.push(LineEdit::Insert {
                    row: i,
                    line: new[j].as_ref().to_string(),
                });
                j += 1;
            }
        }
    }

    trace!(distance, edits = edits.len(), "computed edit script");
    Some(EditScript { edits, distance })
}

/// Replay `script` against the host, with old row 0 at document row `base_row`.
///
/// Callers run this inside [`TextEditor::transact`] so the host sees one logical change.
pub fn apply_edit_script<E: TextEditor + ?Sized>(
    editor: &mut E,
    script: &EditScript,
    base_row: usize,
) -> Result<(), EditorError> {
    let mut shift = 0isize;
    for edit in script.edits() {
        match edit {
            LineEdit::Replace { row, lines } => {
                let start = shifted(base_row + row, shift);
                editor.replace_lines(start, start + lines.len(), lines)?;
            }
            LineEdit::Insert { row, line } => {
                editor.insert_line(shifted(base_row + row, shift), line)?;
                shift += 1;
            }
            LineEdit::Delete { row } => {
                editor.delete_line(shifted(base_row + row, shift))?;
                shift -= 1;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        text.split(',').map(str::to_string).collect()
    }

    fn check(old: &str, new: &str, max: usize) -> Option<EditScript> {
        let old = lines(old);
        let new = lines(new);
        let script = shortest_edit_script(&old, &new, max)?;
        assert_eq!(script.apply_to(&old), new);
        Some(script)
    }

    #[test]
    fn test_identical_sequences() {
        let script = check("a,b,c", "a,b,c", 0).unwrap();
        assert!(script.is_empty());
        assert_eq!(script.distance(), 0);
    }

    #[test]
    fn test_single_insert_and_delete() {
        let script = check("a,c", "a,b,c", 3).unwrap();
        assert_eq!(
            script.edits(),
            &[LineEdit::Insert {
                row: 1,
                line: "b".to_string()
            }]
        );

        let script = check("a,b,c", "a,c", 3).unwrap();
        assert_eq!(script.edits(), &[LineEdit::Delete { row: 1 }]);
    }

    #[test]
    fn test_replace_runs_are_coalesced() {
        let script = check("a,b,c,d", "a,x,y,d", 3).unwrap();
        assert_eq!(script.distance(), 2);
        assert_eq!(
            script.edits(),
            &[LineEdit::Replace {
                row: 1,
                lines: vec!["x".to_string(), "y".to_string()]
            }]
        );
    }

    #[test]
    fn test_prefers_replace_over_insert_delete_pair() {
        let script = check("a,b", "a,c", 3).unwrap();
        assert_eq!(script.distance(), 1);
        assert!(matches!(script.edits(), [LineEdit::Replace { row: 1, .. }]));
    }

    #[test]
    fn test_bound_exceeded_returns_none() {
        assert!(check("a,b,c,d", "w,x,y,z", 3).is_none());
        assert!(check("a,b,c,d", "w,x,y,z", 4).is_some());
        assert!(check("", "a,b,c,d", 3).is_none());
        assert!(check("", "a,b,c", 3).is_some());
    }

    #[test]
    fn test_mixed_edits_shift_rows() {
        let script = check("h,x,1,2,3", "h,d,1,3,4", 3).unwrap();
        assert_eq!(script.distance(), 3);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(check("", "", 0).unwrap().is_empty());
        let script = check("a,b", "", 2).unwrap();
        assert_eq!(script.distance(), 2);
    }
}
