use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::{derive_title, Note};
use crate::store::NoteStore;

/// Case-insensitive search over titles and bodies.
///
/// Ranking: exact title match, then title contains the term, then body contains it.
/// Within a rank, shorter titles first, then newest.
pub fn run<S: NoteStore>(store: &S, term: &str) -> Result<CmdResult> {
    let term_lower = term.trim().to_lowercase();
    if term_lower.is_empty() {
        return Ok(CmdResult::default());
    }

    let mut matches: Vec<(Note, String, u8)> = store
        .list_notes()?
        .into_iter()
        .filter_map(|note| {
            let title = derive_title(&note.text);
            let title_lower = title.to_lowercase();

            let score = if title_lower == term_lower {
                1
            } else if title_lower.contains(&term_lower) {
                2
            } else if note.text.to_lowercase().contains(&term_lower) {
                3
            } else {
                return None;
            };

            Some((note, title, score))
        })
        .collect();

    matches.sort_by(|(a, a_title, score_a), (b, b_title, score_b)| {
        score_a
            .cmp(score_b)
            .then(a_title.len().cmp(&b_title.len()))
            .then(b.date.cmp(&a.date))
    });

    let listed = matches.iter().map(|(n, _, _)| n.metadata()).collect();
    let notes = matches.into_iter().map(|(n, _, _)| n).collect();

    Ok(CmdResult::default()
        .with_listed_notes(listed)
        .with_affected_notes(notes))
}
