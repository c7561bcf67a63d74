use thiserror::Error;

use crate::books::Book;

/// Internal faults of the title rule. Callers never see these; `resolve_title`
/// reports them and falls back.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TitleError {
    #[error("book {b_id} has no title block")]
    MissingTitle { b_id: String },
    #[error("book {b_id} belongs to a series without a series title")]
    MissingSeriesTitle { b_id: String },
}

/// Derive the one display title of a book record.
///
/// Missing or deleted books render no title. A series title wins over the
/// book's own main title, with an episode prefix put in front of whichever
/// wins. Malformed combinations degrade to `title.main` (or `""` when the
/// record has no title at all) after reporting the fault.
pub fn resolve_title(book: Option<&Book>) -> String {
    let book = match book {
        Some(book) => book,
        None => return String::new(),
    };
    if book.is_deleted {
        return String::new();
    }
    match try_title(book) {
        Ok(title) => title,
        Err(err) => {
            log::error!("title resolution failed: {}", err);
            book.title
                .as_ref()
                .map(|title| title.main.clone())
                .unwrap_or_default()
        }
    }
}

fn try_title(book: &Book) -> Result<String, TitleError> {
    let title = book.title.as_ref().ok_or_else(|| TitleError::MissingTitle {
        b_id: book.b_id.clone(),
    })?;
    let prefix = title.prefix.as_deref().filter(|prefix| !prefix.is_empty());

    if let Some(series) = book.series.as_ref() {
        let series_title = series
            .property
            .title
            .as_deref()
            .filter(|series_title| !series_title.is_empty());
        return match (prefix, series_title) {
            (Some(prefix), Some(series_title)) => Ok(format!("{} {}", prefix, series_title)),
            (Some(_), None) => Err(TitleError::MissingSeriesTitle {
                b_id: book.b_id.clone(),
            }),
            (None, Some(series_title)) => Ok(series_title.to_string()),
            (None, None) => Ok(title.main.clone()),
        };
    }

    match prefix {
        Some(prefix) => Ok(format!("{} {}", prefix, title.main)),
        None => Ok(title.main.clone()),
    }
}
