use tabled::builder::Builder;
use tabled::settings::Style;

use crate::models::{Book, VocabEntry};

/// Render a header row plus data rows as a rounded text table.
pub fn render_table<H, R, C>(headers: H, rows: R) -> String
where
    H: IntoIterator,
    H::Item: Into<String>,
    R: IntoIterator<Item = C>,
    C: IntoIterator,
    C::Item: Into<String>,
{
    let mut builder = Builder::default();
    builder.push_record(headers.into_iter().map(Into::into));
    for row in rows {
        builder.push_record(row.into_iter().map(Into::into));
    }

    builder.build().with(Style::rounded()).to_string()
}

/// Search and listing results, headed by the book's languages.
pub fn vocab_table(book: &Book, entries: &[VocabEntry]) -> String {
    render_table(
        [book.language1.as_str(), book.language2.as_str(), "Definition"],
        entries.iter().map(|entry| {
            [
                entry.term1.clone(),
                entry.term2.clone(),
                entry.definition_text().to_string(),
            ]
        }),
    )
}

/// All books with their id, languages and description.
pub fn books_table(books: &[Book]) -> String {
    render_table(
        ["ID", "Name", "Language 1", "Language 2", "Description"],
        books.iter().map(|book| {
            [
                book.id.to_string(),
                book.name.clone(),
                book.language1.clone(),
                book.language2.clone(),
                book.description_text().to_string(),
            ]
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_headers_and_cells() {
        let table = render_table(["English", "Spanish"], [["apple", "manzana"]]);
        let lines: Vec<&str> = table.lines().collect();

        assert!(lines[0].starts_with('╭'));
        assert!(lines[1].contains("English") && lines[1].contains("Spanish"));
        assert!(table.contains("apple"));
        assert!(table.contains("manzana"));
        assert!(lines.last().unwrap().starts_with('╰'));
    }

    #[test]
    fn vocab_table_uses_book_languages_as_headers() {
        let book = Book {
            id: 1,
            name: "ENSP".into(),
            language1: "English".into(),
            language2: "Spanish".into(),
            description: None,
        };
        let entries = [VocabEntry {
            id: 1,
            book_id: 1,
            term1: "apple".into(),
            term2: "manzana".into(),
            definition: None,
        }];

        let table = vocab_table(&book, &entries);
        let header = table.lines().nth(1).unwrap();
        assert!(header.contains("English"));
        assert!(header.contains("Definition"));
        assert!(table.lines().nth(3).unwrap().contains("apple"));
    }
}
