/// Split delimited text into rows of trimmed fields.
///
/// Lines are split on `\n`; a line that is blank after trimming produces no
/// row. Within a line, fields are split on `,` unless inside a `"` span.
/// Every `"` toggles the quoted state and is dropped; there is no `""`
/// escape, so a doubled quote simply toggles twice.
pub fn parse_table(text: &str) -> Vec<Vec<String>> {
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(parse_line)
        .collect()
}

/// Split one line into trimmed fields. A line without a delimiter yields a
/// single field.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    // An unterminated quote still flushes whatever was collected.
    fields.push(current.trim().to_string());
    fields
}

/// Split parsed rows into the header row and the data rows.
pub fn split_header(mut rows: Vec<Vec<String>>) -> (Vec<String>, Vec<Vec<String>>) {
    if rows.is_empty() {
        return (Vec::new(), rows);
    }
    let header = rows.remove(0);
    (header, rows)
}
