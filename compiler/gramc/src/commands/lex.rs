//! `gram lex`: the token stream, one JSON object per line.

use super::{document, load, reporter, CommandOptions};

pub fn lex_file(path: &str, options: &CommandOptions) -> bool {
    let Some((source, language)) = load(path, options) else {
        return false;
    };
    let text = document(&source);
    let tokens = match language.tokenize(text) {
        Ok(tokens) => tokens,
        Err(error) => {
            eprint!("{}", reporter(path, text).language_error(&error, &[]));
            return false;
        }
    };
    for token in &tokens {
        match serde_json::to_string(token) {
            Ok(line) => println!("{line}"),
            Err(error) => {
                eprintln!("error: cannot serialize token: {error}");
                return false;
            }
        }
    }
    true
}
