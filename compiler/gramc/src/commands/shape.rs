//! `gram shape`: the extracted shape as JSON.

use super::{document, load, reporter, CommandOptions};

pub fn shape_file(path: &str, options: &CommandOptions) -> bool {
    let Some((source, language)) = load(path, options) else {
        return false;
    };
    let text = document(&source);
    let rule = options.rule_for(&language);
    let tokens = match language.tokenize(text) {
        Ok(tokens) => tokens,
        Err(error) => {
            eprint!("{}", reporter(path, text).language_error(&error, &[]));
            return false;
        }
    };
    let shape = language
        .parse_tokens(rule, &tokens)
        .and_then(|parse| language.shape_of(&parse));
    match shape.map(|shape| serde_json::to_string_pretty(&shape)) {
        Ok(Ok(json)) => {
            println!("{json}");
            true
        }
        Ok(Err(error)) => {
            eprintln!("error: cannot serialize shape: {error}");
            false
        }
        Err(error) => {
            eprint!("{}", reporter(path, text).language_error(&error, &tokens));
            false
        }
    }
}
