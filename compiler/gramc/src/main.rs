//! Gram CLI
//!
//! Tokenize, parse, shape and format files with the bundled languages.

use gramc::commands::{format_files, lex_file, parse_file, shape_file, CommandOptions};
use gramc::languages;

fn main() {
    gramc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];
    let options = match CommandOptions::parse(&args[2..]) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("error: {message}");
            eprintln!("Run 'gram help' for usage");
            std::process::exit(1);
        }
    };

    let ok = match command.as_str() {
        "lex" => each_file(command, &options, lex_file),
        "parse" => each_file(command, &options, parse_file),
        "shape" => each_file(command, &options, shape_file),
        "fmt" => format_files(&options),
        "languages" => list_languages(),
        "help" | "--help" | "-h" => {
            print_usage();
            true
        }
        "version" | "--version" | "-V" => {
            println!("gram {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            false
        }
    };

    if !ok {
        std::process::exit(1);
    }
}

/// Run `handler` on every file, continuing past failures.
fn each_file(
    command: &str,
    options: &CommandOptions,
    handler: fn(&str, &CommandOptions) -> bool,
) -> bool {
    if options.files.is_empty() {
        eprintln!("Usage: gram {command} <file> [options]");
        return false;
    }
    let mut ok = true;
    for path in &options.files {
        ok &= handler(path, options);
    }
    ok
}

fn list_languages() -> bool {
    match languages::all() {
        Ok(all) => {
            for language in all {
                println!("{:<8} {}", language.name(), language.extensions().join(", "));
            }
            true
        }
        Err(error) => {
            eprintln!("error: {error}");
            false
        }
    }
}

fn print_usage() {
    println!("Gram: reversible grammars");
    println!();
    println!("Usage: gram <command> [files...] [options]");
    println!();
    println!("Commands:");
    println!("  lex <file>           Tokenize and print tokens as JSON lines");
    println!("  parse <file>         Parse and print the tree outline");
    println!("  shape <file>         Parse and print the extracted shape as JSON");
    println!("  fmt <files...>       Reprint files through their grammar");
    println!("  languages            List the bundled languages");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Options:");
    println!("  --lang=<name>        Language, instead of choosing by extension");
    println!("  --rule=<name>        Rule to parse with (default: the language entry)");
    println!("  --width=<n>          Maximum line width for fmt");
    println!("  --indent=<n>         Spaces per indentation level for fmt");
    println!("  --tabs               Indent with tabs");
    println!("  --check              Report files fmt would change, without writing");
    println!();
    println!("Environment:");
    println!("  RUST_LOG             Log filter (default: warn)");
    println!("  GRAM_LOG_TREE        Log as an indented call tree");
}
