//! Width-aware layout of documents.
//!
//! Groups are decided outermost first. When a group is reached in broken
//! mode it is measured flat, together with everything that follows it up to
//! the next break opportunity of its surroundings. If that fits in the
//! remaining width the group is printed flat, otherwise broken. A group
//! containing a hard line is always broken.

use gram_ir::LineKind;
use gram_stack::ensure_sufficient_stack;
use rustc_hash::FxHashSet;

use crate::config::PrintConfig;
use crate::doc::Doc;
use crate::emitter::{Emitter, StringEmitter};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Mode {
    Flat,
    Break,
}

#[derive(Copy, Clone)]
struct Command<'d> {
    indent: usize,
    mode: Mode,
    doc: &'d Doc,
}

/// Render `doc` to a string.
pub fn render(doc: &Doc, config: &PrintConfig) -> String {
    let mut emitter = StringEmitter::new();
    render_to(doc, config, &mut emitter);
    emitter.output()
}

/// Render `doc` into `emitter`.
pub fn render_to<E: Emitter>(doc: &Doc, config: &PrintConfig, emitter: &mut E) {
    let mut hard = FxHashSet::default();
    collect_hard_groups(doc, &mut hard);
    let unit = config.indent_unit();

    let mut column = 0;
    let mut commands = vec![Command {
        indent: 0,
        mode: Mode::Break,
        doc,
    }];
    while let Some(command) = commands.pop() {
        match command.doc {
            Doc::Text(text) => {
                emitter.emit(text);
                column += text_width(text);
            }
            Doc::Concat(parts) => {
                commands.extend(parts.iter().rev().map(|doc| Command { doc, ..command }));
            }
            Doc::Indent(inner) => commands.push(Command {
                indent: command.indent + 1,
                doc: inner,
                ..command
            }),
            Doc::Group(inner) => {
                let broken = hard.contains(&address(command.doc));
                let flat = Command {
                    mode: Mode::Flat,
                    doc: inner,
                    ..command
                };
                let mode = match command.mode {
                    Mode::Flat if !broken => Mode::Flat,
                    Mode::Break
                        if !broken
                            && fits(
                                flat,
                                &commands,
                                config.max_width.saturating_sub(column),
                                &hard,
                            ) =>
                    {
                        Mode::Flat
                    }
                    _ => Mode::Break,
                };
                commands.push(Command { mode, ..flat });
            }
            Doc::Line(kind) => match (command.mode, kind) {
                (Mode::Flat, LineKind::Default) => {
                    emitter.emit(" ");
                    column += 1;
                }
                (Mode::Flat, LineKind::Soft) => {}
                (Mode::Break, _) | (_, LineKind::Hard) => {
                    emitter.emit_newline();
                    emitter.emit_indent(command.indent, &unit);
                    column = command.indent * config.indent_width;
                }
            },
        }
    }
}

/// Does `next`, followed by `rest` up to its first possible line break, fit
/// in `width` columns?
fn fits(next: Command<'_>, rest: &[Command<'_>], width: usize, hard: &FxHashSet<usize>) -> bool {
    let mut remaining = width;
    let mut rest_index = rest.len();
    let mut pending = vec![(next.mode, next.doc)];
    loop {
        let (mode, doc) = if let Some(entry) = pending.pop() {
            entry
        } else {
            let Some(index) = rest_index.checked_sub(1) else {
                return true;
            };
            rest_index = index;
            (rest[index].mode, rest[index].doc)
        };
        match doc {
            Doc::Text(text) => match remaining.checked_sub(text_width(text)) {
                Some(left) => remaining = left,
                None => return false,
            },
            Doc::Concat(parts) => pending.extend(parts.iter().rev().map(|part| (mode, part))),
            Doc::Indent(inner) => pending.push((mode, inner)),
            Doc::Group(inner) => {
                let mode = if hard.contains(&address(doc)) {
                    Mode::Break
                } else {
                    mode
                };
                pending.push((mode, inner));
            }
            Doc::Line(kind) => match (mode, kind) {
                (Mode::Break, _) | (_, LineKind::Hard) => return true,
                (Mode::Flat, LineKind::Default) => match remaining.checked_sub(1) {
                    Some(left) => remaining = left,
                    None => return false,
                },
                (Mode::Flat, LineKind::Soft) => {}
            },
        }
    }
}

/// Record every group that contains a hard line. Returns whether `doc` does.
fn collect_hard_groups(doc: &Doc, hard: &mut FxHashSet<usize>) -> bool {
    ensure_sufficient_stack(|| match doc {
        Doc::Text(_) => false,
        Doc::Line(kind) => *kind == LineKind::Hard,
        Doc::Indent(inner) => collect_hard_groups(inner, hard),
        Doc::Group(inner) => {
            let contains = collect_hard_groups(inner, hard);
            if contains {
                hard.insert(address(doc));
            }
            contains
        }
        Doc::Concat(parts) => parts
            .iter()
            .fold(false, |found, part| collect_hard_groups(part, hard) || found),
    })
}

fn address(doc: &Doc) -> usize {
    std::ptr::from_ref(doc) as usize
}

fn text_width(text: &str) -> usize {
    text.chars().count()
}
