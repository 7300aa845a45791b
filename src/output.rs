//! Terminal output for ad-hoc queries and parse dumps

use crate::query::{QueryNode, Token};
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

fn stdout(color: bool) -> StandardStream {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

/// Print matching document names, one per line, followed by a count
pub fn print_matches(query: &str, docs: &[&str], color: bool) -> io::Result<()> {
    let mut stdout = stdout(color);

    for doc in docs {
        writeln!(stdout, "{}", doc)?;
    }

    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
    write!(stdout, "{}", docs.len())?;
    stdout.reset()?;
    write!(stdout, " documents match ")?;
    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
    writeln!(stdout, "{}", query)?;
    stdout.reset()?;

    Ok(())
}

/// Print the token stream and the indented expression tree
pub fn print_parse(tokens: &[Token], tree: &QueryNode, color: bool) -> io::Result<()> {
    let mut stdout = stdout(color);

    write!(stdout, "tokens: ")?;
    let rendered: Vec<String> = tokens.iter().map(|t| format!("{:?}", t.to_string())).collect();
    writeln!(stdout, "[{}]", rendered.join(", "))?;
    writeln!(stdout, "tree:")?;
    print_node(&mut stdout, tree, 1)?;

    Ok(())
}

fn print_node(stdout: &mut StandardStream, tree: &QueryNode, indent: usize) -> io::Result<()> {
    let mut stack = vec![(tree, indent)];
    while let Some((node, indent)) = stack.pop() {
        let pad = "  ".repeat(indent);
        match node {
            QueryNode::Leaf(word) => {
                write!(stdout, "{}", pad)?;
                stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
                writeln!(stdout, "{}", word)?;
                stdout.reset()?;
            }
            QueryNode::Binary { op, left, right } => {
                write!(stdout, "{}", pad)?;
                stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
                writeln!(stdout, "{}", op)?;
                stdout.reset()?;
                stack.push((right.as_ref(), indent + 1));
                stack.push((left.as_ref(), indent + 1));
            }
            QueryNode::Empty => {
                writeln!(stdout, "{}<empty>", pad)?;
            }
        }
    }
    Ok(())
}
