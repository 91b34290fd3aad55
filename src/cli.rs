//! Interactive harness: reads a grammar from stdin, builds the parser and
//! drives token streams through it.
//!
//! Declarations and rules are read as whitespace-separated tokens, so they
//! may be split across lines freely. After construction, each input line is
//! one token stream; a blank line or EOF ends the session.

use crate::error::{GrammarError, Result};
use crate::first_follow::{compute_first_sets, compute_follow_sets};
use crate::grammar::GrammarBuilder;
use crate::left_factoring::left_factor;
use crate::left_recursion::eliminate_left_recursion;
use crate::ll1::{Ll1Parser, Verdict};
use crate::report;
use crate::symbol::DOLLAR_NAME;
use std::collections::VecDeque;
use std::env;
use std::io::{self, BufRead};
use std::path::PathBuf;

/// Main CLI runner. An optional positional argument names a directory to
/// write the analysis artifacts into.
pub fn run() -> Result<()> {
    let artifact_dir = env::args().nth(1).map(PathBuf::from);
    let stdin = io::stdin();
    let mut input = TokenReader::new(stdin.lock());

    let parser = read_and_build(&mut input)?;
    print!("{}", report::render_table(&parser));

    if let Some(dir) = artifact_dir {
        report::write_artifacts(&dir, &parser)?;
        println!("Artifacts written to {}", dir.display());
    }

    println!("Enter token streams to parse, one per line (empty line to quit):");
    while let Some(line) = input.next_line()? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }
        let mut tokens: Vec<String> = trimmed.split_whitespace().map(String::from).collect();
        tokens.push(DOLLAR_NAME.to_string());
        match parser.parse(&tokens) {
            Verdict::Accepted => println!("Accepted"),
            Verdict::Rejected(reason) => println!("Rejected: {}", reason),
        }
    }

    Ok(())
}

/// Reads the grammar, transforms it and builds the LL(1) parser, echoing
/// each stage.
fn read_and_build<R: BufRead>(input: &mut TokenReader<R>) -> Result<Ll1Parser> {
    println!(
        "Symbol names must not contain whitespace, `]` or `_`. Use \"ε\" for the empty derivation."
    );

    let mut builder = GrammarBuilder::new();

    println!("Enter number of non-terminals:");
    let n = input.count()?;
    println!("Enter {} non-terminals:", n);
    for _ in 0..n {
        let name = input.token()?;
        builder.nonterminal(&name)?;
    }

    println!("Enter number of terminals:");
    let n = input.count()?;
    println!("Enter {} terminals:", n);
    for _ in 0..n {
        let name = input.token()?;
        builder.terminal(&name)?;
    }

    println!("Enter number of production rules:");
    let n = input.count()?;
    println!("Enter {} production rules (format: A -> [ a B c ]):", n);
    for _ in 0..n {
        let rule = input.rule()?;
        builder.rule(&rule)?;
    }

    println!("Enter start symbol:");
    let start = input.token()?;
    let mut grammar = builder.start(&start)?;

    println!("\nYou entered:\n{}", report::render_grammar(&grammar));

    eliminate_left_recursion(&mut grammar);
    left_factor(&mut grammar);
    println!(
        "After eliminating left recursion and left factoring:\n{}",
        report::render_grammar(&grammar)
    );

    let first_sets = compute_first_sets(&grammar);
    let follow_sets = compute_follow_sets(&grammar, &first_sets);
    print!("{}", report::render_sets(&grammar, &first_sets, &follow_sets));

    Ll1Parser::build(grammar, first_sets, follow_sets)
}

/// Whitespace-token reader over buffered lines.
struct TokenReader<R: BufRead> {
    lines: io::Lines<R>,
    buffer: VecDeque<String>,
}

impl<R: BufRead> TokenReader<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            buffer: VecDeque::new(),
        }
    }

    /// Next whitespace-separated token, reading further lines as needed.
    fn token(&mut self) -> Result<String> {
        loop {
            if let Some(token) = self.buffer.pop_front() {
                return Ok(token);
            }
            match self.lines.next() {
                Some(line) => self
                    .buffer
                    .extend(line?.split_whitespace().map(String::from)),
                None => {
                    return Err(GrammarError::InvalidFormat(
                        "unexpected end of input".to_string(),
                    ));
                }
            }
        }
    }

    fn count(&mut self) -> Result<usize> {
        let token = self.token()?;
        token
            .parse()
            .map_err(|_| GrammarError::InvalidFormat(format!("expected a count, got {:?}", token)))
    }

    /// Reads one production rule: tokens up to and including the closing
    /// `]`, rejoined for the grammar builder.
    fn rule(&mut self) -> Result<String> {
        let mut tokens = Vec::new();
        loop {
            let token = self.token()?;
            let done = token == "]";
            tokens.push(token);
            if done {
                return Ok(tokens.join(" "));
            }
        }
    }

    /// Next input line, draining any tokens still buffered first.
    fn next_line(&mut self) -> Result<Option<String>> {
        if !self.buffer.is_empty() {
            let line = self.buffer.drain(..).collect::<Vec<_>>().join(" ");
            return Ok(Some(line));
        }
        match self.lines.next() {
            Some(line) => Ok(Some(line?)),
            None => Ok(None),
        }
    }
}
