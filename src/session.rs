use crate::engine::Trie;
use crate::game::{self, MatchOutcome};
use crate::protocol::{parse_command, parse_word, Command, LineReader, ProtocolError, NEW_MATCH};
use std::io::{BufRead, Write};

/// Runs a whole session: word size, initial dictionary, then matches until
/// the input runs out.
pub fn run<R: BufRead, W: Write>(input: R, mut out: W) -> Result<(), ProtocolError> {
    let mut reader = LineReader::new(input);

    let word_len = read_word_size(&mut reader)?;
    let mut trie = Trie::new(word_len);
    read_initial_dictionary(&mut trie, &mut reader)?;

    loop {
        match game::play_match(&mut trie, &mut reader, &mut out)? {
            MatchOutcome::Continue => trie.reset_pruning(),
            MatchOutcome::EndOfInput => break,
        }
    }
    out.flush()?;
    Ok(())
}

fn read_word_size<R: BufRead>(reader: &mut LineReader<R>) -> Result<usize, ProtocolError> {
    let Some(line) = reader.next_line()? else {
        return Err(ProtocolError::UnexpectedEof {
            expected: "a word size",
        });
    };
    match line.trim().parse::<usize>() {
        Ok(n) if (1..=255).contains(&n) => Ok(n),
        _ => Err(ProtocolError::BadWordSize {
            line: reader.line_number(),
            found: line,
        }),
    }
}

/// Reads words until the first new-match command. A single insert block may
/// sit between the plain word list and the command; its words land in the
/// trie exactly as if they had been part of the initial list.
fn read_initial_dictionary<R: BufRead>(
    trie: &mut Trie,
    reader: &mut LineReader<R>,
) -> Result<(), ProtocolError> {
    loop {
        let Some(line) = reader.next_line()? else {
            return Err(ProtocolError::UnexpectedEof {
                expected: NEW_MATCH,
            });
        };
        if line.starts_with('+') {
            return match parse_command(&line) {
                Some(Command::NewMatch) => Ok(()),
                Some(Command::InsertBegin) => {
                    game::read_insert_block(trie, reader)?;
                    game::expect_new_match(reader)
                }
                _ => Err(reader.bad_command(&line)),
            };
        }
        let Some(word) = parse_word(&line, trie.word_len()) else {
            return Err(reader.bad_word(&line));
        };
        trie.insert(&word);
    }
}
