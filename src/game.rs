use crate::engine::{evaluate, prune_trie, Requirements, Trie};
use crate::protocol::{
    parse_command, parse_word, Command, LineReader, ProtocolError, INSERT_END, NEW_MATCH,
};
use std::io::{BufRead, Write};

pub enum MatchOutcome {
    /// The next match follows; the session should reset prune flags and loop.
    Continue,
    /// Input ran out at a record boundary; the session ends cleanly.
    EndOfInput,
}

/// Plays one match: reads the reference word and guess budget, then consumes
/// events until the match is decided, and finally the post-match directive.
pub fn play_match<R: BufRead, W: Write>(
    trie: &mut Trie,
    reader: &mut LineReader<R>,
    out: &mut W,
) -> Result<MatchOutcome, ProtocolError> {
    let word_len = trie.word_len();

    let Some(reference_line) = reader.next_line()? else {
        return Err(ProtocolError::UnexpectedEof {
            expected: "a reference word",
        });
    };
    let Some(reference) = parse_word(&reference_line, word_len) else {
        return Err(reader.bad_word(&reference_line));
    };

    let Some(count_line) = reader.next_line()? else {
        return Err(ProtocolError::UnexpectedEof {
            expected: "a guess count",
        });
    };
    let mut guesses_left: u32 = match count_line.trim().parse() {
        Ok(n) if n >= 1 => n,
        _ => {
            return Err(ProtocolError::BadGuessCount {
                line: reader.line_number(),
                found: count_line,
            })
        }
    };

    let mut reqs = Requirements::new(reference.into_bytes());
    let mut insert_pending = false;
    let mut last_count: usize = 0;

    while guesses_left > 0 {
        let Some(line) = reader.next_line()? else {
            return Ok(MatchOutcome::EndOfInput);
        };

        if line.starts_with('+') {
            match parse_command(&line) {
                Some(Command::PrintFiltered) => {
                    if insert_pending {
                        last_count = prune_trie(trie, &reqs, true);
                        insert_pending = false;
                    }
                    trie.write_alive(out)?;
                }
                Some(Command::InsertBegin) => {
                    read_insert_block(trie, reader)?;
                    insert_pending = true;
                    last_count = 0;
                }
                _ => return Err(reader.bad_command(&line)),
            }
            continue;
        }

        let Some(guess) = parse_word(&line, word_len) else {
            return Err(reader.bad_word(&line));
        };

        if &*guess == reqs.reference() {
            writeln!(out, "ok")?;
            break;
        }
        if !trie.contains(&guess) {
            // Unknown words do not cost a guess.
            writeln!(out, "not_exists")?;
            continue;
        }

        let feedback = evaluate(&guess, &mut reqs);
        out.write_all(&feedback)?;
        out.write_all(b"\n")?;
        // A live set of exactly one word cannot shrink further: the lone
        // survivor is the reference. Insert blocks reset the count to 0, so
        // the shortcut never skips a prune the insertion made necessary.
        if last_count != 1 {
            last_count = prune_trie(trie, &reqs, insert_pending);
        }
        insert_pending = false;
        writeln!(out, "{last_count}")?;
        guesses_left -= 1;
    }

    if guesses_left == 0 {
        writeln!(out, "ko")?;
    }

    // Post-match directive: end of input closes the session; an insert block
    // (dictionary only, no live requirements) may precede the new match.
    let Some(line) = reader.next_line()? else {
        return Ok(MatchOutcome::EndOfInput);
    };
    match parse_command(&line) {
        Some(Command::NewMatch) => Ok(MatchOutcome::Continue),
        Some(Command::InsertBegin) => {
            read_insert_block(trie, reader)?;
            expect_new_match(reader)?;
            Ok(MatchOutcome::Continue)
        }
        _ => Err(reader.bad_command(&line)),
    }
}

/// Reads words into the trie until the end-of-insert marker.
pub fn read_insert_block<R: BufRead>(
    trie: &mut Trie,
    reader: &mut LineReader<R>,
) -> Result<(), ProtocolError> {
    loop {
        let Some(line) = reader.next_line()? else {
            return Err(ProtocolError::UnexpectedEof {
                expected: INSERT_END,
            });
        };
        if line.starts_with('+') {
            return match parse_command(&line) {
                Some(Command::InsertEnd) => Ok(()),
                _ => Err(reader.bad_command(&line)),
            };
        }
        let Some(word) = parse_word(&line, trie.word_len()) else {
            return Err(reader.bad_word(&line));
        };
        trie.insert(&word);
    }
}

pub fn expect_new_match<R: BufRead>(reader: &mut LineReader<R>) -> Result<(), ProtocolError> {
    let Some(line) = reader.next_line()? else {
        return Err(ProtocolError::UnexpectedEof {
            expected: NEW_MATCH,
        });
    };
    if parse_command(&line) == Some(Command::NewMatch) {
        Ok(())
    } else {
        Err(reader.bad_command(&line))
    }
}
