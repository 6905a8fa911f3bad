use nom::{
    bytes::complete::{take_till1, take_while},
    IResult,
};
use std::ops::Range;

fn whitespace(input: &str) -> IResult<&str, &str> {
    take_while(char::is_whitespace)(input)
}

fn chunk(input: &str) -> IResult<&str, &str> {
    take_till1(char::is_whitespace)(input)
}

/// Splits `original_input` into whitespace-delimited chunks with their byte spans.
///
/// Chunks still carry their punctuation; trimming happens in the tokenizer.
pub fn split_with_spans(original_input: &str) -> Vec<(Range<usize>, &str)> {
    let mut input = original_input;
    let mut result = Vec::new();

    loop {
        // 1. Skip whitespace (Unicode aware, unlike multispace0)
        input = match whitespace(input) {
            Ok((next_input, _)) => next_input,
            Err(_) => break,
        };

        if input.is_empty() {
            break;
        }

        // 2. Take everything up to the next whitespace
        match chunk(input) {
            Ok((next_input, raw)) => {
                // `raw` is a subslice of `original_input`, so the offset is the consumed length
                let start = original_input.len() - input.len();
                result.push((start..start + raw.len(), raw));
                input = next_input;
            }
            Err(_) => break,
        }
    }

    result
}
