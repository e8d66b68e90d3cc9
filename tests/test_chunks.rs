use std::io::{self, Read};

use rowcsv::{Reader, ReaderBuilder};

/// A non-seekable source that hands out its data in fixed, uneven pieces,
/// like a pipe would.
#[derive(Debug)]
struct ChunkReader<'a> {
    chunks: Vec<&'a [u8]>,
}

impl<'a> Read for ChunkReader<'a> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.chunks.is_empty() {
            return Ok(0);
        }
        let chunk: &'a [u8] = self.chunks[0];
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        if n == chunk.len() {
            self.chunks.remove(0);
        } else {
            self.chunks[0] = &chunk[n..];
        }
        Ok(n)
    }
}

fn parse_whole(data: &[u8]) -> Vec<Vec<String>> {
    Reader::from_reader(data)
        .into_rows()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

fn parse_chunks(chunks: Vec<&[u8]>, capacity: usize) -> Vec<Vec<String>> {
    ReaderBuilder::new()
        .buffer_capacity(capacity)
        .from_reader(ChunkReader { chunks })
        .into_rows()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

#[test]
fn test_chunks() {
    let input_chunks = vec![
        &b"col_a,col_b,col_c\r"[..],
        &b"\n0aaaa,\"0b,bbb\",0cccc\r\n1aaaa,1bbbb,\"1c\"\""[..],
        &b"cc\"\r"[..],
        &b"2aaaa,2bbbb"[..],
        &b",\"2cc\ncc\"\n"[..],
        &b"3aaaa,3bbbb,3cccc\n4aaaa,4bbbb,4cccc\n5aaaa,5bb"[..],
        &b"bb,5c\xC3"[..],
        &b"\xA9\n"[..],
        &b"6aaa"[..],
    ];
    let whole: Vec<u8> = input_chunks.concat();
    let expected = vec![
        vec!["col_a", "col_b", "col_c"],
        vec!["0aaaa", "0b,bbb", "0cccc"],
        vec!["1aaaa", "1bbbb", "1c\"cc"],
        vec!["2aaaa", "2bbbb", "2cc\ncc"],
        vec!["3aaaa", "3bbbb", "3cccc"],
        vec!["4aaaa", "4bbbb", "4cccc"],
        vec!["5aaaa", "5bbbb", "5c\u{e9}"],
        vec!["6aaa"],
    ];

    assert_eq!(parse_whole(&whole), expected);
    for &capacity in &[1, 2, 3, 7, 64, 8 * 1024] {
        assert_eq!(
            parse_chunks(input_chunks.clone(), capacity),
            expected,
            "capacity {}",
            capacity
        );
    }
}

// A chunk boundary between a closing quote and the character it drops.
#[test]
fn test_chunks_dropped_character() {
    let chunks = vec![&b"\"foo\""[..], &b"x,bar\n"[..]];
    assert_eq!(parse_chunks(chunks, 8 * 1024), vec![vec!["foo", "bar"]]);
}
