use std::io::Write;

use log::error;

/// Where the interpreter sends everything it displays. The core never does I/O
/// on its own; `print`, `write` and `writeLine` all end up here.
pub trait Output {
    fn write(&mut self, text: &str);
    fn write_line(&mut self, text: &str);
}

/// Collects output in memory.
impl Output for String {
    fn write(&mut self, text: &str) {
        self.push_str(text);
    }

    fn write_line(&mut self, text: &str) {
        self.push_str(text);
        self.push('\n');
    }
}

/// Adapts any `std::io::Write`, e.g. stdout. Write failures are logged and dropped.
pub struct WriterOutput<W: Write> {
    writer: W,
}

impl<W: Write> WriterOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> Output for WriterOutput<W> {
    fn write(&mut self, text: &str) {
        let result = write!(self.writer, "{}", text).and_then(|_| self.writer.flush());
        if let Err(err) = result {
            error!("failed to write output: {}", err);
        }
    }

    fn write_line(&mut self, text: &str) {
        let result = writeln!(self.writer, "{}", text).and_then(|_| self.writer.flush());
        if let Err(err) = result {
            error!("failed to write output: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_output_appends() {
        let mut out = String::new();
        out.write("a");
        out.write_line("b");
        out.write_line("");
        assert_eq!(out, "ab\n\n");
    }

    #[derive(Default)]
    struct CountingWriter {
        bytes: Vec<u8>,
        flushes: usize,
    }

    impl Write for CountingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.bytes.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn writer_output_flushes_after_every_call() {
        let mut out = WriterOutput::new(CountingWriter::default());
        Output::write(&mut out, "a");
        Output::write_line(&mut out, "b");
        assert_eq!(out.writer.bytes, b"ab\n");
        assert_eq!(out.writer.flushes, 2);
    }

    #[test]
    fn writer_output_forwards_bytes() {
        let mut out = WriterOutput::new(Vec::new());
        out.write("x = ");
        out.write_line("1");
        assert_eq!(out.writer, b"x = 1\n");
    }
}
