use std::io::{self, BufRead, Write};

/// Line-oriented question/answer over any reader and writer.
pub struct Prompter<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }

    /// Prints `prompt` and reads one trimmed line. End of input is an `UnexpectedEof` error.
    pub fn ask_line(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_owned())
    }

    /// `Ok(None)` when the answer is not an integer.
    pub fn ask_int(&mut self, prompt: &str) -> io::Result<Option<i64>> {
        Ok(self.ask_line(prompt)?.parse().ok())
    }

    pub fn ask_yes(&mut self, prompt: &str) -> io::Result<bool> {
        let answer = self.ask_line(prompt)?;
        Ok(matches!(answer.chars().next(), Some('y' | 'Y')))
    }
}
