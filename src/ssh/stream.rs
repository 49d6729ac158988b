// ABOUTME: Line-oriented streaming of remote command output.
// ABOUTME: Splits channel data into lines and hands them to a caller-supplied sink.

/// Which remote stream a line arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputChannel {
    Stdout,
    Stderr,
}

/// Receives output lines from a remote command as they are produced.
///
/// A sink is supplied per command invocation, so the session layer is never
/// coupled to a particular console. The CLI reporter implements this; tests
/// use recording sinks.
pub trait LineSink: Send + Sync {
    fn line(&self, channel: OutputChannel, line: &str);
}

/// Splits arriving byte chunks into complete lines.
///
/// Remote data arrives on arbitrary chunk boundaries; a line is emitted only
/// once its terminator has arrived. The unterminated tail is flushed at
/// end-of-stream.
#[derive(Default)]
pub(crate) struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub(crate) fn push(&mut self, data: &[u8], mut emit: impl FnMut(&str)) {
        self.pending.extend_from_slice(data);
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let rest = self.pending.split_off(pos + 1);
            let mut line = std::mem::replace(&mut self.pending, rest);
            line.pop(); // the newline itself
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            emit(&String::from_utf8_lossy(&line));
        }
    }

    pub(crate) fn finish(self, mut emit: impl FnMut(&str)) {
        if !self.pending.is_empty() {
            emit(&String::from_utf8_lossy(&self.pending));
        }
    }
}
