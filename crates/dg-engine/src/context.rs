//! External-interface seams (spec §6 / §9 Design Notes): filesystem,
//! messaging, display, and input are all traits so the engine itself
//! never touches a real file handle or terminal. `tools/dg-cli` is the
//! only crate that supplies concrete implementations; tests use the
//! in-memory ones below.

use std::io;

use crate::error::RecordingError;

/// Everything the recording codec needs from a filesystem. A real
/// implementation wraps [`std::fs`]; tests can swap in an in-memory one
/// without touching disk.
pub trait FileIo {
    fn read_to_end(&mut self, path: &str) -> io::Result<Vec<u8>>;
    fn write_all(&mut self, path: &str, data: &[u8]) -> io::Result<()>;
    fn append(&mut self, path: &str, data: &[u8]) -> io::Result<()>;
}

/// One line of player-facing feedback. Kept as an owned `String` rather
/// than `&str` since most callers build these from formatted runtime
/// state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub important: bool,
}

/// The narrow channel combat/action resolution pushes flavor text
/// through; `inflict_damage` and friends stay pure and never hold one of
/// these themselves; callers that want messages thread a `&mut dyn
/// MessageSink` alongside the `Level`.
pub trait MessageSink {
    fn push(&mut self, message: Message);
}

/// What the renderer needs pushed to it after a turn resolves. No
/// concrete terminal/GUI drawing lives in this crate; this trait is the
/// seam a real front end implements.
pub trait DisplaySink {
    fn redraw(&mut self, level: &dg_types::level::Level);
}

/// A single logical input event, abstracted away from whatever raw
/// keystrokes produced it (spec §6, and the compressed keystroke table
/// in [`crate::recording`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Direction(usize),
    Confirm,
    Cancel,
    Quit,
    Raw(u16),
}

pub trait InputSource {
    fn next_event(&mut self) -> Option<InputEvent>;
}

/// A yes/no/cancel prompt, resolved either by a human or, during
/// playback, by a pre-recorded answer.
pub trait Prompter {
    fn confirm(&mut self, question: &str) -> bool;
}

/// The bundle of external-interface traits threaded through a call,
/// composed once per session rather than passed as four separate
/// parameters (spec §9's recommendation).
pub struct GameContext<'a> {
    pub file_io: &'a mut dyn FileIo,
    pub messages: &'a mut dyn MessageSink,
    pub display: &'a mut dyn DisplaySink,
    pub input: &'a mut dyn InputSource,
    pub prompts: &'a mut dyn Prompter,
}

impl<'a> GameContext<'a> {
    pub fn new(
        file_io: &'a mut dyn FileIo,
        messages: &'a mut dyn MessageSink,
        display: &'a mut dyn DisplaySink,
        input: &'a mut dyn InputSource,
        prompts: &'a mut dyn Prompter,
    ) -> Self {
        Self { file_io, messages, display, input, prompts }
    }
}

/// An in-process recording sink; `dg-cli`'s headless playback mode uses
/// this to collect messages without a terminal.
#[derive(Debug, Default)]
pub struct MessageLog {
    pub entries: Vec<Message>,
}

impl MessageSink for MessageLog {
    fn push(&mut self, message: Message) {
        self.entries.push(message);
    }
}

/// No-op display sink, for headless playback / non-interactive CLI runs.
#[derive(Debug, Default)]
pub struct NullDisplay;

impl DisplaySink for NullDisplay {
    fn redraw(&mut self, _level: &dg_types::level::Level) {}
}

/// Drains a pre-scripted sequence of events, the `InputSource` a
/// recording's playback mode uses in place of a live keyboard.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    events: std::collections::VecDeque<InputEvent>,
}

impl ScriptedInput {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self { events: events.into_iter().collect() }
    }
}

impl InputSource for ScriptedInput {
    fn next_event(&mut self) -> Option<InputEvent> {
        self.events.pop_front()
    }
}

/// Always-confirm prompter, for non-interactive playback where a
/// recorded run never actually pauses on a yes/no.
#[derive(Debug, Default)]
pub struct AutoConfirm;

impl Prompter for AutoConfirm {
    fn confirm(&mut self, _question: &str) -> bool {
        true
    }
}

/// Real-filesystem `FileIo`, the only implementation `tools/dg-cli`
/// wires up for actual play.
#[derive(Debug, Default)]
pub struct StdFileIo;

impl FileIo for StdFileIo {
    fn read_to_end(&mut self, path: &str) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write_all(&mut self, path: &str, data: &[u8]) -> io::Result<()> {
        std::fs::write(path, data)
    }

    fn append(&mut self, path: &str, data: &[u8]) -> io::Result<()> {
        use io::Write;
        let mut file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(data)
    }
}

/// Map a `FileIo` failure onto the engine's own recording error type, so
/// callers reading/writing a recording through a `GameContext` get the
/// same error enum regardless of which `FileIo` is behind it.
pub fn map_io_error(err: io::Error) -> RecordingError {
    RecordingError::Io(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_log_collects_pushed_messages_in_order() {
        let mut log = MessageLog::default();
        log.push(Message { text: "first".into(), important: false });
        log.push(Message { text: "second".into(), important: true });
        assert_eq!(log.entries.len(), 2);
        assert_eq!(log.entries[0].text, "first");
    }

    #[test]
    fn scripted_input_replays_events_in_order() {
        let mut input = ScriptedInput::new([InputEvent::Direction(2), InputEvent::Confirm]);
        assert_eq!(input.next_event(), Some(InputEvent::Direction(2)));
        assert_eq!(input.next_event(), Some(InputEvent::Confirm));
        assert_eq!(input.next_event(), None);
    }

    #[test]
    fn auto_confirm_always_answers_yes() {
        let mut p = AutoConfirm;
        assert!(p.confirm("descend?"));
    }
}
