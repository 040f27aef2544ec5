// Library root
// -----------
// This crate exposes a small library surface for the `perp` binary, which
// wires these modules into an interactive shell.
//
// Module responsibilities:
// - `api`: the chat-completion client (wire types, `ChatApi` trait and the
//   blocking HTTP implementation).
// - `command`: parses one input line into a `Command`.
// - `session`: the credential and the client bound to it.
// - `ui`: the prompt loop that dispatches commands.
// - `config` / `logging`: command-line options and tracing setup.
//
// The loop only sees `ChatApi` through a `Connector`, so tests can run it
// against a fake client and in-memory buffers.
pub mod api;
pub mod command;
pub mod config;
pub mod logging;
pub mod session;
pub mod ui;
