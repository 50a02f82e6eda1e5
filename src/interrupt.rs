//! Ctrl-C while the terminal is waiting for an answer.
//!
//! Hidden password entry switches the terminal to raw mode and turns Ctrl-C
//! into a `SIGINT` it raises itself, before the terminal is restored. Under
//! the default disposition that signal kills the process with the terminal
//! still in raw mode, so a handler has to be installed before prompting.

use std::{
    error::Error,
    io,
    sync::atomic::{AtomicBool, Ordering},
};

/// How a process ended by `SIGINT` conventionally exits.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

static PROMPT_HANDLES_INTERRUPTS: AtomicBool = AtomicBool::new(false);

/// Exit quietly with [`INTERRUPTED_EXIT_CODE`] when Ctrl-C is pressed.
///
/// During a hidden prompt the prompt is left to restore the terminal and
/// fail with [`io::ErrorKind::Interrupted`] instead, see [`is_interrupted()`].
#[cfg(unix)]
pub fn exit_on_interrupt() -> io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .build()?;
    // the handler is installed here, before the first prompt
    let mut interrupts = {
        let _guard = runtime.enter();
        signal(SignalKind::interrupt())?
    };

    std::thread::Builder::new()
        .name(String::from("interrupts"))
        .spawn(move || {
            runtime.block_on(async {
                while interrupts.recv().await.is_some() {
                    if !PROMPT_HANDLES_INTERRUPTS.load(Ordering::SeqCst) {
                        std::process::exit(INTERRUPTED_EXIT_CODE);
                    }

                    log::debug!("Leaving the interrupt to the prompt");
                }
            })
        })?;

    Ok(())
}

#[cfg(not(unix))]
pub fn exit_on_interrupt() -> io::Result<()> { Ok(()) }

/// Run a prompt which reacts to Ctrl-C by itself.
pub(crate) fn prompt_handling_interrupts<T>(prompt: impl FnOnce() -> T) -> T {
    PROMPT_HANDLES_INTERRUPTS.store(true, Ordering::SeqCst);
    let answer = prompt();
    PROMPT_HANDLES_INTERRUPTS.store(false, Ordering::SeqCst);

    answer
}

/// Did the user give up on a prompt with Ctrl-C somewhere down this chain of
/// errors?
pub fn is_interrupted(error: &(dyn Error + 'static)) -> bool {
    let mut cause = Some(error);

    while let Some(current) = cause {
        if let Some(e) = current.downcast_ref::<io::Error>() {
            if e.kind() == io::ErrorKind::Interrupted {
                return true;
            }
        }

        cause = current.source();
    }

    false
}
