use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use nix::sys::signal::{self, SigHandler, Signal};

static INTERRUPTED: OnceLock<Arc<AtomicBool>> = OnceLock::new();

/// Install SIGINT/SIGTERM handlers that set the returned flag.
///
/// The first signal only sets the flag so that running work can wind down;
/// the handlers then revert to the default action, so a second signal
/// terminates the process. Calling this again returns the same flag.
pub fn install_interrupt_handler() -> nix::Result<Arc<AtomicBool>> {
    let flag = INTERRUPTED.get_or_init(|| Arc::new(AtomicBool::new(false)));

    // SAFETY: the handler only touches an already-initialised atomic and
    // calls sigaction, both async-signal-safe.
    unsafe {
        signal::signal(Signal::SIGINT, SigHandler::Handler(handle_interrupt))?;
        signal::signal(Signal::SIGTERM, SigHandler::Handler(handle_interrupt))?;
    }

    Ok(Arc::clone(flag))
}

extern "C" fn handle_interrupt(_: i32) {
    if let Some(flag) = INTERRUPTED.get() {
        flag.store(true, Ordering::SeqCst);
    }
    unsafe {
        let _ = signal::signal(Signal::SIGINT, SigHandler::SigDfl);
        let _ = signal::signal(Signal::SIGTERM, SigHandler::SigDfl);
    }
}
