//! Interrupt handling for the interactive loop.
//!
//! At the prompt the line editor reports Ctrl-C itself. While a foreground child
//! runs, SIGINT reaches the shell as a signal; the handler below prints the same
//! farewell and ends the process without running any other code.

use nix::libc;
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};

const FAREWELL: &[u8] = b"\nGoodbye!\n";

extern "C" fn farewell(_signal: libc::c_int) {
    // Only async-signal-safe calls here.
    unsafe {
        libc::write(
            libc::STDOUT_FILENO,
            FAREWELL.as_ptr().cast(),
            FAREWELL.len(),
        );
        libc::_exit(0);
    }
}

/// Makes SIGINT print a farewell and exit the shell with status 0.
pub fn install_interrupt_handler() -> nix::Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(farewell),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    unsafe { sigaction(Signal::SIGINT, &action) }?;
    Ok(())
}
