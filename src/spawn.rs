// SPDX-License-Identifier: GPL-3.0-only

use std::{
    os::unix::process::CommandExt,
    process::{Command, Stdio},
};
use tracing::{error, info, warn};

/// Hand exited children straight back to the kernel so launched programs
/// never linger as zombies without anyone waiting on them
pub fn ignore_child_exits() -> std::io::Result<()> {
    // SAFETY: SIG_IGN installs no handler code
    if unsafe { libc::signal(libc::SIGCHLD, libc::SIG_IGN) } == libc::SIG_ERR {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

/// Launch `command` in its own session and forget about it. How the program
/// ends is never observed.
pub fn spawn_detached(command: &[String]) {
    let [program, args @ ..] = command else {
        warn!("Empty command passed to spawn");
        return;
    };

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    // SAFETY: signal and setsid are async-signal-safe and touch no parent state
    unsafe {
        cmd.pre_exec(|| {
            // the launched program waits on its own children
            libc::signal(libc::SIGCHLD, libc::SIG_DFL);
            if libc::setsid() == -1 {
                return Err(std::io::Error::last_os_error());
            }
            Ok(())
        });
    }

    match cmd.spawn() {
        Ok(child) => {
            info!("Launched {} (pid {})", program, child.id());
        }
        Err(e) => {
            error!("Failed to execute {}: {}", program, e);
        }
    }
}
