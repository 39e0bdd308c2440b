// SPDX-License-Identifier: GPL-3.0-only

use anyhow::{Context, Result};
use calloop::{
    channel::{self, Channel, Sender},
    signals::{Signal, Signals},
    EventLoop,
};
use tracing::{error, info, warn};

use crate::backend::{Compositor, HostEvent};
use crate::config::Config;
use crate::error::Error;
use crate::state::State;

/// Install the global `tracing` subscriber, honouring `RUST_LOG`
pub fn init_logger() -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("swt=info"));

    fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
        .context("Failed to install logger")?;

    Ok(())
}

/// Channel the compositor glue feeds events through
pub fn host_channel() -> (Sender<HostEvent>, Channel<HostEvent>) {
    channel::channel()
}

/// Run the window manager until asked to quit, a termination signal
/// arrives, or the compositor hangs up its end of `events`.
pub fn run<C: Compositor + 'static>(
    backend: C,
    config: Config,
    events: Channel<HostEvent>,
) -> Result<()> {
    let mut event_loop: EventLoop<'static, Runtime<C>> = EventLoop::try_new()
        .map_err(|err| Error::FatalInit(err.to_string()))
        .context("Failed to initialize event loop")?;

    let mut runtime = Runtime {
        state: State::new(backend, config),
        fatal: None,
    };
    runtime.state.setup();

    event_loop
        .handle()
        .insert_source(events, |event, _, runtime: &mut Runtime<C>| match event {
            channel::Event::Msg(event) => {
                if let Err(err) = runtime.state.handle_event(event) {
                    error!("Fatal error while handling event: {}", err);
                    runtime.fatal = Some(err);
                    runtime.state.should_stop = true;
                }
            }
            channel::Event::Closed => {
                info!("Compositor closed the event channel");
                runtime.state.should_stop = true;
            }
        })
        .map_err(|err| Error::FatalInit(err.error.to_string()))
        .context("Failed to initialize host event source")?;

    let signals = Signals::new(&[Signal::SIGINT, Signal::SIGTERM, Signal::SIGQUIT])
        .map_err(|err| Error::FatalInit(err.to_string()))
        .context("Failed to set up signal handling")?;
    event_loop
        .handle()
        .insert_source(signals, |event, _, runtime: &mut Runtime<C>| {
            warn!("Received {:?}, shutting down", event.signal());
            runtime.state.should_stop = true;
        })
        .map_err(|err| Error::FatalInit(err.error.to_string()))
        .context("Failed to initialize signal source")?;

    crate::spawn::ignore_child_exits()
        .map_err(|err| Error::FatalInit(err.to_string()))
        .context("Failed to stop tracking child processes")?;

    let loop_signal = event_loop.get_signal();

    info!("Starting event loop");

    // run the event loop
    event_loop
        .run(None, &mut runtime, |runtime| {
            // shall we shut down?
            if runtime.state.should_stop {
                info!("Shutting down");
                loop_signal.stop();
                loop_signal.wakeup();
            }
        })
        .context("Event loop failed")?;

    info!("Event loop exited");
    match runtime.fatal {
        Some(err) => Err(err).context("Window manager stopped on a fatal error"),
        None => Ok(()),
    }
}

/// Data owned by the event loop: the window manager plus a slot for the
/// error that stopped it
struct Runtime<C: Compositor> {
    state: State<C>,
    fatal: Option<Error>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::headless::Headless;
    use crate::backend::{ScreenHandle, WindowHandle};
    use smithay::{backend::input::KeyState, input::keyboard::{keysyms as xkb, ModifiersState}};

    #[test]
    fn stops_when_compositor_hangs_up() {
        let (sender, events) = host_channel();
        sender.send(HostEvent::NewScreen(ScreenHandle(1))).unwrap();
        sender.send(HostEvent::NewWindow(WindowHandle(1))).unwrap();
        sender.send(HostEvent::WindowDestroyed(WindowHandle(1))).unwrap();
        drop(sender);

        run(Headless::new(), Config::default(), events).unwrap();
    }

    #[test]
    fn stops_on_quit_binding() {
        let (sender, events) = host_channel();
        sender
            .send(HostEvent::Key {
                modifiers: ModifiersState {
                    logo: true,
                    shift: true,
                    ..Default::default()
                },
                keysym: xkb::KEY_e,
                state: KeyState::Pressed,
                time: 0,
            })
            .unwrap();

        run(Headless::new(), Config::default(), events).unwrap();
        drop(sender);
    }
}
