//! Controller bring-up.
//!
//! Order: control lines low, generators started, heartbeat running, signal
//! bridge claimed, stack started and drained until on, then the dispatcher
//! loop. The heartbeat is independent of the radio path, so a missing
//! bridge or a stack that refuses to start leaves it running on its own.

use bluetooth::BleStack;
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use platform::{Console, OutputPin, PwmChannel};

use crate::dispatcher::WriteDispatcher;
use crate::error::FirmwareError;
use crate::front_end::FrontEnd;
use crate::heartbeat::run_heartbeat;
use crate::signal_bridge::SignalBridge;

/// Put the front end in its power-on state.
pub fn prepare_front_end<P, W>(front_end: &mut FrontEnd<P, W>) -> Result<(), FirmwareError>
where
    P: OutputPin,
    W: PwmChannel,
{
    front_end.reset_lines()?;
    front_end.start_indicators()
}

/// Run the controller forever.
///
/// `bridge` is the result of [`claim_bridge`](crate::claim_bridge). When it
/// is an error the dispatcher is never started and only the heartbeat runs.
pub async fn run_controller<M, S, P, W, C, H>(
    mut dispatcher: WriteDispatcher<'_, M, S, P, W, C>,
    bridge: Result<&SignalBridge, FirmwareError>,
    heartbeat_console: H,
) -> !
where
    M: RawMutex,
    S: BleStack,
    P: OutputPin,
    W: PwmChannel,
    C: Console,
    H: Console,
{
    let registers = dispatcher.registers();
    match select(
        run_heartbeat(registers, heartbeat_console),
        run_radio(&mut dispatcher, bridge),
    )
    .await
    {
        Either::First(never) | Either::Second(never) => never,
    }
}

async fn run_radio<M, S, P, W, C>(
    dispatcher: &mut WriteDispatcher<'_, M, S, P, W, C>,
    bridge: Result<&SignalBridge, FirmwareError>,
) -> !
where
    M: RawMutex,
    S: BleStack,
    P: OutputPin,
    W: PwmChannel,
    C: Console,
{
    let bridge = match bridge {
        Ok(bridge) => bridge,
        Err(err) => {
            log_error!("dispatcher not started: {}", err.as_str());
            park().await
        }
    };
    if let Err(err) = dispatcher.start_stack().await {
        log_error!("dispatcher not started: {}", err.as_str());
        park().await
    }
    dispatcher.run(bridge).await
}

async fn park() -> ! {
    loop {
        core::future::pending::<()>().await;
    }
}
