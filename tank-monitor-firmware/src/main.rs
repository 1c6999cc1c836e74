#![no_std]
#![no_main]

mod inputs;

use assign_resources::assign_resources;
use defmt::{info, unwrap, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::{
    Peri,
    gpio::AnyPin,
    peripherals::{self},
    watchdog::Watchdog,
};
use embassy_time::{Duration, Instant, Ticker, Timer};
use inputs::GpioChannelReader;
#[cfg(feature = "panic-probe")]
use panic_probe as _;
use portable_atomic as _;
use tank_level::{DebouncedReader, MAX_CHANNELS, MonitorConfig};

assign_resources! {
    // GPIO25 is left alone, on a Pico W it is the CYW43 chip select rather than an LED
    status: StatusResources {
        watchdog: WATCHDOG,
    },
    probes: ProbeResources {
        ch0: PIN_0,
        ch1: PIN_1,
        ch2: PIN_2,
        ch3: PIN_3,
        ch4: PIN_4,
        ch5: PIN_5,
        ch6: PIN_6,
        ch7: PIN_7,
    },
}

#[derive(defmt::Format)]
enum BootReason {
    Normal,
    WatchdogTimeout,
    WatchdogForced,
}

#[cfg(not(feature = "panic-probe"))]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    let p = unsafe { embassy_rp::Peripherals::steal() };
    let r = split_resources!(p);

    let mut watchdog = Watchdog::new(r.status.watchdog);

    loop {
        // Keep the watchdog fed so the fault can be inspected rather than rebooting
        watchdog.feed();
        embassy_time::block_for(Duration::from_millis(50));
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    let r = split_resources!(p);

    info!("Version: {}", git_version::git_version!(fallback = "unknown"));
    info!("Boot reason: {}", boot_reason());

    spawner.must_spawn(watchdog_feed_task(r.status));
    spawner.must_spawn(tank_level_task(r.probes));

    #[cfg(feature = "test-panic-on-core-0")]
    spawner.must_spawn(dummy_panic());
}

#[embassy_executor::task]
async fn tank_level_task(r: ProbeResources) {
    let config = unwrap!(MonitorConfig::fresh_and_grey());
    let mut monitor = unwrap!(config.build());

    let pins: [Peri<'static, AnyPin>; MAX_CHANNELS] = [
        r.ch0.into(),
        r.ch1.into(),
        r.ch2.into(),
        r.ch3.into(),
        r.ch4.into(),
        r.ch5.into(),
        r.ch6.into(),
        r.ch7.into(),
    ];
    let gpio = GpioChannelReader::new(pins, config.channels());

    let mut reader = DebouncedReader::new(gpio, || Instant::now().as_millis(), config.debounce_ms);
    let mut ticker = Ticker::every(Duration::from_millis(config.poll_interval_ms));

    info!("Monitoring {} tanks", monitor.tank_count());

    loop {
        match monitor.sample(&mut reader) {
            Ok(events) => {
                for event in events {
                    info!(
                        "Tank {} level {}/{} ({}%, {}) was {}",
                        event.tank_id.as_str(),
                        event.new_level.value(),
                        event.probe_count,
                        event.fill_percentage(),
                        event.label.as_deref(),
                        event.previous_level
                    );
                }
            }
            Err(e) => warn!("Sampling failed: {}", e),
        }

        ticker.next().await;
    }
}

#[embassy_executor::task]
async fn watchdog_feed_task(r: StatusResources) {
    let mut watchdog = Watchdog::new(r.watchdog);
    watchdog.start(Duration::from_millis(600));

    loop {
        watchdog.feed();
        Timer::after_millis(500).await;
    }
}

#[cfg(feature = "test-panic-on-core-0")]
#[embassy_executor::task]
async fn dummy_panic() {
    Timer::after_secs(5).await;
    panic!("oh dear, how sad. nevermind...");
}

fn boot_reason() -> BootReason {
    let reason = embassy_rp::pac::WATCHDOG.reason().read();

    if reason.force() {
        BootReason::WatchdogForced
    } else if reason.timer() {
        BootReason::WatchdogTimeout
    } else {
        BootReason::Normal
    }
}
